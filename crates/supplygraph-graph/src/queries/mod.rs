//! Read queries run after ingestion.

pub mod verify;

pub use verify::{all_supply_links, company_subgraph, NodeRef, SubgraphRow, SupplyLink};
