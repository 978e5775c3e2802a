//! Terminal output formatting.

use colored::Colorize;

use supplygraph_graph::queries::{SubgraphRow, SupplyLink};
use supplygraph_graph::{IngestReport, TableKind};

/// Failures listed in full before the list is cut short.
const MAX_LISTED_FAILURES: usize = 20;

/// Print the per-table counters and the failed rows of an ingestion run.
pub fn print_report(report: &IngestReport) {
    println!();
    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>8}",
        "Table", "Rows", "Loaded", "Skipped", "Failed"
    );
    println!("{}", "-".repeat(56));

    for table in TableKind::ALL {
        let stats = report.stats(table);
        let failed = if stats.failed > 0 {
            stats.failed.to_string().red()
        } else {
            stats.failed.to_string().normal()
        };
        let skipped = if stats.skipped > 0 {
            stats.skipped.to_string().yellow()
        } else {
            stats.skipped.to_string().normal()
        };
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>8}",
            table.as_str(),
            stats.rows,
            stats.loaded.to_string().green(),
            skipped,
            failed
        );
    }

    if report.is_clean() {
        println!("\n{}", "All rows loaded.".green().bold());
        return;
    }

    if !report.setup_failures.is_empty() {
        println!("\n{}:", "Database preparation failed".red().bold());
        for failure in &report.setup_failures {
            println!("  {} {}", "✗".red(), failure);
        }
    }
    if report.failures.is_empty() {
        return;
    }

    println!(
        "\n{} ({}):",
        "Failed rows".red().bold(),
        report.failures.len()
    );
    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        println!("  {} {}", "✗".red(), failure);
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        println!(
            "  {}",
            format!("... and {} more", report.failures.len() - MAX_LISTED_FAILURES).dimmed()
        );
    }
}

pub fn print_supply_links(links: &[SupplyLink]) {
    println!("\n{} ({}):", "Supply links".bold(), links.len());
    if links.is_empty() {
        println!("{}", "  No results.".dimmed());
        return;
    }
    for (i, link) in links.iter().enumerate() {
        println!("{} {}", format!("{:>4}.", i + 1).dimmed(), link);
    }
}

pub fn print_subgraph(company: &str, rows: &[SubgraphRow]) {
    println!(
        "\n{} {} ({}):",
        "Supplier subgraph of".bold(),
        company.cyan(),
        rows.len()
    );
    if rows.is_empty() {
        println!("{}", "  No results.".dimmed());
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        println!("{} {}", format!("{:>4}.", i + 1).dimmed(), row);
    }
}
