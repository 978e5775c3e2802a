//! Application configuration.
//!
//! Loaded once at process start from a TOML or YAML file and passed
//! explicitly to every component that needs it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{SupplyError, SupplyResult};

/// Environment variable that overrides `database.password`.
pub const PASSWORD_ENV: &str = "SUPPLYGRAPH_DB_PASSWORD";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Connection parameters for the target graph database.
///
/// Every key is required; there are no defaults for credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Name of the database that gets recreated and loaded.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Placeholders that data-frame exports write for missing cells.
pub const DEFAULT_MISSING_VALUES: &[&str] = &[
    "-1.#IND", "1.#QNAN", "1.#IND", "-1.#QNAN", "#N/A N/A", "#N/A", "N/A", "n/a", "NA",
    "<NA>", "#NA", "NULL", "null", "NaN", "-NaN", "nan", "-nan", "None",
];

/// Location and dialect of the four input files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub dir: PathBuf,
    pub delimiter: char,
    pub companies: String,
    pub suppliers: String,
    pub company_supplier: String,
    pub supplier_supplier: String,
    /// Cell values treated as missing in addition to blank cells.
    pub missing_values: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./import"),
            delimiter: ';',
            companies: "companies.csv".to_string(),
            suppliers: "suppliers.csv".to_string(),
            company_supplier: "company-supplier.csv".to_string(),
            supplier_supplier: "supplier-supplier.csv".to_string(),
            missing_values: DEFAULT_MISSING_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ImportConfig {
    pub fn companies_path(&self) -> PathBuf {
        self.dir.join(&self.companies)
    }

    pub fn suppliers_path(&self) -> PathBuf {
        self.dir.join(&self.suppliers)
    }

    pub fn company_supplier_path(&self) -> PathBuf {
        self.dir.join(&self.company_supplier)
    }

    pub fn supplier_supplier_path(&self) -> PathBuf {
        self.dir.join(&self.supplier_supplier)
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> SupplyResult<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                SupplyError::config(format!("import.delimiter must be ASCII, got {:?}", self.delimiter))
            })
    }
}

/// What to do with an edge row whose endpoints do not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// No edge is created and the row is counted as skipped.
    #[default]
    Lenient,
    /// The row is recorded as a failure.
    Strict,
}

/// What to do when a row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and continue with the next row.
    #[default]
    Continue,
    /// Stop the run at the first failed row.
    Abort,
}

/// Ingestion behavior and verification query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub edge_policy: EdgePolicy,
    pub failure_policy: FailurePolicy,
    pub subgraph_company: String,
    pub subgraph_depth: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::Lenient,
            failure_policy: FailurePolicy::Continue,
            subgraph_company: "company_A".to_string(),
            subgraph_depth: 10,
        }
    }
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything that is not YAML is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

impl AppConfig {
    /// Read and parse the configuration file, then apply environment overrides.
    pub fn load(path: &Path) -> SupplyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SupplyError::config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let mut config = Self::parse(&content, ConfigFormat::from_path(path))
            .map_err(|e| SupplyError::config(format!("{}: {}", path.display(), e)))?;

        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            debug!("Using database password from {}", PASSWORD_ENV);
            config.database.password = password;
        }

        Ok(config)
    }

    /// Parse configuration text in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
[database]
url = "bolt://localhost:7687"
user = "neo4j"
password = "secret"
name = "supplychain"

[import]
dir = "data"

[ingest]
edge_policy = "strict"
"#;

    #[test]
    fn test_parse_toml() {
        let config = AppConfig::parse(TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(config.database.url(), "bolt://localhost:7687");
        assert_eq!(config.database.user(), "neo4j");
        assert_eq!(config.database.password(), "secret");
        assert_eq!(config.database.name(), "supplychain");
        assert_eq!(config.import.companies_path(), PathBuf::from("data/companies.csv"));
        assert_eq!(config.import.delimiter, ';');
        assert_eq!(config.ingest.edge_policy, EdgePolicy::Strict);
        assert_eq!(config.ingest.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.ingest.subgraph_company, "company_A");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "database:\n  user: neo4j\n  password: pw\n  name: supply\n  url: neo4j://db:7687\n";
        let config = AppConfig::parse(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.database.name(), "supply");
        assert_eq!(config.database.url(), "neo4j://db:7687");
        assert_eq!(config.import.supplier_supplier_path(), PathBuf::from("./import/supplier-supplier.csv"));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let toml = "[database]\nurl = \"bolt://x\"\nuser = \"u\"\nname = \"n\"\n";
        let err = AppConfig::parse(toml, ConfigFormat::Toml).unwrap_err();
        assert!(err.contains("password"), "unexpected error: {}", err);
    }

    #[test]
    fn test_load_yaml_file_with_password_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config_develop.yml");
        std::fs::write(
            &path,
            "database:\n  user: neo4j\n  password: from-file\n  name: supply\n  url: bolt://db:7687\n",
        )
        .unwrap();

        std::env::set_var(PASSWORD_ENV, "from-env");
        let loaded = AppConfig::load(&path);
        std::env::remove_var(PASSWORD_ENV);

        let config = loaded.unwrap();
        assert_eq!(config.database.password(), "from-env");
        assert_eq!(config.database.name(), "supply");
        assert_eq!(config.database.url(), "bolt://db:7687");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match AppConfig::load(&path) {
            Err(SupplyError::Config(msg)) => assert!(msg.contains("absent.toml"), "unexpected message: {}", msg),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[database]\nurl = \"bolt://x\"\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, SupplyError::Config(ref msg) if msg.contains("broken.toml")));
    }

    #[test]
    fn test_default_missing_values_cover_data_frame_placeholders() {
        let import = ImportConfig::default();
        for marker in ["nan", "NA", "N/A", "n/a", "None", "<NA>", "#N/A", "-nan", "NULL"] {
            assert!(import.missing_values.iter().any(|m| m == marker), "missing {}", marker);
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("config_develop.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("supplygraph.toml")), ConfigFormat::Toml);
    }

    #[test]
    fn test_delimiter_must_be_ascii() {
        let mut import = ImportConfig::default();
        assert_eq!(import.delimiter_byte().unwrap(), b';');
        import.delimiter = '§';
        assert!(import.delimiter_byte().is_err());
    }
}
