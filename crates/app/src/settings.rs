//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `TRADELEDGER__*` environment variables,
//! e.g. `TRADELEDGER__APP__LEVEL=debug`.
//!
//! ```toml
//! database = { sqlite = "tradeledger.db" }
//!
//! [app]
//! level = "info"
//!
//! [ledger]
//! output = "journal.ledger"
//! ```
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("tradeledger.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct Ledger {
    /// Where `export` writes the journal when no `--output` is given.
    pub output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub ledger: Ledger,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_file(File::with_name("settings").required(false))
    }

    fn with_file<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("TRADELEDGER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::with_file(File::from_str(toml, FileFormat::Toml)).unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(
            settings.database,
            Database::Sqlite("tradeledger.db".to_string())
        );
        assert_eq!(settings.ledger.output, None);
    }

    #[test]
    fn reads_every_section() {
        let settings = parse(
            r#"
            database = { sqlite = "/tmp/ledger.db" }

            [app]
            level = "debug"

            [ledger]
            output = "journal.ledger"
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(
            settings.database,
            Database::Sqlite("/tmp/ledger.db".to_string())
        );
        assert_eq!(settings.ledger.output.as_deref(), Some("journal.ledger"));
    }

    #[test]
    fn memory_database() {
        assert_eq!(parse(r#"database = "memory""#).database, Database::Memory);
    }
}
