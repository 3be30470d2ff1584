//! Application settings.
//!
//! Loaded from an optional `config.toml` next to the binary, overridable via
//! `FINLEDGER__`-prefixed environment variables
//! (e.g. `FINLEDGER__SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

/// Where the ledger lives.
///
/// `database = "memory"` for an in-memory SQLite (useful for demos),
/// `database = { sqlite = "finledger.db" }` for a file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("FINLEDGER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
