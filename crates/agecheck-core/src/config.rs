//! Configuration management for agecheck.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (AGECHECK__ prefix, `__` separator)
//! 2. Config file (agecheck.toml by default)
//! 3. Defaults, which target the local AGE test database

use serde::{Deserialize, Serialize};

use crate::error::{AgeCheckError, Result};
use crate::types::GraphName;

/// Connection parameters for the AGE-enabled Postgres server.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Prepared statement cache size. AGE misbehaves with cached
    /// statements, so this stays at 0 unless explicitly overridden.
    #[serde(default)]
    pub statement_cache_capacity: usize,

    /// Give up connecting after this many seconds. Unset waits forever.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl ConnectionConfig {
    /// Reject configurations that cannot possibly connect.
    pub fn validate(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(AgeCheckError::InvalidConnection("user is empty".into()));
        }
        if self.host.trim().is_empty() {
            return Err(AgeCheckError::InvalidConnection("host is empty".into()));
        }
        if self.database.trim().is_empty() {
            return Err(AgeCheckError::InvalidConnection("database is empty".into()));
        }
        if self.port == 0 {
            return Err(AgeCheckError::InvalidConnection("port must be non-zero".into()));
        }
        Ok(())
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("user", &self.user)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("password", &"***")
            .field("port", &self.port)
            .field("statement_cache_capacity", &self.statement_cache_capacity)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            host: default_host(),
            database: default_database(),
            password: default_password(),
            port: default_port(),
            statement_cache_capacity: 0,
            connect_timeout_secs: None,
        }
    }
}

/// What a run does once connected.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Graph the queries run against.
    #[serde(default)]
    pub graph: GraphName,

    /// Value bound to the `name` property of the created Person node.
    #[serde(default = "default_person_name")]
    pub person_name: String,

    /// Create the graph first if it does not exist.
    #[serde(default)]
    pub create_graph: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            graph: GraphName::default(),
            person_name: default_person_name(),
            create_graph: false,
        }
    }
}

/// Full agecheck configuration.
///
/// Loaded from the `[database]` and `[run]` sections of the config file
/// or `AGECHECK__DATABASE__*` / `AGECHECK__RUN__*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub database: ConnectionConfig,

    #[serde(default)]
    pub run: RunConfig,
}

impl AppConfig {
    /// Load configuration from `<file_prefix>.toml` (optional) and the
    /// environment. Missing sections fall back to defaults.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("AGECHECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = cfg.try_deserialize()?;
        app.database.validate()?;

        tracing::debug!(
            host = %app.database.host,
            port = app.database.port,
            database = %app.database.database,
            graph = %app.run.graph,
            "Loaded configuration"
        );
        Ok(app)
    }
}

fn default_user() -> String {
    "testuser".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_database() -> String {
    "testdb".to_string()
}

fn default_password() -> String {
    "testpass".to_string()
}

fn default_port() -> u16 {
    5433
}

fn default_person_name() -> String {
    "Tom".to_string()
}
