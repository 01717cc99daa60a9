//! AGE connection management.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection, Row};

use agecheck_core::ConnectionConfig;

use crate::agtype::Agtype;
use crate::statements;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Session configuration error: {0}")]
    Configuration(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Session search path not configured; call configure_session first")]
    SessionNotConfigured,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A bind parameter for a [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Agtype(Agtype),
}

/// A statement plus its ordered bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, param: QueryParam) -> Self {
        self.params.push(param);
        self
    }
}

/// A single connection to an AGE-enabled Postgres server.
///
/// Graph queries are refused until [`AgeClient::configure_session`] has
/// put `ag_catalog` on the search path.
pub struct AgeClient {
    conn: PgConnection,
    configured: bool,
}

impl AgeClient {
    /// Connect using the given configuration.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, GraphError> {
        config
            .validate()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .statement_cache_capacity(config.statement_cache_capacity)
            .application_name("agecheck");

        let connected = match config.connect_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), options.connect())
                .await
                .map_err(|_| GraphError::Connection(format!("timed out after {secs}s")))?,
            None => options.connect().await,
        };
        let conn = connected.map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to Postgres"
        );
        Ok(Self {
            conn,
            configured: false,
        })
    }

    /// Put `ag_catalog` on the session search path.
    pub async fn configure_session(&mut self) -> Result<(), GraphError> {
        sqlx::query(statements::SEARCH_PATH)
            .persistent(false)
            .execute(&mut self.conn)
            .await
            .map_err(|e| GraphError::Configuration(e.to_string()))?;
        self.configured = true;
        tracing::debug!("Search path set to ag_catalog");
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Run a query returning a single `agtype` column and collect the rows.
    pub async fn fetch_agtype(&mut self, request: QueryRequest) -> Result<Vec<Agtype>, GraphError> {
        self.ensure_configured()?;
        let QueryRequest { sql, params } = request;
        let rows = bind_all(sqlx::query(&sql), params)
            .fetch_all(&mut self.conn)
            .await?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            values.push(row.try_get::<Agtype, _>(0)?);
        }
        Ok(values)
    }

    /// Run a query returning a single boolean.
    pub async fn fetch_bool(&mut self, request: QueryRequest) -> Result<bool, GraphError> {
        self.ensure_configured()?;
        let QueryRequest { sql, params } = request;
        let row = bind_all(sqlx::query(&sql), params)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(row.try_get::<bool, _>(0)?)
    }

    /// Run a statement, discarding any rows. Returns rows affected.
    pub async fn execute(&mut self, request: QueryRequest) -> Result<u64, GraphError> {
        self.ensure_configured()?;
        let QueryRequest { sql, params } = request;
        let result = bind_all(sqlx::query(&sql), params)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Gracefully terminate the connection.
    pub async fn close(self) -> Result<(), GraphError> {
        self.conn
            .close()
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;
        tracing::debug!("Connection closed");
        Ok(())
    }

    fn ensure_configured(&self) -> Result<(), GraphError> {
        if self.configured {
            Ok(())
        } else {
            Err(GraphError::SessionNotConfigured)
        }
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Bind parameters in order. Statements are never persisted: AGE's
/// `cypher()` does not survive prepared statement reuse.
fn bind_all(mut query: PgQuery<'_>, params: Vec<QueryParam>) -> PgQuery<'_> {
    for param in params {
        query = match param {
            QueryParam::Text(value) => query.bind(value),
            QueryParam::Agtype(value) => query.bind(value),
        };
    }
    query.persistent(false)
}
