//! agecheck-graph: Apache AGE client.
//!
//! Owns a single Postgres connection, puts `ag_catalog` on its search
//! path, and runs Cypher through the `cypher()` table function. Graph
//! values come back as opaque [`Agtype`] text.

pub mod agtype;
pub mod client;
pub mod mutations;
pub mod queries;
pub mod session;
pub mod statements;

pub use agtype::Agtype;
pub use client::{AgeClient, GraphError, QueryParam, QueryRequest};
pub use session::{AgeConnector, Connector, GraphSession};
