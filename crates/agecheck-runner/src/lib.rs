//! agecheck-runner: Smoke test for an Apache AGE database.
//!
//! Connects once, puts `ag_catalog` on the search path, runs a Cypher read
//! and a parameterized Cypher write against one graph, and reports what
//! happened.

pub mod error;
pub mod runner;

pub use error::RunnerError;
pub use runner::GraphQueryRunner;
