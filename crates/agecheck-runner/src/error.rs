//! Error types for the agecheck-runner crate.

use thiserror::Error;

use agecheck_core::AgeCheckError;
use agecheck_graph::GraphError;

/// Failures that end a run. Query failures are not errors here: they are
/// logged and recorded in the report.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to connect: {0}")]
    Connect(#[source] GraphError),

    #[error("Failed to set search path: {0}")]
    Configure(#[source] GraphError),

    #[error("Failed to create graph {graph}: {source}")]
    Bootstrap {
        graph: String,
        #[source]
        source: GraphError,
    },

    #[error("Config error: {0}")]
    Config(#[from] AgeCheckError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
