//! agecheck-core: Shared types, configuration, and error handling for agecheck.
//!
//! This crate provides the foundational types used by the graph client
//! and the runner:
//! - Graph names and the runner's state machine
//! - Run events and the end-of-run report
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::{AppConfig, ConnectionConfig, RunConfig};
pub use error::AgeCheckError;
pub use events::{EventPayload, RunEvent, RunId, RunReport, StepOutcome};
pub use types::{GraphName, RunState, Step};
