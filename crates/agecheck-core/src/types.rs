//! Core domain types shared by the graph client and the runner.

use serde::{Deserialize, Serialize};

use crate::error::{AgeCheckError, Result};

// ── Graph Name ────────────────────────────────────────────────────

/// AGE rejects graph names shorter than this.
const MIN_GRAPH_NAME_LEN: usize = 3;
/// Postgres NAMEDATALEN - 1.
const MAX_GRAPH_NAME_LEN: usize = 63;

/// A validated AGE graph name.
///
/// Graph names are interpolated into the `cypher()` call as a quoted
/// literal, so only plain identifiers are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GraphName(String);

impl GraphName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: &'static str| AgeCheckError::InvalidGraphName {
            name: name.clone(),
            reason,
        };

        if name.len() < MIN_GRAPH_NAME_LEN {
            return Err(invalid("must be at least 3 characters"));
        }
        if name.len() > MAX_GRAPH_NAME_LEN {
            return Err(invalid("must be at most 63 characters"));
        }

        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(invalid("must start with a letter or underscore")),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("may only contain letters, digits, and underscores"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GraphName {
    fn default() -> Self {
        Self("testgraph".to_string())
    }
}

impl std::fmt::Display for GraphName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GraphName {
    type Error = AgeCheckError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<GraphName> for String {
    fn from(value: GraphName) -> Self {
        value.0
    }
}

// ── Run State ─────────────────────────────────────────────────────

/// Progress of a single runner invocation. Transitions are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Disconnected,
    Connected,
    SearchPathSet,
    ReadAttempted,
    WriteAttempted,
    Done,
}

impl RunState {
    /// The only state reachable from `self`, if any.
    pub fn successor(self) -> Option<RunState> {
        match self {
            Self::Disconnected => Some(Self::Connected),
            Self::Connected => Some(Self::SearchPathSet),
            Self::SearchPathSet => Some(Self::ReadAttempted),
            Self::ReadAttempted => Some(Self::WriteAttempted),
            Self::WriteAttempted => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether graph queries may be issued from this state.
    pub fn allows_queries(self) -> bool {
        matches!(
            self,
            Self::SearchPathSet | Self::ReadAttempted | Self::WriteAttempted
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::SearchPathSet => "search_path_set",
            Self::ReadAttempted => "read_attempted",
            Self::WriteAttempted => "write_attempted",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// The statements a run issues, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SearchPath,
    CreateGraph,
    Read,
    Write,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SearchPath => "search_path",
            Self::CreateGraph => "create_graph",
            Self::Read => "read",
            Self::Write => "write",
        };
        f.write_str(s)
    }
}
