//! Run events and the end-of-run report.
//!
//! Events are emitted through `tracing` as the runner moves between
//! states; the report summarises a whole run and can be printed as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{GraphName, RunState, Step};

/// Unique identifier for a runner invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event emitted while a run progresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub id: Uuid,
    pub run_id: RunId,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl RunEvent {
    pub fn new(run_id: RunId, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// The event payload, tagged by type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    /// The runner moved to a new state.
    StateChanged { from: RunState, to: RunState },
    /// A statement completed.
    QuerySucceeded { step: Step, rows: u64 },
    /// A statement failed; the error was logged and the run continued.
    QueryFailed { step: Step, error: String },
}

/// Outcome of one statement within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub ok: bool,
    pub rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn succeeded(step: Step, rows: u64) -> Self {
        Self {
            step,
            ok: true,
            rows,
            error: None,
        }
    }

    pub fn failed(step: Step, error: impl Into<String>) -> Self {
        Self {
            step,
            ok: false,
            rows: 0,
            error: Some(error.into()),
        }
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub graph: GraphName,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub final_state: RunState,
    pub outcomes: Vec<StepOutcome>,
    #[serde(default)]
    pub events: Vec<RunEvent>,
}

impl RunReport {
    pub fn new(run_id: RunId, graph: GraphName) -> Self {
        Self {
            run_id,
            graph,
            started_at: Utc::now(),
            finished_at: None,
            final_state: RunState::Disconnected,
            outcomes: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn push_event(&mut self, payload: EventPayload) {
        self.events.push(RunEvent::new(self.run_id, payload));
    }

    pub fn finish(&mut self, state: RunState) {
        self.final_state = state;
        self.finished_at = Some(Utc::now());
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }

    /// Number of statements that failed but did not stop the run.
    pub fn failed_queries(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}
