//! # Team Events
//!
//! Progress events emitted while a pipeline runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of team event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamEventKind {
    /// Pipeline started
    PipelineStarted,
    /// Agent started working
    AgentStarted,
    /// Agent produced real content
    AgentCompleted,
    /// Agent's model call failed (the pipeline keeps going)
    AgentFailed,
    /// All four stages finished
    PipelineCompleted,
}

/// An event in a team run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEvent {
    /// Unique event ID
    pub id: String,
    /// ID shared by every event of one `Team::run` call
    #[serde(default)]
    pub run_id: String,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Kind of event
    pub kind: TeamEventKind,
    /// Agent that produced this event
    pub agent: String,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl TeamEvent {
    /// Create a new event
    pub fn new(kind: TeamEventKind, agent: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            run_id: String::new(),
            timestamp: Utc::now(),
            kind,
            agent: agent.to_string(),
            data: None,
        }
    }

    /// Tag the event with the run it belongs to
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
