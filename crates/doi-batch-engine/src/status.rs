//! Workflow states and the events that move a record between them.
//!
//! A record *holds* a state (`draft`, `registered`, `findable`); the
//! registry is *sent* an event (`hide`, `register`, `publish`) to change it.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Draft,
    Registered,
    Findable,
    Unknown,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Draft => "draft",
            WorkflowState::Registered => "registered",
            WorkflowState::Findable => "findable",
            WorkflowState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowEvent {
    Publish,
    Register,
    Hide,
}

impl WorkflowEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowEvent::Publish => "publish",
            WorkflowEvent::Register => "register",
            WorkflowEvent::Hide => "hide",
        }
    }

    /// Parse an exact (already normalized) event name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "publish" => Some(WorkflowEvent::Publish),
            "register" => Some(WorkflowEvent::Register),
            "hide" => Some(WorkflowEvent::Hide),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a free-form status string to a canonical state.
pub fn normalize_state(raw: &str) -> WorkflowState {
    match raw.trim().to_lowercase().as_str() {
        "draft" => WorkflowState::Draft,
        "registered" => WorkflowState::Registered,
        "findable" => WorkflowState::Findable,
        _ => WorkflowState::Unknown,
    }
}

/// The event that moves a record into `state`.
pub fn event_for_state(state: WorkflowState) -> Option<WorkflowEvent> {
    match state {
        WorkflowState::Findable => Some(WorkflowEvent::Publish),
        WorkflowState::Registered => Some(WorkflowEvent::Register),
        WorkflowState::Draft => Some(WorkflowEvent::Hide),
        WorkflowState::Unknown => None,
    }
}

/// Resolve operator input that names either a target state or an event.
pub fn resolve_event(raw: &str) -> Option<WorkflowEvent> {
    let normalized = raw.trim().to_lowercase();
    WorkflowEvent::from_name(&normalized).or_else(|| event_for_state(normalize_state(&normalized)))
}
