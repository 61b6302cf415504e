//! Event Types
//!
//! Structured records of what an agent did, one JSON object per line in the
//! arena's event log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::Action;
use crate::state_key::StateKey;

/// Controller phase, as reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Normal,
    Retreating,
    Interrupted,
    PostInterruptPause,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Normal => "normal",
            Phase::Retreating => "retreating",
            Phase::Interrupted => "interrupted",
            Phase::PostInterruptPause => "post_interrupt_pause",
        };
        f.write_str(s)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum EventKind {
    /// A decision period elapsed and a new action was chosen
    Decision {
        state: StateKey,
        action: Action,
        /// Reward credited to the previous action, if there was one
        #[serde(skip_serializing_if = "Option::is_none")]
        reward: Option<f32>,
        /// Chosen at random rather than greedily
        explored: bool,
    },
    /// The agent hit the target and started retreating
    Attack { damage: f32, distance: f32 },
    /// The controller moved between phases
    PhaseChanged { from: Phase, to: Phase },
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEvent {
    pub event_id: String,
    pub tick: u64,
    pub agent_id: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl EncounterEvent {
    pub fn new(event_id: impl Into<String>, tick: u64, agent_id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            agent_id: agent_id.into(),
            kind,
        }
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
