//! Shared data types for the learning encounter controller.
//!
//! This crate contains pure data structures with no decision logic: the
//! discrete state and action vocabulary, the persisted value-table record,
//! and the event lines written by the arena logger. Positions and directions
//! are `glam::Vec3`, re-exported here. It is a dependency for all other
//! crates in the workspace.

pub mod action;
pub mod event;
pub mod record;
pub mod state_key;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use action::{Action, ActionValues, ACTION_COUNT};
pub use event::{generate_event_id, EncounterEvent, EventKind, Phase};
pub use glam::Vec3;
pub use record::ValueRecord;
pub use state_key::{
    ParseStateKeyError, StateKey, BEARING_BUCKETS, MAX_DISTANCE_BUCKET,
};
