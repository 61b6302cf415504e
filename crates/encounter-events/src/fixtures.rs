//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // encounter-events = { path = "../encounter-events", features = ["test-fixtures"] }
//!
//! use encounter_events::fixtures;
//!
//! let record = fixtures::sample_record();
//! ```

use crate::{EncounterEvent, ValueRecord};

/// Returns a small learned table as a persisted record.
///
/// Contains 6 keys; close-range keys penalise `move_toward`, mid-range
/// keys favour it, and the far key penalises idling.
pub fn sample_record() -> ValueRecord {
    let json = include_str!("../tests/fixtures/sample_table.json");
    ValueRecord::from_json(json).expect("Failed to parse sample_table.json")
}

/// Returns the raw text of the sample table, for tests that write it to disk.
pub fn sample_record_json() -> &'static str {
    include_str!("../tests/fixtures/sample_table.json")
}

/// Returns sample log lines from one short encounter.
///
/// Contains 3 decisions, 1 attack and 4 phase changes.
pub fn sample_events() -> Vec<EncounterEvent> {
    let jsonl = include_str!("../tests/fixtures/sample_events.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            EncounterEvent::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse event line: {}\nError: {}", l, e)
            })
        })
        .collect()
}
