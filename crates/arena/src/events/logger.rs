//! Encounter Log
//!
//! Append-only JSONL log of decisions, attacks and phase changes.

use bevy_ecs::prelude::*;
use encounter_events::{generate_event_id, EncounterEvent, EventKind};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Resource for logging encounter events to a JSONL file
#[derive(Resource)]
pub struct EncounterLog {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl EncounterLog {
    /// Create a new log writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a log that only counts events
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Generate the next event ID
    pub fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Get the current event count
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log an event to the file
    pub fn log(&mut self, event: &EncounterEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Builds and logs an event with the next ID. Write failures are
    /// reported and otherwise ignored so a full disk never stops a run.
    pub fn record(&mut self, tick: u64, agent_id: &str, kind: EventKind) {
        let event = EncounterEvent::new(self.next_id(), tick, agent_id, kind);
        if let Err(e) = self.log(&event) {
            tracing::warn!("Failed to write event {}: {}", event.event_id, e);
        }
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EncounterLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush encounter log: {}", e);
        }
    }
}
