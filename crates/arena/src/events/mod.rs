//! Event logging for arena runs.

pub mod logger;

pub use logger::EncounterLog;
