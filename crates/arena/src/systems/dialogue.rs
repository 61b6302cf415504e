//! Dialogue System
//!
//! Asserts the interrupt flag during scheduled tick windows, standing in
//! for conversations that freeze combat.

use bevy_ecs::prelude::*;
use std::fmt;
use std::str::FromStr;

use crate::resources::ArenaClock;

/// Half-open tick range `[start, end)` during which dialogue is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueWindow {
    pub start: u64,
    pub end: u64,
}

impl DialogueWindow {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, tick: u64) -> bool {
        (self.start..self.end).contains(&tick)
    }
}

/// Error parsing a `START:END` window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWindowError {
    /// Not two `:`-separated parts
    InvalidFormat,
    /// A bound is not a non-negative integer
    InvalidTick(String),
    /// `END` is not after `START`
    EmptyWindow { start: u64, end: u64 },
}

impl fmt::Display for ParseWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWindowError::InvalidFormat => write!(f, "expected START:END"),
            ParseWindowError::InvalidTick(s) => write!(f, "invalid tick '{}'", s),
            ParseWindowError::EmptyWindow { start, end } => {
                write!(f, "window end {} must be after start {}", end, start)
            }
        }
    }
}

impl std::error::Error for ParseWindowError {}

impl FromStr for DialogueWindow {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once(':').ok_or(ParseWindowError::InvalidFormat)?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| ParseWindowError::InvalidTick(part.to_string()))
        };
        let start = parse(start)?;
        let end = parse(end)?;
        if end <= start {
            return Err(ParseWindowError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for DialogueWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Resource: Scheduled dialogue windows and whether one is active now
#[derive(Resource, Debug, Clone, Default)]
pub struct DialogueSchedule {
    windows: Vec<DialogueWindow>,
    active: bool,
}

impl DialogueSchedule {
    pub fn new(windows: Vec<DialogueWindow>) -> Self {
        Self {
            windows,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_scheduled(&self, tick: u64) -> bool {
        self.windows.iter().any(|w| w.contains(tick))
    }
}

/// System: Update the dialogue flag for the current tick
pub fn advance_dialogue(clock: Res<ArenaClock>, mut schedule: ResMut<DialogueSchedule>) {
    let active = schedule.is_scheduled(clock.tick);
    if active != schedule.active {
        if active {
            tracing::info!("Dialogue started at tick {}", clock.tick);
        } else {
            tracing::info!("Dialogue ended at tick {}", clock.tick);
        }
        schedule.active = active;
    }
}
