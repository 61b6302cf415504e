//! Agent Components
//!
//! Identity, roles, the player's wander route and the soldiers' brains.

use bevy_ecs::prelude::*;
use encounter_events::{Phase, Vec3};
use qlite_core::EncounterController;

/// Component: Stable identifier used in logs and reports
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn player() -> Self {
        Self("player".to_string())
    }

    pub fn soldier(index: usize) -> Self {
        Self(format!("soldier_{:02}", index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Marker component for the target everyone chases
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker component for learning soldiers
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Soldier;

/// Component: Closed loop of waypoints the player walks
#[derive(Component, Debug, Clone)]
pub struct Wander {
    pub waypoints: Vec<Vec3>,
    /// Index of the waypoint being walked to
    pub next: usize,
    /// Distance at which a waypoint counts as reached
    pub arrive_radius: f32,
}

impl Wander {
    pub fn new(waypoints: Vec<Vec3>, arrive_radius: f32) -> Self {
        Self {
            waypoints,
            next: 0,
            arrive_radius,
        }
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.next).copied()
    }
}

/// Component: A soldier's learning controller and its running tallies
#[derive(Component, Debug)]
pub struct Brain {
    pub controller: EncounterController,
    pub attacks: u32,
    pub decisions: u32,
    pub explored: u32,
}

impl Brain {
    pub fn new(controller: EncounterController) -> Self {
        Self {
            controller,
            attacks: 0,
            decisions: 0,
            explored: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }
}
