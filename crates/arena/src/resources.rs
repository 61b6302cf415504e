//! Arena Resources
//!
//! Global state shared by the systems: the clock and the seeded RNG.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

/// Resource: Current tick and fixed timestep
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaClock {
    pub tick: u64,
    /// Simulated seconds per tick
    pub dt: f32,
}

impl ArenaClock {
    pub fn new(dt: f32) -> Self {
        Self { tick: 0, dt }
    }

    /// Simulated seconds elapsed at the start of the current tick
    pub fn elapsed(&self) -> f32 {
        self.tick as f32 * self.dt
    }
}

/// Resource: Seeded RNG for arena-level randomness (spawns, wandering).
/// Each soldier's brain has its own RNG.
#[derive(Resource)]
pub struct ArenaRng(pub SmallRng);
