//! Body Components
//!
//! Position, movement, knockback and health.

use bevy_ecs::prelude::*;
use encounter_events::Vec3;
use qlite_core::{horizontal, Actuator};

/// Component: Where an entity is and which way it faces
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Horizontal unit vector
    pub forward: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Turns the facing toward `heading` with exponential smoothing.
    /// Headings without horizontal extent leave the facing alone.
    pub fn turn_toward(&mut self, heading: Vec3, smoothing: f32, dt: f32) {
        let heading = horizontal(heading).normalize_or_zero();
        if heading == Vec3::ZERO {
            return;
        }
        let turned = self
            .forward
            .lerp(heading, (smoothing * dt).min(1.0))
            .normalize_or_zero();
        // Exactly opposite headings cancel out under lerp
        self.forward = if turned == Vec3::ZERO { heading } else { turned };
    }
}

/// Component: Commanded movement
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Direction set by the brain or steering, vertical part dropped
    pub direction: Vec3,
    /// Units per second at a unit-length direction
    pub run_speed: f32,
    /// Rotation smoothing rate (per second)
    pub turn_smoothing: f32,
}

impl Motion {
    pub fn new(run_speed: f32, turn_smoothing: f32) -> Self {
        Self {
            direction: Vec3::ZERO,
            run_speed,
            turn_smoothing,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.direction * self.run_speed
    }
}

impl Actuator for Motion {
    fn move_by_direction(&mut self, direction: Vec3) {
        self.direction = horizontal(direction);
    }
}

/// Knockback speeds below this count as at rest.
const KNOCKBACK_REST: f32 = 1e-5;

/// Component: Velocity imparted by hits, decaying toward zero
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    pub velocity: Vec3,
    /// Decay rate (per second)
    pub decay: f32,
}

impl Default for Knockback {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            decay: 5.0,
        }
    }
}

impl Knockback {
    /// Replaces the current knockback with a horizontal push.
    pub fn apply(&mut self, direction: Vec3, force: f32) {
        self.velocity = horizontal(direction).normalize_or_zero() * force;
    }

    pub fn decay_step(&mut self, dt: f32) {
        self.velocity = self.velocity.lerp(Vec3::ZERO, (self.decay * dt).min(1.0));
    }

    pub fn is_active(&self) -> bool {
        !self.velocity.abs_diff_eq(Vec3::ZERO, KNOCKBACK_REST)
    }
}

/// Component: Health
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            dead: false,
        }
    }

    /// Applies damage. Returns true if this hit was the killing blow.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.dead = true;
            return true;
        }
        false
    }
}
