//! Arena Setup
//!
//! Spawns the player on its wander route and the soldiers in a ring around
//! it, each soldier with its own value table and exploration seed.

use bevy_ecs::prelude::*;
use encounter_events::Vec3;
use qlite_core::{horizontal, EncounterController, QliteConfig, ValueTable};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::{AgentId, Brain, Knockback, Motion, Player, Pose, Soldier, Vitals, Wander};

/// Player run speed (units per second)
pub const PLAYER_SPEED: f32 = 3.0;
/// Soldier run speed (units per second)
pub const SOLDIER_SPEED: f32 = 5.0;
/// Facing smoothing rate shared by every body
pub const TURN_SMOOTHING: f32 = 10.0;
/// Player maximum health
pub const PLAYER_MAX_HEALTH: f32 = 1.0;
/// Soldiers start this far from the arena centre
pub const SPAWN_RADIUS: f32 = 12.0;

/// Corners of the player's patrol square
pub fn player_waypoints() -> Vec<Vec3> {
    vec![
        Vec3::new(6.0, 0.0, 6.0),
        Vec3::new(-6.0, 0.0, 6.0),
        Vec3::new(-6.0, 0.0, -6.0),
        Vec3::new(6.0, 0.0, -6.0),
    ]
}

/// Spawn the player at the arena centre
pub fn spawn_player(world: &mut World) -> Entity {
    world
        .spawn((
            Player,
            AgentId::player(),
            Pose::new(Vec3::ZERO, Vec3::Z),
            Motion::new(PLAYER_SPEED, TURN_SMOOTHING),
            Knockback::default(),
            Vitals::new(PLAYER_MAX_HEALTH),
            Wander::new(player_waypoints(), 0.5),
        ))
        .id()
}

/// Spawn one soldier per table, evenly spaced on a ring with a little
/// angular jitter, facing the centre
pub fn spawn_soldiers(
    world: &mut World,
    config: &QliteConfig,
    tables: Vec<ValueTable>,
    rng: &mut SmallRng,
) -> Vec<Entity> {
    let count = tables.len();
    let mut entities = Vec::with_capacity(count);

    for (index, table) in tables.into_iter().enumerate() {
        let slot = index as f32 / count as f32 * std::f32::consts::TAU;
        let angle = slot + rng.gen_range(-0.2..0.2);
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * SPAWN_RADIUS;
        let forward = horizontal(-position).normalize_or_zero();

        let states = table.len();
        let controller = EncounterController::new(config, table, rng.gen());
        let id = AgentId::soldier(index);
        tracing::debug!("Spawning {} at {:?} with {} known states", id.as_str(), position, states);

        let entity = world
            .spawn((
                Soldier,
                id,
                Pose::new(position, forward),
                Motion::new(SOLDIER_SPEED, TURN_SMOOTHING),
                Brain::new(controller),
            ))
            .id();
        entities.push(entity);
    }

    entities
}
