//! Movement Systems
//!
//! Player steering along its wander route, and integration of commanded
//! motion plus knockback for every body.

use bevy_ecs::prelude::*;
use encounter_events::Vec3;
use qlite_core::horizontal;
use rand::Rng;

use crate::components::{Knockback, Motion, Player, Pose, Vitals, Wander};
use crate::resources::{ArenaClock, ArenaRng};
use crate::systems::dialogue::DialogueSchedule;

/// System: Walk the player toward its current waypoint
///
/// The player stands still while dead or while dialogue is active. On
/// arrival the next waypoint is picked at random among the others.
pub fn steer_player(
    dialogue: Res<DialogueSchedule>,
    mut rng: ResMut<ArenaRng>,
    mut players: Query<(&Pose, &mut Motion, &mut Wander, &Vitals), With<Player>>,
) {
    for (pose, mut motion, mut wander, vitals) in players.iter_mut() {
        if vitals.dead || dialogue.is_active() {
            motion.direction = Vec3::ZERO;
            continue;
        }
        let Some(waypoint) = wander.current() else {
            motion.direction = Vec3::ZERO;
            continue;
        };

        let to_waypoint = horizontal(waypoint - pose.position);
        if to_waypoint.length() <= wander.arrive_radius {
            let count = wander.waypoints.len();
            if count > 1 {
                let offset = rng.0.gen_range(1..count);
                wander.next = (wander.next + offset) % count;
            }
            motion.direction = Vec3::ZERO;
        } else {
            motion.direction = to_waypoint.normalize_or_zero();
        }
    }
}

/// System: Move bodies by commanded velocity plus knockback, turn them
/// toward their movement, and decay knockback
pub fn integrate_motion(
    clock: Res<ArenaClock>,
    mut bodies: Query<(&mut Pose, &Motion, Option<&mut Knockback>)>,
) {
    let dt = clock.dt;
    for (mut pose, motion, knockback) in bodies.iter_mut() {
        let mut velocity = motion.velocity();
        if let Some(mut knockback) = knockback {
            velocity += knockback.velocity;
            knockback.decay_step(dt);
        }

        pose.position += velocity * dt;
        pose.turn_toward(motion.direction, motion.turn_smoothing, dt);
    }
}
