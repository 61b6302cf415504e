//! Combat System
//!
//! Soldiers' attacks are queued while brains think and resolved against the
//! player afterwards, so no system needs the player's health and the
//! soldiers' brains at the same time.

use bevy_ecs::prelude::*;
use encounter_events::Vec3;
use qlite_core::CombatEffects;

use crate::components::{Knockback, Player, Vitals};

/// A single effect bound for the player
#[derive(Debug, Clone, PartialEq)]
pub enum HitEffect {
    Damage(f32),
    Knockback { direction: Vec3, force: f32 },
}

/// An effect with the soldier that caused it
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub source: String,
    pub effect: HitEffect,
}

/// Resource: Effects queued during this tick
#[derive(Resource, Debug, Default)]
pub struct HitQueue {
    hits: Vec<Hit>,
}

impl HitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: &str, effect: HitEffect) {
        self.hits.push(Hit {
            source: source.to_string(),
            effect,
        });
    }

    pub fn drain(&mut self) -> Vec<Hit> {
        std::mem::take(&mut self.hits)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Effect sink for one soldier's tick
    pub fn for_source<'a>(&'a mut self, source: &'a str) -> QueuedEffects<'a> {
        QueuedEffects {
            queue: self,
            source,
        }
    }
}

/// [`CombatEffects`] implementation that queues effects for [`apply_hits`]
pub struct QueuedEffects<'a> {
    queue: &'a mut HitQueue,
    source: &'a str,
}

impl CombatEffects for QueuedEffects<'_> {
    fn apply_damage(&mut self, amount: f32) {
        self.queue.push(self.source, HitEffect::Damage(amount));
    }

    fn apply_knockback(&mut self, direction: Vec3, force: f32) {
        self.queue
            .push(self.source, HitEffect::Knockback { direction, force });
    }
}

/// System: Resolve queued hits against the player
pub fn apply_hits(
    mut queue: ResMut<HitQueue>,
    mut players: Query<(&mut Vitals, &mut Knockback), With<Player>>,
) {
    if queue.is_empty() {
        return;
    }
    let hits = queue.drain();

    for (mut vitals, mut knockback) in players.iter_mut() {
        for hit in &hits {
            if vitals.dead {
                break;
            }
            match hit.effect {
                HitEffect::Damage(amount) => {
                    if vitals.take_damage(amount) {
                        tracing::info!("Player killed by {}", hit.source);
                    } else {
                        tracing::debug!(
                            "{} hit the player for {:.2} ({:.2} left)",
                            hit.source,
                            amount,
                            vitals.health
                        );
                    }
                }
                HitEffect::Knockback { direction, force } => {
                    knockback.apply(direction, force);
                }
            }
        }
    }
}
