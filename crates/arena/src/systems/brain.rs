//! Brain System
//!
//! Runs each soldier's encounter controller once per tick against the
//! player, and logs what the controllers did.

use bevy_ecs::prelude::*;
use encounter_events::{EventKind, Vec3};
use qlite_core::{AgentPose, TargetLocator, TickContext, TickOutcome};

use crate::components::{AgentId, Brain, Motion, Player, Pose, Soldier, Vitals};
use crate::events::EncounterLog;
use crate::resources::ArenaClock;
use crate::systems::combat::HitQueue;
use crate::systems::dialogue::DialogueSchedule;

/// Target lookup resolved once per tick
struct PlayerTarget(Option<Vec3>);

impl TargetLocator for PlayerTarget {
    fn target_position(&self) -> Option<Vec3> {
        self.0
    }
}

/// System: Tick every soldier's controller
pub fn think_soldiers(
    clock: Res<ArenaClock>,
    dialogue: Res<DialogueSchedule>,
    mut hits: ResMut<HitQueue>,
    mut log: ResMut<EncounterLog>,
    players: Query<(&Pose, &Vitals), (With<Player>, Without<Soldier>)>,
    mut soldiers: Query<(&AgentId, &Pose, &mut Motion, &mut Brain), With<Soldier>>,
) {
    // A dead player is no longer a target
    let target = PlayerTarget(
        players
            .iter()
            .find(|(_, vitals)| !vitals.dead)
            .map(|(pose, _)| pose.position),
    );
    let talking = dialogue.is_active();
    let interrupt = move || talking;

    for (id, pose, mut motion, mut brain) in soldiers.iter_mut() {
        let before = brain.phase();

        let mut effects = hits.for_source(id.as_str());
        let result = brain.controller.tick(TickContext {
            pose: AgentPose::new(pose.position, pose.forward),
            dt: clock.dt,
            target: &target,
            interrupt: &interrupt,
            actuator: Some(&mut *motion),
            effects: &mut effects,
        });

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("{} failed to tick: {}", id.as_str(), e);
                continue;
            }
        };

        match outcome {
            TickOutcome::Pursuing {
                decision: Some(decision),
            } => {
                brain.decisions += 1;
                if decision.explored {
                    brain.explored += 1;
                }
                log.record(
                    clock.tick,
                    id.as_str(),
                    EventKind::Decision {
                        state: decision.state,
                        action: decision.action,
                        reward: decision.reward,
                        explored: decision.explored,
                    },
                );
            }
            TickOutcome::Attacked { distance } => {
                brain.attacks += 1;
                let damage = brain.controller.encounter_config().attack_damage;
                log.record(
                    clock.tick,
                    id.as_str(),
                    EventKind::Attack { damage, distance },
                );
            }
            _ => {}
        }

        let after = brain.phase();
        if after != before {
            tracing::debug!("{} {} -> {}", id.as_str(), before, after);
            log.record(
                clock.tick,
                id.as_str(),
                EventKind::PhaseChanged {
                    from: before,
                    to: after,
                },
            );
        }
    }
}
