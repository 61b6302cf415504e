//! Encounter Controller
//!
//! Per-tick state machine wrapped around the learner. Each tick is checked
//! strictly in this order:
//!
//! 1. **Interrupted**: the external interrupt is active. Back away if the
//!    target is within the retreat distance, otherwise idle. Arms the
//!    post-interrupt pause. No learning, no attacks. The learner's pending
//!    decision is dropped so the forced movement is never rewarded.
//! 2. **Post-interrupt pause**: idle while the pause timer runs down.
//! 3. **Retreating**: keep moving away until the retreat distance is reached.
//! 4. **Attack trigger**: within attack distance and off cooldown: damage and
//!    knock back the target, reset the cooldown, start retreating. The
//!    pending decision is dropped here too.
//! 5. **Normal**: every decision period, run the learner; every tick, move
//!    according to the current action.
//!
//! Collaborators (movement, target lookup, interrupt flag, combat effects)
//! are passed in through [`TickContext`]; the controller never looks
//! anything up on its own.

use std::path::Path;

use encounter_events::{Action, Phase, Vec3};

use crate::config::{EncounterConfig, QliteConfig};
use crate::encoder::{encode_state, horizontal, AgentPose};
use crate::error::{QliteError, TableError};
use crate::learner::{Decision, QLearner};
use crate::table::ValueTable;

/// Receives the desired movement direction every tick.
///
/// Only the horizontal component matters; implementations drop `y`.
pub trait Actuator {
    fn move_by_direction(&mut self, direction: Vec3);

    fn idle(&mut self) {
        self.move_by_direction(Vec3::ZERO);
    }
}

/// Supplies the current target position, if there is a target.
pub trait TargetLocator {
    fn target_position(&self) -> Option<Vec3>;
}

/// External "conversation/pause active" flag, polled every tick.
pub trait InterruptSignal {
    fn is_active(&self) -> bool;
}

impl<F> InterruptSignal for F
where
    F: Fn() -> bool,
{
    fn is_active(&self) -> bool {
        self()
    }
}

/// Fire-and-forget effects applied to the target when an attack lands.
pub trait CombatEffects {
    fn apply_damage(&mut self, amount: f32);

    /// `direction` is a horizontal unit vector pointing away from the agent.
    fn apply_knockback(&mut self, direction: Vec3, force: f32);
}

/// Everything the controller needs from the outside for one tick.
pub struct TickContext<'a> {
    /// Agent position and facing this tick
    pub pose: AgentPose,
    /// Simulated seconds since the previous tick
    pub dt: f32,
    pub target: &'a dyn TargetLocator,
    pub interrupt: &'a dyn InterruptSignal,
    /// `None` when no actuator is bound; the tick is skipped
    pub actuator: Option<&'a mut dyn Actuator>,
    pub effects: &'a mut dyn CombatEffects,
}

/// Internal state that persists across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncounterState {
    Normal,
    Retreating {
        /// Unit vector from the target toward the agent at attack time
        direction: Vec3,
    },
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No target or no actuator; nothing happened
    Skipped,
    Interrupted,
    PostInterruptPause,
    Retreating,
    /// An attack landed this tick and a retreat started
    Attacked { distance: f32 },
    /// Normal pursuit; `decision` is set on ticks where the learner ran
    Pursuing { decision: Option<Decision> },
}

impl TickOutcome {
    /// Phase the controller was in for this tick, if it ran at all.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            TickOutcome::Skipped => None,
            TickOutcome::Interrupted => Some(Phase::Interrupted),
            TickOutcome::PostInterruptPause => Some(Phase::PostInterruptPause),
            TickOutcome::Retreating | TickOutcome::Attacked { .. } => Some(Phase::Retreating),
            TickOutcome::Pursuing { .. } => Some(Phase::Normal),
        }
    }
}

/// Interrupt-aware learning controller for one agent.
#[derive(Debug, Clone)]
pub struct EncounterController {
    config: EncounterConfig,
    decision_period: f32,
    learner: QLearner,
    table: ValueTable,
    state: EncounterState,
    attack_cooldown_remaining: f32,
    post_interrupt_pause_remaining: f32,
    decision_timer: f32,
    current_action: Action,
    interrupted: bool,
}

impl EncounterController {
    /// Creates a controller owning `table`. `seed` drives exploration.
    pub fn new(config: &QliteConfig, table: ValueTable, seed: u64) -> Self {
        Self::with_learner(config, table, QLearner::from_config(config, seed))
    }

    /// Loads configuration from `config_path`, then the table from the
    /// configured persistence path (empty if the file does not exist).
    pub fn from_config_file(config_path: &Path, seed: u64) -> Result<Self, QliteError> {
        let config = QliteConfig::from_file(config_path)?;
        let table = ValueTable::load(&config.persistence.table_path)?;
        Ok(Self::new(&config, table, seed))
    }

    pub fn with_learner(config: &QliteConfig, table: ValueTable, learner: QLearner) -> Self {
        Self {
            config: config.encounter.clone(),
            decision_period: config.learner.decision_period,
            learner,
            table,
            state: EncounterState::Normal,
            attack_cooldown_remaining: 0.0,
            post_interrupt_pause_remaining: 0.0,
            // First decision happens on the first normal tick
            decision_timer: 0.0,
            current_action: Action::Idle,
            interrupted: false,
        }
    }

    /// Runs one simulation tick.
    ///
    /// Errors only if the value table rejects an update, which indicates a
    /// bug rather than a runtime condition.
    pub fn tick(&mut self, ctx: TickContext<'_>) -> Result<TickOutcome, TableError> {
        let TickContext {
            pose,
            dt,
            target,
            interrupt,
            actuator,
            effects,
        } = ctx;

        let Some(actuator) = actuator else {
            return Ok(TickOutcome::Skipped);
        };
        let Some(target) = target.target_position() else {
            return Ok(TickOutcome::Skipped);
        };
        let distance = pose.distance_to(target);

        if interrupt.is_active() {
            if !self.interrupted {
                tracing::debug!("Interrupt active, suspending pursuit");
                self.learner.forget_previous();
            }
            self.interrupted = true;
            self.post_interrupt_pause_remaining = self.config.post_interrupt_pause;
            if distance < self.config.retreat_distance {
                actuator.move_by_direction((pose.position - target).normalize_or_zero());
            } else {
                actuator.idle();
            }
            return Ok(TickOutcome::Interrupted);
        }
        self.interrupted = false;

        if self.post_interrupt_pause_remaining > 0.0 {
            self.post_interrupt_pause_remaining -= dt;
            actuator.idle();
            return Ok(TickOutcome::PostInterruptPause);
        }

        if self.attack_cooldown_remaining > 0.0 {
            self.attack_cooldown_remaining -= dt;
        }

        if let EncounterState::Retreating { direction } = self.state {
            actuator.move_by_direction(direction * self.config.retreat_speed);
            if distance >= self.config.retreat_distance {
                tracing::debug!("Retreat finished at distance {:.2}", distance);
                self.state = EncounterState::Normal;
            }
            return Ok(TickOutcome::Retreating);
        }

        if self.attack_cooldown_remaining <= 0.0 && distance <= self.config.attack_distance {
            let direction = (pose.position - target).normalize_or_zero();
            effects.apply_damage(self.config.attack_damage);
            effects.apply_knockback(horizontal(-direction).normalize_or_zero(), self.config.knockback_force);
            // The retreat is forced, not chosen
            self.learner.forget_previous();

            self.attack_cooldown_remaining = self.config.attack_cooldown;
            self.state = EncounterState::Retreating { direction };
            actuator.move_by_direction(direction * self.config.retreat_speed);

            tracing::debug!("Attack landed at distance {:.2}, retreating", distance);
            return Ok(TickOutcome::Attacked { distance });
        }

        self.decision_timer -= dt;
        let decision = if self.decision_timer <= 0.0 {
            self.decision_timer = self.decision_period;
            let key = encode_state(&pose, target);
            let decision = self.learner.select_and_learn(&mut self.table, key, distance)?;
            self.current_action = decision.action;
            Some(decision)
        } else {
            None
        };

        actuator.move_by_direction(self.movement_for(&pose, target, distance));
        Ok(TickOutcome::Pursuing { decision })
    }

    /// Direction to send to the actuator for the current action.
    fn movement_for(&self, pose: &AgentPose, target: Vec3, distance: f32) -> Vec3 {
        match self.current_action {
            Action::MoveToward if distance < self.config.min_chase_distance => Vec3::ZERO,
            Action::MoveToward => (target - pose.position).normalize_or_zero(),
            other => other.fixed_direction(),
        }
    }

    /// Phase as it stands between ticks.
    pub fn phase(&self) -> Phase {
        if self.interrupted {
            Phase::Interrupted
        } else if self.post_interrupt_pause_remaining > 0.0 {
            Phase::PostInterruptPause
        } else {
            match self.state {
                EncounterState::Normal => Phase::Normal,
                EncounterState::Retreating { .. } => Phase::Retreating,
            }
        }
    }

    pub fn encounter_config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn current_action(&self) -> Action {
        self.current_action
    }

    pub fn attack_cooldown_remaining(&self) -> f32 {
        self.attack_cooldown_remaining
    }

    pub fn post_interrupt_pause_remaining(&self) -> f32 {
        self.post_interrupt_pause_remaining
    }

    pub fn learner(&self) -> &QLearner {
        &self.learner
    }

    pub fn learner_mut(&mut self) -> &mut QLearner {
        &mut self.learner
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ValueTable {
        &mut self.table
    }

    /// Gives up the controller and returns its table.
    pub fn into_table(self) -> ValueTable {
        self.table
    }

    /// Persists the value table. Call at lifecycle boundaries, not per tick.
    pub fn save_table(&self, path: &Path) -> Result<(), TableError> {
        self.table.save(path)
    }
}
