//! Action Selector & Learner
//!
//! Epsilon-greedy action choice plus a one-step value update, run once per
//! decision period:
//!
//! 1. If an action was chosen last period, reward it from the distance
//!    change and update `Q[previous_state][previous_action]`.
//! 2. Pick the next action for the current state: uniformly random with
//!    probability epsilon, otherwise the highest value (lowest index wins
//!    ties).
//! 3. Remember the current state, action and distance for the next period.
//!
//! The update bootstraps from zero rather than from the best next-state
//! value: `Q += alpha * (reward + gamma * 0 - Q)`. Learned tables depend on
//! this, so it must not be switched to a full Bellman backup without
//! retraining.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use encounter_events::{Action, ActionValues, StateKey, ACTION_COUNT};

use crate::config::{LearnerConfig, QliteConfig};
use crate::error::TableError;
use crate::reward::{compute_reward, RewardConfig, RewardInputs};
use crate::table::ValueTable;

/// Outcome of one decision period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// State the action was chosen for
    pub state: StateKey,
    /// Chosen action
    pub action: Action,
    /// Reward credited to the previous action, if any
    pub reward: Option<f32>,
    /// True if the action was picked at random
    pub explored: bool,
}

/// The decision still waiting for its reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousDecision {
    pub state: StateKey,
    pub action: Action,
    /// Distance to the target when the decision was made
    pub distance: f32,
}

/// Epsilon-greedy selector with a zero-bootstrap value update.
#[derive(Debug, Clone)]
pub struct QLearner {
    learning_rate: f32,
    discount: f32,
    epsilon: f32,
    min_chase_distance: f32,
    reward: RewardConfig,
    rng: SmallRng,
    previous: Option<PreviousDecision>,
}

impl QLearner {
    /// Creates a learner with its own seeded RNG.
    pub fn new(
        config: &LearnerConfig,
        reward: RewardConfig,
        min_chase_distance: f32,
        seed: u64,
    ) -> Self {
        Self {
            learning_rate: config.learning_rate,
            discount: config.discount,
            epsilon: config.epsilon,
            min_chase_distance,
            reward,
            rng: SmallRng::seed_from_u64(seed),
            previous: None,
        }
    }

    pub fn from_config(config: &QliteConfig, seed: u64) -> Self {
        Self::new(
            &config.learner,
            config.reward.clone(),
            config.encounter.min_chase_distance,
            seed,
        )
    }

    /// Sets the exploration probability.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.set_epsilon(epsilon);
        self
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn previous(&self) -> Option<&PreviousDecision> {
        self.previous.as_ref()
    }

    /// Drops the pending decision so the next period does not learn from it.
    pub fn forget_previous(&mut self) {
        self.previous = None;
    }

    /// Runs one decision period for `current` (see module docs).
    pub fn select_and_learn(
        &mut self,
        table: &mut ValueTable,
        current: StateKey,
        current_distance: f32,
    ) -> Result<Decision, TableError> {
        let reward = match self.previous {
            Some(previous) => {
                let inputs = RewardInputs::new(previous.distance, current_distance);
                Some(self.learn(table, previous.state, previous.action, inputs)?)
            }
            None => None,
        };

        let (action, explored) = self.choose(table.get_or_create(current));

        self.previous = Some(PreviousDecision {
            state: current,
            action,
            distance: current_distance,
        });

        tracing::debug!(
            "State: {}, Action: {}, Reward: {:?}, Explored: {}",
            current,
            action,
            reward,
            explored
        );

        Ok(Decision {
            state: current,
            action,
            reward,
            explored,
        })
    }

    /// Rewards `action` taken in `state` and applies the value update.
    /// Returns the reward.
    pub fn learn(
        &mut self,
        table: &mut ValueTable,
        state: StateKey,
        action: Action,
        inputs: RewardInputs,
    ) -> Result<f32, TableError> {
        let reward = compute_reward(inputs, action, self.min_chase_distance, &self.reward);
        let old = table.get_or_create(state)[action.index()];
        let new = updated_value(old, reward, self.learning_rate, self.discount);
        table.update(state, action, new)?;
        Ok(reward)
    }

    fn choose(&mut self, values: &ActionValues) -> (Action, bool) {
        if self.epsilon > 0.0 && self.rng.gen::<f32>() < self.epsilon {
            let index = self.rng.gen_range(0..ACTION_COUNT);
            // index is always in range
            (Action::from_index(index).unwrap_or_default(), true)
        } else {
            (greedy_action(values), false)
        }
    }
}

/// One-step update with the bootstrap term fixed at zero.
pub fn updated_value(old: f32, reward: f32, learning_rate: f32, discount: f32) -> f32 {
    let max_next = 0.0;
    old + learning_rate * (reward + discount * max_next - old)
}

/// Action with the highest value; the first one wins ties.
pub fn greedy_action(values: &ActionValues) -> Action {
    let mut best = 0;
    let mut max = values[0];
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > max {
            max = value;
            best = i;
        }
    }
    Action::from_index(best).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greedy_learner() -> QLearner {
        QLearner::from_config(&QliteConfig::default(), 7).with_epsilon(0.0)
    }

    #[test]
    fn test_greedy_ties_pick_lowest_index() {
        assert_eq!(greedy_action(&[0.0; ACTION_COUNT]), Action::Idle);
        assert_eq!(greedy_action(&[0.0, 0.5, 0.5, 0.1, 0.5]), Action::MoveToward);
        assert_eq!(greedy_action(&[-1.0, -2.0, -0.5, -0.5, -3.0]), Action::MoveAway);
    }

    #[test]
    fn test_update_uses_zero_bootstrap() {
        // 0 + 0.1 * (1.0 + 0.9 * 0 - 0) = 0.1
        assert!((updated_value(0.0, 1.0, 0.1, 0.9) - 0.1).abs() < 1e-6);
        // 0.5 + 0.1 * (-0.5 - 0.5) = 0.4
        assert!((updated_value(0.5, -0.5, 0.1, 0.9) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_first_decision_does_not_learn() {
        let mut learner = greedy_learner();
        let mut table = ValueTable::new();
        let key = StateKey::new(3, 2);

        let decision = learner.select_and_learn(&mut table, key, 6.0).unwrap();

        assert_eq!(decision.action, Action::Idle);
        assert_eq!(decision.reward, None);
        assert!(!decision.explored);
        assert_eq!(table.get(&key), Some(&[0.0; ACTION_COUNT]));
        assert_eq!(learner.previous().unwrap().distance, 6.0);
    }

    #[test]
    fn test_second_decision_updates_previous_pair() {
        let mut learner = greedy_learner();
        let mut table = ValueTable::new();
        let first = StateKey::new(3, 2);
        let second = StateKey::new(2, 2);

        learner.select_and_learn(&mut table, first, 6.0).unwrap();
        // Idle while far: base 0.0 - 0.5 penalty
        let decision = learner.select_and_learn(&mut table, second, 6.0).unwrap();

        let reward = decision.reward.unwrap();
        assert!((reward + 0.5).abs() < 1e-6);
        let idle_value = table.get(&first).unwrap()[Action::Idle.index()];
        assert!((idle_value + 0.05).abs() < 1e-6);
        // The new state was only created, not updated
        assert_eq!(table.get(&second), Some(&[0.0; ACTION_COUNT]));
    }

    #[test]
    fn test_penalised_idle_switches_greedy_choice() {
        let mut learner = greedy_learner();
        let mut table = ValueTable::new();
        let key = StateKey::new(3, 2);

        learner.select_and_learn(&mut table, key, 6.0).unwrap();
        let decision = learner.select_and_learn(&mut table, key, 6.0).unwrap();

        // Idle now scores below zero, so the next best (MoveToward) wins
        assert_eq!(decision.action, Action::MoveToward);
    }

    #[test]
    fn test_forget_previous_skips_learning() {
        let mut learner = greedy_learner();
        let mut table = ValueTable::new();
        let key = StateKey::new(1, 1);

        learner.select_and_learn(&mut table, key, 2.0).unwrap();
        learner.forget_previous();
        let decision = learner.select_and_learn(&mut table, key, 9.0).unwrap();

        assert_eq!(decision.reward, None);
        assert_eq!(table.get(&key), Some(&[0.0; ACTION_COUNT]));
    }

    #[test]
    fn test_full_exploration_covers_every_action() {
        let mut learner = QLearner::from_config(&QliteConfig::default(), 99).with_epsilon(1.0);
        let mut table = ValueTable::new();
        let key = StateKey::new(0, 0);

        let mut seen = [false; ACTION_COUNT];
        for _ in 0..500 {
            let decision = learner.select_and_learn(&mut table, key, 1.0).unwrap();
            assert!(decision.explored);
            seen[decision.action.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_greedy_runs_are_deterministic() {
        let keys = [
            (StateKey::new(4, 2), 9.0),
            (StateKey::new(3, 2), 7.5),
            (StateKey::new(3, 1), 6.0),
            (StateKey::new(1, 2), 2.5),
            (StateKey::new(0, 2), 1.0),
            (StateKey::new(1, 3), 2.2),
        ];

        let run = || {
            let mut learner = greedy_learner();
            let mut table = ValueTable::new();
            let mut actions = Vec::new();
            for _ in 0..5 {
                for (key, distance) in keys {
                    actions.push(learner.select_and_learn(&mut table, key, distance).unwrap().action);
                }
            }
            (actions, table)
        };

        let (actions_a, table_a) = run();
        let (actions_b, table_b) = run();
        assert_eq!(actions_a, actions_b);
        assert_eq!(table_a, table_b);
    }
}
