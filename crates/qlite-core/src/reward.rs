//! Reward Function
//!
//! Reward for the action taken during the last decision period:
//! - base: distance closed since the previous decision (negative if it grew)
//! - idling inside the minimum chase distance is penalised
//! - idling while the target is far away is penalised
//! - moving toward a target that is already close is penalised (crowding)
//!
//! Penalties are independent and add up.

use encounter_events::Action;
use serde::{Deserialize, Serialize};

/// Reward shaping constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Penalty for idling inside the minimum chase distance
    pub idle_near_penalty: f32,
    /// Distance beyond which idling counts as "far"
    pub far_threshold: f32,
    /// Penalty for idling beyond `far_threshold`
    pub idle_far_penalty: f32,
    /// Distance below which moving toward the target counts as crowding
    pub crowding_threshold: f32,
    /// Penalty for crowding
    pub crowding_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            idle_near_penalty: 0.3,
            far_threshold: 3.0,
            idle_far_penalty: 0.5,
            crowding_threshold: 2.0,
            crowding_penalty: 0.5,
        }
    }
}

/// Distances observed at two consecutive decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardInputs {
    /// Distance to the target at the previous decision
    pub previous_distance: f32,
    /// Distance to the target now
    pub current_distance: f32,
}

impl RewardInputs {
    pub fn new(previous_distance: f32, current_distance: f32) -> Self {
        Self {
            previous_distance,
            current_distance,
        }
    }
}

/// Computes the reward for having taken `action`.
pub fn compute_reward(
    inputs: RewardInputs,
    action: Action,
    min_chase_distance: f32,
    config: &RewardConfig,
) -> f32 {
    let current = inputs.current_distance;
    let mut reward = inputs.previous_distance - current;

    if action == Action::Idle && current < min_chase_distance {
        reward -= config.idle_near_penalty;
    }

    if action == Action::Idle && current > config.far_threshold {
        reward -= config.idle_far_penalty;
    }

    if action == Action::MoveToward && current < config.crowding_threshold {
        reward -= config.crowding_penalty;
    }

    reward
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_CHASE: f32 = 1.2;

    fn reward(previous: f32, current: f32, action: Action) -> f32 {
        compute_reward(
            RewardInputs::new(previous, current),
            action,
            MIN_CHASE,
            &RewardConfig::default(),
        )
    }

    #[test]
    fn test_closing_distance_no_penalties() {
        let r = reward(5.0, 4.0, Action::MoveToward);
        assert!((r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_crowding_penalty() {
        let r = reward(2.5, 1.5, Action::MoveToward);
        // 1.0 closed, -0.5 crowding
        assert!((r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_idle_far_penalty() {
        let r = reward(6.0, 6.0, Action::Idle);
        assert!((r + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_idle_near_penalty() {
        let r = reward(1.0, 1.0, Action::Idle);
        assert!((r + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_idle_between_thresholds_has_no_penalty() {
        let r = reward(2.5, 2.5, Action::Idle);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn test_penalties_stack() {
        let config = RewardConfig {
            far_threshold: 0.5,
            ..RewardConfig::default()
        };
        // Idle, inside min chase distance and beyond the (lowered) far threshold
        let r = compute_reward(RewardInputs::new(1.0, 1.0), Action::Idle, MIN_CHASE, &config);
        assert!((r + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_sidestep_only_gets_base_reward() {
        let r = reward(1.0, 1.5, Action::MoveLeft);
        assert!((r + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reward_decreases_as_distance_grows() {
        for action in Action::ALL {
            // Stay on one side of every threshold so penalties are fixed
            let mut last = f32::INFINITY;
            for step in 0..20 {
                let current = 4.0 + step as f32 * 0.25;
                let r = reward(4.0, current, action);
                assert!(r < last, "{} reward did not decrease at {}", action, current);
                last = r;
            }
        }
    }
}
