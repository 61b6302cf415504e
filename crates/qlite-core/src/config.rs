//! Configuration loading for the encounter controller.
//!
//! All tuning values are loaded from a TOML file. Every section is optional;
//! missing sections and fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::reward::RewardConfig;

/// Default location of the persisted value table.
pub const DEFAULT_TABLE_PATH: &str = "enemy_qtable.json";

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QliteConfig {
    /// Learning rate, discount, exploration and decision period
    #[serde(default)]
    pub learner: LearnerConfig,
    /// Reward shaping constants
    #[serde(default)]
    pub reward: RewardConfig,
    /// Chase, attack and retreat tuning
    #[serde(default)]
    pub encounter: EncounterConfig,
    /// Where the value table lives
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl QliteConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: QliteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that every value is in its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let learner = &self.learner;
        unit_interval("learner.learning_rate", learner.learning_rate)?;
        unit_interval("learner.discount", learner.discount)?;
        unit_interval("learner.epsilon", learner.epsilon)?;
        if learner.decision_period <= 0.0 || !learner.decision_period.is_finite() {
            return Err(ConfigError::invalid(
                "learner.decision_period",
                "must be greater than zero",
            ));
        }

        let reward = &self.reward;
        non_negative("reward.idle_near_penalty", reward.idle_near_penalty)?;
        non_negative("reward.far_threshold", reward.far_threshold)?;
        non_negative("reward.idle_far_penalty", reward.idle_far_penalty)?;
        non_negative("reward.crowding_threshold", reward.crowding_threshold)?;
        non_negative("reward.crowding_penalty", reward.crowding_penalty)?;

        let encounter = &self.encounter;
        non_negative("encounter.min_chase_distance", encounter.min_chase_distance)?;
        non_negative("encounter.attack_distance", encounter.attack_distance)?;
        non_negative("encounter.attack_cooldown", encounter.attack_cooldown)?;
        non_negative("encounter.retreat_distance", encounter.retreat_distance)?;
        non_negative("encounter.retreat_speed", encounter.retreat_speed)?;
        non_negative("encounter.post_interrupt_pause", encounter.post_interrupt_pause)?;
        non_negative("encounter.attack_damage", encounter.attack_damage)?;
        non_negative("encounter.knockback_force", encounter.knockback_force)?;

        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be within [0, 1]"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite, non-negative number"))
    }
}

/// Learning hyper-parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Step size of the value update (alpha)
    pub learning_rate: f32,
    /// Weight of the bootstrap term (gamma)
    pub discount: f32,
    /// Probability of picking a uniformly random action
    pub epsilon: f32,
    /// Simulated seconds between decisions
    pub decision_period: f32,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: 0.3,
            decision_period: 0.8,
        }
    }
}

/// Chase, attack and retreat tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// The agent stops closing in below this distance
    pub min_chase_distance: f32,
    /// Distance at or below which an attack triggers
    pub attack_distance: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Retreat ends once the target is at least this far away
    pub retreat_distance: f32,
    /// Multiplier applied to the retreat direction
    pub retreat_speed: f32,
    /// Seconds of idling after an interrupt clears
    pub post_interrupt_pause: f32,
    /// Damage dealt per attack
    pub attack_damage: f32,
    /// Horizontal knockback force applied to the target per attack
    pub knockback_force: f32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            min_chase_distance: 1.2,
            attack_distance: 1.2,
            attack_cooldown: 8.0,
            retreat_distance: 5.0,
            retreat_speed: 2.0,
            post_interrupt_pause: 8.0,
            attack_damage: 0.2,
            knockback_force: 8.0,
        }
    }
}

/// Value table persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Path of the JSON table file
    pub table_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
        }
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Encounter controller configuration

[learner]
learning_rate = 0.1
discount = 0.9
epsilon = 0.3
decision_period = 0.8

[reward]
idle_near_penalty = 0.3
far_threshold = 3.0
idle_far_penalty = 0.5
crowding_threshold = 2.0
crowding_penalty = 0.5

[encounter]
min_chase_distance = 1.2
attack_distance = 1.2
attack_cooldown = 8.0
retreat_distance = 5.0
retreat_speed = 2.0
post_interrupt_pause = 8.0
attack_damage = 0.2
knockback_force = 8.0

[persistence]
table_path = "enemy_qtable.json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QliteConfig::default();

        assert_eq!(config.learner.learning_rate, 0.1);
        assert_eq!(config.learner.epsilon, 0.3);
        assert_eq!(config.encounter.attack_cooldown, 8.0);
        assert_eq!(config.reward.crowding_penalty, 0.5);
        assert_eq!(config.persistence.table_path, PathBuf::from(DEFAULT_TABLE_PATH));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config_from_toml() {
        let toml = r#"
            [learner]
            epsilon = 0.0
            decision_period = 0.5

            [encounter]
            retreat_distance = 6.5
        "#;

        let config = QliteConfig::from_str(toml).unwrap();

        assert_eq!(config.learner.epsilon, 0.0);
        assert_eq!(config.learner.decision_period, 0.5);
        assert_eq!(config.encounter.retreat_distance, 6.5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [learner]
            learning_rate = 0.25
        "#;

        let config = QliteConfig::from_str(toml).unwrap();

        // Specified value
        assert_eq!(config.learner.learning_rate, 0.25);
        // Default values
        assert_eq!(config.learner.discount, 0.9);
        assert_eq!(config.encounter.min_chase_distance, 1.2);
        assert_eq!(config.reward.far_threshold, 3.0);
    }

    #[test]
    fn test_default_config_toml_parses() {
        let config = QliteConfig::from_str(&default_config_toml()).unwrap();
        assert_eq!(config, QliteConfig::default());
    }

    #[test]
    fn test_config_to_toml() {
        let toml = QliteConfig::default().to_toml().unwrap();

        assert!(toml.contains("[learner]"));
        assert!(toml.contains("[encounter]"));
        assert!(toml.contains("[persistence]"));
    }

    #[test]
    fn test_rejects_epsilon_above_one() {
        let err = QliteConfig::from_str("[learner]\nepsilon = 1.5\n").unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "learner.epsilon"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rejects_zero_decision_period() {
        let err = QliteConfig::from_str("[learner]\ndecision_period = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "learner.decision_period", .. }
        ));
    }

    #[test]
    fn test_rejects_negative_distance() {
        let err = QliteConfig::from_str("[encounter]\nretreat_distance = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "encounter.retreat_distance", .. }
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = QliteConfig::from_str("[learner\nepsilon = ").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = QliteConfig::from_file(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
