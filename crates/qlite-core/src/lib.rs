//! Tabular Q-learning combat controller.
//!
//! A single agent pursues a target, learns which movement pays off in each
//! coarse situation, attacks when close, retreats afterwards, and backs off
//! whenever an external interrupt (a conversation, a cutscene) is active.
//!
//! # Architecture
//!
//! ```text
//!  pose + target ──▶ encoder ──▶ StateKey ──▶ learner ◀──▶ table ◀──▶ enemy_qtable.json
//!                                                │
//!  interrupt flag ──────────────────────▶ controller ──▶ Actuator / CombatEffects
//! ```
//!
//! # Modules
//!
//! - [`encoder`]: Distance and bearing buckets
//! - [`table`]: Value table with JSON persistence
//! - [`reward`]: Distance-based reward shaping
//! - [`learner`]: Epsilon-greedy selection and the value update
//! - [`controller`]: Per-tick interrupt, retreat, attack and pursuit logic
//! - [`config`]: TOML configuration

pub mod config;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod learner;
pub mod reward;
pub mod table;

pub use config::{
    default_config_toml, EncounterConfig, LearnerConfig, PersistenceConfig, QliteConfig,
    DEFAULT_TABLE_PATH,
};
pub use controller::{
    Actuator, CombatEffects, EncounterController, EncounterState, InterruptSignal, TargetLocator,
    TickContext, TickOutcome,
};
pub use encoder::{encode_state, horizontal, AgentPose};
pub use error::{ConfigError, QliteError, TableError};
pub use learner::{greedy_action, updated_value, Decision, PreviousDecision, QLearner};
pub use reward::{compute_reward, RewardConfig, RewardInputs};
pub use table::ValueTable;
