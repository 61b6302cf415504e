//! Discrete movement actions.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of discrete actions; also the length of every value vector.
pub const ACTION_COUNT: usize = 5;

/// One learned score per action, indexed by [`Action::index`].
pub type ActionValues = [f32; ACTION_COUNT];

/// Movement choices available to the agent each decision period.
///
/// The index of each variant is part of the persisted table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Idle = 0,
    /// Resolved live to the direction toward the target
    MoveToward = 1,
    MoveAway = 2,
    MoveLeft = 3,
    MoveRight = 4,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Idle,
        Action::MoveToward,
        Action::MoveAway,
        Action::MoveLeft,
        Action::MoveRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// World-frame direction for this action.
    ///
    /// `MoveToward` returns forward here; the controller replaces it with
    /// the live direction to the target.
    pub fn fixed_direction(self) -> Vec3 {
        match self {
            Action::Idle => Vec3::ZERO,
            Action::MoveToward => Vec3::Z,
            Action::MoveAway => Vec3::NEG_Z,
            Action::MoveLeft => Vec3::NEG_X,
            Action::MoveRight => Vec3::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::MoveToward => "move_toward",
            Action::MoveAway => "move_away",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
