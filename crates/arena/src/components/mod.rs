//! ECS Components
//!
//! Body components shared by every entity, and agent components for the
//! player and the learning soldiers.

pub mod agent;
pub mod body;

pub use agent::*;
pub use body::*;
