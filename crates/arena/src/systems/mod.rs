//! ECS Systems
//!
//! Run once per tick, in this order:
//!
//! 1. [`advance_dialogue`]: raise or clear the interrupt flag
//! 2. [`steer_player`]: walk the player along its route
//! 3. [`think_soldiers`]: tick every soldier's controller
//! 4. [`apply_hits`]: resolve queued attacks against the player
//! 5. [`integrate_motion`]: move and turn every body

pub mod brain;
pub mod combat;
pub mod dialogue;
pub mod movement;

pub use brain::think_soldiers;
pub use combat::{apply_hits, Hit, HitEffect, HitQueue, QueuedEffects};
pub use dialogue::{advance_dialogue, DialogueSchedule, DialogueWindow, ParseWindowError};
pub use movement::{integrate_motion, steer_player};
