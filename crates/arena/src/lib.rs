//! Headless arena for the learning encounter controller.
//!
//! A player wanders a patrol square while one or more soldiers, each driven
//! by an [`qlite_core::EncounterController`], learn to chase and hit it.
//! Dialogue windows interrupt the fight on a fixed schedule. Everything runs
//! on a `bevy_ecs` schedule with a fixed timestep, and a run with a given
//! seed is fully reproducible.

pub mod components;
pub mod events;
pub mod resources;
pub mod run;
pub mod setup;
pub mod systems;

pub use events::EncounterLog;
pub use resources::{ArenaClock, ArenaRng};
pub use run::{
    load_tables, run_arena, save_tables, table_path_for, ArenaError, ArenaOptions, ArenaReport,
    SoldierReport,
};
pub use systems::{DialogueSchedule, DialogueWindow};
