//! Arena Runner
//!
//! Builds the ECS world, runs the fixed-timestep schedule and collects the
//! learned tables and per-soldier tallies.

use bevy_ecs::prelude::*;
use encounter_events::Phase;
use qlite_core::{ConfigError, QliteConfig, TableError, ValueTable};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::{AgentId, Brain, Player, Vitals};
use crate::events::EncounterLog;
use crate::resources::{ArenaClock, ArenaRng};
use crate::setup;
use crate::systems::{
    advance_dialogue, apply_hits, integrate_motion, steer_player, think_soldiers, DialogueSchedule,
    DialogueWindow, HitQueue,
};

/// Errors that stop a run from starting or finishing
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Expected {expected} value tables, got {found}")]
    TableCount { expected: usize, found: usize },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Options for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaOptions {
    /// Seed for spawns, wandering and every soldier's exploration
    pub seed: u64,
    pub ticks: u64,
    /// Simulated seconds per tick
    pub dt: f32,
    pub soldiers: usize,
    /// Tick windows in which dialogue interrupts combat
    pub dialogue: Vec<DialogueWindow>,
    /// JSONL event log, if any
    pub events_path: Option<PathBuf>,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 3000,
            dt: 0.02,
            soldiers: 1,
            dialogue: Vec::new(),
            events_path: None,
        }
    }
}

/// Final tallies for one soldier
#[derive(Debug, Clone, PartialEq)]
pub struct SoldierReport {
    pub agent_id: String,
    pub attacks: u32,
    pub decisions: u32,
    pub explored: u32,
    /// Distinct states in the table at the end of the run
    pub states: usize,
    pub phase: Phase,
}

/// Result of a run
#[derive(Debug, Clone)]
pub struct ArenaReport {
    pub ticks: u64,
    pub simulated_seconds: f32,
    pub player_health: f32,
    pub player_dead: bool,
    pub events_logged: u64,
    /// In soldier order
    pub soldiers: Vec<SoldierReport>,
    /// Learned tables, in soldier order
    pub tables: Vec<ValueTable>,
}

impl ArenaReport {
    pub fn total_attacks(&self) -> u32 {
        self.soldiers.iter().map(|s| s.attacks).sum()
    }
}

/// Runs the arena. `tables` supplies one starting table per soldier.
pub fn run_arena(
    options: &ArenaOptions,
    config: &QliteConfig,
    tables: Vec<ValueTable>,
) -> Result<ArenaReport, ArenaError> {
    if tables.len() != options.soldiers {
        return Err(ArenaError::TableCount {
            expected: options.soldiers,
            found: tables.len(),
        });
    }

    let log = match &options.events_path {
        Some(path) => EncounterLog::new(path).map_err(|source| ArenaError::Io {
            path: path.clone(),
            source,
        })?,
        None => EncounterLog::null(),
    };

    let mut world = World::new();
    world.insert_resource(ArenaClock::new(options.dt));
    world.insert_resource(DialogueSchedule::new(options.dialogue.clone()));
    world.insert_resource(HitQueue::new());
    world.insert_resource(log);

    let mut rng = SmallRng::seed_from_u64(options.seed);
    setup::spawn_player(&mut world);
    let soldiers = setup::spawn_soldiers(&mut world, config, tables, &mut rng);
    world.insert_resource(ArenaRng(rng));
    tracing::info!(
        "Arena ready: {} soldier(s), {} ticks at dt {}",
        soldiers.len(),
        options.ticks,
        options.dt
    );

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            advance_dialogue,
            steer_player,
            think_soldiers,
            apply_hits,
            integrate_motion,
        )
            .chain(),
    );

    for tick in 0..options.ticks {
        world.resource_mut::<ArenaClock>().tick = tick;
        schedule.run(&mut world);

        if tick > 0 && tick % 1000 == 0 {
            let elapsed = world.resource::<ArenaClock>().elapsed();
            tracing::info!("Tick {} / {} ({:.1}s)", tick, options.ticks, elapsed);
        }
    }

    if let Err(e) = world.resource_mut::<EncounterLog>().flush() {
        tracing::warn!("Failed to flush encounter log: {}", e);
    }

    let (player_health, player_dead) = {
        let mut players = world.query_filtered::<&Vitals, With<Player>>();
        players
            .iter(&world)
            .next()
            .map(|v| (v.health, v.dead))
            .unwrap_or((0.0, true))
    };

    let mut soldier_reports = Vec::with_capacity(soldiers.len());
    let mut learned = Vec::with_capacity(soldiers.len());
    for entity in soldiers {
        let Some(mut entity) = world.get_entity_mut(entity) else {
            continue;
        };
        let Some(id) = entity.get::<AgentId>().cloned() else {
            continue;
        };
        let Some(brain) = entity.take::<Brain>() else {
            continue;
        };
        soldier_reports.push(SoldierReport {
            agent_id: id.0,
            attacks: brain.attacks,
            decisions: brain.decisions,
            explored: brain.explored,
            states: brain.controller.table().len(),
            phase: brain.phase(),
        });
        learned.push(brain.controller.into_table());
    }

    Ok(ArenaReport {
        ticks: options.ticks,
        simulated_seconds: options.ticks as f32 * options.dt,
        player_health,
        player_dead,
        events_logged: world.resource::<EncounterLog>().event_count(),
        soldiers: soldier_reports,
        tables: learned,
    })
}

/// Table file for soldier `index` of `count`. A single soldier uses `base`
/// as is; several soldiers each get a suffixed sibling so their saves do not
/// overwrite each other.
pub fn table_path_for(base: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}_{:02}.{}", stem, index + 1, ext.to_string_lossy()),
        None => format!("{}_{:02}", stem, index + 1),
    };
    base.with_file_name(name)
}

/// Loads one table per soldier; missing files start empty.
pub fn load_tables(base: &Path, count: usize) -> Result<Vec<ValueTable>, ArenaError> {
    (0..count)
        .map(|index| ValueTable::load(&table_path_for(base, index, count)).map_err(ArenaError::from))
        .collect()
}

/// Saves each soldier's table next to `base`.
pub fn save_tables(base: &Path, tables: &[ValueTable]) -> Result<(), ArenaError> {
    for (index, table) in tables.iter().enumerate() {
        table.save(&table_path_for(base, index, tables.len()))?;
    }
    Ok(())
}
