//! Headless arena runner
//!
//! Loads configuration and value tables, lets the soldiers fight the
//! wandering player for a fixed number of ticks, then saves what they
//! learned.

use clap::Parser;
use qlite_arena::{
    load_tables, run_arena, save_tables, ArenaError, ArenaOptions, ArenaReport, DialogueWindow,
};
use qlite_core::{default_config_toml, QliteConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for the arena
#[derive(Parser, Debug)]
#[command(name = "qlite_arena")]
#[command(about = "Headless arena for the learning encounter controller")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 0.02)]
    dt: f32,

    /// TOML configuration file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Value table file (overrides the configured path)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Write encounter events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Tick window in which dialogue interrupts combat (repeatable)
    #[arg(long = "dialogue", value_name = "START:END")]
    dialogue: Vec<DialogueWindow>,

    /// Number of learning soldiers
    #[arg(long, default_value_t = 1)]
    soldiers: usize,

    /// Do not save the value tables at shutdown
    #[arg(long)]
    no_save: bool,

    /// Write the default configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ArenaError> {
    if let Some(path) = args.write_default_config {
        std::fs::write(&path, default_config_toml())
            .map_err(|source| ArenaError::Io { path: path.clone(), source })?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => QliteConfig::from_file(path)?,
        None => QliteConfig::default(),
    };
    let table_path = args
        .table
        .clone()
        .unwrap_or_else(|| config.persistence.table_path.clone());

    println!("Q-Learning Encounter Arena");
    println!("==========================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {} (dt {})", args.ticks, args.dt);
    println!("Soldiers: {}", args.soldiers);
    println!("Table: {}", table_path.display());
    for window in &args.dialogue {
        println!("Dialogue: ticks {}", window);
    }
    println!();

    let tables = load_tables(&table_path, args.soldiers)?;

    let options = ArenaOptions {
        seed: args.seed,
        ticks: args.ticks,
        dt: args.dt,
        soldiers: args.soldiers,
        dialogue: args.dialogue,
        events_path: args.events,
    };
    let report = run_arena(&options, &config, tables)?;

    print_summary(&report);

    if args.no_save {
        println!("Skipping table save (--no-save)");
    } else {
        save_tables(&table_path, &report.tables)?;
        println!("Saved {} table(s)", report.tables.len());
    }
    Ok(())
}

fn print_summary(report: &ArenaReport) {
    println!(
        "Run complete. {} ticks ({:.1}s simulated).",
        report.ticks, report.simulated_seconds
    );
    println!(
        "Player health: {:.2}{}",
        report.player_health,
        if report.player_dead { " (dead)" } else { "" }
    );
    for soldier in &report.soldiers {
        println!(
            "  {}: {} attacks, {} decisions ({} explored), {} states, ended {}",
            soldier.agent_id,
            soldier.attacks,
            soldier.decisions,
            soldier.explored,
            soldier.states,
            soldier.phase
        );
    }
    println!("Total attacks: {}", report.total_attacks());
    println!("Events logged: {}", report.events_logged);
}
