#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Siege Lanes match.

mod spawn_order;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use siege_lanes_core::{Faction, FRAMES_PER_SECOND};
use siege_lanes_simulation::{Simulation, SimulationConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::spawn_order::SpawnOrder;

/// Runs a scripted Siege Lanes match without a renderer and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "siege-lanes", version)]
struct Args {
    /// TOML file overriding the default match configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fixed frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u64,

    /// Hero to place before the first frame, as `kind@column,row`. Repeatable.
    #[arg(long = "spawn", value_name = "KIND@COLUMN,ROW")]
    spawns: Vec<SpawnOrder>,

    /// Log filter directive; falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Siege Lanes command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    install_tracing(args.log_level.as_deref())?;

    let config = match &args.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("failed to load match config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut simulation = Simulation::new(config);
    for order in &args.spawns {
        match simulation.try_spawn_hero(order.kind, order.column, order.row, Faction::Player) {
            Ok(entity) => info!(entity = entity.get(), kind = ?order.kind, "scripted hero placed"),
            Err(error) => warn!(kind = ?order.kind, %error, "scripted hero rejected"),
        }
    }

    for _ in 0..args.frames {
        simulation.advance();
        if simulation.status().is_terminal() {
            break;
        }
    }

    let snapshot = simulation.match_snapshot();
    println!("status: {:?}", snapshot.status);
    println!(
        "frames: {} ({:.1}s)",
        snapshot.frame,
        snapshot.frame as f64 / f64::from(FRAMES_PER_SECOND)
    );
    println!("mana: {}", snapshot.mana);
    println!(
        "strongholds: player {} / enemy {}",
        snapshot.player_stronghold.get(),
        snapshot.enemy_stronghold.get()
    );
    println!("time left: {}s", snapshot.time_left.as_secs());
    println!("live entities: {}", simulation.entities().len());
    Ok(())
}

fn install_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter '{directive}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!(error))
}
