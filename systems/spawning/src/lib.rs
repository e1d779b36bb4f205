#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for monster and collectible cadences.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use siege_lanes_core::{Command, TileGrid, TilePosition, TASK_SPAWN_PERIOD};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    monster_interval: u64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided monster cadence and seed.
    ///
    /// A monster spawns on every logic tick that is a positive multiple of
    /// `monster_interval`; zero disables the recurring cadence.
    #[must_use]
    pub const fn new(monster_interval: u64, rng_seed: u64) -> Self {
        Self {
            monster_interval,
            rng_seed,
        }
    }
}

/// Pure system that emits spawn commands on fixed logic tick cadences.
#[derive(Debug)]
pub struct Spawning {
    monster_interval: u64,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            monster_interval: config.monster_interval,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the monster that opens every match.
    pub fn opening(&mut self, grid: &TileGrid, out: &mut Vec<Command>) {
        if let Some(tile) = self.select_monster_tile(grid) {
            out.push(Command::SpawnMonster { tile });
        }
    }

    /// Emits the spawn commands scheduled for the provided logic tick.
    pub fn handle(&mut self, tick_index: u64, grid: &TileGrid, out: &mut Vec<Command>) {
        if tick_index % TASK_SPAWN_PERIOD == 1 {
            out.push(Command::SpawnTask);
        }

        if self.monster_interval == 0 || tick_index == 0 {
            return;
        }
        if tick_index % self.monster_interval == 0 {
            if let Some(tile) = self.select_monster_tile(grid) {
                out.push(Command::SpawnMonster { tile });
            }
        }
    }

    /// Picks an interior row on the lane next to the enemy stronghold.
    fn select_monster_tile(&mut self, grid: &TileGrid) -> Option<TilePosition> {
        let columns = grid.columns().get();
        let rows = grid.rows().get();
        if columns < 3 || rows < 3 {
            return None;
        }

        let row = self.rng.gen_range(2..rows);
        Some(TilePosition::new(columns - 2, row))
    }
}
