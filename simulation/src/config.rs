//! Match configuration loaded from TOML.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use siege_lanes_core::{BodySize, TileCoord, TileGrid};
use siege_lanes_system_spawning::Config as SpawningConfig;
use siege_lanes_world::MatchSettings;
use thiserror::Error;

const DEFAULT_RNG_SEED: u64 = 0x5eed_1a4e_5eed_1a4e;

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration is not valid TOML or has mistyped fields.
    #[error("failed to parse simulation config")]
    Parse(#[from] toml::de::Error),
    /// The configuration parsed but describes an unusable match.
    #[error("invalid simulation config: {0}")]
    Invalid(&'static str),
}

/// Tunable parameters of a match.
///
/// Every field has a default, so an empty document yields the standard
/// 11 by 9 board.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub columns: u32,
    /// Board width in world units.
    pub board_width: f32,
    /// Board height in world units.
    pub board_height: f32,
    /// Mana available when the match begins.
    pub initial_mana: u32,
    /// Starting health of both strongholds.
    pub stronghold_health: u32,
    /// Mana granted per consumed collectible.
    pub task_mana_bonus: u32,
    /// Length of the informational match countdown, in seconds.
    pub match_duration_secs: u64,
    /// Logic ticks between recurring monsters; zero keeps only the opening monster.
    pub monster_interval_ticks: u64,
    /// Seed for monster lane selection.
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            columns: 11,
            board_width: 1100.0,
            board_height: 900.0,
            initial_mana: 40,
            stronghold_health: 100,
            task_mana_bonus: 10,
            match_duration_secs: 60,
            monster_interval_ticks: 12,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects boards without interior lanes and non-positive world sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 3 {
            return Err(ConfigError::Invalid("columns must be at least 3"));
        }
        if self.rows < 3 {
            return Err(ConfigError::Invalid("rows must be at least 3"));
        }
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.board_width) || !positive(self.board_height) {
            return Err(ConfigError::Invalid("board size must be positive"));
        }
        if self.stronghold_health == 0 {
            return Err(ConfigError::Invalid("stronghold health must be positive"));
        }
        Ok(())
    }

    /// Tile layout described by the configuration.
    #[must_use]
    pub fn tile_grid(&self) -> TileGrid {
        TileGrid::new(
            TileCoord::new(self.columns),
            TileCoord::new(self.rows),
            BodySize::new(self.board_width, self.board_height),
        )
    }

    /// World parameters for a fresh match.
    #[must_use]
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            grid: self.tile_grid(),
            initial_mana: self.initial_mana,
            stronghold_health: self.stronghold_health,
            task_mana_bonus: self.task_mana_bonus,
            match_duration: Duration::from_secs(self.match_duration_secs),
        }
    }

    /// Spawning cadence and seed for a fresh match.
    #[must_use]
    pub fn spawning(&self) -> SpawningConfig {
        SpawningConfig::new(self.monster_interval_ticks, self.rng_seed)
    }
}
