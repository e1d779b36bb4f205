use std::{error::Error, fmt, str::FromStr};

use siege_lanes_core::UnitKind;

/// Separates the unit kind from its tile in a spawn order.
const KIND_DELIMITER: char = '@';
/// Separates the column from the row in a spawn order.
const TILE_DELIMITER: char = ',';

/// Hero placement requested on the command line as `kind@column,row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SpawnOrder {
    /// Hero kind to purchase.
    pub kind: UnitKind,
    /// Column of the target tile.
    pub column: u32,
    /// Row of the target tile.
    pub row: u32,
}

impl FromStr for SpawnOrder {
    type Err = SpawnOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SpawnOrderError::Empty);
        }

        let (kind, tile) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or_else(|| SpawnOrderError::MissingTile(trimmed.to_owned()))?;
        let kind = UnitKind::from_name(kind.trim())
            .ok_or_else(|| SpawnOrderError::UnknownKind(kind.trim().to_owned()))?;

        let (column, row) = tile
            .split_once(TILE_DELIMITER)
            .ok_or_else(|| SpawnOrderError::InvalidTile(tile.to_owned()))?;
        let column = column
            .trim()
            .parse::<u32>()
            .map_err(|_| SpawnOrderError::InvalidTile(tile.to_owned()))?;
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|_| SpawnOrderError::InvalidTile(tile.to_owned()))?;

        Ok(Self { kind, column, row })
    }
}

/// Errors that can occur while parsing a spawn order.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SpawnOrderError {
    /// The order was empty or contained only whitespace.
    Empty,
    /// The order did not contain a `@` followed by a tile.
    MissingTile(String),
    /// The kind does not name a unit.
    UnknownKind(String),
    /// The tile was not a `column,row` pair of integers.
    InvalidTile(String),
}

impl fmt::Display for SpawnOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "spawn order was empty"),
            Self::MissingTile(order) => {
                write!(f, "spawn order '{order}' is missing '@column,row'")
            }
            Self::UnknownKind(kind) => write!(f, "unit kind '{kind}' is not known"),
            Self::InvalidTile(tile) => write!(f, "could not parse tile '{tile}'"),
        }
    }
}

impl Error for SpawnOrderError {}
