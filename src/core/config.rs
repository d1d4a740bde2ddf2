//! Game configuration.
//!
//! A session is configured once at startup:
//! - Board dimensions (`rows` × `cols`)
//! - Hand capacity (defaults to `cols`)
//! - Player limit (at most four peers share a board)
//! - The tile set (one `TileSpec` per tile; the deck has exactly one tile per cell)
//!
//! `GameConfig::classic()` is the standard 8×8 board with 64 tiles.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::PathMask;
use super::error::ConfigError;
use super::tile::{Tile, TileId};

/// Blueprint for one tile of the set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    /// Path-groups at orientation 0.
    pub paths: SmallVec<[PathMask; 2]>,
    /// Score weight.
    pub value: u32,
}

impl TileSpec {
    /// A single-group tile from its 4-bit mask (bit 0 = North .. bit 3 = West).
    #[must_use]
    pub fn single(bits: u8) -> Self {
        Self {
            paths: SmallVec::from_slice(&[PathMask::from_bits(bits)]),
            value: 1,
        }
    }

    /// A tile with two independent groups.
    #[must_use]
    pub fn double(first: u8, second: u8) -> Self {
        Self {
            paths: SmallVec::from_slice(&[PathMask::from_bits(first), PathMask::from_bits(second)]),
            value: 1,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub hand_size: usize,
    pub max_players: usize,
    pub tile_set: Vec<TileSpec>,
}

impl GameConfig {
    /// The standard board: 8×8 cells, 8-slot hands, up to 4 players.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            rows: 8,
            cols: 8,
            hand_size: 8,
            max_players: 4,
            tile_set: classic_tile_set(),
        }
    }

    /// A custom board. Hand capacity defaults to `cols`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, tile_set: Vec<TileSpec>) -> Self {
        Self {
            rows,
            cols,
            hand_size: cols,
            max_players: 4,
            tile_set,
        }
    }

    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    #[must_use]
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Number of grid cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Check the configuration before starting a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.hand_size == 0 {
            return Err(ConfigError::EmptyHand);
        }
        if !(1..=4).contains(&self.max_players) {
            return Err(ConfigError::PlayerLimit(self.max_players));
        }
        if self.tile_set.len() != self.cell_count() {
            return Err(ConfigError::TileCount {
                expected: self.cell_count(),
                found: self.tile_set.len(),
            });
        }
        for tile in self.tiles() {
            check_tile(&tile)?;
        }
        Ok(())
    }

    /// Instantiate the tile set. Tile ids are assigned in set order.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        self.tile_set
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Tile::new(TileId(i as u16), spec.paths.iter().copied()).with_value(spec.value)
            })
            .collect()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Structural checks for a single tile.
pub(crate) fn check_tile(tile: &Tile) -> Result<(), ConfigError> {
    let paths = tile.paths();
    if paths.is_empty() || paths.len() > 2 {
        return Err(ConfigError::GroupCount(tile.id()));
    }
    if paths.len() == 2 && paths[0].overlaps(paths[1]) {
        return Err(ConfigError::OverlappingGroups(tile.id()));
    }
    Ok(())
}

/// The 64 tiles of the classic set.
///
/// 16 dead-ends, 4 straights, 12 tees, 16 curves, 4 crossings,
/// 8 double curves and 4 three-way tees.
#[must_use]
pub fn classic_tile_set() -> Vec<TileSpec> {
    const NORTH: u8 = 0b0001;
    const EAST: u8 = 0b0010;
    const SOUTH: u8 = 0b0100;
    const WEST: u8 = 0b1000;

    let mut set = Vec::with_capacity(64);
    let mut add = |count: usize, spec: TileSpec| {
        set.extend(std::iter::repeat(spec).take(count));
    };

    add(16, TileSpec::single(WEST));
    add(4, TileSpec::single(EAST | WEST));
    add(12, TileSpec::single(EAST | SOUTH | WEST));
    add(16, TileSpec::single(NORTH | WEST));
    add(4, TileSpec::double(EAST | WEST, NORTH | SOUTH));
    add(8, TileSpec::double(SOUTH | WEST, NORTH | EAST));
    add(4, TileSpec::single(NORTH | EAST | WEST));

    set
}
