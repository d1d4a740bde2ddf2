//! Move representation.
//!
//! A `Placement` is everything a peer needs to replay a move: which tile,
//! how it is turned, and where it goes. It is exactly the payload of the
//! `p` message.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::tile::TileId;

/// An accepted move: `(tileId, orientationDegrees, cellIndex)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub tile: TileId,
    pub orientation: u16,
    pub cell: usize,
}

impl Placement {
    #[must_use]
    pub const fn new(tile: TileId, orientation: u16, cell: usize) -> Self {
        Self {
            tile,
            orientation,
            cell,
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at cell {} ({}°)", self.tile, self.cell, self.orientation)
    }
}

/// A placement with the seat that made it and the points it earned.
///
/// Used for the move history and the `last` persisted field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub player: PlayerId,
    pub placement: Placement,
    pub points: u32,
}

impl PlacementRecord {
    #[must_use]
    pub fn new(player: PlayerId, placement: Placement, points: u32) -> Self {
        Self {
            player,
            placement,
            points,
        }
    }
}
