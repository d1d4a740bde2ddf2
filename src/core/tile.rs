//! Tiles: rotatable pieces carrying one or two path-groups.
//!
//! A tile's identity is its `TileId`, stable for the whole session and unique
//! within a deck. Grids and hands never own tiles; they hold `TileId` handles
//! into the deck's tile arena.
//!
//! ## Path groups
//!
//! Most tiles have a single group (a straight, a curve, a tee). Crossings and
//! double curves have two groups that do not connect to each other, so each
//! group can complete (and score) independently.
//!
//! ```
//! use tile_paths::core::{Direction, PathMask, Tile, TileId};
//!
//! let mut tile = Tile::new(TileId(7), [PathMask::new(true, false, true, false)]);
//! tile.rotate_clockwise();
//!
//! assert_eq!(tile.orientation(), 90);
//! assert!(tile.has_stub(Direction::East));
//! assert!(tile.has_stub(Direction::West));
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::{Direction, PathMask};
use super::error::RestoreError;

/// Stable tile handle, unique per deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u16);

impl TileId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for TileId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Which path-groups have been confirmed complete. Display feedback only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmed {
    /// A single group was completed.
    Group(u8),
    /// Both groups of a two-group tile were completed.
    All,
}

/// Orientations a tile can take, in degrees.
pub const ORIENTATIONS: [u16; 4] = [0, 90, 180, 270];

/// Convert degrees to a quarter-turn count, if the value is a legal orientation.
#[must_use]
pub fn quarter_turns(degrees: u16) -> Option<u8> {
    if degrees % 90 == 0 && degrees < 360 {
        Some((degrees / 90) as u8)
    } else {
        None
    }
}

/// A tile on the board, in a hand, or waiting in the deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    paths: SmallVec<[PathMask; 2]>,
    orientation: u16,
    value: u32,
    confirmed: Option<Confirmed>,
}

impl Tile {
    /// Create a tile at orientation 0 with value 1.
    pub fn new(id: TileId, paths: impl IntoIterator<Item = PathMask>) -> Self {
        Self {
            id,
            paths: paths.into_iter().collect(),
            orientation: 0,
            value: 1,
            confirmed: None,
        }
    }

    /// Set the score weight.
    #[must_use]
    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Current path-groups, relative to the current orientation.
    #[must_use]
    pub fn paths(&self) -> &[PathMask] {
        &self.paths
    }

    /// Current orientation in degrees (0, 90, 180 or 270).
    #[must_use]
    pub fn orientation(&self) -> u16 {
        self.orientation
    }

    /// Score contribution when a path through this tile completes.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub fn confirmed(&self) -> Option<Confirmed> {
        self.confirmed
    }

    /// Does any group have a stub on `side`?
    #[must_use]
    pub fn has_stub(&self, side: Direction) -> bool {
        self.paths.iter().any(|p| p.has(side))
    }

    /// The group whose stub leaves through `side`, if any.
    #[must_use]
    pub fn group_facing(&self, side: Direction) -> Option<usize> {
        self.paths.iter().position(|p| p.has(side))
    }

    /// Rotate 90° clockwise, turning every group with it.
    pub fn rotate_clockwise(&mut self) {
        for path in &mut self.paths {
            *path = path.rotated();
        }
        self.orientation = (self.orientation + 90) % 360;
    }

    /// A rotated copy, leaving `self` untouched.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let mut copy = self.clone();
        copy.rotate_clockwise();
        copy
    }

    /// Rotate clockwise until the tile faces `degrees`.
    pub fn set_orientation(&mut self, degrees: u16) -> Result<(), RestoreError> {
        if quarter_turns(degrees).is_none() {
            return Err(RestoreError::BadOrientation { tile: self.id, degrees });
        }
        while self.orientation != degrees {
            self.rotate_clockwise();
        }
        Ok(())
    }

    /// Record that `group` was confirmed complete.
    ///
    /// Confirming a second, different group marks the whole tile.
    pub fn mark_confirmed(&mut self, group: usize) {
        let group = group as u8;
        self.confirmed = match self.confirmed {
            None => Some(Confirmed::Group(group)),
            Some(Confirmed::Group(g)) if g == group => Some(Confirmed::Group(g)),
            Some(_) => Some(Confirmed::All),
        };
    }

    /// Back to orientation 0 with no confirmation, ready for a new game.
    pub fn reset(&mut self) {
        self.confirmed = None;
        while self.orientation != 0 {
            self.rotate_clockwise();
        }
    }
}
