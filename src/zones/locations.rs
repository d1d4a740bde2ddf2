//! Reverse index from tile to where it currently is.
//!
//! Grids and hands map a slot to a `TileId`; `TileLocations` answers the
//! opposite question in O(1): "where is tile X?". Keeping it alongside the
//! slot maps is what enforces the invariant that a tile sits in at most one
//! hand slot or grid cell at a time. Undealt tiles are simply absent.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, TileId};

/// Where a dealt tile is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// In a seat's hand, at the given slot.
    Hand { player: PlayerId, slot: usize },
    /// On the board, at the given cell.
    Grid(usize),
}

/// Tile locations: tile_id -> location.
#[derive(Clone, Debug, Default)]
pub struct TileLocations {
    locations: FxHashMap<TileId, Location>,
}

impl TileLocations {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tile's new location.
    ///
    /// Returns the previous location, or `None` if the tile was not tracked.
    pub fn move_to(&mut self, tile: TileId, location: Location) -> Option<Location> {
        self.locations.insert(tile, location)
    }

    /// Stop tracking a tile.
    pub fn remove(&mut self, tile: TileId) -> Option<Location> {
        self.locations.remove(&tile)
    }

    #[must_use]
    pub fn get(&self, tile: TileId) -> Option<Location> {
        self.locations.get(&tile).copied()
    }

    /// The seat holding this tile in hand, if any.
    #[must_use]
    pub fn holder(&self, tile: TileId) -> Option<PlayerId> {
        match self.get(tile)? {
            Location::Hand { player, .. } => Some(player),
            Location::Grid(_) => None,
        }
    }

    /// The cell this tile occupies, if on the board.
    #[must_use]
    pub fn cell_of(&self, tile: TileId) -> Option<usize> {
        match self.get(tile)? {
            Location::Grid(cell) => Some(cell),
            Location::Hand { .. } => None,
        }
    }

    /// Tiles currently in `player`'s hand, in no particular order.
    pub fn in_hand_of(&self, player: PlayerId) -> impl Iterator<Item = TileId> + '_ {
        self.locations.iter().filter_map(move |(&tile, loc)| match loc {
            Location::Hand { player: p, .. } if *p == player => Some(tile),
            _ => None,
        })
    }

    /// Get total number of tracked tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn clear(&mut self) {
        self.locations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_and_get() {
        let mut locations = TileLocations::new();
        let seat = PlayerId::new(1);

        assert_eq!(locations.move_to(TileId(3), Location::Hand { player: seat, slot: 2 }), None);
        assert_eq!(locations.holder(TileId(3)), Some(seat));
        assert_eq!(locations.cell_of(TileId(3)), None);

        let old = locations.move_to(TileId(3), Location::Grid(17));
        assert_eq!(old, Some(Location::Hand { player: seat, slot: 2 }));
        assert_eq!(locations.cell_of(TileId(3)), Some(17));
        assert_eq!(locations.holder(TileId(3)), None);
        assert_eq!(locations.len(), 1);
    }

    #[test]
    fn test_in_hand_of() {
        let mut locations = TileLocations::new();
        let a = PlayerId::new(0);
        let b = PlayerId::new(1);
        locations.move_to(TileId(1), Location::Hand { player: a, slot: 0 });
        locations.move_to(TileId(2), Location::Hand { player: b, slot: 0 });
        locations.move_to(TileId(3), Location::Hand { player: a, slot: 1 });
        locations.move_to(TileId(4), Location::Grid(0));

        let mut held: Vec<_> = locations.in_hand_of(a).collect();
        held.sort();
        assert_eq!(held, vec![TileId(1), TileId(3)]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut locations = TileLocations::new();
        locations.move_to(TileId(1), Location::Grid(5));

        assert_eq!(locations.remove(TileId(1)), Some(Location::Grid(5)));
        assert_eq!(locations.remove(TileId(1)), None);

        locations.move_to(TileId(2), Location::Grid(6));
        locations.clear();
        assert!(locations.is_empty());
    }
}
