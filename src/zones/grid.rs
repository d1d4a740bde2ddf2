//! The board: a fixed `rows × cols` array of cells.
//!
//! Cells hold `TileId` handles into the deck, never tiles themselves.
//! Placement and removal are pure bookkeeping; whether a placement is legal
//! is decided by `rules::legality`, so replaying a peer's already-validated
//! move never re-triggers a local rejection.
//!
//! Cells are numbered row-major: `cell = row * cols + col`.

use im::Vector;
use rustc_hash::FxHashSet;

use crate::core::error::{GridError, RestoreError};
use crate::core::tile::quarter_turns;
use crate::core::{Direction, TileId};

use super::Deck;

/// Persisted form of one cell: `(tileId, orientationDegrees)` or `(null, null)`.
pub type CellRecord = (Option<TileId>, Option<u16>);

/// Fixed-size board of optional tile handles.
///
/// Backed by `im::Vector` so copies taken for replay checks and
/// snapshots are O(1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vector<Option<TileId>>,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: std::iter::repeat(None).take(rows * cols).collect(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn in_bounds(&self, cell: usize) -> bool {
        cell < self.cells.len()
    }

    /// The tile in `cell`, or `None` if empty or off the board.
    #[must_use]
    pub fn get(&self, cell: usize) -> Option<TileId> {
        self.cells.get(cell).copied().flatten()
    }

    #[must_use]
    pub fn is_occupied(&self, cell: usize) -> bool {
        self.get(cell).is_some()
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Is the board completely empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Occupied cells with their tiles, in cell order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, TileId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(cell, t)| t.map(|id| (cell, id)))
    }

    /// The cell across `side` of `cell`, or `None` at the board edge.
    #[must_use]
    pub fn neighbor(&self, cell: usize, side: Direction) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let (row, col) = (cell / self.cols, cell % self.cols);
        match side {
            Direction::North if row > 0 => Some(cell - self.cols),
            Direction::East if col + 1 < self.cols => Some(cell + 1),
            Direction::South if row + 1 < self.rows => Some(cell + self.cols),
            Direction::West if col > 0 => Some(cell - 1),
            _ => None,
        }
    }

    /// Can a tile be dropped here?
    ///
    /// The cell must be empty and either the board is empty (the first move
    /// may go anywhere) or a cardinal neighbor is occupied.
    #[must_use]
    pub fn is_playable(&self, cell: usize) -> bool {
        if !self.in_bounds(cell) || self.is_occupied(cell) {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        Direction::ALL
            .into_iter()
            .filter_map(|side| self.neighbor(cell, side))
            .any(|n| self.is_occupied(n))
    }

    /// The highlight set shown to the current player.
    #[must_use]
    pub fn playable_cells(&self) -> Vec<usize> {
        (0..self.cell_count()).filter(|&c| self.is_playable(c)).collect()
    }

    /// Put `tile` into an empty cell.
    pub fn place(&mut self, tile: TileId, cell: usize) -> Result<(), GridError> {
        match self.cells.get(cell) {
            None => Err(GridError::OutOfRange(cell)),
            Some(Some(_)) => Err(GridError::Occupied(cell)),
            Some(None) => {
                self.cells.set(cell, Some(tile));
                Ok(())
            }
        }
    }

    /// Empty a cell, returning what was there.
    pub fn remove(&mut self, cell: usize) -> Option<TileId> {
        let tile = self.get(cell)?;
        self.cells.set(cell, None);
        Some(tile)
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells = std::iter::repeat(None).take(self.rows * self.cols).collect();
    }

    /// Per-cell `(tileId, orientation)` records for the `grid` field.
    #[must_use]
    pub fn serialize(&self, deck: &Deck) -> Vec<CellRecord> {
        self.cells
            .iter()
            .map(|cell| match cell.and_then(|id| deck.tile(id)) {
                Some(tile) => (Some(tile.id()), Some(tile.orientation())),
                None => (None, None),
            })
            .collect()
    }

    /// Rebuild the board from persisted records.
    ///
    /// Each tile id is resolved through the deck and the tile is turned to
    /// the recorded orientation. Everything is checked before anything is
    /// changed.
    pub fn restore(&mut self, records: &[CellRecord], deck: &mut Deck) -> Result<(), RestoreError> {
        if records.len() != self.cell_count() {
            return Err(RestoreError::Truncated {
                field: "grid",
                expected: self.cell_count(),
                found: records.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for &(id, degrees) in records {
            let Some(id) = id else { continue };
            if !deck.contains(id) {
                return Err(RestoreError::UnknownTile(id));
            }
            if !seen.insert(id) {
                return Err(RestoreError::DuplicateTile(id));
            }
            let degrees = degrees.unwrap_or(0);
            if quarter_turns(degrees).is_none() {
                return Err(RestoreError::BadOrientation { tile: id, degrees });
            }
        }

        self.clear();
        for (cell, &(id, degrees)) in records.iter().enumerate() {
            let Some(id) = id else { continue };
            if let Some(tile) = deck.tile_mut(id) {
                tile.set_orientation(degrees.unwrap_or(0))?;
            }
            self.cells.set(cell, Some(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PathMask, Tile};

    fn deck(n: u16) -> Deck {
        let tiles = (0..n)
            .map(|i| Tile::new(TileId(i), [PathMask::from_bits(0b0101)]))
            .collect();
        Deck::new(tiles).unwrap()
    }

    #[test]
    fn test_neighbors_respect_edges() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.neighbor(0, Direction::North), None);
        assert_eq!(grid.neighbor(0, Direction::West), None);
        assert_eq!(grid.neighbor(0, Direction::East), Some(1));
        assert_eq!(grid.neighbor(0, Direction::South), Some(3));

        assert_eq!(grid.neighbor(2, Direction::East), None);
        assert_eq!(grid.neighbor(3, Direction::West), None);
        assert_eq!(grid.neighbor(8, Direction::South), None);
        assert_eq!(grid.neighbor(4, Direction::North), Some(1));
        assert_eq!(grid.neighbor(9, Direction::North), None);
    }

    #[test]
    fn test_non_square_neighbors() {
        let grid = Grid::new(2, 4);
        assert_eq!(grid.neighbor(3, Direction::East), None);
        assert_eq!(grid.neighbor(3, Direction::South), Some(7));
        assert_eq!(grid.neighbor(4, Direction::West), None);
    }

    #[test]
    fn test_empty_board_all_playable() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.playable_cells(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_playable_after_first_tile() {
        let mut grid = Grid::new(3, 3);
        grid.place(TileId(0), 4).unwrap();

        assert_eq!(grid.playable_cells(), vec![1, 3, 5, 7]);
        assert!(!grid.is_playable(4));
        assert!(!grid.is_playable(0));
    }

    #[test]
    fn test_place_and_remove() {
        let mut grid = Grid::new(2, 2);
        grid.place(TileId(5), 1).unwrap();

        assert_eq!(grid.place(TileId(6), 1), Err(GridError::Occupied(1)));
        assert_eq!(grid.place(TileId(6), 4), Err(GridError::OutOfRange(4)));
        assert_eq!(grid.occupied_count(), 1);

        assert_eq!(grid.remove(1), Some(TileId(5)));
        assert_eq!(grid.remove(1), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_serialize_restore() {
        let mut deck = deck(4);
        let mut grid = Grid::new(2, 2);
        grid.place(TileId(2), 0).unwrap();
        grid.place(TileId(3), 1).unwrap();
        deck.tile_mut(TileId(3)).unwrap().rotate_clockwise();

        let records = grid.serialize(&deck);
        assert_eq!(
            records,
            vec![(Some(TileId(2)), Some(0)), (Some(TileId(3)), Some(90)), (None, None), (None, None)]
        );

        let mut fresh_deck = self::deck(4);
        let mut restored = Grid::new(2, 2);
        restored.restore(&records, &mut fresh_deck).unwrap();

        assert_eq!(restored, grid);
        assert_eq!(fresh_deck.tile(TileId(3)).unwrap().orientation(), 90);
    }

    #[test]
    fn test_restore_rejects_bad_records() {
        let mut deck = deck(4);
        let mut grid = Grid::new(2, 2);

        assert!(matches!(
            grid.restore(&[(None, None)], &mut deck),
            Err(RestoreError::Truncated { expected: 4, found: 1, .. })
        ));

        let unknown = [(Some(TileId(9)), Some(0)), (None, None), (None, None), (None, None)];
        assert!(matches!(grid.restore(&unknown, &mut deck), Err(RestoreError::UnknownTile(_))));

        let crooked = [(Some(TileId(1)), Some(45)), (None, None), (None, None), (None, None)];
        assert!(matches!(
            grid.restore(&crooked, &mut deck),
            Err(RestoreError::BadOrientation { degrees: 45, .. })
        ));
        assert!(grid.is_empty());
    }
}
