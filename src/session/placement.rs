//! The placement attempt within one turn.
//!
//! ```text
//! Idle -> TileSelected -> Dragging -> (drop) -> Legal | Illegal
//!                                                  |       |
//!                         rotate / drag again -----+-------+
//! ```
//!
//! A turn places at most one tile. Once a tile is on the board it may be
//! rotated, dragged to another cell or returned to the hand, but no other
//! tile may be picked up until it is returned. `Illegal` keeps the turn
//! open: `end_turn` is refused until the player fixes the edges.

use crate::core::error::MoveError;
use crate::core::TileId;
use crate::rules::EdgeViolations;

/// Where the current attempt stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlacementStatus {
    #[default]
    Idle,
    TileSelected(TileId),
    Dragging(TileId),
    Legal {
        tile: TileId,
        cell: usize,
    },
    Illegal {
        tile: TileId,
        cell: usize,
        violations: EdgeViolations,
    },
}

impl PlacementStatus {
    /// The tile the attempt is about, if any.
    #[must_use]
    pub fn tile(&self) -> Option<TileId> {
        match *self {
            PlacementStatus::Idle => None,
            PlacementStatus::TileSelected(t) | PlacementStatus::Dragging(t) => Some(t),
            PlacementStatus::Legal { tile, .. } | PlacementStatus::Illegal { tile, .. } => Some(tile),
        }
    }

    #[must_use]
    pub fn is_illegal(&self) -> bool {
        matches!(self, PlacementStatus::Illegal { .. })
    }
}

/// Per-turn bookkeeping: the attempt status plus the tile on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnMoves {
    status: PlacementStatus,
    placed: Option<(TileId, usize)>,
}

impl TurnMoves {
    #[must_use]
    pub fn status(&self) -> PlacementStatus {
        self.status
    }

    /// The tile dropped on the board this turn and its cell.
    #[must_use]
    pub fn placed(&self) -> Option<(TileId, usize)> {
        self.placed
    }

    /// Start of a turn.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A different tile may not be picked up while one is on the board.
    pub fn check_pickup(&self, tile: TileId) -> Result<(), MoveError> {
        match self.placed {
            Some((placed, _)) if placed != tile => Err(MoveError::AlreadyPlaced),
            _ => Ok(()),
        }
    }

    pub fn select(&mut self, tile: TileId) -> Result<(), MoveError> {
        self.check_pickup(tile)?;
        if self.placed.is_none() {
            self.status = PlacementStatus::TileSelected(tile);
        }
        Ok(())
    }

    pub fn begin_drag(&mut self, tile: TileId) -> Result<(), MoveError> {
        self.check_pickup(tile)?;
        self.status = PlacementStatus::Dragging(tile);
        Ok(())
    }

    /// Record the verdict for a drop (or for a rotation of the dropped tile).
    pub fn dropped(&mut self, tile: TileId, cell: usize, violations: EdgeViolations) {
        self.placed = Some((tile, cell));
        self.status = if violations.is_legal() {
            PlacementStatus::Legal { tile, cell }
        } else {
            PlacementStatus::Illegal {
                tile,
                cell,
                violations,
            }
        };
    }

    /// The dropped tile went back to the hand.
    pub fn returned(&mut self) {
        self.reset();
    }

    /// The move `end_turn` may commit.
    pub fn ready(&self) -> Result<(TileId, usize), MoveError> {
        if let PlacementStatus::Illegal { violations, .. } = self.status {
            return Err(MoveError::IllegalPlacement(violations));
        }
        self.placed.ok_or(MoveError::NothingPlaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;

    #[test]
    fn test_happy_path() {
        let mut moves = TurnMoves::default();
        assert_eq!(moves.ready(), Err(MoveError::NothingPlaced));

        moves.select(TileId(4)).unwrap();
        assert_eq!(moves.status(), PlacementStatus::TileSelected(TileId(4)));
        moves.begin_drag(TileId(4)).unwrap();
        moves.dropped(TileId(4), 9, EdgeViolations::none());

        assert_eq!(moves.status(), PlacementStatus::Legal { tile: TileId(4), cell: 9 });
        assert_eq!(moves.ready(), Ok((TileId(4), 9)));
    }

    #[test]
    fn test_illegal_blocks_end_of_turn() {
        let mut moves = TurnMoves::default();
        let mut v = EdgeViolations::none();
        v.insert(Direction::North);
        moves.dropped(TileId(1), 0, v);

        assert!(moves.status().is_illegal());
        assert_eq!(moves.ready(), Err(MoveError::IllegalPlacement(v)));

        // Rotating fixes it.
        moves.dropped(TileId(1), 0, EdgeViolations::none());
        assert!(moves.ready().is_ok());
    }

    #[test]
    fn test_one_tile_per_turn() {
        let mut moves = TurnMoves::default();
        moves.dropped(TileId(1), 0, EdgeViolations::none());

        assert_eq!(moves.select(TileId(2)), Err(MoveError::AlreadyPlaced));
        assert_eq!(moves.begin_drag(TileId(2)), Err(MoveError::AlreadyPlaced));
        moves.begin_drag(TileId(1)).unwrap();
        assert_eq!(moves.status().tile(), Some(TileId(1)));

        moves.returned();
        assert_eq!(moves.status(), PlacementStatus::Idle);
        moves.select(TileId(2)).unwrap();
    }
}
