//! Local legality: "no path to nowhere".
//!
//! Only the four edges of the placed tile are inspected:
//!
//! | side leads to        | illegal when                                        |
//! |----------------------|-----------------------------------------------------|
//! | off the board        | any group has a stub on that side                   |
//! | an occupied cell     | stub presence differs from the neighbor's facing side |
//! | an empty cell        | never                                               |
//!
//! Violations are reported per side so a UI can flag each broken edge.
//! Nothing is rolled back; the player may rotate or move the tile and the
//! check runs again.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Tile};
use crate::zones::{Deck, Grid};

/// Set of tile sides whose edge is broken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeViolations(u8);

impl EdgeViolations {
    /// No violations.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn is_legal(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, side: Direction) -> bool {
        self.0 & (1 << side as u8) != 0
    }

    pub fn insert(&mut self, side: Direction) {
        self.0 |= 1 << side as u8;
    }

    /// Broken sides, in index order.
    pub fn sides(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }

    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl std::fmt::Display for EdgeViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_legal() {
            return f.write_str("none");
        }
        for (i, side) in self.sides().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", side)?;
        }
        Ok(())
    }
}

/// Check `tile` as if it stood in `cell`, whether or not it is on the grid.
///
/// Used both for tiles already dropped on the board and for the robot's
/// trial rotations, which never touch the board.
#[must_use]
pub fn check_candidate(grid: &Grid, deck: &Deck, cell: usize, tile: &Tile) -> EdgeViolations {
    let mut violations = EdgeViolations::none();

    for side in Direction::ALL {
        let mine = tile.has_stub(side);
        match grid.neighbor(cell, side) {
            None => {
                if mine {
                    violations.insert(side);
                }
            }
            Some(n) => {
                let Some(neighbor) = grid.get(n).and_then(|id| deck.tile(id)) else {
                    continue;
                };
                if mine != neighbor.has_stub(side.opposite()) {
                    violations.insert(side);
                }
            }
        }
    }

    violations
}

/// Check the tile currently in `cell`.
///
/// Returns `None` if the cell is empty.
#[must_use]
pub fn check_placement(grid: &Grid, deck: &Deck, cell: usize) -> Option<EdgeViolations> {
    let tile = grid.get(cell).and_then(|id| deck.tile(id))?;
    Some(check_candidate(grid, deck, cell, tile))
}
