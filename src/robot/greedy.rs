//! The robot: first fit over a random cell order.
//!
//! Cells are visited in a fresh random permutation each turn. At each
//! playable cell every hand tile is tried in all four rotations; the first
//! combination that passes the edge check is played. There is no lookahead
//! and no preference for scoring moves.

use crate::core::{GameRng, GameState, Placement, PlayerId, ORIENTATIONS};
use crate::rules::check_candidate;

use super::policy::PlacementPolicy;

/// Greedy first-fit robot.
#[derive(Clone, Debug)]
pub struct GreedyRobot {
    rng: GameRng,
}

impl GreedyRobot {
    /// A robot drawing its cell order from `rng`.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl PlacementPolicy for GreedyRobot {
    fn choose(&mut self, state: &GameState, player: PlayerId) -> Option<Placement> {
        let order = self.rng.random_order(state.grid().cell_count());
        first_fit(state, player, order)
    }
}

/// Deterministic search in row-major cell order.
///
/// Used for hints and for deciding whether a seat can move at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanPolicy;

impl PlacementPolicy for ScanPolicy {
    fn choose(&mut self, state: &GameState, player: PlayerId) -> Option<Placement> {
        find_placement(state, player)
    }
}

/// First legal placement for `player`, scanning cells row-major.
#[must_use]
pub fn find_placement(state: &GameState, player: PlayerId) -> Option<Placement> {
    first_fit(state, player, 0..state.grid().cell_count())
}

/// Can `player` place any tile from their hand?
#[must_use]
pub fn has_legal_move(state: &GameState, player: PlayerId) -> bool {
    find_placement(state, player).is_some()
}

fn first_fit(
    state: &GameState,
    player: PlayerId,
    cells: impl IntoIterator<Item = usize>,
) -> Option<Placement> {
    let hand = state.hand(player)?;
    if hand.is_empty() {
        return None;
    }
    let grid = state.grid();
    let deck = state.deck();

    for cell in cells {
        if !grid.is_playable(cell) {
            continue;
        }
        for id in hand.tiles() {
            let Some(tile) = deck.tile(id) else { continue };
            let mut trial = tile.clone();
            for _ in ORIENTATIONS {
                if check_candidate(grid, deck, cell, &trial).is_legal() {
                    return Some(Placement::new(id, trial.orientation(), cell));
                }
                trial.rotate_clockwise();
            }
        }
    }
    None
}
