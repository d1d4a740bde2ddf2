//! Placement policies.
//!
//! A policy looks at the state and proposes a move for one seat. It never
//! changes the board itself; `play` applies whatever it picks. The robot,
//! the hint button and the autoplay driver all go through this seam.

use tracing::debug;

use crate::core::error::RobotError;
use crate::core::{GameState, Placement, PlacementRecord, PlayerId};

/// Chooses a placement for a seat.
pub trait PlacementPolicy {
    /// Propose a legal placement from `player`'s hand, or `None` if there
    /// is nowhere to go.
    fn choose(&mut self, state: &GameState, player: PlayerId) -> Option<Placement>;
}

/// Let `policy` pick a move for `player`, apply it and score it.
pub fn play<P: PlacementPolicy + ?Sized>(
    policy: &mut P,
    state: &mut GameState,
    player: PlayerId,
) -> Result<PlacementRecord, RobotError> {
    let placement = policy.choose(state, player).ok_or(RobotError::NoLegalMove)?;

    if let Err(err) = state.apply_placement(&placement) {
        debug!(%placement, error = %err, "policy proposed a placement that cannot be applied");
        return Err(RobotError::NoLegalMove);
    }
    let points = state.score_cell(player, placement.cell);

    let record = PlacementRecord::new(player, placement, points);
    state.record(record.clone());
    debug!(%player, %placement, points, "placed");
    Ok(record)
}
