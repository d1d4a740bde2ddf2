//! How a game ended.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// Why a game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The deck is empty and the player to move has nothing left in hand.
    DeckExhausted,
    /// The player to move holds tiles but none fits anywhere.
    NoLegalMoves,
    /// The robot found no legal placement.
    RobotCannotPlay,
    /// The initiator broadcast `g`.
    Announced,
}

impl GameOutcome {
    /// Seats with the highest score. Several seats on a tie.
    #[must_use]
    pub fn leaders(scores: &PlayerMap<u32>) -> Vec<PlayerId> {
        let best = scores.iter().map(|(_, &s)| s).max().unwrap_or(0);
        scores
            .iter()
            .filter(|&(_, &s)| s == best)
            .map(|(p, _)| p)
            .collect()
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            GameOutcome::DeckExhausted => "deck exhausted",
            GameOutcome::NoLegalMoves => "no legal moves",
            GameOutcome::RobotCannotPlay => "robot cannot play",
            GameOutcome::Announced => "game over",
        };
        f.write_str(text)
    }
}
