//! Error types.
//!
//! Each concern has its own enum:
//! - `DeckError`: dealing past the end of the deck
//! - `GridError`: cell bookkeeping (bounds, occupancy)
//! - `RestoreError`: persisted or transmitted state that does not fit this session
//! - `ProtocolError`: inbound peer messages that cannot be applied
//! - `MoveError`: local placement attempts the rules or turn order reject
//! - `RobotError`: the robot has nowhere to go
//! - `ConfigError`: invalid `GameConfig`
//!
//! Validation errors stay local and advisory. Protocol errors stop at the
//! message-handling boundary and never reach the board.

use thiserror::Error;

use super::tile::TileId;
use crate::rules::EdgeViolations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("no undealt tiles remain in the deck")]
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {0} is off the board")]
    OutOfRange(usize),

    #[error("cell {0} is already occupied")]
    Occupied(usize),
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("{field}: expected {expected} entries, found {found}")]
    Truncated {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{0} is not part of this deck")]
    UnknownTile(TileId),

    #[error("{0} appears more than once")]
    DuplicateTile(TileId),

    #[error("{tile}: {degrees} is not a valid orientation")]
    BadOrientation { tile: TileId, degrees: u16 },

    #[error("{field}: value {value} is out of range")]
    OutOfRange { field: &'static str, value: usize },

    #[error("{field}: cannot parse stored value")]
    Malformed {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot blob cannot be encoded or decoded")]
    Blob(#[from] bincode::Error),

    #[error("saved game does not fit this configuration")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown command {0:?}")]
    UnknownCommand(char),

    #[error("malformed payload for command {command:?}")]
    MalformedPayload {
        command: char,
        #[source]
        source: serde_json::Error,
    },

    #[error("message references unknown {0}")]
    UnknownTile(TileId),

    #[error("message references unknown player {0:?}")]
    UnknownPlayer(String),

    #[error("{tile}: {degrees} is not a valid orientation")]
    BadOrientation { tile: TileId, degrees: u16 },

    #[error("cell {0} is off the board")]
    CellOutOfRange(usize),

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("{0} is already on the board")]
    AlreadyPlaced(TileId),

    #[error("{0} has not been dealt to anyone")]
    NotDealt(TileId),

    #[error("cannot restore transmitted state")]
    Restore(#[from] RestoreError),
}

impl From<GridError> for ProtocolError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfRange(cell) => ProtocolError::CellOutOfRange(cell),
            GridError::Occupied(cell) => ProtocolError::CellOccupied(cell),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("the game is over")]
    GameOver,

    #[error("{0} is not in the player's hand")]
    TileNotInHand(TileId),

    #[error("a different tile was already placed this turn")]
    AlreadyPlaced,

    #[error("no tile was placed this turn")]
    NothingPlaced,

    #[error("cell {0} is off the board")]
    CellOutOfRange(usize),

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("cell {0} does not touch any tile on the board")]
    NotPlayable(usize),

    #[error("{0} is not a valid orientation")]
    BadOrientation(u16),

    #[error("the placed tile has broken edges: {0}")]
    IllegalPlacement(EdgeViolations),

    #[error("the hand has no free slot")]
    HandFull,
}

impl From<GridError> for MoveError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfRange(cell) => MoveError::CellOutOfRange(cell),
            GridError::Occupied(cell) => MoveError::CellOccupied(cell),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RobotError {
    #[error("robot has no legal placement")]
    NoLegalMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must have at least one row and one column")]
    EmptyBoard,

    #[error("tile set has {found} tiles, board needs {expected}")]
    TileCount { expected: usize, found: usize },

    #[error("{0} is defined more than once")]
    DuplicateTile(TileId),

    #[error("{0} must have one or two path groups")]
    GroupCount(TileId),

    #[error("{0} has two groups leaving through the same side")]
    OverlappingGroups(TileId),

    #[error("hand capacity must be at least 1")]
    EmptyHand,

    #[error("player limit {0} is outside 1..=4")]
    PlayerLimit(usize),
}
