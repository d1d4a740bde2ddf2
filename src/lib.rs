//! # tile-paths
//!
//! Engine for a tile-placement path puzzle played alone, against a robot,
//! or by several peers sharing one board.
//!
//! Players take turns dropping square tiles onto a grid. Each tile carries
//! one or two path groups leaving through some of its four sides. A drop is
//! legal when every shared edge agrees with its neighbor and no path runs
//! off the board. Closing a path scores the value of every tile on it.
//!
//! ## Design Principles
//!
//! 1. **Handles, not references**: tiles live in the `Deck`; the grid,
//!    hands and reverse index hold `TileId`s only.
//!
//! 2. **Lockstep by broadcast**: peers apply the same accepted moves in the
//!    same order. Only the initiator shuffles, deals and passes the turn.
//!
//! 3. **Nothing half-applied**: a bad message or saved game is rejected
//!    before it touches the board.
//!
//! ## Modules
//!
//! - `core`: tiles, players, state, moves, RNG, configuration, errors
//! - `zones`: deck, grid, hands, and where each tile is
//! - `rules`: edge legality, path completion, game outcome
//! - `protocol`: the peer message set and the broadcast seam
//! - `robot`: computer players
//! - `session`: turn coordination and save/resume

pub mod core;
pub mod protocol;
pub mod robot;
pub mod rules;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Buddy, ColorPair, Direction, GameConfig, GameRng, GameState, PathMask, Placement,
    PlacementRecord, PlayerId, PlayerMap, Roster, Tile, TileId, TileSpec,
};

pub use crate::core::error::{
    ConfigError, DeckError, GridError, MoveError, ProtocolError, RestoreError, RobotError,
};

pub use crate::zones::{Deck, Grid, Hand, TileLocations};

pub use crate::rules::{check_placement, score_placement, EdgeViolations, GameOutcome};

pub use crate::protocol::{Envelope, Message, NullChannel, PeerChannel};

pub use crate::robot::{GreedyRobot, PlacementPolicy, ScanPolicy};

pub use crate::session::{
    MetadataStore, PlacementStatus, Snapshot, TurnCoordinator, TurnState, ROBOT_SEAT,
};
