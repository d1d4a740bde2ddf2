//! Core engine types: tiles, players, state, moves, RNG, configuration.
//!
//! Everything here is plain data plus the bookkeeping that keeps it
//! consistent. The path rules live in `rules`, turn-taking in `session`.

pub mod action;
pub mod config;
pub mod direction;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;
pub mod tile;

pub use action::{Placement, PlacementRecord};
pub use config::{classic_tile_set, GameConfig, TileSpec};
pub use direction::{Direction, PathMask};
pub use error::{ConfigError, DeckError, GridError, MoveError, ProtocolError, RestoreError, RobotError};
pub use player::{Buddy, ColorPair, PlayerId, PlayerMap, Roster};
pub use rng::GameRng;
pub use state::GameState;
pub use tile::{quarter_turns, Confirmed, Tile, TileId, ORIENTATIONS};
