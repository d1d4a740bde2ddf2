//! A peer's view of a running game.
//!
//! ## Key Types
//!
//! - `TurnCoordinator`: turn state machine and message handling
//! - `TurnMoves` / `PlacementStatus`: the one-tile-per-turn attempt
//! - `MetadataStore` / `Snapshot`: save and resume

pub mod coordinator;
pub mod persist;
pub mod placement;

pub use coordinator::{TurnCoordinator, TurnState, ROBOT_SEAT};
pub use persist::{MetadataStore, Snapshot};
pub use placement::{PlacementStatus, TurnMoves};
