//! Computer players.
//!
//! ## Key Types
//!
//! - `PlacementPolicy`: proposes a move for a seat
//! - `GreedyRobot`: random cell order, first legal fit
//! - `ScanPolicy`: row-major first fit, for hints and "can anyone move?"

pub mod greedy;
pub mod policy;

pub use greedy::{find_placement, has_legal_move, GreedyRobot, ScanPolicy};
pub use policy::{play, PlacementPolicy};
