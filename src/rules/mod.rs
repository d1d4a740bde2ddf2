//! Path rules: where a tile may go and what it completes.
//!
//! - `legality`: the four-edge check run on every drop
//! - `completion`: the walk that finds closed paths and scores them
//! - `outcome`: why a game ended

pub mod completion;
pub mod legality;
pub mod outcome;

pub use completion::{find_completed_paths, score_placement, walk_path, CompletedPath, PathNode, PathWalk};
pub use legality::{check_candidate, check_placement, EdgeViolations};
pub use outcome::GameOutcome;
