//! Where tiles live.
//!
//! ## Key Types
//!
//! - `Deck`: owns every tile; deal order and cursor
//! - `Grid`: the board, cell -> tile handle
//! - `Hand`: a seat's slots, slot -> tile handle
//! - `TileLocations`: tile handle -> hand slot or grid cell

pub mod deck;
pub mod grid;
pub mod hand;
pub mod locations;

pub use deck::Deck;
pub use grid::{CellRecord, Grid};
pub use hand::Hand;
pub use locations::{Location, TileLocations};
