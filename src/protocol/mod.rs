//! Peer-to-peer message protocol.
//!
//! - `message`: the closed `Message` enum and its `Envelope` wire form
//! - `channel`: the `PeerChannel` broadcast seam

pub mod channel;
pub mod message;

pub use channel::{NullChannel, PeerChannel};
pub use message::{Envelope, Message};
