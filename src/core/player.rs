//! Player identification, per-seat storage and the turn roster.
//!
//! ## PlayerId
//!
//! A seat index. Hands and scores are stored per seat.
//!
//! ## PlayerMap
//!
//! Efficient per-seat data storage backed by `Vec` for O(1) access.
//!
//! ## Roster
//!
//! The ordered buddy list shared by all peers, whose turn it is, and whether
//! this peer is the initiator (the authoritative dealer). Only the initiator
//! ever advances the turn; joiners mirror the handoffs they receive.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier. Seat 0 is always the initiator (or the solo player).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a seat's data, or `None` if the seat does not exist.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// A participant's stroke and fill colors, as announced on joining.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPair(pub String, pub String);

impl ColorPair {
    pub fn new(stroke: impl Into<String>, fill: impl Into<String>) -> Self {
        Self(stroke.into(), fill.into())
    }
}

/// A participant in a shared session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buddy {
    pub nick: String,
    pub colors: ColorPair,
}

impl Buddy {
    pub fn new(nick: impl Into<String>, colors: ColorPair) -> Self {
        Self {
            nick: nick.into(),
            colors,
        }
    }
}

/// Buddy list plus turn ownership.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Roster {
    buddies: Vec<Buddy>,
    local_nick: String,
    initiator: bool,
    whos_turn: usize,
    capacity: usize,
}

impl Roster {
    /// Roster for the peer that shares (or plays alone): it holds seat 0.
    #[must_use]
    pub fn initiator(local: Buddy, capacity: usize) -> Self {
        Self {
            local_nick: local.nick.clone(),
            buddies: vec![local],
            initiator: true,
            whos_turn: 0,
            capacity,
        }
    }

    /// Roster for a joiner: empty until the initiator broadcasts the buddy list.
    #[must_use]
    pub fn joiner(local_nick: impl Into<String>, capacity: usize) -> Self {
        Self {
            local_nick: local_nick.into(),
            buddies: Vec::new(),
            initiator: false,
            whos_turn: 0,
            capacity,
        }
    }

    #[must_use]
    pub fn buddies(&self) -> &[Buddy] {
        &self.buddies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buddies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buddies.is_empty()
    }

    /// A session is shared once more than one buddy is known.
    #[must_use]
    pub fn is_sharing(&self) -> bool {
        self.buddies.len() > 1
    }

    #[must_use]
    pub fn is_initiator(&self) -> bool {
        self.initiator
    }

    #[must_use]
    pub fn local_nick(&self) -> &str {
        &self.local_nick
    }

    /// Seat of `nick`, if listed.
    #[must_use]
    pub fn seat_of(&self, nick: &str) -> Option<PlayerId> {
        self.buddies
            .iter()
            .position(|b| b.nick == nick)
            .map(|i| PlayerId(i as u8))
    }

    /// The local peer's seat. Seat 0 until a joiner learns the buddy list.
    #[must_use]
    pub fn local_seat(&self) -> PlayerId {
        self.seat_of(&self.local_nick).unwrap_or(PlayerId(0))
    }

    #[must_use]
    pub fn nick_of(&self, seat: PlayerId) -> Option<&str> {
        self.buddies.get(seat.index()).map(|b| b.nick.as_str())
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn whos_turn(&self) -> PlayerId {
        PlayerId(self.whos_turn as u8)
    }

    #[must_use]
    pub fn is_local_turn(&self) -> bool {
        self.whos_turn() == self.local_seat()
    }

    /// Add a buddy unless already listed or the session is full.
    ///
    /// Returns true if the buddy was added.
    pub fn append(&mut self, buddy: Buddy) -> bool {
        if self.seat_of(&buddy.nick).is_some() || self.buddies.len() >= self.capacity {
            return false;
        }
        self.buddies.push(buddy);
        true
    }

    /// Replace the whole list with the initiator's authoritative copy.
    pub fn replace(&mut self, buddies: Vec<Buddy>) {
        self.buddies = buddies;
        self.buddies.truncate(self.capacity);
        if self.whos_turn >= self.buddies.len() {
            self.whos_turn = 0;
        }
    }

    /// New game: the initiator (seat 0) moves first.
    pub fn reset_turn(&mut self) {
        self.whos_turn = 0;
    }

    /// Round-robin to the next seat. Only the initiator may advance.
    ///
    /// Returns the new seat, or `None` on a joiner.
    pub fn advance(&mut self) -> Option<PlayerId> {
        if !self.initiator || self.buddies.is_empty() {
            return None;
        }
        self.whos_turn = (self.whos_turn + 1) % self.buddies.len();
        Some(self.whos_turn())
    }

    /// Mirror a handoff announced by the initiator.
    ///
    /// Returns false if `nick` is not listed.
    pub fn set_turn(&mut self, nick: &str) -> bool {
        match self.seat_of(nick) {
            Some(seat) => {
                self.whos_turn = seat.index();
                true
            }
            None => false,
        }
    }
}
