//! A player's hand: a fixed number of slots, each empty or holding a tile.

use rustc_hash::FxHashSet;

use crate::core::error::RestoreError;
use crate::core::TileId;

use super::Deck;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    slots: Vec<Option<TileId>>,
}

impl Hand {
    /// An empty hand with `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<TileId>] {
        &self.slots
    }

    /// Tiles currently held, in slot order.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// How many tiles are held.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        self.slot_of(tile).is_some()
    }

    #[must_use]
    pub fn slot_of(&self, tile: TileId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(tile))
    }

    #[must_use]
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Put a tile into the first empty slot. Returns the slot used.
    pub fn insert(&mut self, tile: TileId) -> Option<usize> {
        let slot = self.find_empty_slot()?;
        self.slots[slot] = Some(tile);
        Some(slot)
    }

    /// Take a tile out of the hand. Returns the slot it was in.
    pub fn remove(&mut self, tile: TileId) -> Option<usize> {
        let slot = self.slot_of(tile)?;
        self.slots[slot] = None;
        Some(slot)
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Fill empty slots from the deck until the hand is full or the deck runs out.
    ///
    /// Returns the tiles dealt, with the slot each landed in.
    pub fn deal(&mut self, deck: &mut Deck) -> Vec<(usize, TileId)> {
        let mut dealt = Vec::new();
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.is_some() {
                continue;
            }
            match deck.deal_next() {
                Ok(tile) => {
                    *entry = Some(tile);
                    dealt.push((slot, tile));
                }
                Err(_) => break,
            }
        }
        dealt
    }

    /// Slot contents for the `h` message and the `hand-<i>` field.
    #[must_use]
    pub fn serialize(&self) -> Vec<Option<TileId>> {
        self.slots.clone()
    }

    /// Replace the slots with transmitted or persisted contents.
    ///
    /// Every id must exist in the deck and appear at most once. Extra
    /// trailing slots are an error; a shorter list leaves the remaining
    /// slots empty.
    pub fn restore(&mut self, slots: &[Option<TileId>], deck: &Deck) -> Result<(), RestoreError> {
        if slots.len() > self.capacity() {
            return Err(RestoreError::OutOfRange {
                field: "hand",
                value: slots.len(),
            });
        }
        let mut seen = FxHashSet::default();
        for &id in slots.iter().flatten() {
            if !deck.contains(id) {
                return Err(RestoreError::UnknownTile(id));
            }
            if !seen.insert(id) {
                return Err(RestoreError::DuplicateTile(id));
            }
        }

        self.clear();
        for (slot, id) in slots.iter().enumerate() {
            self.slots[slot] = *id;
        }
        Ok(())
    }
}
