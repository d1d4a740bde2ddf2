//! The deck: canonical tile storage plus deal order.
//!
//! Tiles are created once per session and live here for its whole duration.
//! Everything else refers to them by `TileId`. A new game reorders the deck;
//! it never recreates tiles.
//!
//! ## Deal order
//!
//! `order[..cursor]` have been dealt (they sit in hands or on the grid),
//! `order[cursor..]` are still undealt.
//!
//! ```
//! use tile_paths::core::{GameConfig, GameRng};
//! use tile_paths::zones::Deck;
//!
//! let mut deck = Deck::from_config(&GameConfig::classic()).unwrap();
//! deck.shuffle(&mut GameRng::new(1));
//!
//! let first = deck.deal_next().unwrap();
//! assert_eq!(deck.serialize()[0], first);
//! assert_eq!(deck.remaining(), 63);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::config::check_tile;
use crate::core::error::{ConfigError, DeckError, RestoreError};
use crate::core::{GameConfig, GameRng, Tile, TileId};

/// Ordered collection of every tile in the session.
#[derive(Clone, Debug)]
pub struct Deck {
    /// Tile arena. Never reordered, so slots are stable.
    tiles: Vec<Tile>,

    /// tile_id -> arena slot
    slots: FxHashMap<TileId, usize>,

    /// Deal order.
    order: Vec<TileId>,

    /// Index of the next undealt tile.
    cursor: usize,
}

impl Deck {
    /// Create a deck from explicit tiles, in the given order.
    pub fn new(tiles: Vec<Tile>) -> Result<Self, ConfigError> {
        let mut slots = FxHashMap::default();
        for (slot, tile) in tiles.iter().enumerate() {
            check_tile(tile)?;
            if slots.insert(tile.id(), slot).is_some() {
                return Err(ConfigError::DuplicateTile(tile.id()));
            }
        }
        let order = tiles.iter().map(Tile::id).collect();

        Ok(Self {
            tiles,
            slots,
            order,
            cursor: 0,
        })
    }

    /// Create the deck for a validated configuration.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.tiles())
    }

    /// Total number of tiles.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Number of undealt tiles.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.size() - self.cursor
    }

    /// Have all tiles been dealt?
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.size()
    }

    /// Index of the next undealt tile.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Restore the deal cursor from persisted state.
    pub fn set_cursor(&mut self, cursor: usize) -> Result<(), RestoreError> {
        if cursor > self.size() {
            return Err(RestoreError::OutOfRange {
                field: "index",
                value: cursor,
            });
        }
        self.cursor = cursor;
        Ok(())
    }

    /// Current deal order.
    #[must_use]
    pub fn order(&self) -> &[TileId] {
        &self.order
    }

    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Look up a tile by id.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(&id).map(|&slot| &self.tiles[slot])
    }

    /// Look up a tile by id for rotation or confirmation marking.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let slot = *self.slots.get(&id)?;
        Some(&mut self.tiles[slot])
    }

    /// Tiles in deal order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.order.iter().filter_map(|id| self.tile(*id))
    }

    /// Where `id` sits in the deal order.
    #[must_use]
    pub fn position(&self, id: TileId) -> Option<usize> {
        self.order.iter().position(|&t| t == id)
    }

    /// Shuffle all tiles (Fisher–Yates) and rewind the cursor.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.order);
        self.cursor = 0;
    }

    /// Rotate every tile back to 0° and clear completion marks.
    pub fn reset_tiles(&mut self) {
        for tile in &mut self.tiles {
            tile.reset();
        }
    }

    /// Deal the next tile.
    pub fn deal_next(&mut self) -> Result<TileId, DeckError> {
        let id = *self.order.get(self.cursor).ok_or(DeckError::Exhausted)?;
        self.cursor += 1;
        Ok(id)
    }

    /// The deal order as plain ids, for the `d` message and the `deck` field.
    #[must_use]
    pub fn serialize(&self) -> Vec<TileId> {
        self.order.clone()
    }

    /// Adopt a transmitted or persisted deal order and rewind the cursor.
    ///
    /// The order must name every tile exactly once. On error the deck is
    /// left untouched.
    pub fn restore(&mut self, order: &[TileId]) -> Result<(), RestoreError> {
        if order.len() != self.size() {
            return Err(RestoreError::Truncated {
                field: "deck",
                expected: self.size(),
                found: order.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for &id in order {
            if !self.contains(id) {
                return Err(RestoreError::UnknownTile(id));
            }
            if !seen.insert(id) {
                return Err(RestoreError::DuplicateTile(id));
            }
        }

        self.order.clear();
        self.order.extend_from_slice(order);
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PathMask;

    fn small_deck(n: u16) -> Deck {
        let tiles = (0..n)
            .map(|i| Tile::new(TileId(i), [PathMask::from_bits(0b0101)]))
            .collect();
        Deck::new(tiles).unwrap()
    }

    #[test]
    fn test_deal_until_exhausted() {
        let mut deck = small_deck(3);
        assert_eq!(deck.deal_next(), Ok(TileId(0)));
        assert_eq!(deck.deal_next(), Ok(TileId(1)));
        assert_eq!(deck.deal_next(), Ok(TileId(2)));
        assert!(deck.is_exhausted());
        assert_eq!(deck.deal_next(), Err(DeckError::Exhausted));
        assert_eq!(deck.cursor(), 3);
    }

    #[test]
    fn test_shuffle_resets_cursor() {
        let mut deck = small_deck(20);
        deck.deal_next().unwrap();
        deck.deal_next().unwrap();

        let before = deck.serialize();
        deck.shuffle(&mut GameRng::new(42));

        assert_eq!(deck.cursor(), 0);
        assert_ne!(deck.serialize(), before);

        let mut sorted = deck.serialize();
        sorted.sort();
        assert_eq!(sorted, before);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut a = small_deck(16);
        a.shuffle(&mut GameRng::new(9));
        let mut b = small_deck(16);
        b.restore(&a.serialize()).unwrap();

        assert_eq!(a.order(), b.order());
        let dealt_a: Vec<_> = (0..16).map(|_| a.deal_next().unwrap()).collect();
        let dealt_b: Vec<_> = (0..16).map(|_| b.deal_next().unwrap()).collect();
        assert_eq!(dealt_a, dealt_b);
    }

    #[test]
    fn test_restore_rejects_bad_orders() {
        let mut deck = small_deck(4);
        let original = deck.serialize();

        let truncated = [TileId(0), TileId(1)];
        assert!(matches!(
            deck.restore(&truncated),
            Err(RestoreError::Truncated { expected: 4, found: 2, .. })
        ));

        let unknown = [TileId(0), TileId(1), TileId(2), TileId(99)];
        assert!(matches!(deck.restore(&unknown), Err(RestoreError::UnknownTile(TileId(99)))));

        let duplicate = [TileId(0), TileId(1), TileId(1), TileId(2)];
        assert!(matches!(deck.restore(&duplicate), Err(RestoreError::DuplicateTile(TileId(1)))));

        assert_eq!(deck.serialize(), original);
    }

    #[test]
    fn test_restore_preserves_tile_state() {
        let mut deck = small_deck(4);
        deck.tile_mut(TileId(2)).unwrap().rotate_clockwise();

        deck.restore(&[TileId(3), TileId(2), TileId(1), TileId(0)]).unwrap();
        assert_eq!(deck.tile(TileId(2)).unwrap().orientation(), 90);
        assert_eq!(deck.tiles().next().map(Tile::id), Some(TileId(3)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let tiles = vec![
            Tile::new(TileId(1), [PathMask::from_bits(1)]),
            Tile::new(TileId(1), [PathMask::from_bits(2)]),
        ];
        assert_eq!(Deck::new(tiles).err(), Some(ConfigError::DuplicateTile(TileId(1))));
    }

    #[test]
    fn test_set_cursor() {
        let mut deck = small_deck(4);
        deck.set_cursor(4).unwrap();
        assert!(deck.is_exhausted());
        assert!(deck.set_cursor(5).is_err());
    }
}
