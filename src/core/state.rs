//! Game state.
//!
//! `GameState` owns everything one peer knows about the current game:
//! - The deck (canonical tiles plus deal order)
//! - The grid and every seat's hand, as `TileId` handles
//! - The reverse `TileLocations` index
//! - Scores per seat and the move history
//! - The RNG used for shuffling
//!
//! Turn ownership is not here; it lives in the session's `Roster`.
//!
//! Every mutation that moves a tile updates the slot maps and the reverse
//! index together, so a tile is never in two places at once.

use im::Vector;

use super::action::{Placement, PlacementRecord};
use super::config::GameConfig;
use super::error::{ConfigError, MoveError, ProtocolError, RestoreError};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use super::tile::{quarter_turns, Tile, TileId};
use crate::rules::score_placement;
use crate::zones::{CellRecord, Deck, Grid, Hand, Location, TileLocations};

/// Full local game state.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    deck: Deck,
    grid: Grid,
    hands: PlayerMap<Hand>,
    locations: TileLocations,
    scores: PlayerMap<u32>,
    history: Vector<PlacementRecord>,
    last_moved: Option<TileId>,

    /// Deterministic RNG for shuffles.
    pub rng: GameRng,
}

impl GameState {
    /// Create a state for `player_count` seats.
    ///
    /// The configuration is validated and the deck is built in tile-set
    /// order; call `shuffle_deck` before dealing.
    pub fn new(config: GameConfig, player_count: usize, seed: u64) -> Result<Self, ConfigError> {
        let deck = Deck::from_config(&config)?;
        if player_count == 0 || player_count > config.max_players {
            return Err(ConfigError::PlayerLimit(player_count));
        }

        let hand_size = config.hand_size;
        Ok(Self {
            grid: Grid::new(config.rows, config.cols),
            hands: PlayerMap::new(player_count, |_| Hand::new(hand_size)),
            scores: PlayerMap::with_default(player_count),
            locations: TileLocations::new(),
            history: Vector::new(),
            last_moved: None,
            rng: GameRng::new(seed),
            deck,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    /// Change the number of seats. Existing seats keep their hand and score.
    pub fn set_player_count(&mut self, player_count: usize) -> Result<(), ConfigError> {
        if player_count == 0 || player_count > self.config.max_players {
            return Err(ConfigError::PlayerLimit(player_count));
        }
        if player_count == self.player_count() {
            return Ok(());
        }

        let hand_size = self.config.hand_size;
        for seat in PlayerId::all(self.player_count()).skip(player_count) {
            let dropped: Vec<TileId> = self.hands[seat].tiles().collect();
            for tile in dropped {
                self.locations.remove(tile);
            }
        }
        let old_hands = &self.hands;
        let old_scores = &self.scores;
        let hands = PlayerMap::new(player_count, |p| {
            old_hands.get(p).cloned().unwrap_or_else(|| Hand::new(hand_size))
        });
        let scores = PlayerMap::new(player_count, |p| old_scores.get(p).copied().unwrap_or(0));
        self.hands = hands;
        self.scores = scores;
        Ok(())
    }

    // === Tiles and zones ===

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.deck.tile(id)
    }

    /// Get a seat's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.hands.get(player)
    }

    #[must_use]
    pub fn hands(&self) -> &PlayerMap<Hand> {
        &self.hands
    }

    #[must_use]
    pub fn locations(&self) -> &TileLocations {
        &self.locations
    }

    // === Scores and history ===

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores.get(player).copied().unwrap_or(0)
    }

    pub fn set_score(&mut self, player: PlayerId, score: u32) {
        if let Some(s) = self.scores.get_mut(player) {
            *s = score;
        }
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<u32> {
        &self.scores
    }

    /// Accepted placements this game, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<PlacementRecord> {
        &self.history
    }

    /// The most recently moved tile.
    #[must_use]
    pub fn last_moved(&self) -> Option<TileId> {
        self.last_moved
    }

    pub fn set_last_moved(&mut self, tile: Option<TileId>) {
        self.last_moved = tile;
    }

    /// Record an accepted placement in history.
    pub fn record(&mut self, record: PlacementRecord) {
        self.last_moved = Some(record.placement.tile);
        self.history.push_back(record);
    }

    // === New game ===

    /// Clear the board, hands, scores and history and turn every tile back
    /// to 0°. The deck order is kept until the next shuffle or restore.
    pub fn reset(&mut self) {
        self.deck.reset_tiles();
        self.grid.clear();
        for (_, hand) in self.hands.iter_mut() {
            hand.clear();
        }
        for (_, score) in self.scores.iter_mut() {
            *score = 0;
        }
        self.locations.clear();
        self.history = Vector::new();
        self.last_moved = None;
    }

    /// Shuffle the deck with the game RNG and rewind the deal cursor.
    pub fn shuffle_deck(&mut self) {
        self.deck.shuffle(&mut self.rng);
    }

    /// Adopt a deal order from the initiator or from persisted state.
    pub fn restore_deck(&mut self, order: &[TileId]) -> Result<(), RestoreError> {
        self.deck.restore(order)
    }

    /// Move the deal cursor, for persisted state.
    pub fn set_deal_cursor(&mut self, cursor: usize) -> Result<(), RestoreError> {
        self.deck.set_cursor(cursor)
    }

    /// Fill the empty slots of a seat's hand from the deck.
    ///
    /// Returns the tiles dealt with their slots; empty once the deck runs out.
    pub fn deal_hand(&mut self, player: PlayerId) -> Vec<(usize, TileId)> {
        let Some(hand) = self.hands.get_mut(player) else {
            return Vec::new();
        };
        let dealt = hand.deal(&mut self.deck);
        for &(slot, tile) in &dealt {
            self.locations.move_to(tile, Location::Hand { player, slot });
        }
        dealt
    }

    /// Replace a seat's hand with transmitted or persisted contents.
    ///
    /// A listed tile that is already on the board or in another seat's hand
    /// is rejected. The deal cursor moves past every listed tile so that
    /// undealt counts stay right on peers that never deal.
    pub fn restore_hand(
        &mut self,
        player: PlayerId,
        slots: &[Option<TileId>],
    ) -> Result<(), RestoreError> {
        let Some(hand) = self.hands.get_mut(player) else {
            return Err(RestoreError::OutOfRange {
                field: "hand",
                value: player.index(),
            });
        };
        for &id in slots.iter().flatten() {
            match self.locations.get(id) {
                Some(Location::Hand { player: p, .. }) if p == player => {}
                Some(_) => return Err(RestoreError::DuplicateTile(id)),
                None => {}
            }
        }

        let previous: Vec<TileId> = hand.tiles().collect();
        hand.restore(slots, &self.deck)?;

        for tile in previous {
            self.locations.remove(tile);
        }
        let mut furthest = self.deck.cursor();
        for (slot, id) in slots.iter().enumerate() {
            let Some(id) = *id else { continue };
            self.locations.move_to(id, Location::Hand { player, slot });
            if let Some(pos) = self.deck.position(id) {
                furthest = furthest.max(pos + 1);
            }
        }
        self.deck.set_cursor(furthest)
    }

    /// Rebuild the board from persisted records.
    ///
    /// A tile now on the board is dropped from any hand that still lists it.
    pub fn restore_grid(&mut self, records: &[CellRecord]) -> Result<(), RestoreError> {
        self.grid.restore(records, &mut self.deck)?;

        self.locations.clear();
        for (cell, id) in self.grid.occupied() {
            self.locations.move_to(id, Location::Grid(cell));
        }
        for (player, hand) in self.hands.iter_mut() {
            for (slot, id) in hand.slots().to_vec().into_iter().enumerate() {
                let Some(id) = id else { continue };
                if self.locations.get(id).is_some() {
                    hand.remove(id);
                    continue;
                }
                self.locations.move_to(id, Location::Hand { player, slot });
            }
        }
        Ok(())
    }

    // === Local moves ===

    /// Move a tile from a seat's hand onto an empty cell. No legality check.
    pub fn place_from_hand(
        &mut self,
        player: PlayerId,
        tile: TileId,
        cell: usize,
    ) -> Result<(), MoveError> {
        let hand = self.hands.get_mut(player).ok_or(MoveError::NotYourTurn)?;
        if !hand.contains(tile) {
            return Err(MoveError::TileNotInHand(tile));
        }
        self.grid.place(tile, cell)?;
        hand.remove(tile);
        self.locations.move_to(tile, Location::Grid(cell));
        self.last_moved = Some(tile);
        Ok(())
    }

    /// Move a tile already on the board to another empty cell.
    pub fn relocate(&mut self, tile: TileId, cell: usize) -> Result<(), MoveError> {
        let from = self.locations.cell_of(tile).ok_or(MoveError::NothingPlaced)?;
        if from == cell {
            return Ok(());
        }
        self.grid.place(tile, cell)?;
        self.grid.remove(from);
        self.locations.move_to(tile, Location::Grid(cell));
        self.last_moved = Some(tile);
        Ok(())
    }

    /// Take a tile off the board and put it back in a seat's hand.
    ///
    /// Returns the slot it landed in.
    pub fn return_to_hand(&mut self, player: PlayerId, tile: TileId) -> Result<usize, MoveError> {
        let cell = self.locations.cell_of(tile).ok_or(MoveError::NothingPlaced)?;
        let hand = self.hands.get_mut(player).ok_or(MoveError::NotYourTurn)?;
        let slot = hand.insert(tile).ok_or(MoveError::HandFull)?;
        self.grid.remove(cell);
        self.locations.move_to(tile, Location::Hand { player, slot });
        self.last_moved = Some(tile);
        Ok(slot)
    }

    /// Turn a tile 90° clockwise. Returns the new orientation.
    pub fn rotate(&mut self, tile: TileId) -> Option<u16> {
        let t = self.deck.tile_mut(tile)?;
        t.rotate_clockwise();
        self.last_moved = Some(tile);
        Some(t.orientation())
    }

    // === Replayed moves ===

    /// Apply a peer's accepted placement without re-checking legality.
    ///
    /// The tile must be in some seat's hand. Everything is validated before
    /// anything changes, so a rejected message leaves the state untouched.
    /// Returns the seat whose hand held the tile.
    pub fn apply_placement(&mut self, placement: &Placement) -> Result<PlayerId, ProtocolError> {
        let Placement {
            tile,
            orientation,
            cell,
        } = *placement;

        if !self.deck.contains(tile) {
            return Err(ProtocolError::UnknownTile(tile));
        }
        if quarter_turns(orientation).is_none() {
            return Err(ProtocolError::BadOrientation {
                tile,
                degrees: orientation,
            });
        }
        if self.locations.cell_of(tile).is_some() {
            return Err(ProtocolError::AlreadyPlaced(tile));
        }
        let holder = self
            .locations
            .holder(tile)
            .ok_or(ProtocolError::NotDealt(tile))?;

        self.grid.place(tile, cell)?;
        if let Some(t) = self.deck.tile_mut(tile) {
            t.set_orientation(orientation)?;
        }

        if let Some(hand) = self.hands.get_mut(holder) {
            hand.remove(tile);
        }
        self.locations.move_to(tile, Location::Grid(cell));
        self.last_moved = Some(tile);
        Ok(holder)
    }

    /// Run the completion walk for the tile in `cell` and credit `player`.
    ///
    /// Returns the points earned.
    pub fn score_cell(&mut self, player: PlayerId, cell: usize) -> u32 {
        let points = score_placement(&self.grid, &mut self.deck, cell);
        if let Some(score) = self.scores.get_mut(player) {
            *score += points;
        }
        points
    }
}
