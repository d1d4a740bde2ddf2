//! Turn ownership and state synchronization.
//!
//! One `TurnCoordinator` runs per peer. It owns that peer's `GameState` and
//! `Roster`, turns local UI events into board changes, and keeps every peer
//! in lockstep by broadcasting accepted moves.
//!
//! ## Roles
//!
//! - **Initiator**: the peer that shared the game (or plays alone). It
//!   shuffles, deals every hand, and is the only peer that advances the turn.
//! - **Joiner**: mirrors the initiator. It applies the deck order and hands
//!   it is sent and waits to be told whose turn it is.
//!
//! Solo and robot games are a lone initiator with nobody to broadcast to.
//!
//! ## Turn flow
//!
//! ```text
//! AwaitingNewGame -> Dealing -> MyTurn | WaitingOnPeer
//!                                  ^           |
//!                                  +-- RedealCheck (initiator) --> GameOver
//! ```
//!
//! Inbound messages are applied one at a time in arrival order. Nothing
//! blocks: `WaitingOnPeer` simply means "do nothing until a message comes".
//! Peers never resynchronize; if one drifts, the drift is logged and play
//! continues.

use tracing::{debug, info, warn};

use crate::core::error::{ConfigError, MoveError, ProtocolError, RestoreError};
use crate::core::{
    quarter_turns, Buddy, ColorPair, GameConfig, GameState, Placement, PlacementRecord, PlayerId,
    Roster, TileId,
};
use crate::protocol::{Envelope, Message, PeerChannel};
use crate::robot::{find_placement, has_legal_move, play, GreedyRobot};
use crate::rules::{check_placement, EdgeViolations, GameOutcome};

use super::persist::{MetadataStore, Snapshot};
use super::placement::{PlacementStatus, TurnMoves};

/// Seat the robot plays from in a robot game.
pub const ROBOT_SEAT: PlayerId = PlayerId(1);

const ROBOT_NICK: &str = "robot";

/// Where this peer is in the turn cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// No game yet.
    AwaitingNewGame,
    /// A joiner saw `n` and is waiting for its hand.
    Dealing,
    /// The local player may place a tile.
    MyTurn,
    /// Someone else is moving.
    WaitingOnPeer(String),
    /// The initiator is refilling hands and picking the next seat.
    RedealCheck,
    GameOver(GameOutcome),
}

/// Per-peer game driver.
pub struct TurnCoordinator<C: PeerChannel> {
    state: GameState,
    roster: Roster,
    channel: C,
    turn: TurnState,
    moves: TurnMoves,
    robot: Option<GreedyRobot>,
}

impl<C: PeerChannel> TurnCoordinator<C> {
    /// A peer that plays alone or shares the game with joiners.
    pub fn initiator(
        config: GameConfig,
        local: Buddy,
        seed: u64,
        channel: C,
    ) -> Result<Self, ConfigError> {
        let roster = Roster::initiator(local, config.max_players);
        Ok(Self {
            state: GameState::new(config, 1, seed)?,
            roster,
            channel,
            turn: TurnState::AwaitingNewGame,
            moves: TurnMoves::default(),
            robot: None,
        })
    }

    /// A peer that joined someone else's game. Call `join` to announce it.
    pub fn joiner(
        config: GameConfig,
        nick: impl Into<String>,
        seed: u64,
        channel: C,
    ) -> Result<Self, ConfigError> {
        let roster = Roster::joiner(nick, config.max_players);
        Ok(Self {
            state: GameState::new(config, 1, seed)?,
            roster,
            channel,
            turn: TurnState::AwaitingNewGame,
            moves: TurnMoves::default(),
            robot: None,
        })
    }

    /// Play against the robot. Only meaningful for a lone initiator.
    pub fn with_robot(mut self) -> Result<Self, ConfigError> {
        self.enable_robot()?;
        Ok(self)
    }

    fn enable_robot(&mut self) -> Result<(), ConfigError> {
        if self.robot.is_none() {
            self.state.set_player_count(2)?;
            self.robot = Some(GreedyRobot::new(self.state.rng.for_context(ROBOT_NICK)));
        }
        Ok(())
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn turn_state(&self) -> &TurnState {
        &self.turn
    }

    #[must_use]
    pub fn placement_status(&self) -> PlacementStatus {
        self.moves.status()
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    #[must_use]
    pub fn is_robot_game(&self) -> bool {
        self.robot.is_some()
    }

    #[must_use]
    pub fn local_seat(&self) -> PlayerId {
        self.roster.local_seat()
    }

    /// The local player's score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score(self.local_seat())
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.turn {
            TurnState::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Cells the local player may drop a tile on.
    #[must_use]
    pub fn playable_cells(&self) -> Vec<usize> {
        self.state.grid().playable_cells()
    }

    /// A legal placement from the local hand, without making it.
    #[must_use]
    pub fn hint(&self) -> Option<Placement> {
        if self.turn != TurnState::MyTurn || self.moves.placed().is_some() {
            return None;
        }
        find_placement(&self.state, self.local_seat())
    }

    fn send(&mut self, message: Message) {
        match message.encode() {
            Ok(envelope) => self.channel.broadcast(envelope),
            Err(err) => warn!(command = %message.command(), error = %err, "cannot encode message"),
        }
    }

    fn sharing(&self) -> bool {
        self.roster.is_sharing()
    }

    fn seat_count(&self) -> usize {
        if self.robot.is_some() {
            2
        } else {
            self.roster.len().max(1)
        }
    }

    // === Joining ===

    /// Announce this peer to the initiator.
    pub fn join(&mut self, colors: ColorPair) {
        let nick = self.roster.local_nick().to_string();
        info!(%nick, "joining shared game");
        self.send(Message::Join { nick, colors });
    }

    // === New game ===

    /// Start a new game.
    ///
    /// The initiator clears everything, shuffles and deals, tells the
    /// joiners, and takes the first turn. A joiner clears and waits.
    pub fn new_game(&mut self) {
        self.state.reset();
        self.moves.reset();
        self.roster.reset_turn();

        if !self.roster.is_initiator() {
            info!("waiting for the initiator to deal");
            self.turn = TurnState::Dealing;
            return;
        }

        self.turn = TurnState::Dealing;
        if let Err(err) = self.state.set_player_count(self.seat_count()) {
            warn!(error = %err, "cannot seat every player");
        }

        let sharing = self.sharing();
        if sharing {
            self.send(Message::NewGame);
        }
        self.state.shuffle_deck();
        if sharing {
            let order = self.state.deck().serialize();
            self.send(Message::Deck { order });
        }

        let local = self.local_seat();
        self.state.deal_hand(local);
        if self.robot.is_some() {
            self.state.deal_hand(ROBOT_SEAT);
        } else if sharing {
            for seat in PlayerId::all(self.roster.len()) {
                if seat != local {
                    self.state.deal_hand(seat);
                }
                self.send_hand(seat);
            }
        }

        info!(
            seed = self.state.rng.seed(),
            players = self.state.player_count(),
            robot = self.robot.is_some(),
            "new game"
        );
        self.begin_my_turn();
    }

    fn send_hand(&mut self, seat: PlayerId) {
        let Some(nick) = self.roster.nick_of(seat).map(str::to_string) else {
            return;
        };
        let slots = self.state.hand(seat).map(|h| h.serialize()).unwrap_or_default();
        debug!(%nick, "sending hand");
        self.send(Message::Hand { nick, slots });
    }

    // === Local UI events ===

    fn require_my_turn(&self) -> Result<(), MoveError> {
        match self.turn {
            TurnState::MyTurn => Ok(()),
            TurnState::GameOver(_) => Err(MoveError::GameOver),
            _ => Err(MoveError::NotYourTurn),
        }
    }

    /// Is `tile` something the local player may touch this turn?
    fn require_own_tile(&self, tile: TileId) -> Result<(), MoveError> {
        let in_hand = self
            .state
            .hand(self.local_seat())
            .is_some_and(|h| h.contains(tile));
        let placed = self.moves.placed().is_some_and(|(t, _)| t == tile);
        if in_hand || placed {
            Ok(())
        } else {
            Err(MoveError::TileNotInHand(tile))
        }
    }

    /// The player picked up a tile.
    pub fn select_tile(&mut self, tile: TileId) -> Result<(), MoveError> {
        self.require_my_turn()?;
        self.require_own_tile(tile)?;
        self.moves.select(tile)
    }

    /// The player started dragging a tile.
    pub fn begin_drag(&mut self, tile: TileId) -> Result<(), MoveError> {
        self.require_my_turn()?;
        self.require_own_tile(tile)?;
        self.moves.begin_drag(tile)
    }

    /// The player dropped a tile on a grid cell.
    ///
    /// The tile lands even if its edges are broken; the returned violations
    /// say which sides need fixing before the turn can end.
    pub fn drop_on_cell(&mut self, tile: TileId, cell: usize) -> Result<EdgeViolations, MoveError> {
        self.require_my_turn()?;
        self.require_own_tile(tile)?;
        self.moves.check_pickup(tile)?;
        self.check_target(cell)?;

        if self.moves.placed().is_some() {
            self.state.relocate(tile, cell)?;
        } else {
            self.state.place_from_hand(self.local_seat(), tile, cell)?;
        }

        let violations = check_placement(self.state.grid(), self.state.deck(), cell)
            .unwrap_or_default();
        self.moves.dropped(tile, cell, violations);
        debug!(%tile, cell, %violations, "dropped");
        Ok(violations)
    }

    /// Can the tile being moved land on `cell`? The tile placed this turn,
    /// if any, counts as lifted.
    fn check_target(&self, cell: usize) -> Result<(), MoveError> {
        let mut board = self.state.grid().clone();
        if let Some((_, from)) = self.moves.placed() {
            board.remove(from);
        }
        if !board.in_bounds(cell) {
            return Err(MoveError::CellOutOfRange(cell));
        }
        if board.is_occupied(cell) {
            return Err(MoveError::CellOccupied(cell));
        }
        if !board.is_playable(cell) {
            return Err(MoveError::NotPlayable(cell));
        }
        Ok(())
    }

    /// The player took the dropped tile back. Returns its hand slot.
    pub fn return_to_hand(&mut self, tile: TileId) -> Result<usize, MoveError> {
        self.require_my_turn()?;
        match self.moves.placed() {
            Some((placed, _)) if placed == tile => {}
            _ => return Err(MoveError::NothingPlaced),
        }
        let slot = self.state.return_to_hand(self.local_seat(), tile)?;
        self.moves.returned();
        Ok(slot)
    }

    /// The player turned a tile 90° clockwise.
    ///
    /// If the tile is on the board its edges are checked again and the new
    /// verdict is returned.
    pub fn rotate_tile(&mut self, tile: TileId) -> Result<Option<EdgeViolations>, MoveError> {
        self.require_my_turn()?;
        self.require_own_tile(tile)?;
        self.state.rotate(tile);

        match self.moves.placed() {
            Some((placed, cell)) if placed == tile => {
                let violations = check_placement(self.state.grid(), self.state.deck(), cell)
                    .unwrap_or_default();
                self.moves.dropped(tile, cell, violations);
                Ok(Some(violations))
            }
            _ => Ok(None),
        }
    }

    /// Turn a tile to `orientation` and drop it on `cell` in one step.
    pub fn place(&mut self, placement: Placement) -> Result<EdgeViolations, MoveError> {
        self.require_my_turn()?;
        self.require_own_tile(placement.tile)?;
        self.moves.check_pickup(placement.tile)?;
        if quarter_turns(placement.orientation).is_none() {
            return Err(MoveError::BadOrientation(placement.orientation));
        }
        self.check_target(placement.cell)?;
        while self
            .state
            .tile(placement.tile)
            .is_some_and(|t| t.orientation() != placement.orientation)
        {
            self.state.rotate(placement.tile);
        }
        self.drop_on_cell(placement.tile, placement.cell)
    }

    /// Commit the tile placed this turn.
    ///
    /// Scores it, tells the peers, and hands the turn on.
    pub fn end_turn(&mut self) -> Result<PlacementRecord, MoveError> {
        self.require_my_turn()?;
        let (tile, cell) = self.moves.ready()?;

        let orientation = self.state.tile(tile).map_or(0, |t| t.orientation());
        let placement = Placement::new(tile, orientation, cell);
        let local = self.local_seat();
        let points = self.state.score_cell(local, cell);
        let record = PlacementRecord::new(local, placement, points);
        self.state.record(record.clone());
        self.moves.reset();
        info!(%placement, points, score = self.state.score(local), "took my turn");

        if self.sharing() {
            self.send(Message::Place(placement));
        }

        if self.robot.is_some() {
            self.turn = TurnState::WaitingOnPeer(ROBOT_NICK.to_string());
            self.robot_turn();
            if self.outcome().is_none() {
                self.begin_my_turn();
            }
        } else if !self.sharing() {
            self.begin_my_turn();
        } else if self.roster.is_initiator() {
            self.advance_turn();
        } else {
            let initiator = self.roster.nick_of(PlayerId(0)).unwrap_or_default().to_string();
            self.turn = TurnState::WaitingOnPeer(initiator);
        }

        Ok(record)
    }

    fn robot_turn(&mut self) {
        if self.state.hand(ROBOT_SEAT).is_some_and(|h| h.is_empty()) {
            self.state.deal_hand(ROBOT_SEAT);
        }
        let Some(robot) = self.robot.as_mut() else {
            return;
        };
        match play(robot, &mut self.state, ROBOT_SEAT) {
            Ok(record) => info!(placement = %record.placement, points = record.points, "robot played"),
            Err(err) => {
                info!(error = %err, "robot cannot play");
                self.turn = TurnState::GameOver(GameOutcome::RobotCannotPlay);
            }
        }
    }

    /// Start a local turn. Outside shared games this is where empty hands
    /// are refilled and a stuck player ends the game.
    fn begin_my_turn(&mut self) {
        self.moves.reset();
        self.turn = TurnState::MyTurn;
        if self.sharing() {
            return;
        }

        let local = self.local_seat();
        if self.state.hand(local).is_some_and(|h| h.is_empty()) {
            self.turn = TurnState::RedealCheck;
            self.state.deal_hand(local);
            if self.robot.is_some() && self.state.hand(ROBOT_SEAT).is_some_and(|h| h.is_empty()) {
                self.state.deal_hand(ROBOT_SEAT);
            }
        }

        if has_legal_move(&self.state, local) {
            self.turn = TurnState::MyTurn;
            return;
        }
        let outcome = if self.state.hand(local).map_or(true, |h| h.is_empty()) {
            GameOutcome::DeckExhausted
        } else {
            GameOutcome::NoLegalMoves
        };
        info!(%outcome, score = self.score(), "game over");
        self.turn = TurnState::GameOver(outcome);
    }

    /// Round-robin to the next seat that can move (initiator only).
    ///
    /// Each candidate seat with an empty hand is refilled first. If nobody
    /// can move the game is over for everyone.
    fn advance_turn(&mut self) {
        self.turn = TurnState::RedealCheck;

        for _ in 0..self.roster.len() {
            let Some(seat) = self.roster.advance() else {
                return;
            };
            if self.state.hand(seat).is_some_and(|h| h.is_empty()) {
                let dealt = self.state.deal_hand(seat);
                if !dealt.is_empty() {
                    self.send_hand(seat);
                }
            }
            if has_legal_move(&self.state, seat) {
                let nick = self.roster.nick_of(seat).unwrap_or_default().to_string();
                self.send(Message::Turn { nick });
                self.take_turn(seat);
                return;
            }
            debug!(%seat, "seat cannot move, skipping");
        }

        let all_empty = self.state.hands().iter().all(|(_, h)| h.is_empty());
        let outcome = if all_empty && self.state.deck().is_exhausted() {
            GameOutcome::DeckExhausted
        } else {
            GameOutcome::NoLegalMoves
        };
        info!(%outcome, "nobody can move");
        self.send(Message::GameOver);
        self.turn = TurnState::GameOver(outcome);
    }

    fn take_turn(&mut self, seat: PlayerId) {
        if seat == self.local_seat() {
            self.begin_my_turn();
        } else {
            let nick = self.roster.nick_of(seat).unwrap_or_default().to_string();
            debug!(%nick, "waiting for peer");
            self.turn = TurnState::WaitingOnPeer(nick);
        }
    }

    // === Inbound messages ===

    /// Handle one message from a peer.
    ///
    /// Anything that cannot be decoded or applied is logged and dropped;
    /// local state is never left half-changed.
    pub fn receive(&mut self, envelope: &Envelope) {
        let message = match Message::decode(envelope) {
            Ok(message) => message,
            Err(err) => {
                warn!(command = %envelope.command, error = %err, "dropping message");
                return;
            }
        };
        debug!(message = message.name(), "received");
        if let Err(err) = self.handle(message) {
            warn!(command = %envelope.command, error = %err, "dropping message");
        }
    }

    fn handle(&mut self, message: Message) -> Result<(), ProtocolError> {
        let initiator = self.roster.is_initiator();
        match message {
            Message::NewGame => {
                if !initiator {
                    self.new_game();
                }
            }
            Message::Join { nick, colors } => {
                if initiator && self.robot.is_none() {
                    if self.roster.append(Buddy::new(nick.clone(), colors)) {
                        info!(%nick, "has joined");
                        self.resize_seats();
                    }
                    let buddies = self.roster.buddies().to_vec();
                    self.send(Message::BuddyList { buddies });
                }
            }
            Message::BuddyList { buddies } => {
                if !initiator {
                    self.roster.replace(buddies);
                    self.resize_seats();
                }
            }
            Message::Deck { order } => {
                if !initiator {
                    self.state.restore_deck(&order)?;
                }
            }
            Message::Hand { nick, slots } => {
                let seat = self
                    .roster
                    .seat_of(&nick)
                    .ok_or_else(|| ProtocolError::UnknownPlayer(nick.clone()))?;
                if !initiator {
                    self.state.restore_hand(seat, &slots)?;
                    if seat == self.local_seat() && self.turn == TurnState::Dealing {
                        let first = self.roster.whos_turn();
                        self.take_turn(first);
                    }
                }
            }
            Message::Place(placement) => self.apply_remote(placement)?,
            Message::Turn { nick } => {
                if !initiator {
                    if !self.roster.set_turn(&nick) {
                        return Err(ProtocolError::UnknownPlayer(nick));
                    }
                    let seat = self.roster.whos_turn();
                    self.take_turn(seat);
                }
            }
            Message::GameOver => {
                if self.outcome().is_none() {
                    info!(score = self.score(), "game over");
                    self.turn = TurnState::GameOver(GameOutcome::Announced);
                }
            }
        }
        Ok(())
    }

    fn resize_seats(&mut self) {
        if let Err(err) = self.state.set_player_count(self.seat_count()) {
            warn!(error = %err, "cannot seat every player");
        }
    }

    /// Replay a peer's accepted move. No legality check: its author already
    /// ran one.
    fn apply_remote(&mut self, placement: Placement) -> Result<(), ProtocolError> {
        let player = self.state.apply_placement(&placement)?;
        let points = self.state.score_cell(player, placement.cell);
        self.state.record(PlacementRecord::new(player, placement, points));
        info!(%player, %placement, points, "peer played");

        if self.roster.is_initiator() {
            self.advance_turn();
        }
        Ok(())
    }

    // === Persistence ===

    /// Write the persisted fields to `store`.
    pub fn save(&self, store: &mut impl MetadataStore) -> Result<(), RestoreError> {
        Snapshot::capture(&self.state, self.local_seat(), self.is_robot_game()).save(store)
    }

    /// Resume from `store`.
    ///
    /// Returns `Ok(false)` if nothing was saved. On error the current game
    /// is untouched and the caller should start a new one.
    pub fn restore(&mut self, store: &impl MetadataStore) -> Result<bool, RestoreError> {
        let Some(snapshot) = Snapshot::load(store)? else {
            return Ok(false);
        };
        let mut state = self.state.clone();
        if snapshot.robot {
            state.set_player_count(2)?;
        }
        snapshot.apply(&mut state, self.roster.local_seat())?;
        self.state = state;
        if snapshot.robot {
            self.enable_robot()?;
        }

        self.moves.reset();
        self.roster.reset_turn();
        self.begin_my_turn();
        info!(score = self.score(), robot = snapshot.robot, "resumed game");
        Ok(true)
    }
}
