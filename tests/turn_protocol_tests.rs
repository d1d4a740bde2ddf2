//! Lockstep play between peers.
//!
//! Each peer is a `TurnCoordinator` whose outbox is a plain `Vec<Envelope>`.
//! `Table::pump` moves envelopes between outboxes until everything has been
//! delivered, preserving per-sender order the way a real channel would.

use tile_paths::core::{Buddy, ColorPair, GameConfig, Placement, PlayerId, TileSpec};
use tile_paths::protocol::{Envelope, Message};
use tile_paths::rules::GameOutcome;
use tile_paths::session::{TurnCoordinator, TurnState};

type Peer = TurnCoordinator<Vec<Envelope>>;

const E: u8 = 0b0010;
const W: u8 = 0b1000;

fn colors(n: u8) -> ColorPair {
    ColorPair::new(format!("#00000{n}"), format!("#FFFFF{n}"))
}

struct Table {
    peers: Vec<Peer>,
}

impl Table {
    /// A host plus one joiner per nick, all joined and agreed on the roster.
    fn seated(config: GameConfig, joiners: &[&str]) -> Self {
        let host = Peer::initiator(config.clone(), Buddy::new("host", colors(0)), 11, Vec::new())
            .unwrap();
        let mut table = Table { peers: vec![host] };
        for (i, nick) in joiners.iter().enumerate() {
            let mut peer = Peer::joiner(config.clone(), *nick, 100 + i as u64, Vec::new()).unwrap();
            peer.join(colors(i as u8 + 1));
            table.peers.push(peer);
            table.pump();
        }
        table
    }

    fn pump(&mut self) {
        for _ in 0..64 {
            let mut delivered = false;
            for from in 0..self.peers.len() {
                let outbox = std::mem::take(self.peers[from].channel_mut());
                for envelope in &outbox {
                    delivered = true;
                    for (to, peer) in self.peers.iter_mut().enumerate() {
                        if to != from {
                            peer.receive(envelope);
                        }
                    }
                }
            }
            if !delivered {
                return;
            }
        }
        panic!("peers never went quiet");
    }

    fn whose_turn(&self) -> Option<usize> {
        self.peers
            .iter()
            .position(|p| p.turn_state() == &TurnState::MyTurn)
    }

    /// The peer whose turn it is plays its hint.
    fn play_turn(&mut self) -> usize {
        let idx = self.whose_turn().expect("somebody should be on turn");
        let peer = &mut self.peers[idx];
        let hint = peer.hint().expect("the seat on turn should have a move");
        assert!(peer.place(hint).unwrap().is_legal());
        peer.end_turn().unwrap();
        self.pump();
        idx
    }

    fn assert_in_sync(&self) {
        let host = self.peers[0].state();
        for peer in &self.peers[1..] {
            let state = peer.state();
            assert_eq!(state.deck().serialize(), host.deck().serialize());
            assert_eq!(state.deck().cursor(), host.deck().cursor());
            assert_eq!(state.grid(), host.grid());
            assert_eq!(state.hands(), host.hands());
            assert_eq!(state.scores(), host.scores());
            assert_eq!(state.history(), host.history());
        }
    }
}

/// 4x4 board of east-west pieces. Hands of two so that redeals happen.
fn row_config() -> GameConfig {
    let mut tiles = Vec::new();
    for _ in 0..4 {
        tiles.push(TileSpec::single(E));
        tiles.push(TileSpec::single(E | W));
        tiles.push(TileSpec::single(E | W));
        tiles.push(TileSpec::single(W));
    }
    GameConfig::new(4, 4, tiles).with_hand_size(2)
}

#[test]
fn test_join_builds_shared_roster() {
    let table = Table::seated(row_config(), &["ann", "bob"]);

    for (seat, peer) in table.peers.iter().enumerate() {
        let nicks: Vec<&str> = peer.roster().buddies().iter().map(|b| b.nick.as_str()).collect();
        assert_eq!(nicks, vec!["host", "ann", "bob"]);
        assert_eq!(peer.local_seat(), PlayerId(seat as u8));
        assert_eq!(peer.state().player_count(), 3);
    }
    assert!(table.peers[0].roster().is_initiator());
    assert!(!table.peers[1].roster().is_initiator());
}

#[test]
fn test_duplicate_join_is_ignored() {
    let mut table = Table::seated(row_config(), &["ann"]);
    table.peers[1].join(colors(9));
    table.pump();

    assert_eq!(table.peers[0].roster().len(), 2);
    assert_eq!(table.peers[1].roster().len(), 2);
    // The original colors stand.
    assert_eq!(table.peers[1].roster().buddies()[1].colors, colors(1));
}

#[test]
fn test_new_game_deals_the_same_everywhere() {
    let mut table = Table::seated(row_config(), &["ann", "bob"]);
    table.peers[0].new_game();

    let sent: Vec<char> = table.peers[0].channel().iter().map(|e| e.command).collect();
    assert_eq!(sent, vec!['n', 'd', 'h', 'h', 'h']);

    table.pump();
    table.assert_in_sync();

    assert_eq!(table.peers[0].turn_state(), &TurnState::MyTurn);
    for peer in &table.peers[1..] {
        assert_eq!(peer.turn_state(), &TurnState::WaitingOnPeer("host".into()));
        assert_eq!(peer.state().hand(peer.local_seat()).unwrap().tile_count(), 2);
    }
    assert_eq!(table.peers[0].state().deck().cursor(), 6);
}

#[test]
fn test_joiner_waits_for_its_hand() {
    let mut table = Table::seated(row_config(), &["ann"]);
    table.peers[0].new_game();

    let outbox = std::mem::take(table.peers[0].channel_mut());
    table.peers[1].receive(&outbox[0]);
    assert_eq!(table.peers[1].turn_state(), &TurnState::Dealing);
    for envelope in &outbox[1..] {
        table.peers[1].receive(envelope);
    }
    assert_eq!(
        table.peers[1].turn_state(),
        &TurnState::WaitingOnPeer("host".into())
    );
}

#[test]
fn test_turns_go_round_robin() {
    let mut table = Table::seated(row_config(), &["ann", "bob"]);
    table.peers[0].new_game();
    table.pump();

    let mut order = Vec::new();
    for _ in 0..3 {
        order.push(table.play_turn());
        table.assert_in_sync();
    }
    assert_eq!(order, vec![0, 1, 2]);

    // Every joiner mirrors the host's idea of whose turn it is.
    let next = table.peers[0].roster().whos_turn();
    for peer in &table.peers[1..] {
        assert_eq!(peer.roster().whos_turn(), next);
    }
    assert_eq!(table.peers[0].state().history().len(), 3);
    let players: Vec<PlayerId> = table.peers[2]
        .state()
        .history()
        .iter()
        .map(|r| r.player)
        .collect();
    assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
}

#[test]
fn test_joiner_cannot_pass_the_turn() {
    let mut table = Table::seated(row_config(), &["ann", "bob"]);
    table.peers[0].new_game();
    table.pump();

    let handoff = Message::Turn { nick: "bob".into() }.encode().unwrap();
    table.peers[0].receive(&handoff);
    assert_eq!(table.peers[0].turn_state(), &TurnState::MyTurn);
    assert_eq!(table.peers[0].roster().whos_turn(), PlayerId(0));

    // Nor can a joiner end a turn it does not hold.
    assert!(table.peers[1].end_turn().is_err());
}

#[test]
fn test_game_over_reaches_every_peer() {
    let mut table = Table::seated(row_config(), &["ann"]);
    table.peers[0].new_game();
    table.pump();

    for _ in 0..32 {
        if table.peers[0].outcome().is_some() {
            break;
        }
        table.play_turn();
        table.assert_in_sync();
    }

    let host = table.peers[0].outcome().unwrap();
    assert!(matches!(
        host,
        GameOutcome::DeckExhausted | GameOutcome::NoLegalMoves
    ));
    assert_eq!(table.peers[1].outcome(), Some(GameOutcome::Announced));
    assert!(table.whose_turn().is_none());
}

#[test]
fn test_replay_is_deterministic() {
    let play = || {
        let mut table = Table::seated(row_config(), &["ann", "bob"]);
        table.peers[0].new_game();
        table.pump();
        for _ in 0..5 {
            if table.whose_turn().is_none() {
                break;
            }
            table.play_turn();
        }
        let bob = table.peers[2].state();
        (bob.grid().clone(), bob.history().clone())
    };

    let (grid, history) = play();
    assert!(!history.is_empty());
    assert_eq!(play(), (grid, history));
}

#[test]
fn test_bad_messages_leave_joiner_untouched() {
    let mut table = Table::seated(row_config(), &["ann"]);
    table.peers[0].new_game();
    table.pump();

    let joiner = &mut table.peers[1];
    let before = joiner.state().grid().clone();
    let hand = joiner.state().hand(PlayerId(1)).cloned();
    let cursor = joiner.state().deck().cursor();
    let undealt = joiner.state().deck().serialize()[cursor];
    let undealt_move = Message::Place(Placement::new(undealt, 0, 5)).encode().unwrap();

    joiner.receive(&Envelope::new('z', "[]"));
    joiner.receive(&Envelope::new('p', "not json"));
    joiner.receive(&Envelope::new('p', "[9999,0,0]"));
    joiner.receive(&Envelope::new('p', "[0,45,0]"));
    joiner.receive(&Envelope::new('h', r#"["stranger",[1,2]]"#));
    joiner.receive(&Envelope::new('h', r#"["ann",[5,5]]"#));
    joiner.receive(&undealt_move);
    joiner.receive(&Envelope::new('d', "[0,1,2]"));
    joiner.receive(&Envelope::new('b', r##"[["a","b"],[["#1","#2"]]]"##));

    assert_eq!(joiner.state().grid(), &before);
    assert_eq!(joiner.state().hand(PlayerId(1)).cloned(), hand);
    assert_eq!(joiner.state().deck().cursor(), cursor);
    assert_eq!(joiner.state().locations().get(undealt), None);
    assert!(joiner.state().history().is_empty());
    assert_eq!(joiner.roster().len(), 2);
    assert_eq!(
        joiner.turn_state(),
        &TurnState::WaitingOnPeer("host".into())
    );
    table.assert_in_sync();
}
