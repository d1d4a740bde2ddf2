//! Property checks for rotation, path completion, the wire format and
//! save/resume.

use std::collections::BTreeMap;

use proptest::prelude::*;

use tile_paths::core::{GameConfig, GameState, PathMask, Placement, PlayerId, TileId, TileSpec};
use tile_paths::protocol::{Envelope, Message};
use tile_paths::robot::{play, ScanPolicy};
use tile_paths::rules::find_completed_paths;
use tile_paths::session::Snapshot;

const ME: PlayerId = PlayerId(0);

/// A 3x3 board of single-group tiles with the given masks, dropped in
/// `order` without any legality check.
fn scattered_board(masks: &[u8], order: &[usize], count: usize) -> GameState {
    let tiles = masks.iter().map(|&m| TileSpec::single(m)).collect();
    let config = GameConfig::new(3, 3, tiles).with_hand_size(9);
    let mut state = GameState::new(config, 1, 0).unwrap();
    state.deal_hand(ME);
    for (i, &cell) in order.iter().take(count).enumerate() {
        state.place_from_hand(ME, TileId(i as u16), cell).unwrap();
    }
    state
}

proptest! {
    #[test]
    fn four_turns_restore_a_mask(bits in 1u8..16) {
        let mask = PathMask::from_bits(bits);
        let turned = mask.rotated().rotated().rotated().rotated();
        prop_assert_eq!(turned, mask);
        prop_assert_eq!(mask.rotated().stub_count(), mask.stub_count());
        for side in mask.sides() {
            prop_assert!(mask.rotated().has(side.clockwise()));
        }
    }

    #[test]
    fn completed_paths_have_no_loose_ends(
        masks in prop::collection::vec(1u8..16, 9),
        order in Just((0..9).collect::<Vec<usize>>()).prop_shuffle(),
        count in 1usize..=9,
    ) {
        let state = scattered_board(&masks, &order, count);
        let grid = state.grid();

        for (cell, _) in grid.occupied() {
            for path in find_completed_paths(grid, state.deck(), cell) {
                prop_assert!(path.nodes.contains(&(cell, 0)));
                for &(c, group) in &path.nodes {
                    let tile = state.tile(grid.get(c).unwrap()).unwrap();
                    for side in tile.paths()[group].sides() {
                        let n = grid.neighbor(c, side);
                        prop_assert!(n.is_some(), "stub off the board at {}", c);
                        let neighbor = state.tile(grid.get(n.unwrap()).unwrap()).unwrap();
                        let g = neighbor.group_facing(side.opposite());
                        prop_assert!(g.is_some());
                        prop_assert!(path.nodes.contains(&(n.unwrap(), g.unwrap())));
                    }
                }
                // Every tile is worth 1 here.
                let mut cells: Vec<usize> = path.cells().collect();
                cells.sort_unstable();
                cells.dedup();
                prop_assert_eq!(path.value as usize, cells.len());
            }
        }
    }

    #[test]
    fn decode_never_panics(command in "[nbdhjptgxz]", payload in ".{0,40}") {
        let command = command.chars().next().unwrap();
        let _ = Message::decode(&Envelope::new(command, payload));
    }

    #[test]
    fn placement_survives_the_wire(tile in 0u16..64, turns in 0u16..4, cell in 0usize..64) {
        let message = Message::Place(Placement::new(TileId(tile), turns * 90, cell));
        let envelope = message.encode().unwrap();
        prop_assert_eq!(Message::decode(&envelope).unwrap(), message);
    }

    #[test]
    fn resume_reproduces_any_position(seed in any::<u64>(), moves in 0usize..12) {
        let mut state = GameState::new(GameConfig::classic(), 1, seed).unwrap();
        state.shuffle_deck();
        state.deal_hand(ME);
        for _ in 0..moves {
            if play(&mut ScanPolicy, &mut state, ME).is_err() {
                break;
            }
            if state.hand(ME).unwrap().is_empty() {
                state.deal_hand(ME);
            }
        }

        let mut store = BTreeMap::new();
        Snapshot::capture(&state, ME, false).save(&mut store).unwrap();
        let mut resumed = GameState::new(GameConfig::classic(), 1, 0).unwrap();
        Snapshot::load(&store).unwrap().unwrap().apply(&mut resumed, ME).unwrap();

        prop_assert_eq!(resumed.grid(), state.grid());
        prop_assert_eq!(resumed.hand(ME), state.hand(ME));
        prop_assert_eq!(resumed.deck().cursor(), state.deck().cursor());
        prop_assert_eq!(resumed.score(ME), state.score(ME));
        prop_assert_eq!(resumed.last_moved(), state.last_moved());
    }
}
