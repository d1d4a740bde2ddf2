//! Completed-path detection and scoring.
//!
//! The board is treated as an implicit graph. A node is a `(cell, group)`
//! pair; two nodes are joined when their tiles touch and both groups have a
//! stub on the shared edge. Starting from the groups of the tile just placed,
//! a breadth-first walk collects every reachable node.
//!
//! A walked component is **complete** only if every stub of every node meets
//! a matching stub. A single stub facing an empty cell, the board edge, or a
//! stub-less neighbor side breaks the whole component.
//!
//! Scoring counts each distinct tile in a completed component once. A tile
//! with two independent groups can score twice, once per component.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::core::{Direction, Tile, TileId};
use crate::zones::{Deck, Grid};

/// Graph node: `(cell, group index within the tile)`.
pub type PathNode = (usize, usize);

/// Result of walking one component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathWalk {
    /// Discovered nodes, in discovery order (seed first).
    pub nodes: Vec<PathNode>,
    /// Some stub in the component has no matching neighbor stub.
    pub broken: bool,
}

/// A component that closed with no dangling stubs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedPath {
    pub nodes: SmallVec<[PathNode; 8]>,
    /// Sum of the values of the distinct tiles on the path.
    pub value: u32,
}

impl CompletedPath {
    /// Cells on the path (a cell appears once per group it contributes).
    pub fn cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().map(|&(cell, _)| cell)
    }
}

fn tile_at<'a>(grid: &Grid, deck: &'a Deck, cell: usize) -> Option<&'a Tile> {
    grid.get(cell).and_then(|id| deck.tile(id))
}

/// The neighbor node joined to `(cell, group)` through `side`.
///
/// `None` means the stub on `side` dangles.
fn follow(grid: &Grid, deck: &Deck, cell: usize, side: Direction) -> Option<PathNode> {
    let n = grid.neighbor(cell, side)?;
    let group = tile_at(grid, deck, n)?.group_facing(side.opposite())?;
    Some((n, group))
}

/// Walk the component containing `seed`.
///
/// Nodes before `next` in the discovery list have been tested; the walk ends
/// when every discovered node is tested. The board is finite, so it always
/// terminates.
#[must_use]
pub fn walk_path(grid: &Grid, deck: &Deck, seed: PathNode) -> PathWalk {
    let mut nodes = vec![seed];
    let mut discovered: FxHashSet<PathNode> = FxHashSet::default();
    discovered.insert(seed);
    let mut broken = false;
    let mut next = 0;

    while next < nodes.len() {
        let (cell, group) = nodes[next];
        next += 1;

        let Some(mask) = tile_at(grid, deck, cell).and_then(|t| t.paths().get(group).copied()) else {
            broken = true;
            continue;
        };

        for side in mask.sides() {
            match follow(grid, deck, cell, side) {
                Some(node) => {
                    if discovered.insert(node) {
                        nodes.push(node);
                    }
                }
                None => broken = true,
            }
        }
    }

    PathWalk { nodes, broken }
}

/// Every path completed by the tile in `cell`.
///
/// Each group of the tile seeds a walk, unless an earlier seed's walk
/// already reached it.
#[must_use]
pub fn find_completed_paths(grid: &Grid, deck: &Deck, cell: usize) -> Vec<CompletedPath> {
    let Some(tile) = tile_at(grid, deck, cell) else {
        return Vec::new();
    };

    let mut completed = Vec::new();
    let mut walked: FxHashSet<PathNode> = FxHashSet::default();

    for group in 0..tile.paths().len() {
        let seed = (cell, group);
        if walked.contains(&seed) {
            continue;
        }

        let walk = walk_path(grid, deck, seed);
        walked.extend(walk.nodes.iter().copied());
        if walk.broken || walk.nodes.is_empty() {
            continue;
        }

        let mut tiles: FxHashSet<TileId> = FxHashSet::default();
        let value = walk
            .nodes
            .iter()
            .filter_map(|&(c, _)| tile_at(grid, deck, c))
            .filter(|t| tiles.insert(t.id()))
            .map(Tile::value)
            .sum();

        completed.push(CompletedPath {
            nodes: walk.nodes.into_iter().collect(),
            value,
        });
    }

    completed
}

/// Score the tile in `cell`: mark every group on a completed path as
/// confirmed and return the points earned.
pub fn score_placement(grid: &Grid, deck: &mut Deck, cell: usize) -> u32 {
    let completed = find_completed_paths(grid, deck, cell);

    for path in &completed {
        for &(c, group) in &path.nodes {
            if let Some(tile) = grid.get(c).and_then(|id| deck.tile_mut(id)) {
                tile.mark_confirmed(group);
            }
        }
    }

    completed.iter().map(|p| p.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Confirmed, PathMask};

    const N: u8 = 0b0001;
    const E: u8 = 0b0010;
    const S: u8 = 0b0100;
    const W: u8 = 0b1000;

    fn deck(specs: &[(&[u8], u32)]) -> Deck {
        let tiles = specs
            .iter()
            .enumerate()
            .map(|(i, (groups, value))| {
                Tile::new(TileId(i as u16), groups.iter().map(|&b| PathMask::from_bits(b)))
                    .with_value(*value)
            })
            .collect();
        Deck::new(tiles).unwrap()
    }

    #[test]
    fn test_ring_of_four_completes() {
        let mut deck = deck(&[(&[E | S], 1), (&[S | W], 2), (&[N | E], 3), (&[N | W], 4)]);
        let mut grid = Grid::new(4, 4);
        grid.place(TileId(0), 5).unwrap();
        grid.place(TileId(1), 6).unwrap();
        grid.place(TileId(2), 9).unwrap();
        grid.place(TileId(3), 10).unwrap();

        let paths = find_completed_paths(&grid, &deck, 10);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].value, 10);
        assert_eq!(paths[0].nodes.len(), 4);

        assert_eq!(score_placement(&grid, &mut deck, 10), 10);
        for id in 0..4 {
            assert_eq!(deck.tile(TileId(id)).unwrap().confirmed(), Some(Confirmed::Group(0)));
        }
    }

    #[test]
    fn test_dangling_stub_breaks_path() {
        // Three corners of the ring; tile 1's south stub points at an empty cell.
        let deck = deck(&[(&[E | S], 1), (&[S | W], 1), (&[N | E], 1)]);
        let mut grid = Grid::new(4, 4);
        grid.place(TileId(0), 5).unwrap();
        grid.place(TileId(1), 6).unwrap();
        grid.place(TileId(2), 9).unwrap();

        let walk = walk_path(&grid, &deck, (9, 0));
        assert!(walk.broken);
        assert_eq!(walk.nodes.len(), 3);
        assert!(find_completed_paths(&grid, &deck, 9).is_empty());
    }

    #[test]
    fn test_two_groups_complete_independently() {
        // A crossing in the middle of a 3x1 column closed by end caps,
        // with its east-west group dangling.
        let mut deck = deck(&[(&[N | S, E | W], 5), (&[S], 1), (&[N], 1)]);
        let mut grid = Grid::new(3, 3);
        grid.place(TileId(1), 1).unwrap();
        grid.place(TileId(0), 4).unwrap();
        grid.place(TileId(2), 7).unwrap();

        let paths = find_completed_paths(&grid, &deck, 4);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].value, 7);

        score_placement(&grid, &mut deck, 4);
        assert_eq!(deck.tile(TileId(0)).unwrap().confirmed(), Some(Confirmed::Group(0)));
    }

    #[test]
    fn test_both_groups_of_crossing_score() {
        let deck = deck(&[(&[N | S, E | W], 5), (&[S], 1), (&[N], 1), (&[E], 1), (&[W], 1)]);
        let mut grid = Grid::new(3, 3);
        grid.place(TileId(0), 4).unwrap();
        grid.place(TileId(1), 1).unwrap();
        grid.place(TileId(2), 7).unwrap();
        grid.place(TileId(3), 3).unwrap();
        grid.place(TileId(4), 5).unwrap();

        let paths = find_completed_paths(&grid, &deck, 4);
        assert_eq!(paths.len(), 2);
        let total: u32 = paths.iter().map(|p| p.value).sum();
        assert_eq!(total, 14);
    }

    #[test]
    fn test_tight_ring_fills_board() {
        let deck = deck(&[(&[E | S], 1), (&[S | W], 1), (&[N | E], 1), (&[N | W], 1)]);
        let mut grid = Grid::new(2, 2);
        for i in 0..4 {
            grid.place(TileId(i), i as usize).unwrap();
        }
        let paths = find_completed_paths(&grid, &deck, 0);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].value, 4);
        let mut cells: Vec<_> = paths[0].cells().collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_cell_completes_nothing() {
        let deck = deck(&[(&[N], 1)]);
        let grid = Grid::new(2, 2);
        assert!(find_completed_paths(&grid, &deck, 0).is_empty());
    }
}
