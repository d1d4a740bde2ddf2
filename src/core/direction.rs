//! Compass directions and orientation-relative path masks.
//!
//! Every tile side is addressed by a `Direction`. A `PathMask` records, for one
//! path-group of a tile, which sides have a path stub leaving the tile.
//!
//! ## Rotation
//!
//! Rotating clockwise by 90° moves each stub one side around:
//! the stub that was on West now faces North, North moves to East, and so on.
//!
//! ```
//! use tile_paths::core::{Direction, PathMask};
//!
//! let curve = PathMask::new(true, false, false, true); // North + West
//! let turned = curve.rotated();
//!
//! assert!(turned.has(Direction::North));
//! assert!(turned.has(Direction::East));
//! assert_eq!(turned.rotated().rotated().rotated(), curve);
//! ```

use serde::{Deserialize, Serialize};

/// One of the four sides of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Index into a 4-element side array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The side facing this one across a shared edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The next direction clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// Stub presence on each side for a single path-group.
///
/// Value type: rotation returns a new mask instead of permuting in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathMask([bool; 4]);

impl PathMask {
    /// Mask with no stubs.
    pub const EMPTY: PathMask = PathMask([false; 4]);

    /// Create a mask from explicit North/East/South/West flags.
    #[must_use]
    pub const fn new(north: bool, east: bool, south: bool, west: bool) -> Self {
        Self([north, east, south, west])
    }

    /// Create a mask from its 4-bit form (bit 0 = North .. bit 3 = West).
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self([
            bits & 0b0001 != 0,
            bits & 0b0010 != 0,
            bits & 0b0100 != 0,
            bits & 0b1000 != 0,
        ])
    }

    /// The 4-bit form of this mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        (self.0[0] as u8) | (self.0[1] as u8) << 1 | (self.0[2] as u8) << 2 | (self.0[3] as u8) << 3
    }

    /// Does this group have a stub on `side`?
    #[must_use]
    pub const fn has(self, side: Direction) -> bool {
        self.0[side.index()]
    }

    /// Does this group have any stub at all?
    #[must_use]
    pub const fn any(self) -> bool {
        self.bits() != 0
    }

    /// Number of stubs.
    #[must_use]
    pub const fn stub_count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Sides that carry a stub, in index order.
    pub fn sides(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.has(d))
    }

    /// Does this mask share a stub side with `other`?
    #[must_use]
    pub const fn overlaps(self, other: PathMask) -> bool {
        self.bits() & other.bits() != 0
    }

    /// This mask rotated 90° clockwise: N←W, E←N, S←E, W←S.
    #[must_use]
    pub const fn rotated(self) -> Self {
        let [n, e, s, w] = self.0;
        Self([w, n, e, s])
    }
}

impl From<[bool; 4]> for PathMask {
    fn from(sides: [bool; 4]) -> Self {
        Self(sides)
    }
}
