//! Grid topology: index arithmetic for square and offset-row hex grids.
//!
//! Tile indices are dense in `[0, width * height)`. On a square grid an index
//! decomposes as `column = index / height`, `row = index % height`; moving
//! "north" adds `height`, moving "east" adds one. On a hex grid rows are
//! `index / width`; odd rows are shifted half a tile along X, which changes
//! which tiles of the adjacent rows touch a given tile.
//!
//! ```text
//!     +---+---+---+
//!     | NW| N | NE|
//!     +---+---+---+
//!     | W |   | E |      (E and W exist on square grids only)
//!     +---+---+---+
//!     | SW| S | SE|
//!     +---+---+---+
//! ```

use smallvec::SmallVec;

/// Adjacency rule set of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridType {
    /// 4- or 8-connected square tiles.
    #[default]
    Square,
    /// 6-connected hexagons in an offset-row ("brick") layout.
    Hex,
}

/// One of the eight neighbor slots around a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The four orthogonal directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Slot number, clockwise from north (0..8).
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Direction for a slot number; wraps modulo 8.
    #[inline]
    pub const fn from_slot(slot: usize) -> Self {
        Self::ALL[slot % 8]
    }

    /// The direction pointing back (`slot + 4 mod 8`).
    #[inline]
    pub const fn opposite(self) -> Self {
        Self::from_slot(self.slot() + 4)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.slot() % 2 == 1
    }

    /// The two orthogonal directions a diagonal is composed of.
    ///
    /// Returns `None` for orthogonal directions.
    pub const fn components(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::NorthEast => Some((Direction::North, Direction::East)),
            Direction::SouthEast => Some((Direction::South, Direction::East)),
            Direction::SouthWest => Some((Direction::South, Direction::West)),
            Direction::NorthWest => Some((Direction::North, Direction::West)),
            _ => None,
        }
    }
}

/// The eight neighbor slots of a tile, each either a valid index or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    slots: [Option<usize>; 8],
}

impl Neighbors {
    /// Index in direction `dir`, if any.
    #[inline]
    pub fn get(&self, dir: Direction) -> Option<usize> {
        self.slots[dir.slot()]
    }

    /// Raw slot value using `-1` for absent neighbors.
    #[inline]
    pub fn get_raw(&self, dir: Direction) -> i64 {
        self.get(dir).map_or(-1, |i| i as i64)
    }

    /// Whether `index` is one of the neighbors.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.slots.contains(&Some(index))
    }

    /// The direction under which `index` appears, if it does.
    pub fn direction_of(&self, index: usize) -> Option<Direction> {
        self.iter().find(|&(_, i)| i == index).map(|(d, _)| d)
    }

    /// Present neighbors in clockwise slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .iter()
            .filter_map(move |&d| self.get(d).map(|i| (d, i)))
    }

    /// Number of present neighbors.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Pure index arithmetic for a grid of a given shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    pub grid_type: GridType,
    pub width: usize,
    pub height: usize,
}

impl Topology {
    pub const fn new(grid_type: GridType, width: usize, height: usize) -> Self {
        Self {
            grid_type,
            width,
            height,
        }
    }

    /// Number of tiles.
    #[inline]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        index < self.len()
    }

    /// Compute all eight neighbor slots of `index`.
    ///
    /// Neighbors across a row boundary or outside `[0, len)` are absent. East
    /// and west are always absent on hex grids.
    pub fn neighbors(&self, index: usize) -> Neighbors {
        let mut n = Neighbors::default();
        if !self.contains(index) {
            return n;
        }
        let i = index as i64;
        let len = self.len() as i64;
        let mut put = |dir: Direction, v: Option<i64>| {
            n.slots[dir.slot()] = v.filter(|&v| v >= 0 && v < len).map(|v| v as usize);
        };

        match self.grid_type {
            GridType::Square => {
                let h = self.height as i64;
                let east = (i + 1) % h != 0;
                let west = i % h != 0;
                put(Direction::North, Some(i + h));
                put(Direction::South, Some(i - h));
                put(Direction::East, east.then_some(i + 1));
                put(Direction::West, west.then_some(i - 1));
                put(Direction::NorthEast, east.then_some(i + h + 1));
                put(Direction::SouthEast, east.then_some(i - h + 1));
                put(Direction::SouthWest, west.then_some(i - h - 1));
                put(Direction::NorthWest, west.then_some(i + h - 1));
            }
            GridType::Hex => {
                let w = self.width as i64;
                let last_col = (i + 1) % w == 0;
                let first_col = i % w == 0;
                put(Direction::North, (!last_col).then_some(i + 1));
                put(Direction::South, (!first_col).then_some(i - 1));
                if (i / w) % 2 != 0 {
                    put(Direction::NorthEast, (!last_col).then_some(i + w + 1));
                    put(Direction::NorthWest, (!last_col).then_some(i - w + 1));
                    put(Direction::SouthWest, Some(i - w));
                    put(Direction::SouthEast, Some(i + w));
                } else {
                    put(Direction::NorthEast, Some(i + w));
                    put(Direction::NorthWest, Some(i - w));
                    put(Direction::SouthWest, (!first_col).then_some(i - w - 1));
                    put(Direction::SouthEast, (!first_col).then_some(i + w - 1));
                }
                put(Direction::East, None);
                put(Direction::West, None);
            }
        }
        n
    }

    /// Neighbors of `index` flattened to a dense list.
    ///
    /// Square grids without `allow_diagonal` yield only the orthogonal
    /// neighbors. Hex grids always yield all six.
    pub fn neighbor_list(&self, index: usize, allow_diagonal: bool) -> SmallVec<[usize; 8]> {
        let skip_diagonals = self.grid_type == GridType::Square && !allow_diagonal;
        self.neighbors(index)
            .iter()
            .filter(|(d, _)| !(skip_diagonals && d.is_diagonal()))
            .map(|(_, i)| i)
            .collect()
    }

    /// Which direction `to` lies in when seen from `from`.
    ///
    /// Returns `None` if the tiles are not adjacent.
    pub fn direction_between(&self, from: usize, to: usize) -> Option<Direction> {
        self.neighbors(from).direction_of(to)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
