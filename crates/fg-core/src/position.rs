//! Grid coordinates and the four movement directions.

use std::fmt;
use std::str::FromStr;

use crate::FgError;

// ── Position ──────────────────────────────────────────────────────────────────

/// An immutable `(row, col)` cell coordinate.
///
/// Rows grow downwards and columns grow rightwards, so `(0, 0)` is the
/// top-left cell.  Coordinates are signed so that a translation off the edge
/// produces a representable (out-of-bounds) position rather than wrapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The position `dr` rows and `dc` columns away.
    #[inline]
    pub fn translate(self, dr: i32, dc: i32) -> Position {
        Position::new(self.row + dr, self.col + dc)
    }

    /// The neighbouring cell in `direction`.
    #[inline]
    pub fn step(self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        self.translate(dr, dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four orthogonal moves.
///
/// The numeric index follows clockwise order starting at the top:
/// `0 = Up`, `1 = Right`, `2 = Down`, `3 = Left`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// `(Δrow, Δcol)` for this direction.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down  => (1, 0),
            Direction::Left  => (0, -1),
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction for a numeric index, or `None` outside `0..4`.
    pub fn from_index(i: usize) -> Option<Direction> {
        Direction::ALL.get(i).copied()
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up    => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down  => Direction::Up,
            Direction::Left  => Direction::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up    => "UP",
            Direction::Right => "RIGHT",
            Direction::Down  => "DOWN",
            Direction::Left  => "LEFT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = FgError;

    /// Accepts the direction names and the `w`/`a`/`s`/`d` keys, ignoring
    /// case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w"    => Ok(Direction::Up),
            "right" | "d" => Ok(Direction::Right),
            "down" | "s"  => Ok(Direction::Down),
            "left" | "a"  => Ok(Direction::Left),
            _ => Err(FgError::UnknownDirection(s.to_owned())),
        }
    }
}
