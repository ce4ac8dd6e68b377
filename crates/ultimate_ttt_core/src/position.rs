//! Positions within a 3x3 grid and addresses into the nested board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// A position on a 3x3 grid (0-8, row-major).
///
/// The same index type addresses every level of the board: a medium board
/// inside the root, a small board inside a medium board and a cell inside a
/// small board. Serialized as its index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Creates position from grid index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Creates position from row and column (each 0-2).
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < 3 && col < 3 {
            Self::from_index(row * 3 + col)
        } else {
            None
        }
    }

    /// Converts position to grid index (0-8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Row within the 3x3 grid.
    pub fn row(self) -> usize {
        self.index() / 3
    }

    /// Column within the 3x3 grid.
    pub fn col(self) -> usize {
        self.index() % 3
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Index outside 0-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Position index {} is out of range (must be 0-8)", index)]
pub struct InvalidPosition {
    /// The rejected index.
    pub index: u8,
}

impl TryFrom<u8> for Position {
    type Error = InvalidPosition;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index as usize).ok_or(InvalidPosition { index })
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position as u8
    }
}

/// Full address of a cell: medium board, small board, cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    /// Medium board within the root (l3).
    pub outer: Position,
    /// Small board within the medium board (l2).
    pub middle: Position,
    /// Cell within the small board (l1).
    pub inner: Position,
}

impl Path {
    /// Creates a new path.
    pub fn new(outer: Position, middle: Position, inner: Position) -> Self {
        Self {
            outer,
            middle,
            inner,
        }
    }

    /// Creates a path from raw indices, rejecting anything outside 0-8.
    #[instrument]
    pub fn from_indices(outer: usize, middle: usize, inner: usize) -> Option<Self> {
        Some(Self::new(
            Position::from_index(outer)?,
            Position::from_index(middle)?,
            Position::from_index(inner)?,
        ))
    }

    /// Small board containing this cell.
    pub fn small_board(self) -> Constraint {
        Constraint::new(self.outer, self.middle)
    }

    /// Small board the opponent is sent to after a move here.
    ///
    /// Playing at local position `(middle, inner)` sends the opponent to
    /// medium board `middle`, small board `inner`.
    pub fn sends_to(self) -> Constraint {
        Constraint::new(self.middle, self.inner)
    }

    /// Iterates every cell address in index order.
    pub fn all() -> impl Iterator<Item = Path> {
        Position::iter().flat_map(|outer| {
            Position::iter().flat_map(move |middle| {
                Position::iter().map(move |inner| Path::new(outer, middle, inner))
            })
        })
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.outer, self.middle, self.inner)
    }
}

/// The single small board the current player must play in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    /// Required medium board within the root.
    pub outer: Position,
    /// Required small board within that medium board.
    pub middle: Position,
}

impl Constraint {
    /// Creates a new constraint.
    pub fn new(outer: Position, middle: Position) -> Self {
        Self { outer, middle }
    }

    /// Returns true if the path lies inside the required small board.
    pub fn admits(self, path: Path) -> bool {
        path.outer == self.outer && path.middle == self.middle
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.outer, self.middle)
    }
}
