//! First-class move type and move errors.

use super::position::{Constraint, Path};
use super::types::{Owner, Player};
use serde::{Deserialize, Serialize};

/// A player placing their mark at a cell.
///
/// Moves are plain values: they can be validated before application, sent
/// to a peer and replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The cell being marked.
    pub path: Path,
    /// The player making the move.
    pub player: Player,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, path: Path) -> Self {
        Self { path, player }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.path)
    }
}

/// Why a move was rejected.
///
/// Applying a move never partially changes state: on error the input state
/// is all there is.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game has an outcome already.
    #[display("Game is already over ({})", _0)]
    GameOver(Owner),

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),

    /// The cell lies outside the small board the player was sent to.
    #[display("Cell {} is outside the required board {}", path, constraint)]
    OutsideConstraint {
        /// The attempted cell.
        path: Path,
        /// The small board the player must use.
        constraint: Constraint,
    },

    /// The cell is already marked.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Path),

    /// A postcondition failed after applying the move.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
