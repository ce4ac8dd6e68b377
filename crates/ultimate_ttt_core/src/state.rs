//! Complete game state.

use super::board::{LargeBoard, SmallBoard};
use super::invariants::{GameStateInvariants, InvariantSet, InvariantViolation};
use super::position::{Constraint, Path};
use super::types::{Cell, Owner, Player};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Everything needed to continue a game.
///
/// Values are never mutated: each accepted move produces a new state that
/// shares unchanged subtrees with its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: LargeBoard,
    current_player: Player,
    active_constraint: Option<Constraint>,
    winner: Owner,
}

impl GameState {
    /// Creates a fresh game: empty board, X to move, free play.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: LargeBoard::empty(),
            current_player: Player::X,
            active_constraint: None,
            winner: Owner::Undecided,
        }
    }

    pub(crate) fn from_parts(
        board: LargeBoard,
        current_player: Player,
        active_constraint: Option<Constraint>,
        winner: Owner,
    ) -> Self {
        Self {
            board,
            current_player,
            active_constraint,
            winner,
        }
    }

    /// Returns the root board.
    pub fn board(&self) -> &LargeBoard {
        &self.board
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the small board the current player must use, if any.
    pub fn active_constraint(&self) -> Option<Constraint> {
        self.active_constraint
    }

    /// Returns the overall outcome (mirrors the root owner).
    pub fn winner(&self) -> Owner {
        self.winner
    }

    /// Returns true once the game has an outcome.
    pub fn is_over(&self) -> bool {
        self.winner.is_decided()
    }

    /// Returns the small board at the given address.
    pub fn small_board(&self, at: Constraint) -> &SmallBoard {
        self.board.get(at.outer).get(at.middle)
    }

    /// Returns the cell at the given path.
    pub fn cell(&self, path: Path) -> Cell {
        *self.small_board(path.small_board()).get(path.inner)
    }

    /// Counts the marks each player has placed, as `(x, o)`.
    pub fn mark_counts(&self) -> (usize, usize) {
        Path::all().fold((0, 0), |(x, o), path| match self.cell(path) {
            Cell::Occupied(Player::X) => (x + 1, o),
            Cell::Occupied(Player::O) => (x, o + 1),
            Cell::Empty => (x, o),
        })
    }

    /// Checks every state invariant.
    ///
    /// Use this before adopting a state received from a peer or a file;
    /// deserialization alone only guarantees the shape.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), Vec<InvariantViolation>> {
        GameStateInvariants::check_all(self).inspect_err(|violations| {
            warn!(count = violations.len(), "Game state failed validation");
        })
    }

    /// Human-readable status line.
    pub fn status_string(&self) -> String {
        match self.winner {
            Owner::Undecided => match self.active_constraint {
                Some(constraint) => format!(
                    "Player {} to move in board {}.",
                    self.current_player, constraint
                ),
                None => format!("Player {} to move anywhere.", self.current_player),
            },
            Owner::Won(player) => format!("Game over. Player {} wins!", player),
            Owner::Draw => "Game over. Draw!".to_string(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
