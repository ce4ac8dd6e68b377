//! Core domain types: players, cells and board ownership.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Single-character mark used in text rendering.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A leaf cell of a small board.
///
/// Serialized as `null` when empty and as the player's mark otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Player>", into = "Option<Player>")]
pub enum Cell {
    /// No mark yet.
    #[default]
    Empty,
    /// Marked by a player. Never changes afterwards.
    Occupied(Player),
}

impl Cell {
    /// Returns true if nobody has played here.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the player who marked this cell.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// Character used in text rendering.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(player) => player.symbol(),
        }
    }
}

impl From<Option<Player>> for Cell {
    fn from(value: Option<Player>) -> Self {
        value.map_or(Cell::Empty, Cell::Occupied)
    }
}

impl From<Cell> for Option<Player> {
    fn from(cell: Cell) -> Self {
        cell.player()
    }
}

/// Settled outcome of a board at any level.
///
/// Once a board leaves `Undecided` its owner is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    /// Still open.
    #[default]
    Undecided,
    /// Three in a row for this player.
    Won(Player),
    /// Every position settled without a line.
    Draw,
}

impl Owner {
    /// Returns true once the board has an outcome.
    pub fn is_decided(self) -> bool {
        !matches!(self, Owner::Undecided)
    }

    /// Returns the winning player, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            Owner::Won(player) => Some(player),
            Owner::Undecided | Owner::Draw => None,
        }
    }

    /// Character used in text rendering.
    pub fn symbol(self) -> char {
        match self {
            Owner::Undecided => ' ',
            Owner::Won(player) => player.symbol(),
            Owner::Draw => '#',
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Undecided => write!(f, "undecided"),
            Owner::Won(player) => write!(f, "won by {}", player),
            Owner::Draw => write!(f, "draw"),
        }
    }
}
