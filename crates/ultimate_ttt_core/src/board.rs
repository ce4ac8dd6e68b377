//! Recursive board model.
//!
//! Every level shares the same shape: an owner plus nine positional
//! children. Nodes are never mutated in place; [`Board::with_child`] builds
//! a shallow copy with one slot replaced, so unchanged siblings stay shared.

use super::position::Position;
use super::rules::evaluate_owner;
use super::types::{Cell, Owner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Anything that can sit in a board slot: a cell or a nested board.
pub trait Node: Clone {
    /// Tier marker: 0 for cells, 1 for small boards and so on.
    const LEVEL: u8;

    /// A fresh, unplayed node.
    fn empty() -> Self;

    /// Settled outcome of this node.
    ///
    /// For a cell this is the player who marked it.
    fn owner(&self) -> Owner;

    /// Returns true once every position is occupied.
    fn is_full(&self) -> bool;

    /// Decided for the purposes of the parent: owned or full.
    fn is_settled(&self) -> bool {
        self.owner().is_decided() || self.is_full()
    }
}

impl Node for Cell {
    const LEVEL: u8 = 0;

    fn empty() -> Self {
        Cell::Empty
    }

    fn owner(&self) -> Owner {
        self.player().map_or(Owner::Undecided, Owner::Won)
    }

    fn is_full(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Node> Node for Arc<T> {
    const LEVEL: u8 = T::LEVEL;

    fn empty() -> Self {
        Arc::new(T::empty())
    }

    fn owner(&self) -> Owner {
        self.as_ref().owner()
    }

    fn is_full(&self) -> bool {
        self.as_ref().is_full()
    }
}

/// One node of the board tree: an owner and nine children in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board<C> {
    level: u8,
    owner: Owner,
    cells: [C; 9],
}

/// 3x3 grid of cells (level 1).
pub type SmallBoard = Board<Cell>;

/// 3x3 grid of small boards (level 2).
pub type MediumBoard = Board<Arc<SmallBoard>>;

/// Root: 3x3 grid of medium boards (level 3).
pub type LargeBoard = Board<Arc<MediumBoard>>;

impl<C: Node> Board<C> {
    /// Creates an undecided board whose children are all empty.
    ///
    /// Empty siblings share one subtree.
    pub fn empty() -> Self {
        let child = C::empty();
        Self {
            level: C::LEVEL + 1,
            owner: Owner::Undecided,
            cells: std::array::from_fn(|_| child.clone()),
        }
    }

    /// Tier marker (1 = cells, 2 = small boards, 3 = medium boards).
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Settled outcome of this board.
    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Children in row-major order.
    pub fn cells(&self) -> &[C; 9] {
        &self.cells
    }

    /// Child at the given position.
    pub fn get(&self, pos: Position) -> &C {
        &self.cells[pos.index()]
    }

    /// Returns true once every position is settled.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Node::is_settled)
    }

    /// Copy of this board with one child replaced.
    ///
    /// The owner is re-evaluated only while still undecided.
    pub(crate) fn with_child(&self, pos: Position, child: C) -> Self {
        let mut cells = self.cells.clone();
        cells[pos.index()] = child;
        let owner = if self.owner.is_decided() {
            self.owner
        } else {
            evaluate_owner(&cells)
        };
        Self {
            level: self.level,
            owner,
            cells,
        }
    }
}

impl<C: Node> Node for Board<C> {
    const LEVEL: u8 = C::LEVEL + 1;

    fn empty() -> Self {
        Board::empty()
    }

    fn owner(&self) -> Owner {
        self.owner
    }

    fn is_full(&self) -> bool {
        Board::is_full(self)
    }
}

impl<C: Node> Default for Board<C> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
pub(crate) fn small_board_from(cells: [Cell; 9]) -> SmallBoard {
    Board {
        level: 1,
        owner: evaluate_owner(&cells),
        cells,
    }
}
