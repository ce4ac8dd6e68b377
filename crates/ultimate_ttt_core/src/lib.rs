//! Ultimate tic-tac-toe game logic.
//!
//! A three-level recursive board: nine medium boards, each holding nine
//! small boards, each holding nine cells. The crate provides the immutable
//! board model and the move engine that validates a move, propagates wins
//! bottom-up and decides which small board the opponent is sent to.
//!
//! # Architecture
//!
//! - **Board model**: [`Board`] is one generic "owner + nine children" node,
//!   stacked into [`SmallBoard`], [`MediumBoard`] and [`LargeBoard`].
//!   Subtrees are shared through `Arc`, so a move rebuilds only the path
//!   from the root to the played cell.
//! - **Move engine**: [`validate_move`], [`is_valid_move`] and
//!   [`apply_move`] are pure functions from one [`GameState`] to the next.
//! - **Contracts and invariants**: preconditions are checked on every move,
//!   postconditions in debug builds, and [`GameState::validate`] screens
//!   snapshots received from outside.
//!
//! # Example
//!
//! ```
//! use ultimate_ttt_core::{Constraint, GameState, Move, Path, Player, Position};
//!
//! let state = GameState::new();
//! let path = Path::new(Position::TopLeft, Position::TopLeft, Position::Center);
//! let next = state.apply_move(Move::new(Player::X, path)).unwrap();
//!
//! assert_eq!(next.current_player(), Player::O);
//! assert_eq!(
//!     next.active_constraint(),
//!     Some(Constraint::new(Position::TopLeft, Position::Center))
//! );
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod contracts;
mod engine;
mod invariants;
mod position;
mod rules;
mod state;
mod types;

pub use action::{Move, MoveError};
pub use board::{Board, LargeBoard, MediumBoard, Node, SmallBoard};
pub use contracts::{
    CellIsEmpty, Contract, GameNotOver, LegalMove, MoveContract, PlayersTurn, WithinConstraint,
};
pub use engine::{apply_move, is_valid_move, legal_moves, next_constraint, validate_move};
pub use invariants::{
    ConstraintPlayableInvariant, GameStateInvariants, Invariant, InvariantSet,
    InvariantViolation, LevelMarkersInvariant, SettledOwnersInvariant, TurnOrderInvariant,
    WinnerMirrorsRootInvariant,
};
pub use position::{Constraint, InvalidPosition, Path, Position};
pub use rules::{LINES, evaluate_owner};
pub use state::GameState;
pub use types::{Cell, Owner, Player};
