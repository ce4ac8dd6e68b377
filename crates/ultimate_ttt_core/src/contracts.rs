//! Contract-based validation for moves.
//!
//! Contracts formalize Hoare-style reasoning: {P} action {Q}. Preconditions
//! are checked on every move, postconditions in debug builds only.

use super::action::{Move, MoveError};
use super::position::{Constraint, Path, Position};
use super::state::GameState;
use super::types::Owner;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The game has no outcome yet.
pub struct GameNotOver;

impl GameNotOver {
    /// Rejects every move once the game is concluded.
    pub fn check(_mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if state.is_over() {
            Err(MoveError::GameOver(state.winner()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: It must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects moves by the player who is not on turn.
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if mov.player != state.current_player() {
            Err(MoveError::WrongPlayer(mov.player))
        } else {
            Ok(())
        }
    }
}

/// Precondition: The cell lies in the small board the player was sent to.
pub struct WithinConstraint;

impl WithinConstraint {
    /// Free play admits every cell.
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        match state.active_constraint() {
            Some(constraint) if !constraint.admits(mov.path) => {
                Err(MoveError::OutsideConstraint {
                    path: mov.path,
                    constraint,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Precondition: The target cell must be empty.
///
/// Won boards stay playable; only their owner is frozen.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Rejects marked cells.
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if state.cell(mov.path).is_empty() {
            Ok(())
        } else {
            Err(MoveError::CellOccupied(mov.path))
        }
    }
}

/// Composite precondition: all move rules, in order.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move, reporting the first failure.
    #[instrument(level = "debug", skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        GameNotOver::check(mov, state)?;
        PlayersTurn::check(mov, state)?;
        WithinConstraint::check(mov, state)?;
        CellIsEmpty::check(mov, state)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions.
///
/// Postconditions:
/// - The resulting state satisfies every state invariant
/// - The turn passed to the opponent
/// - Exactly one empty cell gained the mover's mark, nothing else changed
/// - Decided owners kept their outcome
pub struct MoveContract;

impl Contract<GameState, Move> for MoveContract {
    fn pre(state: &GameState, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, state)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), MoveError> {
        after.validate().map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        if after.current_player() != before.current_player().opponent() {
            return Err(violation("Turn did not pass to the opponent"));
        }

        let mut placed = 0;
        for path in Path::all() {
            let (old, new) = (before.cell(path), after.cell(path));
            if old == new {
                continue;
            }
            if !old.is_empty() || new.player() != Some(before.current_player()) {
                return Err(violation("A marked cell changed"));
            }
            placed += 1;
        }
        if placed != 1 {
            return Err(violation("Expected exactly one new mark"));
        }

        if !owners_frozen(before, after) {
            return Err(violation("A decided board changed its owner"));
        }

        Ok(())
    }
}

fn violation(description: &str) -> MoveError {
    warn!(description, "Move postcondition violated");
    MoveError::InvariantViolation(format!("Postcondition failed: {}", description))
}

fn owners_frozen(before: &GameState, after: &GameState) -> bool {
    let kept = |old: Owner, new: Owner| !old.is_decided() || old == new;

    if !kept(before.board().owner(), after.board().owner()) {
        return false;
    }
    Position::ALL.into_iter().all(|outer| {
        let (old_medium, new_medium) = (before.board().get(outer), after.board().get(outer));
        kept(old_medium.owner(), new_medium.owner())
            && Position::ALL.into_iter().all(|middle| {
                let at = Constraint::new(outer, middle);
                kept(
                    before.small_board(at).owner(),
                    after.small_board(at).owner(),
                )
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn path(outer: usize, middle: usize, inner: usize) -> Path {
        Path::from_indices(outer, middle, inner).unwrap()
    }

    #[test]
    fn test_precondition_fresh_game() {
        let state = GameState::new();
        let action = Move::new(Player::X, path(4, 4, 4));
        assert!(MoveContract::pre(&state, &action).is_ok());
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let state = GameState::new();
        let action = Move::new(Player::O, path(4, 4, 4));
        assert_eq!(
            MoveContract::pre(&state, &action),
            Err(MoveError::WrongPlayer(Player::O))
        );
    }

    #[test]
    fn test_precondition_outside_constraint() {
        let state = GameState::new()
            .apply_move(Move::new(Player::X, path(0, 0, 4)))
            .unwrap();
        let action = Move::new(Player::O, path(1, 0, 0));
        assert_eq!(
            MoveContract::pre(&state, &action),
            Err(MoveError::OutsideConstraint {
                path: action.path,
                constraint: Constraint::new(Position::TopLeft, Position::Center),
            })
        );
    }

    #[test]
    fn test_precondition_occupied_cell() {
        // X at (4,4,4) sends O back to (4,4).
        let state = GameState::new()
            .apply_move(Move::new(Player::X, path(4, 4, 4)))
            .unwrap();
        let action = Move::new(Player::O, path(4, 4, 4));
        assert_eq!(
            MoveContract::pre(&state, &action),
            Err(MoveError::CellOccupied(action.path))
        );
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = GameState::new();
        let after = before
            .apply_move(Move::new(Player::X, path(3, 1, 5)))
            .unwrap();
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_missing_move() {
        let state = GameState::new();
        assert!(matches!(
            MoveContract::post(&state, &state),
            Err(MoveError::InvariantViolation(_))
        ));
    }
}
