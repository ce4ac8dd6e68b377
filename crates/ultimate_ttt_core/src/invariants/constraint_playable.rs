//! Constraint invariant: players are never pinned to a full board.

use super::super::GameState;
use super::Invariant;

/// Invariant: The active constraint, if any, names a small board with an empty cell.
pub struct ConstraintPlayableInvariant;

impl Invariant<GameState> for ConstraintPlayableInvariant {
    fn holds(state: &GameState) -> bool {
        state
            .active_constraint()
            .is_none_or(|at| !state.small_board(at).is_full())
    }

    fn description() -> &'static str {
        "Active constraint names a small board that is not full"
    }
}
