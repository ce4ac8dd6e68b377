//! Winner invariant: the game outcome is the root board's owner.

use super::super::GameState;
use super::Invariant;

/// Invariant: `winner` equals the root owner.
pub struct WinnerMirrorsRootInvariant;

impl Invariant<GameState> for WinnerMirrorsRootInvariant {
    fn holds(state: &GameState) -> bool {
        state.winner() == state.board().owner()
    }

    fn description() -> &'static str {
        "Winner mirrors the root board owner"
    }
}
