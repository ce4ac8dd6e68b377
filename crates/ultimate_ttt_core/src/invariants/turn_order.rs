//! Turn order invariant: X moves first and players alternate.

use super::super::{GameState, Player};
use super::Invariant;

/// Invariant: Mark counts agree with the player to move.
///
/// X to move means both players have placed equally many marks; O to move
/// means X is exactly one ahead.
pub struct TurnOrderInvariant;

impl Invariant<GameState> for TurnOrderInvariant {
    fn holds(state: &GameState) -> bool {
        let (x, o) = state.mark_counts();
        match state.current_player() {
            Player::X => x == o,
            Player::O => x == o + 1,
        }
    }

    fn description() -> &'static str {
        "Players alternate starting with X"
    }
}
