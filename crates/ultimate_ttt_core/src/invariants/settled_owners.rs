//! Settled owner invariant: every board owner is backed by its children.

use super::super::rules::{LINES, evaluate_owner};
use super::super::{GameState, Node, Owner};
use super::Invariant;

/// Invariant: Every board owner agrees with its children.
///
/// - `Undecided`: the children form no line and are not all settled.
/// - `Won(p)`: some line is owned by `p` in all three children.
/// - `Draw`: every child is settled and no line is complete.
///
/// Children's owners are frozen once decided, so a line that decided a
/// board stays intact however the board is played afterwards. A decided
/// owner may still differ from a fresh evaluation (a later line can come
/// first in `LINES` order), which is why `Won` only asks for one line.
pub struct SettledOwnersInvariant;

fn consistent<C: Node>(owner: Owner, cells: &[C; 9]) -> bool {
    match owner {
        Owner::Undecided => !evaluate_owner(cells).is_decided(),
        Owner::Won(player) => LINES.iter().any(|line| {
            line.iter()
                .all(|pos| cells[pos.index()].owner() == Owner::Won(player))
        }),
        Owner::Draw => evaluate_owner(cells) == Owner::Draw,
    }
}

impl Invariant<GameState> for SettledOwnersInvariant {
    fn holds(state: &GameState) -> bool {
        let root = state.board();
        consistent(root.owner(), root.cells())
            && root.cells().iter().all(|medium| {
                consistent(medium.owner(), medium.cells())
                    && medium
                        .cells()
                        .iter()
                        .all(|small| consistent(small.owner(), small.cells()))
            })
    }

    fn description() -> &'static str {
        "Board owners agree with their children"
    }
}
