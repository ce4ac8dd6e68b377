//! Level marker invariant: every node carries its tier.

use super::super::GameState;
use super::Invariant;

/// Invariant: The root is level 3, medium boards level 2, small boards level 1.
pub struct LevelMarkersInvariant;

impl Invariant<GameState> for LevelMarkersInvariant {
    fn holds(state: &GameState) -> bool {
        let root = state.board();
        root.level() == 3
            && root.cells().iter().all(|medium| {
                medium.level() == 2 && medium.cells().iter().all(|small| small.level() == 1)
            })
    }

    fn description() -> &'static str {
        "Boards carry the level marker of their tier"
    }
}
