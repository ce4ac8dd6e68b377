//! Move engine: validation, application and constraint advancement.

use super::action::{Move, MoveError};
use super::board::LargeBoard;
use super::contracts::{Contract, MoveContract};
use super::position::{Constraint, Path, Position};
use super::state::GameState;
use super::types::Cell;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Checks a move against the current state, reporting the first rule it breaks.
pub fn validate_move(state: &GameState, mov: Move) -> Result<(), MoveError> {
    MoveContract::pre(state, &mov)
}

/// Returns true if the move may be applied.
pub fn is_valid_move(state: &GameState, mov: Move) -> bool {
    validate_move(state, mov).is_ok()
}

/// Small board the next player is pinned to after a move at `path`.
///
/// Free play (`None`) when that board has no empty cell left.
pub fn next_constraint(board: &LargeBoard, path: Path) -> Option<Constraint> {
    let target = path.sends_to();
    let small = board.get(target.outer).get(target.middle);
    if small.is_full() { None } else { Some(target) }
}

/// Applies a move and returns the resulting state.
///
/// The cell is marked, then the owners of its small, medium and root boards
/// are re-evaluated bottom-up (each only while still undecided). Every
/// ancestor of the cell is rebuilt; sibling subtrees are shared with
/// `state`, which is left untouched.
///
/// # Errors
///
/// Fails without producing a state if any move precondition does not hold.
#[instrument(skip(state), fields(path = %mov.path, player = %mov.player))]
pub fn apply_move(state: &GameState, mov: Move) -> Result<GameState, MoveError> {
    MoveContract::pre(state, &mov)?;

    let Path {
        outer,
        middle,
        inner,
    } = mov.path;
    let root = state.board();
    let medium = root.get(outer);
    let small = medium.get(middle);

    let small = small.with_child(inner, Cell::Occupied(mov.player));
    if small.owner() != medium.get(middle).owner() {
        debug!(board = %mov.path.small_board(), owner = %small.owner(), "Small board decided");
    }
    let medium = medium.with_child(middle, Arc::new(small));
    if medium.owner() != root.get(outer).owner() {
        debug!(board = %outer, owner = %medium.owner(), "Medium board decided");
    }
    let board = root.with_child(outer, Arc::new(medium));

    let active_constraint = next_constraint(&board, mov.path);
    let winner = board.owner();
    if winner.is_decided() {
        info!(%winner, "Game concluded");
    }

    let next = GameState::from_parts(
        board,
        mov.player.opponent(),
        active_constraint,
        winner,
    );

    #[cfg(debug_assertions)]
    MoveContract::post(state, &next)?;

    Ok(next)
}

/// Every move the current player could make, in path order.
pub fn legal_moves(state: &GameState) -> Vec<Path> {
    if state.is_over() {
        return Vec::new();
    }
    let boards: Vec<Constraint> = match state.active_constraint() {
        Some(constraint) => vec![constraint],
        None => Position::ALL
            .into_iter()
            .flat_map(|outer| {
                Position::ALL
                    .into_iter()
                    .map(move |middle| Constraint::new(outer, middle))
            })
            .collect(),
    };

    boards
        .into_iter()
        .flat_map(|at| {
            Position::ALL
                .into_iter()
                .map(move |inner| Path::new(at.outer, at.middle, inner))
        })
        .filter(|path| state.cell(*path).is_empty())
        .collect()
}

impl GameState {
    /// See [`validate_move`].
    pub fn validate_move(&self, mov: Move) -> Result<(), MoveError> {
        validate_move(self, mov)
    }

    /// See [`is_valid_move`].
    pub fn is_valid_move(&self, mov: Move) -> bool {
        is_valid_move(self, mov)
    }

    /// See [`apply_move`].
    pub fn apply_move(&self, mov: Move) -> Result<GameState, MoveError> {
        apply_move(self, mov)
    }

    /// See [`legal_moves`].
    pub fn legal_moves(&self) -> Vec<Path> {
        legal_moves(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Owner, Player};

    fn path(outer: usize, middle: usize, inner: usize) -> Path {
        Path::from_indices(outer, middle, inner).unwrap()
    }

    #[test]
    fn test_sibling_subtrees_are_shared() {
        let before = GameState::new()
            .apply_move(Move::new(Player::X, path(0, 0, 4)))
            .unwrap();
        let after = before
            .apply_move(Move::new(Player::O, path(0, 4, 2)))
            .unwrap();

        for pos in Position::ALL.into_iter().skip(1) {
            assert!(Arc::ptr_eq(before.board().get(pos), after.board().get(pos)));
        }
        let (old_medium, new_medium) = (
            before.board().get(Position::TopLeft),
            after.board().get(Position::TopLeft),
        );
        assert!(!Arc::ptr_eq(old_medium, new_medium));
        assert!(Arc::ptr_eq(
            old_medium.get(Position::TopLeft),
            new_medium.get(Position::TopLeft)
        ));
    }

    #[test]
    fn test_free_play_allows_any_empty_cell() {
        let state = GameState::new();
        assert_eq!(legal_moves(&state).len(), 729);
    }

    #[test]
    fn test_legal_moves_respect_constraint() {
        let state = GameState::new()
            .apply_move(Move::new(Player::X, path(0, 0, 4)))
            .unwrap();
        let moves = legal_moves(&state);
        assert_eq!(moves.len(), 9);
        assert!(moves.iter().all(|p| p.outer == Position::TopLeft && p.middle == Position::Center));
        assert!(moves
            .iter()
            .all(|p| state.is_valid_move(Move::new(Player::O, *p))));
    }

    #[test]
    fn test_self_target_is_seen_after_the_move() {
        // Playing (4,4,4) targets the same small board it marks.
        let state = GameState::new()
            .apply_move(Move::new(Player::X, path(4, 4, 4)))
            .unwrap();
        assert_eq!(
            state.active_constraint(),
            Some(Constraint::new(Position::Center, Position::Center))
        );
        assert_eq!(state.winner(), Owner::Undecided);
    }
}
