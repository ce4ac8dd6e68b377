//! Tests for the move engine: scenarios and whole-game properties.

use ultimate_ttt_core::{
    Cell, Constraint, GameState, Move, MoveError, Owner, Path, Player, Position,
};

fn path(outer: usize, middle: usize, inner: usize) -> Path {
    Path::from_indices(outer, middle, inner).expect("indices in range")
}

/// Plays the given paths in order, alternating from the state's current player.
fn play(state: GameState, moves: &[(usize, usize, usize)]) -> GameState {
    moves.iter().fold(state, |state, &(l3, l2, l1)| {
        let mov = Move::new(state.current_player(), path(l3, l2, l1));
        state.apply_move(mov).expect("Valid move")
    })
}

fn small_owner(state: &GameState, outer: usize, middle: usize) -> Owner {
    let at = Constraint::new(
        Position::from_index(outer).unwrap(),
        Position::from_index(middle).unwrap(),
    );
    state.small_board(at).owner()
}

/// Sequence in which X takes the top row of small board (0,0).
const TOP_ROW_WIN: [(usize, usize, usize); 11] = [
    (0, 0, 0),
    (0, 0, 3),
    (0, 3, 0),
    (3, 0, 0),
    (0, 0, 1),
    (0, 1, 0),
    (1, 0, 0),
    (0, 0, 4),
    (0, 4, 0),
    (4, 0, 0),
    (0, 0, 2),
];

#[test]
fn test_fresh_game() {
    let state = GameState::new();
    assert_eq!(state.current_player(), Player::X);
    assert_eq!(state.active_constraint(), None);
    assert_eq!(state.winner(), Owner::Undecided);
    assert!(Path::all().all(|p| state.cell(p) == Cell::Empty));
}

#[test]
fn test_constraint_send() {
    let state = play(GameState::new(), &[(0, 0, 4)]);
    assert_eq!(state.cell(path(0, 0, 4)), Cell::Occupied(Player::X));
    assert_eq!(
        state.active_constraint(),
        Some(Constraint::new(Position::TopLeft, Position::Center))
    );
    assert_eq!(state.current_player(), Player::O);
}

#[test]
fn test_illegal_move_rejected() {
    let state = play(GameState::new(), &[(0, 0, 4)]);
    let snapshot = state.clone();
    let mov = Move::new(Player::O, path(1, 0, 0));

    assert!(!state.is_valid_move(mov));
    assert!(matches!(
        state.apply_move(mov),
        Err(MoveError::OutsideConstraint { .. })
    ));
    assert_eq!(state, snapshot);
}

#[test]
fn test_wrong_player_rejected() {
    let state = GameState::new();
    let result = state.apply_move(Move::new(Player::O, path(4, 4, 4)));
    assert_eq!(result, Err(MoveError::WrongPlayer(Player::O)));
}

#[test]
fn test_small_board_win() {
    let before = play(GameState::new(), &TOP_ROW_WIN[..10]);
    assert_eq!(small_owner(&before, 0, 0), Owner::Undecided);

    let after = play(before, &TOP_ROW_WIN[10..]);
    assert_eq!(small_owner(&after, 0, 0), Owner::Won(Player::X));
    assert_eq!(
        after.board().get(Position::TopLeft).owner(),
        Owner::Undecided
    );
    assert_eq!(after.winner(), Owner::Undecided);
}

#[test]
fn test_play_continues_in_won_board_and_owner_stays() {
    let state = play(GameState::new(), &TOP_ROW_WIN);
    // O is sent to (0,2), X then sends O back into the won board (0,0).
    let state = play(state, &[(0, 2, 0), (2, 0, 0)]);
    assert_eq!(
        state.active_constraint(),
        Some(Constraint::new(Position::TopLeft, Position::TopLeft))
    );

    // O completes the middle row of (0,0); X keeps the board.
    let state = play(state, &[(0, 0, 5)]);
    assert_eq!(state.cell(path(0, 0, 5)), Cell::Occupied(Player::O));
    assert_eq!(small_owner(&state, 0, 0), Owner::Won(Player::X));
}

/// X to move, free play, small board (0,0) completely filled (drawn).
fn state_with_full_small_board() -> GameState {
    let mut json = serde_json::to_value(GameState::new()).unwrap();
    let small = &mut json["board"]["cells"][0]["cells"][0];
    // X O X / X O O / O X X
    small["cells"] = serde_json::json!(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
    small["owner"] = "draw".into();
    json["board"]["cells"][8]["cells"][8]["cells"][8] = "O".into();

    let state: GameState = serde_json::from_value(json).unwrap();
    state.validate().expect("Consistent snapshot");
    state
}

#[test]
fn test_free_play_after_full_target() {
    let state = state_with_full_small_board();
    let state = play(state, &[(5, 0, 0)]);
    assert_eq!(state.active_constraint(), None);
}

#[test]
fn test_full_target_is_not_merely_won() {
    // A won but unfilled board still pins the opponent.
    let state = play(GameState::new(), &TOP_ROW_WIN);
    let state = play(state, &[(0, 2, 0), (2, 0, 0)]);
    assert_eq!(small_owner(&state, 0, 0), Owner::Won(Player::X));
    assert!(state.active_constraint().is_some());
}

#[test]
fn test_terminal_state_rejects_every_move() {
    let state = play_out(|legal| legal[0]);
    let winner = state.winner();
    assert!(winner.is_decided());
    assert!(state.validate().is_ok());

    for p in Path::all() {
        for player in [Player::X, Player::O] {
            assert!(!state.is_valid_move(Move::new(player, p)));
        }
    }
    assert!(state.legal_moves().is_empty());
    assert_eq!(
        state.validate_move(Move::new(state.current_player(), path(0, 0, 0))),
        Err(MoveError::GameOver(winner))
    );
}

#[test]
fn test_forged_outcomes_fail_validation() {
    let mut json = serde_json::to_value(GameState::new()).unwrap();
    json["board"]["owner"] = serde_json::json!({"won": "O"});
    json["winner"] = serde_json::json!({"won": "O"});
    let state: GameState = serde_json::from_value(json).unwrap();
    assert!(state.validate().is_err());

    let mut json = serde_json::to_value(GameState::new()).unwrap();
    json["board"]["cells"][0]["cells"][0]["owner"] = "draw".into();
    let state: GameState = serde_json::from_value(json).unwrap();
    assert!(state.validate().is_err());
}

/// Small deterministic generator for move selection.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

/// Plays a whole game, checking every per-move property along the way.
fn play_out(mut pick: impl FnMut(&[Path]) -> Path) -> GameState {
    let mut state = GameState::new();
    let mut moves = 0;

    while !state.is_over() {
        let legal = state.legal_moves();
        assert!(!legal.is_empty(), "Undecided game must have a legal move");
        let mov = Move::new(state.current_player(), pick(&legal));
        assert!(state.is_valid_move(mov));

        let before = state.clone();
        let after = state.apply_move(mov).expect("Legal move applies");

        // Input untouched.
        assert_eq!(state, before);
        // Turn alternation.
        assert_ne!(after.current_player(), state.current_player());
        // No overwrite of marked cells.
        for p in Path::all() {
            let old = state.cell(p);
            if !old.is_empty() {
                assert_eq!(after.cell(p), old);
            }
        }
        // Decided owners stay decided.
        for outer in Position::ALL {
            let (old, new) = (state.board().get(outer), after.board().get(outer));
            if old.owner().is_decided() {
                assert_eq!(new.owner(), old.owner());
            }
            for middle in Position::ALL {
                let (old, new) = (old.get(middle), new.get(middle));
                if old.owner().is_decided() {
                    assert_eq!(new.owner(), old.owner());
                }
            }
        }
        // Constraint follows the local position unless the target is full.
        let target = mov.path.sends_to();
        let expected = if after.small_board(target).is_full() {
            None
        } else {
            Some(target)
        };
        assert_eq!(after.active_constraint(), expected);
        assert_eq!(after.winner(), after.board().owner());
        assert!(after.validate().is_ok());

        state = after;
        moves += 1;
        assert!(moves <= 729);
    }

    state
}

#[test]
fn test_full_game_first_legal_move() {
    let state = play_out(|legal| legal[0]);
    assert!(state.winner().is_decided());
    assert!(state.legal_moves().is_empty());
}

#[test]
fn test_full_game_last_legal_move() {
    let state = play_out(|legal| legal[legal.len() - 1]);
    assert!(state.winner().is_decided());
}

#[test]
fn test_full_games_pseudo_random() {
    for seed in [7, 42, 1234, 98765] {
        let mut rng = XorShift(seed);
        let state = play_out(|legal| legal[(rng.next() % legal.len() as u64) as usize]);
        assert!(state.is_over());
        for p in Path::all() {
            assert!(!state.is_valid_move(Move::new(state.current_player(), p)));
        }
    }
}
