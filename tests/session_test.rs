//! Integration tests for match sessions talking over a local peer channel.

use std::sync::{Arc, Mutex};
use ultimate_ttt::{
    Author, Cue, MAX_CHAT_LINES, FeedbackSink, GameState, MatchSession, Move, MoveError, Owner, Path, PeerMessage,
    Player, Role, SessionError, SessionEvent, SilentFeedback, local_pair,
};

#[derive(Debug, Default)]
struct RecordingFeedback {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingFeedback {
    fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn cue(&self, cue: Cue) {
        self.cues.lock().unwrap().push(cue);
    }
}

fn path(outer: usize, middle: usize, inner: usize) -> Path {
    Path::from_indices(outer, middle, inner).unwrap()
}

fn session(role: Role) -> MatchSession {
    MatchSession::new(role, Arc::new(SilentFeedback))
}

#[tokio::test]
async fn test_host_and_guest_stay_in_sync() {
    let ((host_tx, mut host_rx), (guest_tx, mut guest_rx)) = local_pair();
    let mut host = session(Role::Host);
    let mut guest = session(Role::Guest);

    let snapshot = host.on_connected().unwrap();
    assert!(guest.on_connected().is_none());
    host_tx.send(snapshot).unwrap();
    let received = guest_rx.recv().await.unwrap().unwrap();
    assert_eq!(guest.handle(received).unwrap(), SessionEvent::Replaced);

    let opening = host.select_cell(path(0, 0, 4)).unwrap();
    host_tx.send(opening).unwrap();
    let received = guest_rx.recv().await.unwrap().unwrap();
    assert!(matches!(guest.handle(received).unwrap(), SessionEvent::Moved(_)));
    assert_eq!(host.state(), guest.state());
    assert!(guest.is_my_turn());
    assert!(!host.is_my_turn());

    let reply = guest.select_cell(path(0, 4, 8)).unwrap();
    guest_tx.send(reply).unwrap();
    let received = host_rx.recv().await.unwrap().unwrap();
    host.handle(received).unwrap();
    assert_eq!(host.state(), guest.state());
    assert_eq!(
        host.state().status_string(),
        "Player X to move in board (4, 8)."
    );
}

#[test]
fn test_out_of_turn_move_rejected_with_cue() {
    let feedback = Arc::new(RecordingFeedback::default());
    let mut guest = MatchSession::new(Role::Guest, feedback.clone());

    let err = guest.select_cell(path(0, 0, 0)).unwrap_err();
    assert_eq!(
        err,
        SessionError::IllegalMove(MoveError::WrongPlayer(Player::O))
    );
    assert_eq!(guest.state(), &GameState::new());
    assert_eq!(feedback.cues(), vec![Cue::Rejected]);
}

#[test]
fn test_move_outside_constraint_rejected() {
    let mut local = session(Role::Local);
    local.select_cell(path(0, 0, 4)).unwrap();
    let before = local.state().clone();

    let err = local.select_cell(path(1, 0, 0)).unwrap_err();
    assert!(matches!(
        err,
        SessionError::IllegalMove(MoveError::OutsideConstraint { .. })
    ));
    assert_eq!(local.state(), &before);
}

#[test]
fn test_peer_cannot_play_local_mark() {
    let mut guest = session(Role::Guest);
    let forged = PeerMessage::Move(Move::new(Player::O, path(0, 0, 0)));
    assert_eq!(
        guest.handle(forged).unwrap_err(),
        SessionError::Impersonation(Player::O)
    );
    assert_eq!(guest.state(), &GameState::new());
}

#[test]
fn test_inconsistent_snapshot_rejected() {
    let mut guest = session(Role::Guest);
    let mut json = serde_json::to_value(GameState::new()).unwrap();
    json["board"]["cells"][0]["cells"][0]["cells"][0] = "O".into();
    let forged: GameState = serde_json::from_value(json).unwrap();

    let err = guest.handle(PeerMessage::State(forged)).unwrap_err();
    assert!(matches!(err, SessionError::InvalidState(_)));
    assert_eq!(guest.state(), &GameState::new());
}

#[test]
fn test_snapshot_with_unearned_win_rejected() {
    let mut guest = session(Role::Guest);
    let mut json = serde_json::to_value(GameState::new()).unwrap();
    json["board"]["owner"] = serde_json::json!({ "won": "X" });
    json["winner"] = serde_json::json!({ "won": "X" });
    let forged: GameState = serde_json::from_value(json).unwrap();

    let err = guest.handle(PeerMessage::State(forged)).unwrap_err();
    assert!(matches!(err, SessionError::InvalidState(_)));
    assert!(!guest.state().is_over());
}

#[test]
fn test_chat_is_logged_both_sides() {
    let mut host = session(Role::Host);
    let mut guest = session(Role::Guest);

    let message = guest.say("good luck");
    assert_eq!(
        host.handle(message).unwrap(),
        SessionEvent::Chat("good luck".to_string())
    );
    assert_eq!(guest.chat()[0].author, Author::Me);
    assert_eq!(host.chat()[0].author, Author::Peer);
    assert_eq!(host.chat()[0].text, "good luck");
}

#[test]
fn test_chat_log_is_bounded() {
    let mut host = session(Role::Host);
    for i in 0..MAX_CHAT_LINES + 5 {
        host.handle(PeerMessage::Chat(format!("line {}", i))).unwrap();
    }
    assert_eq!(host.chat().len(), MAX_CHAT_LINES);
    assert_eq!(host.chat()[0].text, "line 5");
    assert_eq!(
        host.chat().last().map(|line| line.text.as_str()),
        Some(format!("line {}", MAX_CHAT_LINES + 4).as_str())
    );
}

#[test]
fn test_reset_propagates() {
    let mut host = session(Role::Host);
    let mut guest = session(Role::Guest);
    let opening = host.select_cell(path(4, 4, 4)).unwrap();
    guest.handle(opening).unwrap();

    let reset = guest.reset();
    assert_eq!(reset, PeerMessage::Reset);
    assert_eq!(host.handle(reset).unwrap(), SessionEvent::Reset);
    assert_eq!(host.state(), &GameState::new());
    assert_eq!(guest.state(), &GameState::new());
}

#[test]
fn test_small_board_win_emits_cue() {
    let feedback = Arc::new(RecordingFeedback::default());
    let mut local = MatchSession::new(Role::Local, feedback.clone());
    let moves = [
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
    for (outer, middle, inner) in moves {
        local.select_cell(path(outer, middle, inner)).unwrap();
    }

    let cues = feedback.cues();
    assert!(cues.contains(&Cue::BoardDecided(Owner::Won(Player::X))));
    assert_eq!(cues.last(), Some(&Cue::Placed(Player::X)));
    assert!(!cues.iter().any(|cue| matches!(cue, Cue::GameOver(_))));
}

#[test]
fn test_small_board_draw_emits_decided_cue() {
    // X O X / X O O / O X _ in small board (0, 0), X to move.
    let mut json = serde_json::to_value(GameState::new()).unwrap();
    json["board"]["cells"][0]["cells"][0]["cells"] =
        serde_json::json!(["X", "O", "X", "X", "O", "O", "O", "X", null]);
    let state: GameState = serde_json::from_value(json).unwrap();

    let feedback = Arc::new(RecordingFeedback::default());
    let mut local = MatchSession::new(Role::Local, feedback.clone());
    local.load(state).unwrap();
    local.select_cell(path(0, 0, 8)).unwrap();

    assert!(feedback.cues().contains(&Cue::BoardDecided(Owner::Draw)));
}
