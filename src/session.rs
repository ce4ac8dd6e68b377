//! A match between two participants, local or over a peer channel.
//!
//! The session owns the local copy of the game state. Local input goes
//! through [`MatchSession::select_cell`]; everything the peer sends goes
//! through [`MatchSession::handle`]. Both return the outgoing message (if
//! any) instead of sending it, so the caller decides how to deliver it.

use crate::feedback::{Cue, FeedbackSink};
use crate::protocol::PeerMessage;
use derive_new::new;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use ultimate_ttt_core::{GameState, InvariantViolation, Move, MoveError, Owner, Path, Player};

/// Chat lines kept in the log; older lines are dropped first.
pub const MAX_CHAT_LINES: usize = 200;

/// Which side of the match this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Both players share this process (hotseat).
    Local,
    /// Accepted the connection; plays X and owns the authoritative state.
    Host,
    /// Connected to a host; plays O.
    Guest,
}

impl Role {
    /// Mark this side places, or `None` when both marks are local.
    pub fn mark(self) -> Option<Player> {
        match self {
            Role::Local => None,
            Role::Host => Some(Player::X),
            Role::Guest => Some(Player::O),
        }
    }
}

/// Who wrote a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// This process.
    Me,
    /// The remote participant.
    Peer,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ChatLine {
    /// Who sent it.
    pub author: Author,
    /// Message text.
    pub text: String,
}

/// What a peer message did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The peer's move was applied.
    Moved(Move),
    /// The local state was replaced by a snapshot.
    Replaced,
    /// A chat line arrived.
    Chat(String),
    /// A fresh game started.
    Reset,
}

/// Why a session operation was refused. State is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The move engine refused the move.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),

    /// The peer tried to place this side's mark.
    #[display("Peer attempted to play as {}", _0)]
    Impersonation(Player),

    /// A snapshot broke game invariants.
    #[display("Invalid game state: {}", _0)]
    InvalidState(String),
}

impl std::error::Error for SessionError {}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        SessionError::IllegalMove(err)
    }
}

impl From<Vec<InvariantViolation>> for SessionError {
    fn from(violations: Vec<InvariantViolation>) -> Self {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        SessionError::InvalidState(descriptions)
    }
}

/// Local view of one match.
pub struct MatchSession {
    role: Role,
    state: GameState,
    chat: Vec<ChatLine>,
    feedback: Arc<dyn FeedbackSink>,
}

impl std::fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSession")
            .field("role", &self.role)
            .field("status", &self.state.status_string())
            .field("chat_lines", &self.chat.len())
            .finish()
    }
}

impl MatchSession {
    /// Creates a session with a fresh game.
    #[instrument(skip(feedback))]
    pub fn new(role: Role, feedback: Arc<dyn FeedbackSink>) -> Self {
        info!("Creating match session");
        Self {
            role,
            state: GameState::new(),
            chat: Vec::new(),
            feedback,
        }
    }

    /// Returns the session role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the chat log, oldest first, at most [`MAX_CHAT_LINES`] long.
    pub fn chat(&self) -> &[ChatLine] {
        &self.chat
    }

    /// Returns true if local input may place a mark now.
    pub fn is_my_turn(&self) -> bool {
        !self.state.is_over()
            && self
                .role
                .mark()
                .is_none_or(|mark| mark == self.state.current_player())
    }

    /// Called once the peer channel is up.
    ///
    /// The host pushes its full state so the guest starts from the same
    /// board; the guest sends nothing.
    #[instrument(skip(self), fields(role = ?self.role))]
    pub fn on_connected(&self) -> Option<PeerMessage> {
        match self.role {
            Role::Host => {
                debug!("Pushing snapshot to guest");
                Some(PeerMessage::State(self.state.clone()))
            }
            Role::Guest | Role::Local => None,
        }
    }

    /// Handles a cell selected by the local user.
    ///
    /// Returns the move to forward to the peer. A refused move leaves the
    /// state untouched and emits [`Cue::Rejected`].
    #[instrument(skip(self), fields(role = ?self.role))]
    pub fn select_cell(&mut self, path: Path) -> Result<PeerMessage, SessionError> {
        let player = self.role.mark().unwrap_or(self.state.current_player());
        let mov = Move::new(player, path);
        match self.play(mov) {
            Ok(()) => Ok(PeerMessage::Move(mov)),
            Err(e) => {
                debug!(error = %e, "Local move refused");
                self.feedback.cue(Cue::Rejected);
                Err(e.into())
            }
        }
    }

    /// Dispatches one message from the peer.
    #[instrument(skip(self, message), fields(kind = message.kind()))]
    pub fn handle(&mut self, message: PeerMessage) -> Result<SessionEvent, SessionError> {
        match message {
            PeerMessage::Move(mov) => {
                if self.role.mark() == Some(mov.player) {
                    warn!(player = %mov.player, "Peer move uses the local mark");
                    return Err(SessionError::Impersonation(mov.player));
                }
                self.play(mov).inspect_err(|e| {
                    warn!(error = %e, "Peer move refused; states may have diverged");
                })?;
                Ok(SessionEvent::Moved(mov))
            }
            PeerMessage::State(state) => {
                self.replace(state)?;
                Ok(SessionEvent::Replaced)
            }
            PeerMessage::Chat(text) => {
                self.feedback.cue(Cue::Chat);
                self.record_chat(ChatLine::new(Author::Peer, text.clone()));
                Ok(SessionEvent::Chat(text))
            }
            PeerMessage::Reset => {
                self.state = GameState::new();
                info!("Peer reset the game");
                Ok(SessionEvent::Reset)
            }
        }
    }

    /// Starts a fresh game and returns the message telling the peer.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> PeerMessage {
        self.state = GameState::new();
        info!("Game reset");
        PeerMessage::Reset
    }

    /// Records a local chat line and returns the message for the peer.
    pub fn say(&mut self, text: impl Into<String>) -> PeerMessage {
        let text = text.into();
        self.record_chat(ChatLine::new(Author::Me, text.clone()));
        PeerMessage::Chat(text)
    }

    /// Adopts a state from outside (a loaded file) and returns the snapshot
    /// for the peer.
    #[instrument(skip(self, state))]
    pub fn load(&mut self, state: GameState) -> Result<PeerMessage, SessionError> {
        self.replace(state)?;
        Ok(PeerMessage::State(self.state.clone()))
    }

    fn record_chat(&mut self, line: ChatLine) {
        if self.chat.len() >= MAX_CHAT_LINES {
            let excess = self.chat.len() + 1 - MAX_CHAT_LINES;
            self.chat.drain(..excess);
        }
        self.chat.push(line);
    }

    fn replace(&mut self, state: GameState) -> Result<(), SessionError> {
        state.validate()?;
        info!(status = %state.status_string(), "Adopting snapshot");
        self.state = state;
        Ok(())
    }

    fn play(&mut self, mov: Move) -> Result<(), MoveError> {
        let next = self.state.apply_move(mov)?;

        let at = mov.path.small_board();
        let small_owner = next.small_board(at).owner();
        if small_owner != self.state.small_board(at).owner() {
            self.feedback.cue(Cue::BoardDecided(small_owner));
        }
        self.feedback.cue(Cue::Placed(mov.player));
        if next.winner() != Owner::Undecided {
            self.feedback.cue(Cue::GameOver(next.winner()));
        }

        debug!(%mov, status = %next.status_string(), "Move applied");
        self.state = next;
        Ok(())
    }
}
