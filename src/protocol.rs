//! Wire messages exchanged between two peers.
//!
//! Each message is one line of JSON: `{"type": "move", "payload": {...}}`.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use ultimate_ttt_core::{GameState, Move};

/// A typed message delivered over the peer channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum PeerMessage {
    /// Peer played this move; the receiver applies it locally.
    Move(Move),
    /// Authoritative snapshot; the receiver replaces its state wholesale.
    State(GameState),
    /// Free-form chat text, no effect on the game.
    Chat(String),
    /// Receiver starts a fresh game.
    Reset,
}

impl PeerMessage {
    /// Short name of the message kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::Move(_) => "move",
            PeerMessage::State(_) => "state",
            PeerMessage::Chat(_) => "chat",
            PeerMessage::Reset => "reset",
        }
    }
}

/// Serializes a message as a single JSON line (without the newline).
#[instrument(skip(message), fields(kind = message.kind()))]
pub fn encode(message: &PeerMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

/// Parses one line received from the peer.
///
/// Only the shape is checked here; snapshots still need
/// [`GameState::validate`] before they are adopted.
#[instrument(skip(line), fields(len = line.len()))]
pub fn decode(line: &str) -> Result<PeerMessage, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Malformed frame on the peer channel.
#[derive(Debug, Clone, Display, Error)]
#[display("Protocol error: {} at {}:{}", message, file, line)]
pub struct ProtocolError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProtocolError {
    /// Creates a new protocol error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Invalid JSON frame: {}", err))
    }
}
