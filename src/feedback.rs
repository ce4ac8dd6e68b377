//! User feedback cues, injected into the session.

use tracing::{debug, info};
use ultimate_ttt_core::{Owner, Player};

/// Something the user should notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A mark was placed.
    Placed(Player),
    /// A local move was refused.
    Rejected,
    /// A small board was won or drawn.
    BoardDecided(Owner),
    /// The game concluded.
    GameOver(Owner),
    /// A chat message arrived.
    Chat,
}

/// Receives feedback cues (sound, flashing, log lines).
pub trait FeedbackSink: Send + Sync {
    /// Delivers one cue.
    fn cue(&self, cue: Cue);
}

/// Reports cues as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn cue(&self, cue: Cue) {
        match cue {
            Cue::Rejected => info!("Move rejected"),
            Cue::GameOver(owner) => info!(%owner, "Game over"),
            other => debug!(cue = ?other, "Feedback"),
        }
    }
}

/// Drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl FeedbackSink for SilentFeedback {
    fn cue(&self, _cue: Cue) {}
}
