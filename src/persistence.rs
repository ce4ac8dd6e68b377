//! Save and load games as human-readable JSON.

use derive_more::{Display, Error};
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use ultimate_ttt_core::GameState;

/// Writes the full game state to `path` as pretty-printed JSON.
#[instrument(skip(path, state), fields(path = %path.as_ref().display()))]
pub fn save_game(path: impl AsRef<Path>, state: &GameState) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path.as_ref(), json)?;
    info!("Game saved");
    Ok(())
}

/// Reads a game written by [`save_game`].
///
/// The result is checked against every state invariant; a file that parses
/// but describes an impossible game is rejected.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_game(path: impl AsRef<Path>) -> Result<GameState, PersistenceError> {
    debug!("Loading game from file");
    let content = std::fs::read_to_string(path.as_ref())?;
    let state: GameState = serde_json::from_str(&content)?;

    state.validate().map_err(|violations| {
        warn!(count = violations.len(), "Saved game is inconsistent");
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        PersistenceError::new(format!("Inconsistent game state: {}", descriptions))
    })?;

    info!(status = %state.status_string(), "Game loaded");
    Ok(state)
}

/// Save/load error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Persistence error: {} at {}:{}", message, file, line)]
pub struct PersistenceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PersistenceError {
    /// Creates a new persistence error with caller location tracking.
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

impl From<std::io::Error> for PersistenceError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for PersistenceError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Malformed save file: {}", err))
    }
}
