//! Ultimate tic-tac-toe for two players, hotseat or over TCP.
//!
//! The rules live in [`ultimate_ttt_core`]; this crate wraps them in a
//! match session and the pieces around it.
//!
//! # Architecture
//!
//! - **Session**: local copy of the game, applies local and peer moves
//! - **Protocol / Transport**: newline-delimited JSON between two peers
//! - **Render**: plain-text board drawing and cell address parsing
//! - **Persistence**: save and load games as JSON
//! - **Config**: TOML settings for one player's process
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ultimate_ttt::{MatchSession, Path, Role, SilentFeedback};
//!
//! let mut session = MatchSession::new(Role::Local, Arc::new(SilentFeedback));
//! let path = Path::from_indices(0, 0, 4).unwrap();
//! session.select_cell(path).unwrap();
//! assert_eq!(
//!     session.state().status_string(),
//!     "Player O to move in board (0, 4)."
//! );
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod feedback;
mod input;
mod persistence;
mod protocol;
mod render;
mod session;
mod transport;

pub use config::{AppConfig, ConfigError};
pub use feedback::{Cue, FeedbackSink, SilentFeedback, TracingFeedback};
pub use input::{HELP, Input, parse_input};
pub use persistence::{PersistenceError, load_game, save_game};
pub use protocol::{PeerMessage, ProtocolError, decode, encode};
pub use render::{
    GRID_SIZE, ParsePathError, RenderOptions, grid_to_path, parse_path, path_to_grid, render,
    render_owners,
};
pub use session::{
    Author, ChatLine, MAX_CHAT_LINES, MatchSession, Role, SessionError, SessionEvent,
};
pub use transport::{
    Incoming, MAX_FRAME_LEN, PeerReceiver, PeerSender, TransportError, accept, connect_stream,
    host, join, local_pair,
};

pub use ultimate_ttt_core::{
    Constraint, GameState, Move, MoveError, Owner, Path, Player, Position,
};
