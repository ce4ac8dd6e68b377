//! Commands typed at the interactive prompt.

use crate::render::{ParsePathError, parse_path};
use std::path::PathBuf;
use ultimate_ttt_core::Path;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Select a cell: `<l3> <l2> <l1>`.
    Play(Path),
    /// Send a chat line: `say <text>`.
    Say(String),
    /// Start a fresh game: `reset`.
    Reset,
    /// Write the game to a file: `save <file>`.
    Save(PathBuf),
    /// Replace the game from a file: `load <file>`.
    Load(PathBuf),
    /// Redraw the board: `board`.
    Board,
    /// Show board owners: `owners`.
    Owners,
    /// Show the command list: `help`.
    Help,
    /// Leave: `quit`.
    Quit,
}

/// Command summary for `help`.
pub const HELP: &str = "\
Commands:
  <l3> <l2> <l1>   play the cell (medium board, small board, cell; each 0-8)
  say <text>       send a chat message
  reset            start a fresh game
  save <file>      save the game as JSON
  load <file>      load a saved game
  board            redraw the board
  owners           show who owns each board
  help             show this list
  quit             leave";

/// Parses one input line.
pub fn parse_input(line: &str) -> Result<Input, ParsePathError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match (word, rest) {
        ("say", text) if !text.is_empty() => Ok(Input::Say(text.to_string())),
        ("save", file) if !file.is_empty() => Ok(Input::Save(PathBuf::from(file))),
        ("load", file) if !file.is_empty() => Ok(Input::Load(PathBuf::from(file))),
        ("reset", "") => Ok(Input::Reset),
        ("board", "") => Ok(Input::Board),
        ("owners", "") => Ok(Input::Owners),
        ("help" | "?", "") => Ok(Input::Help),
        ("quit" | "exit", "") => Ok(Input::Quit),
        _ => parse_path(line).map(Input::Play),
    }
}
