//! Text presentation of the nested board.
//!
//! The board is drawn as a 27x27 grid of cells. Grid coordinates map to
//! cell addresses through [`grid_to_path`] and [`path_to_grid`], which is
//! all the input side needs to turn a selection into a move.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use ultimate_ttt_core::{Constraint, GameState, Owner, Path, Position};

/// Cosmetic drawing parameters. None of them affect the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Width of the lines between small boards; medium boards get one more.
    pub line_thickness: u8,
    /// Draw the marks of decided small boards in lowercase.
    pub blur_settled: bool,
    /// Mark the open cells of the required small board with `*`.
    pub highlight_constraint: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_thickness: 1,
            blur_settled: true,
            highlight_constraint: true,
        }
    }
}

/// Side length of the cell grid.
pub const GRID_SIZE: usize = 27;

/// Cell address at a grid coordinate (row, column), each 0-26.
pub fn grid_to_path(row: usize, col: usize) -> Option<Path> {
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return None;
    }
    Some(Path::new(
        Position::from_row_col(row / 9, col / 9)?,
        Position::from_row_col(row / 3 % 3, col / 3 % 3)?,
        Position::from_row_col(row % 3, col % 3)?,
    ))
}

/// Grid coordinate (row, column) of a cell address.
pub fn path_to_grid(path: Path) -> (usize, usize) {
    let row = path.outer.row() * 9 + path.middle.row() * 3 + path.inner.row();
    let col = path.outer.col() * 9 + path.middle.col() * 3 + path.inner.col();
    (row, col)
}

/// Draws the board followed by a status line.
pub fn render(state: &GameState, options: &RenderOptions) -> String {
    let thin = options.line_thickness.max(1) as usize;
    let small_sep = format!(" {} ", "|".repeat(thin));
    let medium_sep = format!(" {} ", "|".repeat(thin + 1));

    let mut out = String::new();
    for row in 0..GRID_SIZE {
        if row > 0 && row % 9 == 0 {
            for _ in 0..thin {
                out.push_str(&rule('=', &small_sep, &medium_sep));
            }
        } else if row > 0 && row % 3 == 0 {
            out.push_str(&rule('-', &small_sep, &medium_sep));
        }
        for col in 0..GRID_SIZE {
            if col > 0 {
                out.push_str(separator(col, &small_sep, &medium_sep));
            }
            if let Some(path) = grid_to_path(row, col) {
                out.push(cell_symbol(state, path, options));
            }
        }
        out.push('\n');
    }
    out.push_str(&state.status_string());
    out.push('\n');
    out
}

/// Draws the owners of all small boards (9x9) and of the medium boards (3x3).
pub fn render_owners(state: &GameState) -> String {
    let mut out = String::from("Small boards:\n");
    for row in 0..9 {
        if row > 0 && row % 3 == 0 {
            out.push('\n');
        }
        for col in 0..9 {
            if col > 0 && col % 3 == 0 {
                out.push(' ');
            }
            let (Some(outer), Some(middle)) = (
                Position::from_row_col(row / 3, col / 3),
                Position::from_row_col(row % 3, col % 3),
            ) else {
                continue;
            };
            out.push(owner_symbol(
                state.small_board(Constraint::new(outer, middle)).owner(),
            ));
        }
        out.push('\n');
    }
    out.push_str("Medium boards:\n");
    for row in Position::ALL.chunks(3) {
        let line: String = row
            .iter()
            .map(|pos| owner_symbol(state.board().get(*pos).owner()))
            .collect();
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn owner_symbol(owner: Owner) -> char {
    match owner {
        Owner::Undecided => '.',
        decided => decided.symbol(),
    }
}

fn separator<'a>(col: usize, small_sep: &'a str, medium_sep: &'a str) -> &'a str {
    if col % 9 == 0 {
        medium_sep
    } else if col % 3 == 0 {
        small_sep
    } else {
        " "
    }
}

fn rule(fill: char, small_sep: &str, medium_sep: &str) -> String {
    let mut line = String::new();
    for col in 0..GRID_SIZE {
        if col > 0 {
            let sep = separator(col, small_sep, medium_sep);
            if sep == " " {
                line.push(fill);
            } else {
                line.extend(sep.chars().map(|c| if c == '|' { '+' } else { fill }));
            }
        }
        line.push(fill);
    }
    line.push('\n');
    line
}

fn cell_symbol(state: &GameState, path: Path, options: &RenderOptions) -> char {
    let cell = state.cell(path);
    let settled = state.small_board(path.small_board()).owner().is_decided();

    if cell.is_empty() {
        let required = state.active_constraint().is_some_and(|c| c.admits(path));
        if options.highlight_constraint && required && !state.is_over() {
            '*'
        } else {
            cell.symbol()
        }
    } else if options.blur_settled && settled {
        cell.symbol().to_ascii_lowercase()
    } else {
        cell.symbol()
    }
}

/// Parses a typed cell address such as `0 0 4` or `0,0,4`.
pub fn parse_path(input: &str) -> Result<Path, ParsePathError> {
    let indices = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| ParsePathError::new(format!("'{}' is not a number", part)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [outer, middle, inner] = indices[..] else {
        return Err(ParsePathError::new(format!(
            "Expected 3 indices, got {}",
            indices.len()
        )));
    };
    Path::from_indices(outer, middle, inner)
        .ok_or_else(|| ParsePathError::new("Indices must be between 0 and 8"))
}

/// Unparseable cell address.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid cell address: {}", message)]
pub struct ParsePathError {
    /// What was wrong with the input.
    pub message: String,
}

impl ParsePathError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
