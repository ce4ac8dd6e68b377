//! Win and draw detection, shared by every board level.

use super::board::Node;
use super::position::Position;
use super::types::Owner;
use tracing::instrument;

/// The 8 winning lines, in the order they are checked.
///
/// Rows top to bottom, then columns left to right, then the two diagonals
/// (top-left first). The first complete line decides the owner.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Computes the outcome of nine children.
///
/// Returns the player owning all three children of the first complete line,
/// `Draw` if every child is settled without such a line, and `Undecided`
/// otherwise. Drawn children never count towards a line.
#[instrument(level = "trace", skip(children))]
pub fn evaluate_owner<C: Node>(children: &[C; 9]) -> Owner {
    for [a, b, c] in LINES {
        let owner = children[a.index()].owner();
        if let Owner::Won(player) = owner
            && children[b.index()].owner() == owner
            && children[c.index()].owner() == owner
        {
            return Owner::Won(player);
        }
    }

    if children.iter().all(Node::is_settled) {
        Owner::Draw
    } else {
        Owner::Undecided
    }
}
