use tracing::trace;

use crate::board::{Board, Color};
use crate::movegen::attacked_squares;
use crate::square::Square;

/// Whether a non-king `color` piece could step onto `square` once it is vacated.
///
/// The square is emptied first, so a slider whose ray currently stops on the
/// occupant still counts as guarding it.
pub fn is_defended(square: Square, board: &Board, color: Color) -> bool {
    let vacated = board.without(square);

    let defender = vacated
        .iter_color(color)
        .filter(|(_, piece)| !piece.is_king())
        .find(|&(from, piece)| attacked_squares(from, piece, &vacated).contains(square));

    if let Some((from, piece)) = defender {
        trace!(%square, defender = %from, %piece, "square defended");
        return true;
    }
    false
}
