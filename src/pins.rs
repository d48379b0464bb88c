//! Pin detection against the own king.
//!
//! Only the line beyond the piece is inspected: the first occupied square past it
//! decides. Squares between the king and the piece are not examined.

use tracing::trace;

use crate::bitboard::SquareSet;
use crate::board::{Board, Color};
use crate::square::{is_inside, Coord, Square};

/// The line through a king and one of its pinned pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinRay {
    king: Coord,
    step: (i8, i8),
}

impl PinRay {
    pub fn king(&self) -> Square {
        crate::square::to_square(self.king)
    }

    /// Unit step from the king toward the pinned piece, as (file, rank) deltas.
    pub fn direction(&self) -> (i8, i8) {
        self.step
    }

    /// Whether `square` lies on the infinite line through the king along this ray.
    pub fn contains(&self, square: Square) -> bool {
        let dest = square.coord();
        let df = (dest.file - self.king.file) as i32;
        let dr = (dest.rank - self.king.rank) as i32;
        df * self.step.1 as i32 == dr * self.step.0 as i32
    }

    /// Keeps only the squares of `squares` on this line.
    pub fn restrict(&self, mut squares: SquareSet) -> SquareSet {
        squares.retain(|sq| self.contains(sq));
        squares
    }
}

/// Unit step from `from` toward `to` when both share a rank, file or diagonal.
fn line_step(from: Coord, to: Coord) -> Option<(i8, i8)> {
    let df = to.file - from.file;
    let dr = to.rank - from.rank;

    if df == 0 && dr == 0 {
        return None;
    }
    if df == 0 || dr == 0 || df.abs() == dr.abs() {
        Some((df.signum(), dr.signum()))
    } else {
        None
    }
}

fn king_line(square: Square, board: &Board, color: Color) -> Option<PinRay> {
    let king = board.king_square(color)?;
    let step = line_step(king.coord(), square.coord())?;
    Some(PinRay {
        king: king.coord(),
        step,
    })
}

/// Whether the piece on `square` is pinned to the `color` king by an enemy slider.
///
/// A board without a `color` king has no pins.
pub fn is_pinned(square: Square, board: &Board, color: Color) -> bool {
    let Some(ray) = king_line(square, board, color) else {
        return false;
    };

    let (df, dr) = ray.step;
    let orthogonal = df == 0 || dr == 0;
    let mut current = square.coord().offset(df, dr);

    while is_inside(current) {
        let sq = crate::square::to_square(current);
        if let Some(blocker) = board.piece_at(sq) {
            let pinned = blocker.color != color
                && if orthogonal {
                    blocker.kind.slides_orthogonally()
                } else {
                    blocker.kind.slides_diagonally()
                };
            if pinned {
                trace!(piece = %square, pinner = %sq, "pinned to king");
            }
            return pinned;
        }
        current = current.offset(df, dr);
    }

    false
}

/// The line a pinned piece may still act along, or `None` when the piece does not
/// share a line with its king (or there is no king).
pub fn legal_ray_for_pinned_piece(square: Square, board: &Board, color: Color) -> Option<PinRay> {
    king_line(square, board, color)
}
