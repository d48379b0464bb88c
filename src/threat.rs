use serde::{Deserialize, Serialize};

use crate::board::{Board, Color};
use crate::movegen::attacked_squares;
use crate::square::Square;

/// Which kinds of enemy piece attack a square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatDetail {
    pub king_threat: bool,
    pub other_threat: bool,
}

impl ThreatDetail {
    pub fn is_threatened(&self) -> bool {
        self.king_threat || self.other_threat
    }

    /// Attacked by the king and nothing else.
    pub fn king_only(&self) -> bool {
        self.king_threat && !self.other_threat
    }
}

/// Splits the `attacking_color` attackers of `square` into king and non-king.
///
/// Attack sets are not pin-filtered here: a pinned attacker still counts.
pub fn classify_threat(square: Square, board: &Board, attacking_color: Color) -> ThreatDetail {
    let mut detail = ThreatDetail::default();

    for (from, piece) in board.iter_color(attacking_color) {
        if attacked_squares(from, piece, board).contains(square) {
            if piece.is_king() {
                detail.king_threat = true;
            } else {
                detail.other_threat = true;
            }
        }
    }

    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(id: &str) -> Square {
        id.parse().unwrap()
    }

    #[test]
    fn king_alone() {
        let board = Board::from_snapshot([("55", "bk"), ("11", "wk")]).unwrap();
        let detail = classify_threat(sq("44"), &board, Color::Black);
        assert_eq!(detail, ThreatDetail { king_threat: true, other_threat: false });
        assert!(detail.king_only());
    }

    #[test]
    fn king_and_pawn_together() {
        let board = Board::from_snapshot([("55", "bk"), ("35", "bp")]).unwrap();
        let detail = classify_threat(sq("44"), &board, Color::Black);
        assert!(detail.king_threat && detail.other_threat);
        assert!(!detail.king_only());
    }

    #[test]
    fn only_the_named_color_counts() {
        let board = Board::from_snapshot([("55", "wk"), ("35", "wp")]).unwrap();
        assert!(!classify_threat(sq("44"), &board, Color::Black).is_threatened());
    }

    #[test]
    fn pinned_attacker_still_threatens() {
        // Black knight on "56" is pinned by the rook on "51" but still eyes "44"
        let board = Board::from_snapshot([("58", "bk"), ("56", "bn"), ("51", "wr")]).unwrap();
        let detail = classify_threat(sq("44"), &board, Color::Black);
        assert!(detail.other_threat);
        assert!(!detail.king_threat);
    }
}
