use serde::{Deserialize, Serialize};

use crate::bitboard::SquareSet;
use crate::board::{Board, Color, Piece};
use crate::config::AnalysisConfig;
use crate::movegen::attacked_squares;
use crate::pins::{is_pinned, legal_ray_for_pinned_piece};
use crate::square::Square;

/// Squares each side attacks or defends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    #[serde(rename = "white")]
    pub controlled_by_white: SquareSet,
    #[serde(rename = "black")]
    pub controlled_by_black: SquareSet,
}

impl Coverage {
    pub fn of(&self, color: Color) -> SquareSet {
        match color {
            Color::White => self.controlled_by_white,
            Color::Black => self.controlled_by_black,
        }
    }

    pub fn controls(&self, color: Color, square: Square) -> bool {
        self.of(color).contains(square)
    }

    fn add(&mut self, color: Color, squares: SquareSet) {
        match color {
            Color::White => self.controlled_by_white = self.controlled_by_white.union(squares),
            Color::Black => self.controlled_by_black = self.controlled_by_black.union(squares),
        }
    }
}

/// Attacked squares of one piece after pin filtering.
pub fn controlled_squares(
    square: Square,
    piece: Piece,
    board: &Board,
    config: &AnalysisConfig,
) -> SquareSet {
    let attacked = attacked_squares(square, piece, board);
    if !config.pin_filtering || !is_pinned(square, board, piece.color) {
        return attacked;
    }

    match legal_ray_for_pinned_piece(square, board, piece.color) {
        Some(ray) => ray.restrict(attacked),
        None => attacked,
    }
}

/// Coverage of both sides with every refinement enabled.
pub fn compute_coverage(board: &Board) -> Coverage {
    compute_coverage_with(board, &AnalysisConfig::default())
}

pub fn compute_coverage_with(board: &Board, config: &AnalysisConfig) -> Coverage {
    let mut coverage = Coverage::default();
    for (square, piece) in board.iter() {
        coverage.add(piece.color, controlled_squares(square, piece, board, config));
    }
    coverage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(id: &str) -> Square {
        id.parse().unwrap()
    }

    fn set(ids: &[&str]) -> SquareSet {
        ids.iter().map(|id| sq(id)).collect()
    }

    #[test]
    fn pinned_bishop_keeps_to_the_pin_line() {
        let board = Board::from_snapshot([("11", "wk"), ("33", "wb"), ("55", "bq")]).unwrap();
        let bishop = board.piece_at(sq("33")).unwrap();

        let filtered = controlled_squares(sq("33"), bishop, &board, &AnalysisConfig::default());
        assert!(filtered.is_subset(&set(&["22", "44", "55"])));
        assert!(filtered.contains(sq("44")));
        assert!(!filtered.contains(sq("24")));

        let unfiltered =
            controlled_squares(sq("33"), bishop, &board, &AnalysisConfig::legacy_unrefined());
        assert!(unfiltered.contains(sq("24")));
        assert!(unfiltered.contains(sq("42")));
    }

    #[test]
    fn same_color_attacks_are_unioned() {
        let board = Board::from_snapshot([("44", "wp"), ("64", "wp")]).unwrap();
        let coverage = compute_coverage(&board);
        assert_eq!(coverage.controlled_by_white, set(&["35", "55", "75"]));
        assert!(coverage.controlled_by_black.is_empty());
    }

    #[test]
    fn sides_are_kept_apart() {
        let board = Board::from_snapshot([("44", "wp"), ("46", "bp")]).unwrap();
        let coverage = compute_coverage(&board);
        assert!(coverage.controls(Color::White, sq("55")));
        assert!(coverage.controls(Color::Black, sq("55")));
        assert_eq!(coverage.of(Color::Black), set(&["35", "55"]));
    }

    #[test]
    fn serializes_as_white_and_black_lists() {
        let board = Board::from_snapshot([("12", "wp")]).unwrap();
        let json = serde_json::to_string(&compute_coverage(&board)).unwrap();
        assert_eq!(json, r#"{"white":["23"],"black":[]}"#);
    }
}
