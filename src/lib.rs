//! Square-control analysis for chess snapshots.
//!
//! Given an immutable board snapshot, computes the squares each side attacks or
//! defends (pin-aware), classifies threats on a square, and judges whether
//! moving to or capturing on a square exposes the mover to recapture.

pub mod analysis;
pub mod bitboard;
pub mod board;
pub mod config;
pub mod coverage;
pub mod defense;
pub mod error;
pub mod movegen;
pub mod pins;
pub mod protocol;
pub mod safety;
pub mod square;
pub mod threat;

pub use analysis::{AnalysisReport, Analyzer, Hint, HintReport};
pub use bitboard::SquareSet;
pub use board::{Board, Color, Piece, PieceKind};
pub use config::AnalysisConfig;
pub use coverage::{compute_coverage, compute_coverage_with, controlled_squares, Coverage};
pub use defense::is_defended;
pub use error::{CoverageError, CoverageResult};
pub use movegen::attacked_squares;
pub use pins::{is_pinned, legal_ray_for_pinned_piece, PinRay};
pub use safety::{
    classify_hint, is_move_safe, is_move_safe_with, pieces_under_attack, would_capture_be_safe,
    would_capture_be_safe_with, HintKind, HintVerdict,
};
pub use square::{is_inside, to_coordinate, to_square, Coord, Square};
pub use threat::{classify_threat, ThreatDetail};

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use std::collections::HashMap;

    use crate::{AnalysisConfig, Board, Color, CoverageError, Square};

    fn value_error(e: CoverageError) -> PyErr {
        PyErr::new::<PyValueError, _>(e.to_string())
    }

    fn parse_color(color: &str) -> PyResult<Color> {
        color.parse().map_err(PyErr::new::<PyValueError, _>)
    }

    fn parse_inputs(square: &str, board: HashMap<String, String>) -> PyResult<(Square, Board)> {
        let square: Square = square.parse().map_err(value_error)?;
        let board = Board::from_snapshot(board).map_err(value_error)?;
        Ok((square, board))
    }

    #[pymodule]
    fn square_control(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PyCoverageEngine>()?;
        Ok(())
    }

    #[pyclass]
    struct PyCoverageEngine {
        config: AnalysisConfig,
    }

    #[pymethods]
    impl PyCoverageEngine {
        #[new]
        #[pyo3(signature = (pin_filtering=true, defense_refinement=true, capture_simulation=true))]
        fn new(pin_filtering: bool, defense_refinement: bool, capture_simulation: bool) -> Self {
            PyCoverageEngine {
                config: AnalysisConfig {
                    pin_filtering,
                    defense_refinement,
                    capture_simulation,
                },
            }
        }

        /// Returns `(white_squares, black_squares)` as sorted identifier lists.
        fn compute_coverage(
            &self,
            board: HashMap<String, String>,
        ) -> PyResult<(Vec<String>, Vec<String>)> {
            let board = Board::from_snapshot(board).map_err(value_error)?;
            let coverage = crate::compute_coverage_with(&board, &self.config);
            let ids = |set: crate::SquareSet| -> Vec<String> {
                set.iter().map(|sq| sq.to_string()).collect()
            };
            Ok((ids(coverage.controlled_by_white), ids(coverage.controlled_by_black)))
        }

        /// Returns `(king_threat, other_threat)`.
        fn classify_threat(
            &self,
            square: &str,
            board: HashMap<String, String>,
            color: &str,
        ) -> PyResult<(bool, bool)> {
            let (square, board) = parse_inputs(square, board)?;
            let detail = crate::classify_threat(square, &board, parse_color(color)?);
            Ok((detail.king_threat, detail.other_threat))
        }

        fn is_defended(
            &self,
            square: &str,
            board: HashMap<String, String>,
            color: &str,
        ) -> PyResult<bool> {
            let (square, board) = parse_inputs(square, board)?;
            Ok(crate::is_defended(square, &board, parse_color(color)?))
        }

        fn would_capture_be_safe(
            &self,
            square: &str,
            board: HashMap<String, String>,
            color: &str,
        ) -> PyResult<bool> {
            let (square, board) = parse_inputs(square, board)?;
            let mover = parse_color(color)?;
            Ok(crate::would_capture_be_safe_with(square, &board, mover, &self.config))
        }

        fn is_move_safe(
            &self,
            square: &str,
            board: HashMap<String, String>,
            color: &str,
        ) -> PyResult<bool> {
            let (square, board) = parse_inputs(square, board)?;
            Ok(crate::is_move_safe_with(square, &board, parse_color(color)?, &self.config))
        }
    }
}
