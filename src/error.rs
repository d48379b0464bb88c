//! Error types for the square-control engine
//!
//! Only snapshot parsing can fail. Analysis over a parsed [`Board`](crate::board::Board)
//! is total: degenerate positions (no king, two kings) fall back to defined values.

use thiserror::Error;

/// Errors raised while turning caller input into a board snapshot
#[derive(Error, Debug)]
pub enum CoverageError {
    /// Square identifier is not two digits in 1-8 (file then rank)
    #[error("Invalid square: {square:?} (expected two digits 1-8, file then rank)")]
    InvalidSquare { square: String },

    /// Piece code is not a color letter (w/b) followed by a kind letter (p/n/b/r/q/k)
    #[error("Invalid piece code: {code:?}")]
    InvalidPiece { code: String },

    /// FEN piece placement could not be read
    #[error("Invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// JSON snapshot could not be decoded
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type alias for snapshot parsing
pub type CoverageResult<T> = Result<T, CoverageError>;
