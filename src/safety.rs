//! Safety verdicts for the mover: destination hints, captures, and own pieces
//! left hanging.
//!
//! Every verdict starts from enemy coverage. When the defense refinement is on,
//! a square attacked only by the enemy king and defended by the mover is not
//! dangerous, since the king cannot take on a guarded square. Captures may then
//! be re-checked on a board with the captured piece removed, exposing enemy
//! pieces that were lined up behind it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitboard::SquareSet;
use crate::board::{Board, Color};
use crate::config::AnalysisConfig;
use crate::coverage::{compute_coverage_with, Coverage};
use crate::defense::is_defended;
use crate::square::Square;
use crate::threat::classify_threat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    Move,
    Capture,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintVerdict {
    Safe,
    Danger,
}

impl HintVerdict {
    fn from_danger(danger: bool) -> Self {
        if danger {
            HintVerdict::Danger
        } else {
            HintVerdict::Safe
        }
    }

    pub fn is_safe(self) -> bool {
        self == HintVerdict::Safe
    }
}

/// Enemy coverage with the king-only exemption applied.
fn covered_danger(
    square: Square,
    board: &Board,
    mover: Color,
    coverage: &Coverage,
    config: &AnalysisConfig,
) -> bool {
    let enemy = mover.flip();
    if !coverage.controls(enemy, square) {
        return false;
    }

    if config.defense_refinement
        && classify_threat(square, board, enemy).king_only()
        && is_defended(square, board, mover)
    {
        debug!(%square, "only the enemy king attacks a defended square");
        return false;
    }

    true
}

fn capture_danger(
    square: Square,
    board: &Board,
    mover: Color,
    coverage: &Coverage,
    config: &AnalysisConfig,
) -> bool {
    if covered_danger(square, board, mover, coverage, config) {
        return true;
    }

    let holds_enemy = board.piece_at(square).is_some_and(|piece| piece.color != mover);
    if !config.capture_simulation || !holds_enemy || is_defended(square, board, mover) {
        return false;
    }

    let captured = board.without(square);
    let recomputed = compute_coverage_with(&captured, config);
    let unmasked = recomputed.controls(mover.flip(), square);
    if unmasked {
        debug!(%square, "capture exposes a recapture once the piece is removed");
    }
    unmasked
}

/// Whether the mover can take the enemy piece on `square` without it being retaken.
pub fn would_capture_be_safe(square: Square, board: &Board, mover: Color) -> bool {
    would_capture_be_safe_with(square, board, mover, &AnalysisConfig::default())
}

pub fn would_capture_be_safe_with(
    square: Square,
    board: &Board,
    mover: Color,
    config: &AnalysisConfig,
) -> bool {
    let coverage = compute_coverage_with(board, config);
    !capture_danger(square, board, mover, &coverage, config)
}

/// Whether the mover can step onto the empty `square` without it being attacked.
pub fn is_move_safe(square: Square, board: &Board, mover: Color) -> bool {
    is_move_safe_with(square, board, mover, &AnalysisConfig::default())
}

pub fn is_move_safe_with(
    square: Square,
    board: &Board,
    mover: Color,
    config: &AnalysisConfig,
) -> bool {
    let coverage = compute_coverage_with(board, config);
    !covered_danger(square, board, mover, &coverage, config)
}

pub(crate) fn classify_hint_in(
    square: Square,
    kind: HintKind,
    board: &Board,
    mover: Color,
    coverage: &Coverage,
    config: &AnalysisConfig,
) -> HintVerdict {
    let danger = match kind {
        HintKind::Move => covered_danger(square, board, mover, coverage, config),
        HintKind::Capture => capture_danger(square, board, mover, coverage, config),
    };
    HintVerdict::from_danger(danger)
}

/// Verdict for one destination hint.
pub fn classify_hint(
    square: Square,
    kind: HintKind,
    board: &Board,
    mover: Color,
    config: &AnalysisConfig,
) -> HintVerdict {
    let coverage = compute_coverage_with(board, config);
    classify_hint_in(square, kind, board, mover, &coverage, config)
}

pub(crate) fn pieces_under_attack_in(
    board: &Board,
    color: Color,
    coverage: &Coverage,
    config: &AnalysisConfig,
) -> SquareSet {
    board
        .iter_color(color)
        .map(|(square, _)| square)
        .filter(|&square| covered_danger(square, board, color, coverage, config))
        .collect()
}

/// Squares of `color` pieces the enemy can take.
pub fn pieces_under_attack(board: &Board, color: Color, config: &AnalysisConfig) -> SquareSet {
    let coverage = compute_coverage_with(board, config);
    pieces_under_attack_in(board, color, &coverage, config)
}
