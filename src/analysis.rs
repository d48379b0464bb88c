use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitboard::SquareSet;
use crate::board::{Board, Color};
use crate::config::AnalysisConfig;
use crate::coverage::{compute_coverage_with, Coverage};
use crate::safety::{classify_hint_in, pieces_under_attack_in, HintKind, HintVerdict};
use crate::square::Square;

/// A destination offered to the player, to be judged safe or dangerous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub square: Square,
    pub kind: HintKind,
}

impl Hint {
    pub fn new(square: Square, kind: HintKind) -> Self {
        Hint { square, kind }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintReport {
    pub square: Square,
    pub kind: HintKind,
    pub verdict: HintVerdict,
}

/// Everything a host needs to render one snapshot from `player`'s side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub player: Color,
    pub coverage: Coverage,
    pub under_attack: SquareSet,
    pub hints: Vec<HintReport>,
}

/// Runs the pipeline over snapshots with one fixed [`AnalysisConfig`].
///
/// Holds no per-board state, so one analyzer can serve any number of
/// snapshots, from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    pub fn coverage(&self, board: &Board) -> Coverage {
        compute_coverage_with(board, &self.config)
    }

    pub fn analyze(&self, board: &Board, player: Color, hints: &[Hint]) -> AnalysisReport {
        let coverage = self.coverage(board);
        let under_attack = pieces_under_attack_in(board, player, &coverage, &self.config);

        let hints = hints
            .iter()
            .map(|hint| HintReport {
                square: hint.square,
                kind: hint.kind,
                verdict: classify_hint_in(
                    hint.square,
                    hint.kind,
                    board,
                    player,
                    &coverage,
                    &self.config,
                ),
            })
            .collect();

        debug!(
            pieces = board.piece_count(),
            white = coverage.controlled_by_white.len(),
            black = coverage.controlled_by_black.len(),
            under_attack = under_attack.len(),
            "snapshot analyzed"
        );

        AnalysisReport {
            player,
            coverage,
            under_attack,
            hints,
        }
    }

    /// Coverage of many independent snapshots, in input order.
    pub fn coverage_batch(&self, boards: &[Board]) -> Vec<Coverage> {
        boards.par_iter().map(|board| self.coverage(board)).collect()
    }

    /// Full reports for many independent snapshots, in input order.
    pub fn analyze_batch(&self, jobs: &[(Board, Color)]) -> Vec<AnalysisReport> {
        jobs.par_iter()
            .map(|(board, player)| self.analyze(board, *player, &[]))
            .collect()
    }
}
