use proptest::prelude::*;
use square_control::{
    attacked_squares, compute_coverage, compute_coverage_with, is_defended, is_inside,
    AnalysisConfig, Board, Color, Piece, PieceKind, Square,
};

fn piece_from(code: usize) -> Piece {
    let color = if code < 6 { Color::White } else { Color::Black };
    Piece::new(color, PieceKind::ALL[code % 6])
}

fn arb_board() -> impl Strategy<Value = Board> {
    prop::collection::vec((0u8..64, 0usize..12), 0..24).prop_map(|placements| {
        placements
            .into_iter()
            .fold(Board::empty(), |board, (index, code)| {
                board.with(Square::from_index(index), piece_from(code))
            })
    })
}

proptest! {
    #[test]
    fn generated_squares_stay_on_board(board in arb_board()) {
        for (square, piece) in board.iter() {
            for target in attacked_squares(square, piece, &board) {
                prop_assert!(is_inside(target.coord()));
                prop_assert_ne!(target, square);
            }
        }
    }

    #[test]
    fn coverage_is_idempotent(board in arb_board()) {
        prop_assert_eq!(compute_coverage(&board), compute_coverage(&board));
    }

    #[test]
    fn pin_filtering_only_removes_squares(board in arb_board()) {
        let filtered = compute_coverage(&board);
        let unfiltered = compute_coverage_with(&board, &AnalysisConfig::legacy_unrefined());
        prop_assert!(filtered.controlled_by_white.is_subset(&unfiltered.controlled_by_white));
        prop_assert!(filtered.controlled_by_black.is_subset(&unfiltered.controlled_by_black));
    }

    #[test]
    fn defense_ignores_the_current_occupant(board in arb_board(), index in 0u8..64) {
        let square = Square::from_index(index);
        for color in [Color::White, Color::Black] {
            prop_assert_eq!(
                is_defended(square, &board, color),
                is_defended(square, &board.without(square), color)
            );
        }
    }

    #[test]
    fn snapshot_round_trips_through_json(board in arb_board()) {
        let json = serde_json::to_string(&board).unwrap();
        prop_assert_eq!(Board::from_json(&json).unwrap(), board);
    }
}
