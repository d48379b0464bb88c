use crate::bitboard::*;
use crate::board::{Board, Color, Piece, PieceKind};
use crate::square::Square;

/// Squares a piece standing on `square` attacks, ignoring pins and check.
///
/// Pawns control both forward diagonals whatever stands there. Knights and kings
/// reach every on-board offset not held by a friendly piece. Sliders run until the
/// first occupied square, which counts only when it holds an enemy piece.
pub fn attacked_squares(square: Square, piece: Piece, board: &Board) -> SquareSet {
    SquareSet(attack_bitboard(square.index(), piece, board))
}

fn attack_bitboard(sq: u8, piece: Piece, board: &Board) -> Bitboard {
    let tables = &ATTACK_TABLES;
    let own = board.color_bb(piece.color);
    let occ = board.occupied();

    match piece.kind {
        PieceKind::Pawn => tables.pawn_attacks[pawn_side(piece.color)][sq as usize],
        PieceKind::Knight => tables.knight_attacks[sq as usize] & !own,
        PieceKind::King => tables.king_attacks[sq as usize] & !own,
        PieceKind::Bishop => tables.get_bishop_attacks(sq, occ) & !own,
        PieceKind::Rook => tables.get_rook_attacks(sq, occ) & !own,
        PieceKind::Queen => tables.get_queen_attacks(sq, occ) & !own,
    }
}

#[inline(always)]
fn pawn_side(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
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

    fn attacks(board: &Board, id: &str) -> SquareSet {
        let piece = board.piece_at(sq(id)).unwrap();
        attacked_squares(sq(id), piece, board)
    }

    #[test]
    fn pawn_controls_diagonals_regardless_of_occupancy() {
        let white = Board::from_snapshot([("44", "wp")]).unwrap();
        assert_eq!(attacks(&white, "44"), set(&["35", "55"]));

        let black = Board::from_snapshot([("44", "bp")]).unwrap();
        assert_eq!(attacks(&black, "44"), set(&["33", "53"]));

        // Friendly pieces on the diagonals are still "controlled" (defended)
        let crowded = Board::from_snapshot([("44", "wp"), ("35", "wn"), ("55", "wr")]).unwrap();
        assert_eq!(attacks(&crowded, "44"), set(&["35", "55"]));
    }

    #[test]
    fn edge_pawn_has_one_diagonal() {
        let board = Board::from_snapshot([("12", "wp")]).unwrap();
        assert_eq!(attacks(&board, "12"), set(&["23"]));
    }

    #[test]
    fn knight_skips_friendly_squares() {
        let board = Board::from_snapshot([("11", "wn"), ("23", "wp"), ("32", "bp")]).unwrap();
        assert_eq!(attacks(&board, "11"), set(&["32"]));
    }

    #[test]
    fn king_reaches_neighbours() {
        let board = Board::from_snapshot([("11", "wk"), ("12", "wp")]).unwrap();
        assert_eq!(attacks(&board, "11"), set(&["21", "22"]));
    }

    #[test]
    fn rook_stops_before_friendly_blocker() {
        let board = Board::from_snapshot([("41", "wr"), ("44", "wp")]).unwrap();
        let moves = attacks(&board, "41");
        assert!(moves.contains(sq("42")));
        assert!(moves.contains(sq("43")));
        assert!(!moves.contains(sq("44")));
        assert!(!moves.contains(sq("45")));
    }

    #[test]
    fn rook_includes_enemy_blocker_only() {
        let board = Board::from_snapshot([("41", "wr"), ("44", "bp")]).unwrap();
        let moves = attacks(&board, "41");
        assert!(moves.contains(sq("44")));
        assert!(!moves.contains(sq("45")));
        // Full first rank plus three squares up the file
        assert_eq!(moves.len(), 7 + 3);
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let board = Board::from_snapshot([("44", "wq")]).unwrap();
        assert_eq!(attacks(&board, "44").len(), 14 + 13);
    }
}
