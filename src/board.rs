use crate::bitboard::*;
use crate::error::{CoverageError, CoverageResult};
use crate::square::Square;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn slides_orthogonally(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    pub fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn flip(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(format!("Invalid color: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }
}

impl FromStr for Piece {
    type Err = CoverageError;

    /// Two-character code: color (`w`/`b`) then kind (`p`,`n`,`b`,`r`,`q`,`k`).
    fn from_str(code: &str) -> CoverageResult<Piece> {
        let mut chars = code.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(c), Some(k), None) => Color::from_char(c).zip(PieceKind::from_char(k)),
            _ => None,
        };

        parsed
            .map(|(color, kind)| Piece::new(color, kind))
            .ok_or_else(|| CoverageError::InvalidPiece {
                code: code.to_string(),
            })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.to_char(), self.kind.to_char())
    }
}

/// Immutable snapshot of piece placement.
///
/// Derived positions (a vacated square, a simulated capture) are new boards;
/// nothing mutates a `Board` once it is built.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Board {
    pieces: [[Bitboard; 6]; 2],
    color_bb: [Bitboard; 2],
    all_pieces: Bitboard,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            pieces: [[EMPTY; 6]; 2],
            color_bb: [EMPTY; 2],
            all_pieces: EMPTY,
        }
    }
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard starting placement.
    pub fn startpos() -> Self {
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
            .expect("starting placement is valid")
    }

    /// Builds a board from `(square id, piece code)` pairs, e.g. `("51", "wk")`.
    /// A later entry for the same square replaces an earlier one.
    pub fn from_snapshot<I, S, P>(entries: I) -> CoverageResult<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let mut board = Board::default();
        for (square, code) in entries {
            let square: Square = square.as_ref().parse()?;
            let piece: Piece = code.as_ref().parse()?;
            board.put(square, piece);
        }
        Ok(board)
    }

    /// Parses a JSON object such as `{"51": "wk", "44": "bp"}`.
    pub fn from_json(json: &str) -> CoverageResult<Self> {
        let map: HashMap<String, String> = serde_json::from_str(json)?;
        Self::from_snapshot(map)
    }

    /// Reads the piece-placement field of a FEN string; any further fields are ignored.
    pub fn from_fen(fen: &str) -> CoverageResult<Self> {
        let placement = fen.split_whitespace().next().ok_or_else(|| CoverageError::InvalidFen {
            reason: "empty string".to_string(),
        })?;

        let mut board = Board::default();
        let mut rank = 8i8;
        let mut file = 1i8;

        for ch in placement.chars() {
            if ch == '/' {
                if file != 9 {
                    return Err(CoverageError::InvalidFen {
                        reason: format!("rank {} does not cover eight files", rank),
                    });
                }
                rank -= 1;
                file = 1;
            } else if let Some(skip) = ch.to_digit(10) {
                file += skip as i8;
            } else {
                let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
                let kind = PieceKind::from_char(ch.to_ascii_lowercase()).ok_or_else(|| {
                    CoverageError::InvalidFen {
                        reason: format!("invalid piece: {}", ch),
                    }
                })?;

                let square = crate::square::Coord::new(file, rank);
                let square = Square::from_coord(square).ok_or_else(|| CoverageError::InvalidFen {
                    reason: format!("piece {} placed off the board", ch),
                })?;
                board.put(square, Piece::new(color, kind));

                file += 1;
            }

            if file > 9 || rank < 1 {
                return Err(CoverageError::InvalidFen {
                    reason: "placement runs off the board".to_string(),
                });
            }
        }

        if rank != 1 || file != 9 {
            return Err(CoverageError::InvalidFen {
                reason: "placement does not describe eight ranks".to_string(),
            });
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::from_index(rank * 8 + file);
                if let Some(piece) = self.piece_at(sq) {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    let ch = piece.kind.to_char();
                    fen.push(if piece.color == Color::White {
                        ch.to_ascii_uppercase()
                    } else {
                        ch
                    });
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }

    fn put(&mut self, square: Square, piece: Piece) {
        self.clear(square);
        let sq = square.index();
        let color = piece.color as usize;
        let kind = piece.kind as usize;
        self.pieces[color][kind] = set_bit(self.pieces[color][kind], sq);
        self.color_bb[color] = set_bit(self.color_bb[color], sq);
        self.all_pieces = set_bit(self.all_pieces, sq);
    }

    fn clear(&mut self, square: Square) {
        let sq = square.index();
        for color in 0..2 {
            for kind in 0..6 {
                self.pieces[color][kind] = clear_bit(self.pieces[color][kind], sq);
            }
            self.color_bb[color] = clear_bit(self.color_bb[color], sq);
        }
        self.all_pieces = clear_bit(self.all_pieces, sq);
    }

    /// A new snapshot with `square` vacated.
    pub fn without(&self, square: Square) -> Board {
        let mut board = self.clone();
        board.clear(square);
        board
    }

    /// A new snapshot with `piece` placed on `square`, replacing any occupant.
    pub fn with(&self, square: Square, piece: Piece) -> Board {
        let mut board = self.clone();
        board.put(square, piece);
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let sq = square.index();
        if !get_bit(self.all_pieces, sq) {
            return None;
        }

        let color = if get_bit(self.color_bb[0], sq) {
            Color::White
        } else {
            Color::Black
        };

        PieceKind::ALL
            .into_iter()
            .find(|&kind| get_bit(self.pieces[color as usize][kind as usize], sq))
            .map(|kind| Piece::new(color, kind))
    }

    pub fn is_empty(&self, square: Square) -> bool {
        !get_bit(self.all_pieces, square.index())
    }

    pub fn occupied(&self) -> Bitboard {
        self.all_pieces
    }

    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.color_bb[color as usize]
    }

    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color as usize][kind as usize]
    }

    /// The king of `color`. With several kings, the one with the lowest identifier
    /// (file first, then rank) is used.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        SquareSet(self.pieces(color, PieceKind::King))
            .iter()
            .min_by_key(|king| (king.file(), king.rank()))
    }

    pub fn piece_count(&self) -> usize {
        count_bits(self.all_pieces) as usize
    }

    /// Occupied squares with their pieces, in ascending square order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        SquareSet(self.all_pieces)
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn iter_color(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color == color)
    }
}

impl TryFrom<BTreeMap<String, String>> for Board {
    type Error = CoverageError;

    fn try_from(map: BTreeMap<String, String>) -> CoverageResult<Self> {
        Board::from_snapshot(map)
    }
}

impl From<Board> for BTreeMap<String, String> {
    fn from(board: Board) -> Self {
        board
            .iter()
            .map(|(sq, piece)| (sq.to_string(), piece.to_string()))
            .collect()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(sq, piece)| (sq.to_string(), piece.to_string())))
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let symbol = match self.piece_at(Square::from_index(rank * 8 + file)) {
                    Some(piece) if piece.color == Color::White => {
                        piece.kind.to_char().to_ascii_uppercase()
                    }
                    Some(piece) => piece.kind.to_char(),
                    None => '.',
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        write!(f, "  1 2 3 4 5 6 7 8")
    }
}
