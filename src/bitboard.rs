use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::square::Square;

pub type Bitboard = u64;

pub const EMPTY: Bitboard = 0;

// Squares are indexed (rank - 1) * 8 + (file - 1): bit 0 is "11", bit 63 is "88".

#[inline(always)]
pub fn set_bit(bb: Bitboard, sq: u8) -> Bitboard {
    bb | (1u64 << sq)
}

#[inline(always)]
pub fn clear_bit(bb: Bitboard, sq: u8) -> Bitboard {
    bb & !(1u64 << sq)
}

#[inline(always)]
pub fn get_bit(bb: Bitboard, sq: u8) -> bool {
    (bb & (1u64 << sq)) != 0
}

#[inline(always)]
pub fn count_bits(bb: Bitboard) -> u32 {
    bb.count_ones()
}

#[inline(always)]
pub fn pop_lsb(bb: Bitboard) -> (Bitboard, Option<u8>) {
    if bb == 0 {
        return (0, None);
    }
    let sq = bb.trailing_zeros() as u8;
    (bb & (bb - 1), Some(sq))
}

/// Unit steps as (file delta, rank delta).
pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const KNIGHT_DELTAS: [(i8, i8); 8] = [(1, 2), (2, 1), (-1, 2), (-2, 1),
                                      (1, -2), (2, -1), (-1, -2), (-2, -1)];

const KING_DELTAS: [(i8, i8); 8] = [(1, 1), (1, 0), (1, -1), (0, 1),
                                    (0, -1), (-1, 1), (-1, 0), (-1, -1)];

/// Occupancy-independent attack sets for the leaping pieces.
pub struct AttackTables {
    pub pawn_attacks: [[Bitboard; 64]; 2],
    pub knight_attacks: [Bitboard; 64],
    pub king_attacks: [Bitboard; 64],
}

impl AttackTables {
    pub fn new() -> Self {
        let mut tables = AttackTables {
            pawn_attacks: [[0; 64]; 2],
            knight_attacks: [0; 64],
            king_attacks: [0; 64],
        };

        tables.init_pawn_attacks();
        tables.init_knight_attacks();
        tables.init_king_attacks();

        tables
    }

    fn init_pawn_attacks(&mut self) {
        for sq in 0..64u8 {
            // White pawns capture toward rank 8, black toward rank 1
            self.pawn_attacks[0][sq as usize] = leaper_targets(sq, &[(-1, 1), (1, 1)]);
            self.pawn_attacks[1][sq as usize] = leaper_targets(sq, &[(-1, -1), (1, -1)]);
        }
    }

    fn init_knight_attacks(&mut self) {
        for sq in 0..64u8 {
            self.knight_attacks[sq as usize] = leaper_targets(sq, &KNIGHT_DELTAS);
        }
    }

    fn init_king_attacks(&mut self) {
        for sq in 0..64u8 {
            self.king_attacks[sq as usize] = leaper_targets(sq, &KING_DELTAS);
        }
    }

    /// Squares reached along each direction up to and including the first occupied square.
    #[inline(always)]
    pub fn get_ray_attacks(&self, sq: u8, occ: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
        let mut attacks = 0;

        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;

        for (df, dr) in directions.iter() {
            let mut r = rank + dr;
            let mut f = file + df;

            while (0..8).contains(&r) && (0..8).contains(&f) {
                let target = (r * 8 + f) as u8;
                attacks = set_bit(attacks, target);
                if get_bit(occ, target) {
                    break;
                }
                r += dr;
                f += df;
            }
        }

        attacks
    }

    #[inline(always)]
    pub fn get_bishop_attacks(&self, sq: u8, occ: Bitboard) -> Bitboard {
        self.get_ray_attacks(sq, occ, &DIAGONALS)
    }

    #[inline(always)]
    pub fn get_rook_attacks(&self, sq: u8, occ: Bitboard) -> Bitboard {
        self.get_ray_attacks(sq, occ, &ORTHOGONALS)
    }

    #[inline(always)]
    pub fn get_queen_attacks(&self, sq: u8, occ: Bitboard) -> Bitboard {
        self.get_rook_attacks(sq, occ) | self.get_bishop_attacks(sq, occ)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

fn leaper_targets(sq: u8, deltas: &[(i8, i8)]) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut targets = 0;

    for (df, dr) in deltas.iter() {
        let new_rank = rank + dr;
        let new_file = file + df;

        if (0..8).contains(&new_rank) && (0..8).contains(&new_file) {
            targets = set_bit(targets, (new_rank * 8 + new_file) as u8);
        }
    }

    targets
}

lazy_static::lazy_static! {
    pub static ref ATTACK_TABLES: AttackTables = AttackTables::new();
}

/// An unordered, deduplicated set of squares backed by a bitboard.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(pub Bitboard);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(EMPTY);

    pub fn insert(&mut self, square: Square) {
        self.0 = set_bit(self.0, square.index());
    }

    pub fn remove(&mut self, square: Square) {
        self.0 = clear_bit(self.0, square.index());
    }

    pub fn contains(&self, square: Square) -> bool {
        get_bit(self.0, square.index())
    }

    pub fn len(&self) -> usize {
        count_bits(self.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == EMPTY
    }

    pub fn union(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    pub fn is_subset(&self, other: &SquareSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Squares in ascending index order ("11", "21", ... "88").
    pub fn iter(&self) -> SquareSetIter {
        SquareSetIter(self.0)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(Square) -> bool) {
        for square in self.iter() {
            if !keep(square) {
                self.remove(square);
            }
        }
    }
}

pub struct SquareSetIter(Bitboard);

impl Iterator for SquareSetIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let (rest, sq) = pop_lsb(self.0);
        self.0 = rest;
        sq.map(Square::from_index)
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;

    fn into_iter(self) -> SquareSetIter {
        self.iter()
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for square in iter {
            set.insert(square);
        }
        set
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for SquareSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for square in self.iter() {
            seq.serialize_element(&square)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SquareSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let squares = Vec::<Square>::deserialize(deserializer)?;
        Ok(squares.into_iter().collect())
    }
}
