//! Coordinate model: two-digit square identifiers ("44" = file 4, rank 4)
//! and the (file, rank) pairs the generators step through.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoverageError, CoverageResult};

/// A (file, rank) pair. Components are signed so ray stepping can leave the board;
/// use [`is_inside`] before converting back to a [`Square`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub file: i8,
    pub rank: i8,
}

impl Coord {
    pub const fn new(file: i8, rank: i8) -> Self {
        Coord { file, rank }
    }

    pub fn offset(self, df: i8, dr: i8) -> Coord {
        Coord::new(self.file + df, self.rank + dr)
    }
}

/// One of the 64 cells. Stored as a bitboard index, (rank - 1) * 8 + (file - 1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Panics if `index >= 64`.
    pub fn from_index(index: u8) -> Square {
        assert!(index < 64, "square index {index} out of range");
        Square(index)
    }

    pub fn from_coord(coord: Coord) -> Option<Square> {
        if is_inside(coord) {
            Some(Square(((coord.rank - 1) * 8 + (coord.file - 1)) as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> i8 {
        (self.0 % 8) as i8 + 1
    }

    pub fn rank(self) -> i8 {
        (self.0 / 8) as i8 + 1
    }

    pub fn coord(self) -> Coord {
        Coord::new(self.file(), self.rank())
    }

    /// The square `(df, dr)` away, if it is still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        Square::from_coord(self.coord().offset(df, dr))
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

/// Parses a two-digit identifier into (file, rank).
pub fn to_coordinate(square: &str) -> CoverageResult<Coord> {
    let invalid = || CoverageError::InvalidSquare {
        square: square.to_string(),
    };

    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(invalid());
    }

    let digit = |b: u8| match b {
        b'1'..=b'8' => Some((b - b'0') as i8),
        _ => None,
    };

    match (digit(bytes[0]), digit(bytes[1])) {
        (Some(file), Some(rank)) => Ok(Coord::new(file, rank)),
        _ => Err(invalid()),
    }
}

/// Inverse of [`to_coordinate`]. Panics on an off-board coordinate.
pub fn to_square(coord: Coord) -> Square {
    match Square::from_coord(coord) {
        Some(square) => square,
        None => panic!("coordinate {coord:?} is off the board"),
    }
}

#[inline(always)]
pub fn is_inside(coord: Coord) -> bool {
    (1..=8).contains(&coord.file) && (1..=8).contains(&coord.rank)
}

impl FromStr for Square {
    type Err = CoverageError;

    fn from_str(s: &str) -> CoverageResult<Square> {
        to_coordinate(s).map(to_square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_then_rank() {
        assert_eq!(to_coordinate("82").unwrap(), Coord::new(8, 2));
        assert_eq!(to_coordinate("11").unwrap(), Coord::new(1, 1));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for bad in ["", "1", "123", "09", "90", "a1", "4 ", "١١"] {
            assert!(
                matches!(to_coordinate(bad), Err(CoverageError::InvalidSquare { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn square_round_trips_through_coordinates() {
        for square in Square::all() {
            assert_eq!(to_square(square.coord()), square);
            assert_eq!(square.to_string().parse::<Square>().unwrap(), square);
        }
    }

    #[test]
    fn bounds_check() {
        assert!(is_inside(Coord::new(1, 8)));
        assert!(!is_inside(Coord::new(0, 4)));
        assert!(!is_inside(Coord::new(4, 9)));
        assert_eq!("11".parse::<Square>().unwrap().offset(-1, 0), None);
    }
}
