//! Square coordinates and ray directions.
//!
//! Squares use little-endian rank-file indexing: `a1 == 0`, `h1 == 7`,
//! `a8 == 56`, `h8 == 63`. Every square has exactly one `Coordinate` value in
//! [`Coordinate::ALL`]; constructors hand out entries of that table.

use std::fmt;
use std::str::FromStr;

use crate::errors::SquareError;
use crate::game_state::chess_types::Square;

/// One of the 64 board squares. File and rank are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    index: u8,
}

impl Coordinate {
    pub const ALL: [Coordinate; 64] = build_all();

    // Squares the castling rules refer to.
    pub const A1: Coordinate = Coordinate { index: 0 };
    pub const C1: Coordinate = Coordinate { index: 2 };
    pub const D1: Coordinate = Coordinate { index: 3 };
    pub const E1: Coordinate = Coordinate { index: 4 };
    pub const F1: Coordinate = Coordinate { index: 5 };
    pub const G1: Coordinate = Coordinate { index: 6 };
    pub const H1: Coordinate = Coordinate { index: 7 };
    pub const A8: Coordinate = Coordinate { index: 56 };
    pub const C8: Coordinate = Coordinate { index: 58 };
    pub const D8: Coordinate = Coordinate { index: 59 };
    pub const E8: Coordinate = Coordinate { index: 60 };
    pub const F8: Coordinate = Coordinate { index: 61 };
    pub const G8: Coordinate = Coordinate { index: 62 };
    pub const H8: Coordinate = Coordinate { index: 63 };

    /// Look up the square at `file`, `rank` (both `1..=8`).
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 1 || file > 8 || rank < 1 || rank > 8 {
            return None;
        }
        Some(Self::ALL[((rank - 1) * 8 + (file - 1)) as usize])
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Internal conversion for square indices produced by bitboard scans.
    #[inline]
    pub(crate) const fn from_square(square: Square) -> Self {
        Self::ALL[(square & 63) as usize]
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.index % 8 + 1
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.index / 8 + 1
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.index
    }

    #[inline]
    pub const fn square(self) -> Square {
        self.index
    }

    #[inline]
    pub const fn mask(self) -> u64 {
        1u64 << self.index
    }

    /// True for dark squares (a1 is dark).
    #[inline]
    pub const fn is_dark(self) -> bool {
        (self.file() + self.rank()) % 2 == 0
    }

    /// The square `file_delta`, `rank_delta` away, if it is on the board.
    #[inline]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if !(1..=8).contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Self::new(file as u8, rank as u8)
    }

    #[inline]
    pub fn step(self, direction: Direction) -> Option<Self> {
        self.offset(direction.file_step, direction.rank_step)
    }

    /// Squares strictly between two aligned squares; empty when not aligned
    /// or adjacent.
    pub fn squares_between(self, other: Coordinate) -> Vec<Coordinate> {
        let Some(direction) = Direction::between(self, other) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(6);
        let mut current = self.step(direction);
        while let Some(square) = current {
            if square == other {
                break;
            }
            out.push(square);
            current = square.step(direction);
        }
        out
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.file() - 1);
        let rank = char::from(b'0' + self.rank());
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Coordinate {
    type Err = SquareError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::BadLength(text.to_owned()));
        }
        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) {
            return Err(SquareError::InvalidFile(char::from(file)));
        }
        if !(b'1'..=b'8').contains(&rank) {
            return Err(SquareError::InvalidRank(char::from(rank)));
        }
        Ok(Self::ALL[((rank - b'1') * 8 + (file - b'a')) as usize])
    }
}

const fn build_all() -> [Coordinate; 64] {
    let mut table = [Coordinate { index: 0 }; 64];
    let mut i = 0usize;
    while i < 64 {
        table[i] = Coordinate { index: i as u8 };
        i += 1;
    }
    table
}

/// A unit step along a rank, file or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub file_step: i8,
    pub rank_step: i8,
}

impl Direction {
    pub const NORTH: Direction = Direction::new(0, 1);
    pub const SOUTH: Direction = Direction::new(0, -1);
    pub const EAST: Direction = Direction::new(1, 0);
    pub const WEST: Direction = Direction::new(-1, 0);
    pub const NORTH_EAST: Direction = Direction::new(1, 1);
    pub const NORTH_WEST: Direction = Direction::new(-1, 1);
    pub const SOUTH_EAST: Direction = Direction::new(1, -1);
    pub const SOUTH_WEST: Direction = Direction::new(-1, -1);

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::NORTH,
        Direction::SOUTH,
        Direction::EAST,
        Direction::WEST,
    ];
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NORTH_EAST,
        Direction::NORTH_WEST,
        Direction::SOUTH_EAST,
        Direction::SOUTH_WEST,
    ];
    pub const ALL: [Direction; 8] = [
        Direction::NORTH,
        Direction::SOUTH,
        Direction::EAST,
        Direction::WEST,
        Direction::NORTH_EAST,
        Direction::NORTH_WEST,
        Direction::SOUTH_EAST,
        Direction::SOUTH_WEST,
    ];

    pub const fn new(file_step: i8, rank_step: i8) -> Self {
        Self {
            file_step,
            rank_step,
        }
    }

    /// Ray direction leading from `from` to `to` when both lie on a common
    /// rank, file or diagonal.
    pub fn between(from: Coordinate, to: Coordinate) -> Option<Direction> {
        if from == to {
            return None;
        }
        let df = to.file() as i8 - from.file() as i8;
        let dr = to.rank() as i8 - from.rank() as i8;
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return None;
        }
        Some(Direction::new(df.signum(), dr.signum()))
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.file_step != 0 && self.rank_step != 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, Direction};

    #[test]
    fn index_matches_file_and_rank() {
        for coordinate in Coordinate::ALL {
            let expected = (coordinate.rank() - 1) * 8 + (coordinate.file() - 1);
            assert_eq!(coordinate.index(), expected);
            assert_eq!(coordinate.mask(), 1u64 << expected);
        }
    }

    #[test]
    fn parses_and_prints_square_names() {
        let e4: Coordinate = "e4".parse().expect("e4 should parse");
        assert_eq!(e4.file(), 5);
        assert_eq!(e4.rank(), 4);
        assert_eq!(e4.index(), 28);
        assert_eq!(e4.to_string(), "e4");
        assert!("i1".parse::<Coordinate>().is_err());
        assert!("a9".parse::<Coordinate>().is_err());
        assert!("a10".parse::<Coordinate>().is_err());
    }

    #[test]
    fn offsets_stay_on_board() {
        let a1 = Coordinate::new(1, 1).expect("a1 exists");
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 2).map(|c| c.to_string()), Some("b3".to_owned()));
        let h8 = Coordinate::new(8, 8).expect("h8 exists");
        assert_eq!(h8.step(Direction::NORTH), None);
    }

    #[test]
    fn direction_between_aligned_squares() {
        let c1: Coordinate = "c1".parse().expect("c1");
        let h6: Coordinate = "h6".parse().expect("h6");
        let d2: Coordinate = "d3".parse().expect("d3");
        assert_eq!(Direction::between(c1, h6), Some(Direction::NORTH_EAST));
        assert_eq!(Direction::between(c1, d2), None);

        let between: Vec<String> = c1.squares_between(h6).iter().map(|c| c.to_string()).collect();
        assert_eq!(between, vec!["d2", "e3", "f4", "g5"]);
    }

    #[test]
    fn named_squares_match_their_text() {
        assert_eq!(Coordinate::E1.to_string(), "e1");
        assert_eq!(Coordinate::G8.to_string(), "g8");
        assert_eq!(Coordinate::A8.index(), 56);
    }

    #[test]
    fn dark_and_light_squares() {
        assert!(Coordinate::new(1, 1).expect("a1").is_dark());
        assert!(!Coordinate::new(8, 1).expect("h1").is_dark());
    }
}
