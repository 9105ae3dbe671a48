use std::convert::From;
use std::fmt::Display;

use thiserror::Error;

/// Errors raised when converting raw values or text into board coordinates.
#[derive(Error, Debug, PartialEq)]
pub enum CoordinatesError {
    #[error("Invalid square index: {0} (must be 0-63)")]
    InvalidSquareIndex(u8),

    #[error("Invalid square name: \"{0}\"")]
    InvalidSquareName(String),

    #[error("Invalid file: '{0}'")]
    InvalidFile(char),

    #[error("Invalid rank: '{0}'")]
    InvalidRank(char),
}

/// Represents a file (column) on a chess board.
///
/// Files are labeled from A to H, going from left to right when viewing the board from White's perspective. The file
/// of a square is its index modulo 8.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Represents all files on a chess board.
    pub const ALL_FILES: [File; 8] = [File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H];
}

impl Display for File {
    /// Formats the file as a single lowercase letter.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (u8::from(*self) + b'a') as char)
    }
}

impl From<File> for u8 {
    fn from(file: File) -> Self {
        file as u8
    }
}

impl TryFrom<char> for File {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::ALL_FILES[(value as u8 - b'a') as usize]),
            _ => Err(CoordinatesError::InvalidFile(value)),
        }
    }
}

/// Represents a rank (row) on a chess board.
///
/// The board is stored from the top: row 0 holds rank 8 and row 7 holds rank 1. The discriminant of each variant is
/// its row, so `R8` is 0 and `R1` is 7.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    /// All ranks, in row order (from rank 8 down to rank 1).
    pub const ALL_RANKS: [Rank; 8] =
        [Rank::R8, Rank::R7, Rank::R6, Rank::R5, Rank::R4, Rank::R3, Rank::R2, Rank::R1];

    /// Returns the row of the rank, 0 being the top of the board.
    pub fn row(&self) -> u8 {
        *self as u8
    }
}

impl Display for Rank {
    /// Formats the rank as a single digit.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'8' - self.row()) as char)
    }
}

impl TryFrom<char> for Rank {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::ALL_RANKS[(b'8' - value as u8) as usize]),
            _ => Err(CoordinatesError::InvalidRank(value)),
        }
    }
}

/// Represents a square on a chess board.
///
/// Squares are indexed from 0 to 63 row by row, starting from A8 in the top left corner and ending at H1 in the
/// bottom right corner. The file is the index modulo 8 and the row is the index divided by 8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

#[allow(dead_code)]
impl Square {
    pub const COUNT: usize = 64;

    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A7: Square = Square(8);
    pub const B7: Square = Square(9);
    pub const C7: Square = Square(10);
    pub const D7: Square = Square(11);
    pub const E7: Square = Square(12);
    pub const F7: Square = Square(13);
    pub const G7: Square = Square(14);
    pub const H7: Square = Square(15);
    pub const A6: Square = Square(16);
    pub const B6: Square = Square(17);
    pub const C6: Square = Square(18);
    pub const D6: Square = Square(19);
    pub const E6: Square = Square(20);
    pub const F6: Square = Square(21);
    pub const G6: Square = Square(22);
    pub const H6: Square = Square(23);
    pub const A5: Square = Square(24);
    pub const B5: Square = Square(25);
    pub const C5: Square = Square(26);
    pub const D5: Square = Square(27);
    pub const E5: Square = Square(28);
    pub const F5: Square = Square(29);
    pub const G5: Square = Square(30);
    pub const H5: Square = Square(31);
    pub const A4: Square = Square(32);
    pub const B4: Square = Square(33);
    pub const C4: Square = Square(34);
    pub const D4: Square = Square(35);
    pub const E4: Square = Square(36);
    pub const F4: Square = Square(37);
    pub const G4: Square = Square(38);
    pub const H4: Square = Square(39);
    pub const A3: Square = Square(40);
    pub const B3: Square = Square(41);
    pub const C3: Square = Square(42);
    pub const D3: Square = Square(43);
    pub const E3: Square = Square(44);
    pub const F3: Square = Square(45);
    pub const G3: Square = Square(46);
    pub const H3: Square = Square(47);
    pub const A2: Square = Square(48);
    pub const B2: Square = Square(49);
    pub const C2: Square = Square(50);
    pub const D2: Square = Square(51);
    pub const E2: Square = Square(52);
    pub const F2: Square = Square(53);
    pub const G2: Square = Square(54);
    pub const H2: Square = Square(55);
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);

    /// Creates a new square from a file and a rank.
    pub fn new(file: File, rank: Rank) -> Square {
        Square(rank.row() << 3 | u8::from(file))
    }

    /// Returns an iterator over the 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Square::COUNT as u8).map(Square)
    }

    /// Returns the rank of the square.
    pub fn rank(&self) -> Rank {
        Rank::ALL_RANKS[(self.0 >> 3) as usize]
    }

    /// Returns the file of the square.
    pub fn file(&self) -> File {
        File::ALL_FILES[(self.0 & 0b111) as usize]
    }

    /// Returns the index of the square, usable to index the 64 tiles of a board.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square `offset` indices away, or `None` if the result leaves the 0-63 range.
    ///
    /// Only the range is checked here. Offsets that would wrap around the left or right edge of the board are
    /// rejected by the move generators, which know the geometry of each piece.
    pub fn offset(&self, offset: i8) -> Option<Square> {
        let index = self.0 as i16 + offset as i16;
        (0..Square::COUNT as i16).contains(&index).then(|| Square(index as u8))
    }
}

impl Display for Square {
    /// Formats the square as a two-character string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl TryFrom<u8> for Square {
    type Error = CoordinatesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as usize) < Square::COUNT {
            Ok(Square(value))
        } else {
            Err(CoordinatesError::InvalidSquareIndex(value))
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = CoordinatesError;

    /// Parses a square from its name (e.g. "e4").
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Square::new(File::try_from(file)?, Rank::try_from(rank)?)),
            _ => Err(CoordinatesError::InvalidSquareName(value.to_string())),
        }
    }
}
