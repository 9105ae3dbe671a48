use std::collections::HashSet;
use std::convert::From;
use std::fmt::Display;
use std::ops::Not;

use thiserror::Error;

use crate::{
    coordinates::{Rank, Square},
    move_gen::{king, knight, pawn, sliding},
    position::Board,
    r#move::{CastlingRight, Move},
};

/// Represents the color of a chess piece.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;

    /// Represents all colors of chess pieces.
    pub const ALL_COLORS: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the sign of the index offsets of a forward pawn move.
    ///
    /// White pawns move toward the top of the board (decreasing indices), Black pawns toward the bottom.
    pub fn direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Returns the rank the pawns of this color start on.
    pub fn pawn_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// Returns the rank on which the pawns of this color promote.
    pub fn promotion_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }

    /// Returns the rank the king and rooks of this color start on.
    pub fn back_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl Display for Color {
    /// Formats the color as a string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl From<Color> for usize {
    fn from(color: Color) -> Self {
        color as usize
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Represents all piece types.
    pub const ALL_PIECE_TYPES: [PieceType; 6] =
        [PieceType::Pawn, PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen, PieceType::King];

    /// Returns the material value of the piece type, in centipawns.
    pub fn value(&self) -> u32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 300,
            PieceType::Bishop => 300,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 10000,
        }
    }
}

/// Represents an error that occurs when converting a character to a piece.
#[derive(Error, Debug, PartialEq)]
pub enum PieceError {
    #[error("Invalid piece character: '{0}'")]
    InvalidCharacter(char),
}

impl From<PieceType> for char {
    fn from(piece_type: PieceType) -> Self {
        match piece_type {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }
}

impl TryFrom<char> for PieceType {
    type Error = PieceError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'p' => Ok(PieceType::Pawn),
            'n' => Ok(PieceType::Knight),
            'b' => Ok(PieceType::Bishop),
            'r' => Ok(PieceType::Rook),
            'q' => Ok(PieceType::Queen),
            'k' => Ok(PieceType::King),
            _ => Err(PieceError::InvalidCharacter(value)),
        }
    }
}

impl Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "Pawn"),
            PieceType::Knight => write!(f, "Knight"),
            PieceType::Bishop => write!(f, "Bishop"),
            PieceType::Rook => write!(f, "Rook"),
            PieceType::Queen => write!(f, "Queen"),
            PieceType::King => write!(f, "King"),
        }
    }
}

/// Represents a chess piece standing on a square.
///
/// A `Piece` is an immutable value. Two pieces with the same type, color, square and flags are the same piece: moving
/// a piece produces a new `Piece` on the destination square, it never changes the original one.
///
/// `first_move` is true while the piece has never moved. `castled` is only ever set on kings, once they have castled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    piece_type: PieceType,
    square: Square,
    color: Color,
    first_move: bool,
    castled: bool,
}

impl Piece {
    /// Creates a new piece that has never moved.
    pub fn new(color: Color, piece_type: PieceType, square: Square) -> Self {
        Self { piece_type, square, color, first_move: true, castled: false }
    }

    /// Returns a copy of the piece flagged as having already moved.
    pub fn moved(self) -> Self {
        Self { first_move: false, ..self }
    }

    /// Returns the color of the piece.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the type of the piece.
    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    /// Returns the square the piece stands on.
    pub fn square(&self) -> Square {
        self.square
    }

    /// Returns true if the piece has never moved.
    pub fn first_move(&self) -> bool {
        self.first_move
    }

    /// Returns true if the piece is a king that has castled.
    pub fn is_castled(&self) -> bool {
        self.castled
    }

    /// Returns the castling rights a king still carries. Other pieces carry none.
    ///
    /// A king keeps both rights until it moves or castles. Whether a castle is actually possible also depends on the
    /// rooks and the surrounding squares, which only the position knows.
    pub fn castling_rights(&self) -> CastlingRight {
        if self.piece_type == PieceType::King && self.first_move && !self.castled {
            CastlingRight::all()
        } else {
            CastlingRight::empty()
        }
    }

    /// Generates the pseudo-legal moves of the piece on the given board.
    ///
    /// The result is a set: the same move can be proposed more than once by the generators and callers must not rely
    /// on any ordering. Castling moves are not included here, they depend on the whole position.
    pub fn generate_moves(&self, board: &Board) -> HashSet<Move> {
        match self.piece_type {
            PieceType::Pawn => pawn::generate_pawn_moves(self, board),
            PieceType::Knight => knight::generate_knight_moves(self, board),
            PieceType::Bishop => sliding::generate_bishop_moves(self, board),
            PieceType::Rook => sliding::generate_rook_moves(self, board),
            PieceType::Queen => sliding::generate_queen_moves(self, board),
            PieceType::King => king::generate_king_moves(self, board),
        }
    }

    /// Returns the image of the piece after it made the given move.
    ///
    /// The relocated piece has moved, so its first-move flag is cleared. A king remembers that it castled.
    pub fn relocate(&self, mv: &Move) -> Piece {
        let to_square = mv.to_square().unwrap_or(self.square);
        Piece { square: to_square, first_move: false, castled: self.castled || mv.is_castling(), ..*self }
    }

    /// Returns the piece moved to another square without any other change than its first-move flag.
    pub(crate) fn moved_to(&self, square: Square) -> Piece {
        Piece { square, first_move: false, ..*self }
    }
}

impl From<Piece> for char {
    /// Converts a `Piece` to a single character, uppercase for White and lowercase for Black.
    fn from(piece: Piece) -> Self {
        match piece.color() {
            Color::White => char::from(piece.piece_type()).to_ascii_uppercase(),
            Color::Black => char::from(piece.piece_type()).to_ascii_lowercase(),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} on {}", self.color, self.piece_type, self.square)
    }
}
