use std::fmt::Display;

use bitflags::bitflags;
use thiserror::Error;
use tracing::debug;

use crate::{
    coordinates::Square,
    piece::{Piece, PieceType},
    position::{Position, PositionBuilder, PositionError},
};

/// Errors raised when a move cannot be applied to, or taken back from, a position.
#[derive(Error, Debug, PartialEq)]
pub enum MoveError {
    #[error("The null move cannot be executed or undone")]
    NullMove,

    #[error("The move produced an invalid position: {0}")]
    InvalidPosition(#[from] PositionError),
}

/// The two sides a king can castle toward.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastlingSide {
    pub const COUNT: usize = 2;

    pub const ALL_SIDES: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];
}

impl From<CastlingSide> for CastlingRight {
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::Kingside => CastlingRight::KINGSIDE,
            CastlingSide::Queenside => CastlingRight::QUEENSIDE,
        }
    }
}

bitflags! {
    /// The castling rights a king still carries.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CastlingRight: u8 {
        const KINGSIDE = 0b01;
        const QUEENSIDE = 0b10;
    }
}

/// A move of a piece, classified by the rule it follows.
///
/// Every variant except `Null` records the moving piece exactly as it stood before the move, so the move knows its
/// origin square and whether the piece had already moved. Moves are values: two moves with the same variant and
/// payload are equal, whatever generated them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// A quiet move of a non-pawn piece to an empty square.
    Basic { piece: Piece, to_square: Square },

    /// A non-pawn piece captures the piece on its destination.
    Capture { piece: Piece, to_square: Square, captured: Piece },

    /// A pawn advances one square.
    PawnPush { piece: Piece, to_square: Square },

    /// A pawn advances two squares from its home rank. The pawn can be taken en passant on the next move.
    PawnJump { piece: Piece, to_square: Square },

    /// A pawn captures diagonally.
    PawnCapture { piece: Piece, to_square: Square, captured: Piece },

    /// A pawn captures the pawn that just jumped beside it, landing on the square that pawn crossed.
    EnPassant { piece: Piece, to_square: Square, captured: Piece },

    /// A pawn push or pawn capture reaching the last rank. The pawn always becomes a queen.
    Promotion { piece: Piece, to_square: Square, captured: Option<Piece> },

    /// The king moves two squares toward one of its rooks and the rook jumps over it.
    Castling { side: CastlingSide, king: Piece, to_square: Square, rook: Piece, rook_to_square: Square },

    /// The absence of a move.
    Null,
}

impl Move {
    /// Creates a quiet move.
    pub fn new(piece: Piece, to_square: Square) -> Self {
        Move::Basic { piece, to_square }
    }

    /// Creates a capture by a non-pawn piece.
    pub fn new_capture(piece: Piece, to_square: Square, captured: Piece) -> Self {
        Move::Capture { piece, to_square, captured }
    }

    /// Creates a single pawn push.
    pub fn new_pawn_push(piece: Piece, to_square: Square) -> Self {
        Move::PawnPush { piece, to_square }
    }

    /// Creates a two-square pawn push.
    pub fn new_pawn_jump(piece: Piece, to_square: Square) -> Self {
        Move::PawnJump { piece, to_square }
    }

    /// Creates a diagonal pawn capture.
    pub fn new_pawn_capture(piece: Piece, to_square: Square, captured: Piece) -> Self {
        Move::PawnCapture { piece, to_square, captured }
    }

    /// Creates an en passant capture of `captured`.
    pub fn new_en_passant(piece: Piece, to_square: Square, captured: Piece) -> Self {
        Move::EnPassant { piece, to_square, captured }
    }

    /// Creates a promotion. With a captured piece it wraps a pawn capture, without one it wraps a pawn push.
    pub fn new_promotion(piece: Piece, to_square: Square, captured: Option<Piece>) -> Self {
        Move::Promotion { piece, to_square, captured }
    }

    /// Creates a castling move.
    pub fn new_castling(
        side: CastlingSide,
        king: Piece,
        to_square: Square,
        rook: Piece,
        rook_to_square: Square,
    ) -> Self {
        Move::Castling { side, king, to_square, rook, rook_to_square }
    }

    /// Returns the moving piece, as it stood before the move.
    pub fn piece(&self) -> Option<Piece> {
        match *self {
            Move::Basic { piece, .. }
            | Move::Capture { piece, .. }
            | Move::PawnPush { piece, .. }
            | Move::PawnJump { piece, .. }
            | Move::PawnCapture { piece, .. }
            | Move::EnPassant { piece, .. }
            | Move::Promotion { piece, .. } => Some(piece),
            Move::Castling { king, .. } => Some(king),
            Move::Null => None,
        }
    }

    /// Returns the square the moving piece leaves.
    pub fn from_square(&self) -> Option<Square> {
        self.piece().map(|piece| piece.square())
    }

    /// Returns the square the moving piece lands on. For a castle it is the destination of the king.
    pub fn to_square(&self) -> Option<Square> {
        match *self {
            Move::Basic { to_square, .. }
            | Move::Capture { to_square, .. }
            | Move::PawnPush { to_square, .. }
            | Move::PawnJump { to_square, .. }
            | Move::PawnCapture { to_square, .. }
            | Move::EnPassant { to_square, .. }
            | Move::Promotion { to_square, .. }
            | Move::Castling { to_square, .. } => Some(to_square),
            Move::Null => None,
        }
    }

    /// Returns the piece removed from the board by the move.
    pub fn captured_piece(&self) -> Option<Piece> {
        match *self {
            Move::Capture { captured, .. } | Move::PawnCapture { captured, .. } | Move::EnPassant { captured, .. } => {
                Some(captured)
            }
            Move::Promotion { captured, .. } => captured,
            _ => None,
        }
    }

    /// Returns true if the move removes an opponent piece.
    pub fn is_capture(&self) -> bool {
        self.captured_piece().is_some()
    }

    /// Returns true for castling moves.
    pub fn is_castling(&self) -> bool {
        matches!(self, Move::Castling { .. })
    }

    /// Returns true for the null move.
    pub fn is_null(&self) -> bool {
        matches!(self, Move::Null)
    }

    /// Returns true if the moving piece could capture an enemy standing on the destination.
    ///
    /// Forward pawn moves and castles never capture, so they do not threaten the square they reach.
    pub fn threatens_destination(&self) -> bool {
        match self {
            Move::Basic { .. } | Move::Capture { .. } | Move::PawnCapture { .. } | Move::EnPassant { .. } => true,
            Move::Promotion { captured, .. } => captured.is_some(),
            Move::PawnPush { .. } | Move::PawnJump { .. } | Move::Castling { .. } | Move::Null => false,
        }
    }

    /// Returns the pawn move a promotion is built on: a pawn capture when it takes a piece, a pawn push otherwise.
    pub fn wrapped(&self) -> Option<Move> {
        match *self {
            Move::Promotion { piece, to_square, captured: Some(captured) } => {
                Some(Move::new_pawn_capture(piece, to_square, captured))
            }
            Move::Promotion { piece, to_square, captured: None } => Some(Move::new_pawn_push(piece, to_square)),
            _ => None,
        }
    }

    /// Applies the move to the position it was generated from and returns the resulting position.
    ///
    /// The new position holds every piece of the mover except the moving one, every opponent piece except the captured
    /// one, and the moving piece relocated on its destination. It is the opponent's turn and the move is recorded as
    /// the transition move. A pawn jump leaves the jumping pawn as the en passant pawn of the new position.
    ///
    /// # Parameters
    /// * `position` - The position the move was generated from
    ///
    /// # Returns
    /// * `Ok(Position)` - The position after the move
    ///
    /// # Errors
    /// * `MoveError::NullMove` - If the move is the null move
    /// * `MoveError::InvalidPosition` - If the resulting piece set does not hold exactly one king per side
    pub fn execute(&self, position: &Position) -> Result<Position, MoveError> {
        match *self {
            Move::Null => Err(MoveError::NullMove),
            Move::Promotion { piece, to_square, .. } => {
                let wrapped = self.wrapped().ok_or(MoveError::NullMove)?;
                let pawn_moved = wrapped.execute(position)?;
                let queen = Piece::new(piece.color(), PieceType::Queen, to_square).moved();
                debug!("Promoting {} to a queen on {}", piece, to_square);

                let mut builder = PositionBuilder::new();
                for other in pawn_moved.all_pieces().filter(|other| other.square() != to_square) {
                    builder.set_piece(*other);
                }
                Ok(builder.set_piece(queen).turn(pawn_moved.side_to_move()).transition_move(*self).build()?)
            }
            Move::Castling { king, rook, rook_to_square, .. } => {
                debug!("{} castles {}", king, self);

                let mut builder = PositionBuilder::new();
                for other in position.all_pieces().filter(|other| **other != king && **other != rook) {
                    builder.set_piece(*other);
                }
                Ok(builder
                    .set_piece(king.relocate(self))
                    .set_piece(rook.moved_to(rook_to_square))
                    .turn(king.color().opposite())
                    .transition_move(*self)
                    .build()?)
            }
            _ => {
                let piece = self.piece().ok_or(MoveError::NullMove)?;
                let captured = self.captured_piece();

                let mut builder = PositionBuilder::new();
                for other in position.all_pieces().filter(|other| **other != piece && Some(**other) != captured) {
                    builder.set_piece(*other);
                }

                let relocated = piece.relocate(self);
                if let Move::PawnJump { .. } = self {
                    builder.en_passant_pawn(Some(relocated));
                }
                Ok(builder.set_piece(relocated).turn(piece.color().opposite()).transition_move(*self).build()?)
            }
        }
    }

    /// Takes the move back from the position it produced and returns the position it was made from.
    ///
    /// The moving piece returns to its origin with its original flags, a captured piece reappears where it stood, a
    /// castling rook goes back to its corner and a promoted queen turns back into the pawn. It is the mover's turn
    /// again. Only an en passant capture restores the en passant pawn: other moves cannot know whether the previous
    /// position had one.
    ///
    /// # Parameters
    /// * `position` - The position produced by executing this move
    ///
    /// # Errors
    /// * `MoveError::NullMove` - If the move is the null move
    /// * `MoveError::InvalidPosition` - If the reconstructed piece set is not a valid position
    pub fn undo(&self, position: &Position) -> Result<Position, MoveError> {
        let piece = self.piece().ok_or(MoveError::NullMove)?;
        let to_square = self.to_square().ok_or(MoveError::NullMove)?;

        let vacated = match *self {
            Move::Castling { rook_to_square, .. } => [Some(to_square), Some(rook_to_square)],
            _ => [Some(to_square), None],
        };

        let mut builder = PositionBuilder::new();
        for other in position.all_pieces().filter(|other| !vacated.contains(&Some(other.square()))) {
            builder.set_piece(*other);
        }

        builder.set_piece(piece);
        if let Move::Castling { rook, .. } = *self {
            builder.set_piece(rook);
        }
        if let Some(captured) = self.captured_piece() {
            builder.set_piece(captured);
        }
        if let Move::EnPassant { captured, .. } = *self {
            builder.en_passant_pawn(Some(captured));
        }

        Ok(builder.turn(piece.color()).build()?)
    }
}

impl Display for Move {
    /// Formats the move as the short token used by move logs.
    ///
    /// Piece moves print the piece letter and the destination (`Nf3`), pawn pushes only the destination (`e4`) and
    /// pawn captures the origin file, an `x` and the destination (`exd5`). Castles print `O-O` and `O-O-O`,
    /// promotions print the origin and destination squares (`e7-e8`) and the null move prints `--`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Basic { piece, to_square } | Move::Capture { piece, to_square, .. } => {
                write!(f, "{}{}", char::from(piece.piece_type()), to_square)
            }
            Move::PawnPush { to_square, .. } | Move::PawnJump { to_square, .. } => write!(f, "{}", to_square),
            Move::PawnCapture { piece, to_square, .. } | Move::EnPassant { piece, to_square, .. } => {
                write!(f, "{}x{}", piece.square().file(), to_square)
            }
            Move::Promotion { piece, to_square, .. } => write!(f, "{}-{}", piece.square(), to_square),
            Move::Castling { side: CastlingSide::Kingside, .. } => write!(f, "O-O"),
            Move::Castling { side: CastlingSide::Queenside, .. } => write!(f, "O-O-O"),
            Move::Null => write!(f, "--"),
        }
    }
}
