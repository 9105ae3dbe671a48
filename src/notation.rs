use thiserror::Error;

use crate::{
    coordinates::{CoordinatesError, Square},
    piece::{PieceError, PieceType},
    r#move::Move,
};

/// Represents errors that can occur when parsing chess move notation.
#[derive(Error, Debug, PartialEq)]
pub enum NotationError {
    /// Error when the source square coordinates in the notation are invalid.
    #[error("Invalid from square: {0}")]
    InvalidFromSquare(CoordinatesError),

    /// Error when the destination square coordinates in the notation are invalid.
    #[error("Invalid to square: {0}")]
    InvalidToSquare(CoordinatesError),

    /// Error when the promotion piece notation is invalid.
    #[error("Invalid promotion piece: {0}")]
    InvalidPromotionPiece(PieceError),

    /// Error when the notation asks for a promotion to another piece than a queen.
    #[error("Pawns can only be promoted to a queen, not a {0}")]
    UnsupportedPromotion(PieceType),

    /// Error when the overall notation format is incorrect.
    #[error("Invalid notation: \"{0}\"")]
    InvalidNotation(String),
}

/// Renders a move as the short token used by move logs (`e4`, `Nf3`, `exd5`, `O-O`).
pub fn render_token(mv: &Move) -> String {
    mv.to_string()
}

/// Parses a move in coordinate notation into its source and destination squares.
///
/// Coordinate notation represents moves as the source square followed by the destination square (e.g. "e2e4"). A
/// trailing promotion letter is accepted for compatibility with other tools, but only `q`: pawns always become queens.
///
/// # Parameters
/// * `notation` - The move in coordinate notation (e.g., "e2e4", "e7e8q")
///
/// # Returns
/// * `Ok((from, to))` - The squares of the move
///
/// # Errors
/// * `InvalidFromSquare` - If the source square notation is invalid
/// * `InvalidToSquare` - If the destination square notation is invalid
/// * `InvalidPromotionPiece` - If the promotion letter is not a piece
/// * `UnsupportedPromotion` - If the promotion letter is not a queen
/// * `InvalidNotation` - If the notation format is incorrect
pub fn parse_coordinate_notation(notation: &str) -> Result<(Square, Square), NotationError> {
    if !notation.is_ascii() || !(4..=5).contains(&notation.len()) {
        return Err(NotationError::InvalidNotation(notation.to_string()));
    }

    let from = Square::try_from(&notation[0..2]).map_err(NotationError::InvalidFromSquare)?;
    let to = Square::try_from(&notation[2..4]).map_err(NotationError::InvalidToSquare)?;

    if let Some(promotion) = notation[4..].chars().next() {
        match PieceType::try_from(promotion).map_err(NotationError::InvalidPromotionPiece)? {
            PieceType::Queen => {}
            other => return Err(NotationError::UnsupportedPromotion(other)),
        }
    }

    Ok((from, to))
}
