use std::collections::HashSet;

use crate::{
    coordinates::Square,
    piece::{Color, Piece, PieceType},
    position::Board,
    r#move::{CastlingRight, CastlingSide, Move},
};

use super::is_square_attacked;

/// The squares involved in one castle of one color.
struct CastlingPath {
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    rook_to: Square,
    /// Squares strictly between the king and the rook.
    between: &'static [Square],
    /// Squares the king crosses and lands on.
    transit: &'static [Square],
}

const CASTLING_PATHS: [[CastlingPath; CastlingSide::COUNT]; Color::COUNT] = [
    [
        CastlingPath {
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
            between: &[Square::F1, Square::G1],
            transit: &[Square::F1, Square::G1],
        },
        CastlingPath {
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
            between: &[Square::B1, Square::C1, Square::D1],
            transit: &[Square::C1, Square::D1],
        },
    ],
    [
        CastlingPath {
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
            between: &[Square::F8, Square::G8],
            transit: &[Square::F8, Square::G8],
        },
        CastlingPath {
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
            between: &[Square::B8, Square::C8, Square::D8],
            transit: &[Square::C8, Square::D8],
        },
    ],
];

/// Generates the castles available to `king`.
///
/// A castle is generated when the king has never moved and stands on its home square, is not in check, the corner
/// holds a rook of the same color that has never moved, the squares between them are empty and no square the king
/// crosses or lands on is attacked by the opponent. Castles that fail any condition are silently left out.
///
/// # Parameters
/// * `board` - The board of the position
/// * `king` - The king of the side to generate castles for
/// * `in_check` - Whether that king is currently in check
/// * `opponent_moves` - The pseudo-legal moves of the opponent, used to find attacked squares
pub(crate) fn generate_castling_moves(
    board: &Board,
    king: &Piece,
    in_check: bool,
    opponent_moves: &HashSet<Move>,
) -> Vec<Move> {
    if in_check {
        return Vec::new();
    }

    let color = king.color();
    let rights = king.castling_rights();
    CastlingSide::ALL_SIDES
        .into_iter()
        .filter(|side| rights.contains(CastlingRight::from(*side)))
        .filter_map(|side| {
            let path = &CASTLING_PATHS[usize::from(color)][side as usize];
            if king.square() != path.king_from {
                return None;
            }

            let rook = board[path.rook_from].piece().filter(|rook| {
                rook.piece_type() == PieceType::Rook && rook.color() == color && rook.first_move()
            })?;

            let clear = path.between.iter().all(|square| !board[*square].occupied());
            let safe = path
                .transit
                .iter()
                .all(|square| !is_square_attacked(board, *square, color.opposite(), opponent_moves));

            (clear && safe).then(|| Move::new_castling(side, *king, path.king_to, rook, path.rook_to))
        })
        .collect()
}
