use std::collections::HashSet;

use crate::{
    coordinates::{File, Square},
    piece::{Color, Piece},
    position::Board,
    r#move::Move,
};

pub(crate) mod castling;
pub(crate) mod king;
pub(crate) mod knight;
pub(crate) mod pawn;
pub(crate) mod sliding;

/// Generates the pseudo-legal moves of a set of pieces on the given board.
///
/// Castling moves are not included: they depend on the opponent's moves and are added when the players of a position
/// are computed.
pub fn generate_all_moves(board: &Board, pieces: &[Piece]) -> HashSet<Move> {
    pieces.iter().flat_map(|piece| piece.generate_moves(board)).collect()
}

/// Returns true if moving `offset` indices from a square on `file` would wrap around the left or right edge.
///
/// The horizontal component of an offset is its remainder modulo 8, read as a shift of at most two files: a remainder
/// of 7 or 6 moves one or two files to the left, 1 or 2 one or two files to the right. Vertical offsets never wrap.
pub(crate) fn crosses_edge(file: File, offset: i8) -> bool {
    let shift: i8 = match offset.rem_euclid(8) {
        1 => 1,
        2 => 2,
        6 => -2,
        7 => -1,
        _ => 0,
    };
    !(0..8).contains(&(u8::from(file) as i8 + shift))
}

/// Returns the move of `piece` onto `to_square`: a quiet move when the square is empty, a capture when an enemy stands
/// there, nothing when the square holds a piece of the same color.
pub(crate) fn move_to(piece: &Piece, board: &Board, to_square: Square) -> Option<Move> {
    match board[to_square].piece() {
        None => Some(Move::new(*piece, to_square)),
        Some(target) if target.color() != piece.color() => Some(Move::new_capture(*piece, to_square, target)),
        Some(_) => None,
    }
}

/// Generates the moves of a piece that reaches its destinations in a single step (knight or king).
pub(crate) fn generate_step_moves(piece: &Piece, board: &Board, offsets: &[i8]) -> HashSet<Move> {
    offsets
        .iter()
        .filter(|offset| !crosses_edge(piece.square().file(), **offset))
        .filter_map(|offset| piece.square().offset(*offset))
        .filter_map(|to_square| move_to(piece, board, to_square))
        .collect()
}

/// Returns true if a piece of color `attacker` could capture an enemy standing on `square`.
///
/// `attacker_moves` are the pseudo-legal moves of the attacking side. Only moves that could capture on their
/// destination count. Pawns are checked on the board directly: a pawn covers the squares diagonally in front of it
/// even when they are empty and no pawn capture is generated toward them.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color, attacker_moves: &HashSet<Move>) -> bool {
    attacker_moves.iter().any(|mv| mv.to_square() == Some(square) && mv.threatens_destination())
        || pawn::is_covered_by_pawn(board, square, attacker)
}
