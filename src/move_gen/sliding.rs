use std::collections::HashSet;

use crate::{piece::Piece, position::Board, r#move::Move};

use super::{crosses_edge, move_to};

const BISHOP_OFFSETS: [i8; 4] = [-9, -7, 7, 9];
const ROOK_OFFSETS: [i8; 4] = [-8, -1, 1, 8];
const QUEEN_OFFSETS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

pub(crate) fn generate_bishop_moves(bishop: &Piece, board: &Board) -> HashSet<Move> {
    generate_sliding_moves(bishop, board, &BISHOP_OFFSETS)
}

pub(crate) fn generate_rook_moves(rook: &Piece, board: &Board) -> HashSet<Move> {
    generate_sliding_moves(rook, board, &ROOK_OFFSETS)
}

pub(crate) fn generate_queen_moves(queen: &Piece, board: &Board) -> HashSet<Move> {
    generate_sliding_moves(queen, board, &QUEEN_OFFSETS)
}

/// Follows each ray from the piece until it leaves the board, would wrap around an edge, or meets a piece.
///
/// The edge check uses the file of the square the ray currently stands on, so a ray stops on the edge it reaches
/// instead of reappearing on the other side.
fn generate_sliding_moves(piece: &Piece, board: &Board, offsets: &[i8]) -> HashSet<Move> {
    let mut moves = HashSet::new();

    for offset in offsets {
        let mut current = piece.square();
        while !crosses_edge(current.file(), *offset) {
            let Some(next) = current.offset(*offset) else {
                break;
            };

            if let Some(mv) = move_to(piece, board, next) {
                moves.insert(mv);
            }
            if board[next].occupied() {
                break;
            }
            current = next;
        }
    }

    moves
}
