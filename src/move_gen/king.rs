use std::collections::HashSet;

use crate::{piece::Piece, position::Board, r#move::Move};

use super::generate_step_moves;

const KING_OFFSETS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

/// Generates the single-step moves of a king. Castles are generated with the players of a position.
pub(crate) fn generate_king_moves(king: &Piece, board: &Board) -> HashSet<Move> {
    generate_step_moves(king, board, &KING_OFFSETS)
}
