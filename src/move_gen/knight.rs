use std::collections::HashSet;

use crate::{piece::Piece, position::Board, r#move::Move};

use super::generate_step_moves;

const KNIGHT_OFFSETS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

pub(crate) fn generate_knight_moves(knight: &Piece, board: &Board) -> HashSet<Move> {
    generate_step_moves(knight, board, &KNIGHT_OFFSETS)
}
