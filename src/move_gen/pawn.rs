use std::collections::HashSet;

use crate::{
    coordinates::Square,
    piece::{Color, Piece, PieceType},
    position::Board,
    r#move::Move,
};

use super::crosses_edge;

const PAWN_PUSH: i8 = 8;
const PAWN_JUMP: i8 = 16;
const PAWN_CAPTURES: [i8; 2] = [7, 9];

/// Generates the pushes, jumps, captures, en passant captures and promotions of a pawn.
pub(crate) fn generate_pawn_moves(pawn: &Piece, board: &Board) -> HashSet<Move> {
    let mut moves = HashSet::new();
    let color = pawn.color();
    let direction = color.direction();

    if let Some(to_square) = pawn.square().offset(PAWN_PUSH * direction) {
        if !board[to_square].occupied() {
            if to_square.rank() == color.promotion_rank() {
                moves.insert(Move::new_promotion(*pawn, to_square, None));
            } else {
                moves.insert(Move::new_pawn_push(*pawn, to_square));
            }

            if pawn.first_move() && pawn.square().rank() == color.pawn_rank() {
                if let Some(jump_square) = pawn.square().offset(PAWN_JUMP * direction) {
                    if !board[jump_square].occupied() {
                        moves.insert(Move::new_pawn_jump(*pawn, jump_square));
                    }
                }
            }
        }
    }

    for capture in PAWN_CAPTURES {
        let offset = capture * direction;
        if crosses_edge(pawn.square().file(), offset) {
            continue;
        }
        let Some(to_square) = pawn.square().offset(offset) else {
            continue;
        };

        match board[to_square].piece() {
            Some(target) if target.color() != color => {
                if to_square.rank() == color.promotion_rank() {
                    moves.insert(Move::new_promotion(*pawn, to_square, Some(target)));
                } else {
                    moves.insert(Move::new_pawn_capture(*pawn, to_square, target));
                }
            }
            Some(_) => {}
            None => {
                if let Some(en_passant) = en_passant_target(pawn, board, capture) {
                    moves.insert(Move::new_en_passant(*pawn, to_square, en_passant));
                }
            }
        }
    }

    moves
}

/// Returns the en passant pawn when it stands right beside `pawn`, on the side the diagonal `capture` goes toward.
///
/// Seen from the board indices, that neighbour is one index against the pawn's direction for a capture of 7 and one
/// index along it for a capture of 9.
fn en_passant_target(pawn: &Piece, board: &Board, capture: i8) -> Option<Piece> {
    let en_passant = board.en_passant_pawn()?;
    let beside = if capture == 7 { -pawn.color().direction() } else { pawn.color().direction() };

    (en_passant.color() != pawn.color()
        && en_passant.piece_type() == PieceType::Pawn
        && Some(en_passant.square()) == pawn.square().offset(beside)
        && en_passant.square().rank() == pawn.square().rank())
    .then_some(en_passant)
}

/// Returns true if a pawn of color `attacker` stands diagonally behind `square`, from the attacker's point of view.
pub(crate) fn is_covered_by_pawn(board: &Board, square: Square, attacker: Color) -> bool {
    PAWN_CAPTURES.iter().any(|capture| {
        let offset = capture * attacker.direction();
        square
            .offset(-offset)
            .and_then(|from| board[from].piece())
            .is_some_and(|piece| {
                piece.piece_type() == PieceType::Pawn
                    && piece.color() == attacker
                    && !crosses_edge(piece.square().file(), offset)
            })
    })
}
