use std::collections::HashSet;

pub mod config;
pub mod coordinates;
pub mod r#move;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod player;
pub mod position;
pub mod tile;

pub use notation::render_token;

use coordinates::Square;
use player::MoveTransition;
use position::Position;
use r#move::{Move, MoveError};

/// Returns the moves of the side to move: its pseudo-legal moves and the castles available to it.
///
/// Moves that would leave the king in check are part of the set. They are rejected when attempted.
pub fn current_legal_moves(position: &Position) -> &HashSet<Move> {
    position.current_player().legal_moves()
}

/// Attempts to move the piece standing on `from` to `to` for the side to move.
///
/// When no move of either side goes from `from` to `to`, the null move is attempted, which is rejected as illegal.
///
/// # Errors
/// * `MoveError` - If executing the move fails, which only happens on corrupt positions
pub fn attempt_move(position: &Position, from: Square, to: Square) -> Result<MoveTransition<'_>, MoveError> {
    let mv = position.find_move(from, to);
    position.current_player().make_move(&mv)
}
