use std::{collections::HashSet, fmt::Display};

use tracing::{debug, trace};

use crate::{
    move_gen::{castling::generate_castling_moves, is_square_attacked},
    piece::{Color, Piece, PieceType},
    position::{Board, Position, PositionError},
    r#move::{CastlingRight, Move, MoveError},
};

//======================================================================================================================
// Move status and transition
//======================================================================================================================

/// The outcome of an attempted move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveStatus {
    /// The move was applied.
    Done,

    /// The move is not one of the player's moves.
    IllegalMove,

    /// The move would leave the player's own king attacked.
    LeavePlayerInCheck,
}

impl MoveStatus {
    /// Returns true if the move was applied.
    pub fn is_done(&self) -> bool {
        matches!(self, MoveStatus::Done)
    }
}

impl Display for MoveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveStatus::Done => write!(f, "done"),
            MoveStatus::IllegalMove => write!(f, "illegal move"),
            MoveStatus::LeavePlayerInCheck => write!(f, "leaves the player in check"),
        }
    }
}

/// The result of an attempted move: its status and the position the game continues from.
///
/// A rejected move leaves the game on the original position, which the transition borrows. Only an applied move owns a
/// new position.
#[derive(Debug)]
pub struct MoveTransition<'a> {
    from_position: &'a Position,
    to_position: Option<Position>,
    mv: Move,
    status: MoveStatus,
}

impl<'a> MoveTransition<'a> {
    fn done(from_position: &'a Position, to_position: Position, mv: Move) -> Self {
        Self { from_position, to_position: Some(to_position), mv, status: MoveStatus::Done }
    }

    fn rejected(from_position: &'a Position, mv: Move, status: MoveStatus) -> Self {
        Self { from_position, to_position: None, mv, status }
    }

    /// Returns the status of the attempted move.
    pub fn status(&self) -> MoveStatus {
        self.status
    }

    /// Returns the attempted move.
    pub fn transition_move(&self) -> Move {
        self.mv
    }

    /// Returns the position the move was attempted on.
    pub fn from_position(&self) -> &'a Position {
        self.from_position
    }

    /// Returns the position the game continues from: the new position when the move is done, the original otherwise.
    pub fn position(&self) -> &Position {
        self.to_position.as_ref().unwrap_or(self.from_position)
    }

    /// Consumes the transition and returns the position the game continues from.
    pub fn into_position(self) -> Position {
        self.to_position.unwrap_or_else(|| self.from_position.clone())
    }
}

//======================================================================================================================
// Player state
//======================================================================================================================

/// The state of one side, computed once when a position is built.
#[derive(Clone, Debug)]
pub(crate) struct PlayerState {
    color: Color,
    king: Piece,
    legal_moves: HashSet<Move>,
    in_check: bool,
}

impl PlayerState {
    /// Computes the state of the side `color`.
    ///
    /// # Parameters
    /// * `board` - The board of the position being built
    /// * `pieces` - The active pieces of the side
    /// * `moves` - The pseudo-legal moves of the side
    /// * `opponent_moves` - The pseudo-legal moves of the other side
    ///
    /// # Errors
    /// * `PositionError::MissingKing` - If the side has no king
    /// * `PositionError::MultipleKings` - If the side has more than one king
    pub(crate) fn new(
        color: Color,
        board: &Board,
        pieces: &[Piece],
        moves: &HashSet<Move>,
        opponent_moves: &HashSet<Move>,
    ) -> Result<Self, PositionError> {
        let mut kings = pieces.iter().filter(|piece| piece.piece_type() == PieceType::King);
        let king = *kings.next().ok_or(PositionError::MissingKing(color))?;
        if kings.next().is_some() {
            return Err(PositionError::MultipleKings(color));
        }

        let in_check = is_square_attacked(board, king.square(), color.opposite(), opponent_moves);
        let castles = generate_castling_moves(board, &king, in_check, opponent_moves);
        let legal_moves = moves.iter().copied().chain(castles).collect();

        Ok(Self { color, king, legal_moves, in_check })
    }

    pub(crate) fn legal_moves(&self) -> &HashSet<Move> {
        &self.legal_moves
    }
}

//======================================================================================================================
// Player
//======================================================================================================================

/// One side of a position.
///
/// A `Player` borrows the position it belongs to. Its moves are pseudo-legal: a move that would leave the king
/// attacked is only rejected when it is attempted through `make_move`.
#[derive(Copy, Clone, Debug)]
pub struct Player<'a> {
    position: &'a Position,
    state: &'a PlayerState,
}

impl<'a> Player<'a> {
    pub(crate) fn new(position: &'a Position, state: &'a PlayerState) -> Self {
        Self { position, state }
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    pub fn king(&self) -> Piece {
        self.state.king
    }

    /// Returns the pseudo-legal moves of the player, castles included.
    pub fn legal_moves(&self) -> &'a HashSet<Move> {
        &self.state.legal_moves
    }

    pub fn active_pieces(&self) -> &'a [Piece] {
        self.position.pieces(self.state.color)
    }

    /// Returns true if the king of the player is attacked.
    pub fn in_check(&self) -> bool {
        self.state.in_check
    }

    /// Returns the other side of the same position.
    pub fn opponent(&self) -> Player<'a> {
        self.position.player(self.state.color.opposite())
    }

    /// Returns true if the king of the player has castled.
    pub fn is_castled(&self) -> bool {
        self.state.king.is_castled()
    }

    /// Returns the castling rights the king of the player still carries.
    pub fn castling_rights(&self) -> CastlingRight {
        self.state.king.castling_rights()
    }

    /// Returns true if `mv` is one of the player's moves.
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.state.legal_moves.contains(mv)
    }

    /// Attempts a move.
    ///
    /// The move must be one of the player's moves. It is then executed, and rejected if the player's king is attacked
    /// in the resulting position.
    ///
    /// # Returns
    /// * A `MoveTransition` with status `Done` and the new position, or with a rejection status and the original
    ///   position
    ///
    /// # Errors
    /// * `MoveError` - If executing the move fails, which only happens on corrupt positions
    pub fn make_move(&self, mv: &Move) -> Result<MoveTransition<'a>, MoveError> {
        if !self.is_legal(mv) {
            trace!("{} move {} rejected: {}", self.color(), mv, MoveStatus::IllegalMove);
            return Ok(MoveTransition::rejected(self.position, *mv, MoveStatus::IllegalMove));
        }

        let next = mv.execute(self.position)?;
        if next.player(self.color()).in_check() {
            trace!("{} move {} rejected: {}", self.color(), mv, MoveStatus::LeavePlayerInCheck);
            return Ok(MoveTransition::rejected(self.position, *mv, MoveStatus::LeavePlayerInCheck));
        }

        trace!("{} move {} done", self.color(), mv);
        Ok(MoveTransition::done(self.position, next, *mv))
    }

    /// Returns true if the player is in check and no move gets the king out of it.
    ///
    /// # Errors
    /// * `MoveError` - If simulating one of the moves fails
    pub fn in_checkmate(&self) -> Result<bool, MoveError> {
        let checkmate = self.in_check() && !self.has_escape_moves()?;
        if checkmate {
            debug!("{} is checkmated", self.color());
        }
        Ok(checkmate)
    }

    /// Returns true if the player is not in check but has no move that can be done.
    ///
    /// # Errors
    /// * `MoveError` - If simulating one of the moves fails
    pub fn in_stalemate(&self) -> Result<bool, MoveError> {
        let stalemate = !self.in_check() && !self.has_escape_moves()?;
        if stalemate {
            debug!("{} is stalemated", self.color());
        }
        Ok(stalemate)
    }

    fn has_escape_moves(&self) -> Result<bool, MoveError> {
        for mv in self.state.legal_moves.iter() {
            if self.make_move(mv)?.status().is_done() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coordinates::Square,
        position::PositionBuilder,
        r#move::CastlingSide,
    };

    fn piece(color: Color, piece_type: PieceType, square: Square) -> Piece {
        Piece::new(color, piece_type, square)
    }

    fn play(position: Position, moves: &[(Square, Square)]) -> Position {
        moves.iter().fold(position, |position, (from, to)| {
            let mv = position.find_move(*from, *to);
            let transition = position.current_player().make_move(&mv).unwrap();
            assert_eq!(transition.status(), MoveStatus::Done, "{} should be done", mv);
            transition.into_position()
        })
    }

    #[test]
    fn test_standard_position_players() {
        let position = Position::standard();
        let white = position.current_player();

        assert_eq!(white.color(), Color::White);
        assert_eq!(white.king(), piece(Color::White, PieceType::King, Square::E1));
        assert_eq!(white.legal_moves().len(), 20);
        assert_eq!(white.active_pieces().len(), 16);
        assert!(!white.in_check());
        assert_eq!(white.opponent().color(), Color::Black);
        assert_eq!(white.opponent().opponent().color(), Color::White);
        assert_eq!(white.castling_rights(), CastlingRight::all());
        assert!(!white.is_castled());
        assert!(!white.in_checkmate().unwrap());
        assert!(!white.in_stalemate().unwrap());
    }

    #[test]
    fn test_illegal_move_keeps_the_position() {
        let position = Position::standard();
        let black_pawn = piece(Color::Black, PieceType::Pawn, Square::E7);
        let mv = Move::new_pawn_jump(black_pawn, Square::E5);

        let transition = position.current_player().make_move(&mv).unwrap();
        assert_eq!(transition.status(), MoveStatus::IllegalMove);
        assert!(std::ptr::eq(transition.position(), &position));
        assert_eq!(transition.transition_move(), mv);

        let transition = position.current_player().make_move(&Move::Null).unwrap();
        assert_eq!(transition.status(), MoveStatus::IllegalMove);
    }

    #[test]
    fn test_move_leaving_the_king_in_check() {
        let rook = piece(Color::White, PieceType::Rook, Square::E2);
        let position = PositionBuilder::new()
            .set_piece(piece(Color::White, PieceType::King, Square::E1))
            .set_piece(rook)
            .set_piece(piece(Color::Black, PieceType::Rook, Square::E8))
            .set_piece(piece(Color::Black, PieceType::King, Square::H8))
            .build()
            .unwrap();
        let player = position.current_player();

        let transition = player.make_move(&Move::new(rook, Square::D2)).unwrap();
        assert_eq!(transition.status(), MoveStatus::LeavePlayerInCheck);
        assert!(std::ptr::eq(transition.position(), &position));

        let transition = player.make_move(&Move::new(rook, Square::E5)).unwrap();
        assert_eq!(transition.status(), MoveStatus::Done);
        assert_eq!(transition.position().side_to_move(), Color::Black);
    }

    #[test]
    fn test_fools_mate() {
        let position = play(
            Position::standard(),
            &[(Square::F2, Square::F3), (Square::E7, Square::E5), (Square::G2, Square::G4), (Square::D8, Square::H4)],
        );
        let white = position.current_player();

        assert!(white.in_check());
        assert!(white.in_checkmate().unwrap());
        assert!(!white.in_stalemate().unwrap());
        assert!(!white.opponent().in_check());
    }

    #[test]
    fn test_stalemate() {
        let position = PositionBuilder::new()
            .set_piece(piece(Color::Black, PieceType::King, Square::H8))
            .set_piece(piece(Color::White, PieceType::Queen, Square::G6).moved())
            .set_piece(piece(Color::White, PieceType::King, Square::F7).moved())
            .turn(Color::Black)
            .build()
            .unwrap();
        let black = position.current_player();

        assert!(!black.in_check());
        assert!(black.in_stalemate().unwrap());
        assert!(!black.in_checkmate().unwrap());
    }

    #[test]
    fn test_castling_is_remembered() {
        let position = PositionBuilder::new()
            .set_piece(piece(Color::White, PieceType::King, Square::E1))
            .set_piece(piece(Color::White, PieceType::Rook, Square::H1))
            .set_piece(piece(Color::Black, PieceType::King, Square::E8))
            .build()
            .unwrap();
        let mv = position.find_move(Square::E1, Square::G1);
        assert!(matches!(mv, Move::Castling { side: CastlingSide::Kingside, .. }));

        let position = play(position, &[(Square::E1, Square::G1), (Square::E8, Square::D8), (Square::G1, Square::H1)]);
        let white = position.player(Color::White);
        assert!(white.is_castled());
        assert_eq!(white.king().square(), Square::H1);
        assert_eq!(white.castling_rights(), CastlingRight::empty());
    }

    #[test]
    fn test_en_passant_expires() {
        let position = play(
            Position::standard(),
            &[(Square::E2, Square::E4), (Square::A7, Square::A6), (Square::E4, Square::E5), (Square::D7, Square::D5)],
        );
        assert!(matches!(position.find_move(Square::E5, Square::D6), Move::EnPassant { .. }));

        let position = play(position, &[(Square::H2, Square::H3), (Square::A6, Square::A5)]);
        assert_eq!(position.find_move(Square::E5, Square::D6), Move::Null);
    }
}
