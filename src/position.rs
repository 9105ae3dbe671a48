use std::{fmt::Display, ops::Index};

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::{
    coordinates::{File, Rank, Square},
    move_gen::generate_all_moves,
    piece::{Color, Piece, PieceType},
    player::{Player, PlayerState},
    r#move::Move,
    tile::Tile,
};

/// Errors raised when a set of pieces does not describe a playable position.
#[derive(Error, Debug, PartialEq)]
pub enum PositionError {
    #[error("The {0} side has no king")]
    MissingKing(Color),

    #[error("The {0} side has more than one king")]
    MultipleKings(Color),
}

//======================================================================================================================
// Board
//======================================================================================================================

/// The 64 tiles of a position and the pawn that can be taken en passant.
///
/// This is everything the move generators need to know about a position.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: [Tile; Square::COUNT],
    en_passant_pawn: Option<Piece>,
}

impl Board {
    /// Returns the pawn that jumped on the last move, if any.
    pub fn en_passant_pawn(&self) -> Option<Piece> {
        self.en_passant_pawn
    }
}

impl Index<Square> for Board {
    type Output = Tile;

    fn index(&self, square: Square) -> &Self::Output {
        &self.tiles[square.index()]
    }
}

//======================================================================================================================
// Position implementation
//======================================================================================================================

/// A snapshot of a game: the board, the active pieces of both sides, the side to move and the move that led here.
///
/// Positions are immutable. They are created by a `PositionBuilder` or by executing a move on another position, and
/// the players of both sides (their king, pseudo-legal moves, castles and check status) are computed once, when the
/// position is built.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    pieces: [Vec<Piece>; Color::COUNT],
    side_to_move: Color,
    transition_move: Move,
    players: [PlayerState; Color::COUNT],
}

static STANDARD_POSITION: Lazy<Position> = Lazy::new(|| {
    const BACK_RANK: [PieceType; 8] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];

    let mut builder = PositionBuilder::new();
    for (file, piece_type) in File::ALL_FILES.into_iter().zip(BACK_RANK) {
        for color in Color::ALL_COLORS {
            builder
                .set_piece(Piece::new(color, piece_type, Square::new(file, color.back_rank())))
                .set_piece(Piece::new(color, PieceType::Pawn, Square::new(file, color.pawn_rank())));
        }
    }

    builder.build().expect("This can not fail because the standard position holds exactly one king per side.")
});

impl Position {
    /// Returns the standard initial position, White to move.
    pub fn standard() -> Position {
        STANDARD_POSITION.clone()
    }

    /// Returns the board of the position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the tile of a square.
    pub fn tile(&self, square: Square) -> Tile {
        self.board[square]
    }

    /// Returns the active pieces of one side.
    pub fn pieces(&self, color: Color) -> &[Piece] {
        &self.pieces[usize::from(color)]
    }

    /// Returns the active pieces of both sides, White first.
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flatten()
    }

    /// Returns the color of the side to move.
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the pawn that can be taken en passant on this move, if any.
    pub fn en_passant_pawn(&self) -> Option<Piece> {
        self.board.en_passant_pawn()
    }

    /// Returns the move that produced the position, `Move::Null` for built positions.
    pub fn transition_move(&self) -> Move {
        self.transition_move
    }

    /// Returns the player of one side.
    pub fn player(&self, color: Color) -> Player<'_> {
        Player::new(self, &self.players[usize::from(color)])
    }

    /// Returns the player whose turn it is.
    pub fn current_player(&self) -> Player<'_> {
        self.player(self.side_to_move)
    }

    /// Returns the moves of both sides: pseudo-legal moves plus the castles that passed validation.
    pub fn all_legal_moves(&self) -> impl Iterator<Item = &Move> {
        self.players.iter().flat_map(|player| player.legal_moves().iter())
    }

    /// Finds the move of either side going from `from` to `to`.
    ///
    /// # Returns
    /// * The matching move, or `Move::Null` when no piece of either side can go from `from` to `to`
    pub fn find_move(&self, from: Square, to: Square) -> Move {
        self.all_legal_moves()
            .find(|mv| mv.from_square() == Some(from) && mv.to_square() == Some(to))
            .copied()
            .unwrap_or(Move::Null)
    }
}

impl Index<Square> for Position {
    type Output = Tile;

    fn index(&self, square: Square) -> &Self::Output {
        &self.board[square]
    }
}

impl Display for Position {
    /// Formats the board as eight rows of right-aligned tiles, rank 8 first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in Rank::ALL_RANKS {
            for file in File::ALL_FILES {
                write!(f, "{:>3}", self.board[Square::new(file, rank)].to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//======================================================================================================================
// Position builder
//======================================================================================================================

/// Collects pieces and game state, then freezes them into a `Position`.
///
/// The builder starts empty with White to move, no en passant pawn and the null move as transition move. Setting a
/// piece on a square replaces whatever stood there.
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    board: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    en_passant_pawn: Option<Piece>,
    transition_move: Move,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self {
            board: [None; Square::COUNT],
            side_to_move: Color::White,
            en_passant_pawn: None,
            transition_move: Move::Null,
        }
    }
}

impl PositionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a piece on its square.
    pub fn set_piece(&mut self, piece: Piece) -> &mut Self {
        self.board[piece.square().index()] = Some(piece);
        self
    }

    /// Sets the side to move.
    pub fn turn(&mut self, color: Color) -> &mut Self {
        self.side_to_move = color;
        self
    }

    /// Sets the pawn that can be taken en passant.
    pub fn en_passant_pawn(&mut self, pawn: Option<Piece>) -> &mut Self {
        self.en_passant_pawn = pawn;
        self
    }

    /// Sets the move that produced the position.
    pub fn transition_move(&mut self, mv: Move) -> &mut Self {
        self.transition_move = mv;
        self
    }

    /// Builds the position and computes the players of both sides.
    ///
    /// # Errors
    /// * `PositionError::MissingKing` - If a side has no king
    /// * `PositionError::MultipleKings` - If a side has more than one king
    pub fn build(&self) -> Result<Position, PositionError> {
        let board = Board { tiles: self.board.map(Tile::from), en_passant_pawn: self.en_passant_pawn };
        let pieces = Color::ALL_COLORS.map(|color| {
            self.board.iter().flatten().filter(|piece| piece.color() == color).copied().collect::<Vec<_>>()
        });

        let [white_moves, black_moves] = pieces.each_ref().map(|pieces| generate_all_moves(&board, pieces));
        let players = [
            PlayerState::new(Color::White, &board, &pieces[0], &white_moves, &black_moves)?,
            PlayerState::new(Color::Black, &board, &pieces[1], &black_moves, &white_moves)?,
        ];

        Ok(Position {
            board,
            pieces,
            side_to_move: self.side_to_move,
            transition_move: self.transition_move,
            players,
        })
    }
}
