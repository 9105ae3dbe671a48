use std::fmt::Display;

use crate::piece::Piece;

/// The content of one square of a board: either nothing or exactly one piece.
///
/// Tiles are plain values. An empty tile carries no state at all, so every board shares the same `Tile::EMPTY`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Tile {
    pub const EMPTY: Tile = Tile::Empty;

    /// Returns true if a piece stands on the tile.
    pub fn occupied(&self) -> bool {
        matches!(self, Tile::Occupied(_))
    }

    /// Returns the piece standing on the tile, if any.
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Tile::Empty => None,
            Tile::Occupied(piece) => Some(*piece),
        }
    }
}

impl From<Option<Piece>> for Tile {
    fn from(piece: Option<Piece>) -> Self {
        piece.map_or(Tile::Empty, Tile::Occupied)
    }
}

impl Display for Tile {
    /// Formats the tile as the letter of its piece, or `-` when empty.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tile::Empty => write!(f, "-"),
            Tile::Occupied(piece) => write!(f, "{}", char::from(*piece)),
        }
    }
}
