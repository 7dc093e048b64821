use chess_with_guns_core::{CellCoord, PieceKind};
use thiserror::Error;

/// Reasons a match could not be set up.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SetupError {
    /// Fewer than two players were provided.
    #[error("a match needs at least two players, got {count}")]
    NotEnoughPlayers {
        /// Number of players supplied.
        count: usize,
    },
    /// The board has no cells.
    #[error("board must have at least one row and one column")]
    EmptyBoard,
    /// The cell length is not a positive finite number.
    #[error("cell length must be positive, got {length}")]
    InvalidCellLength {
        /// Rejected cell length.
        length: f32,
    },
    /// Two players asked for the same piece.
    #[error("piece {piece:?} was assigned to more than one player")]
    DuplicatePiece {
        /// Piece claimed twice.
        piece: PieceKind,
    },
    /// A starting cell lies outside the board.
    #[error("player `{name}` starts outside the board at {cell:?}")]
    StartOutOfBounds {
        /// Name of the offending player.
        name: String,
        /// Rejected starting cell.
        cell: CellCoord,
    },
    /// Two players share a starting cell.
    #[error("player `{name}` starts on an occupied cell {cell:?}")]
    StartOccupied {
        /// Name of the offending player.
        name: String,
        /// Contested starting cell.
        cell: CellCoord,
    },
    /// Not enough empty cells remain to scatter the pickups.
    #[error("board cannot hold {pickups} pickups alongside the players")]
    NoRoomForPickups {
        /// Requested pickup count.
        pickups: usize,
    },
}
