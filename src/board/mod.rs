//! Board representation and game rules.
//!
//! Bitboard masks keep set membership per side and piece class; legal
//! move generation prunes unsafe moves during generation from a single
//! king-safety analysis, and applied moves undo in O(1) from a saved
//! record.
//!
//! # Example
//! ```
//! use fianchetto::board::{Board, Color};
//!
//! let mut board = Board::new();
//! let moves = board.legal_moves(Color::White, false);
//! assert_eq!(moves.len(), 20);
//! ```

mod apply;
mod attack_tables;
mod error;
mod movegen;
mod state;
mod types;
mod zobrist;

#[cfg(test)]
mod tests;

pub use apply::Undo;
pub use error::SquareError;
pub use state::{Board, START_LAYOUT};
pub use types::{
    Bitboard, BitboardIter, BoardMeta, Color, Move, MoveList, PieceKind, Promotion, Square, Wing,
};
