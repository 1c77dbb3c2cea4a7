//! Unit tests for the board, generator, codec, evaluator, and search.

mod draws;
mod eval;

use crate::board::{Board, Color, Move, Square};

// Signed layout codes used to assemble test positions.
pub(crate) const WP: i8 = 1;
pub(crate) const WN: i8 = 2;
pub(crate) const WB: i8 = 3;
pub(crate) const WR: i8 = 4;
pub(crate) const WQ: i8 = 5;
pub(crate) const WK: i8 = 6;
pub(crate) const BP: i8 = -1;
pub(crate) const BN: i8 = -2;
pub(crate) const BB: i8 = -3;
pub(crate) const BR: i8 = -4;
pub(crate) const BQ: i8 = -5;
pub(crate) const BK: i8 = -6;

/// Build a board holding exactly the given pieces.
pub(crate) fn board_from(pieces: &[(&str, i8)]) -> Board {
    let mut layout = [0i8; 64];
    for (notation, code) in pieces {
        let sq: Square = notation.parse().expect("valid square");
        layout[sq.index()] = *code;
    }
    Board::from_layout(&layout)
}

pub(crate) fn sq(notation: &str) -> Square {
    notation.parse().expect("valid square")
}

/// Find a generated legal move by its endpoints.
pub(crate) fn find_move(board: &mut Board, from: &str, to: &str) -> Move {
    let from = sq(from);
    let to = sq(to);
    let side = board.color_at(from).expect("piece on origin square");
    board
        .legal_moves(side, false)
        .iter()
        .copied()
        .find(|m| m.from() == from && m.to() == to)
        .unwrap_or_else(|| panic!("expected {from}{to} to be legal"))
}

/// Apply a sequence of moves given by endpoints.
pub(crate) fn play(board: &mut Board, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        let m = find_move(board, from, to);
        board.apply(&m);
    }
}

#[test]
fn start_layout_round_trips() {
    let board = Board::new();
    assert_eq!(board.layout(), crate::board::START_LAYOUT);
}

#[test]
fn start_position_basics() {
    let board = Board::new();
    assert_eq!(board.king_square(Color::White), sq("e1"));
    assert_eq!(board.king_square(Color::Black), sq("e8"));
    assert!(!board.is_endgame());
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw());
}

#[test]
fn endgame_threshold_counts_pieces() {
    let board = board_from(&[("e1", WK), ("e8", BK), ("a2", WP)]);
    assert!(board.is_endgame());
}

#[test]
fn copy_piece_preserves_identity() {
    let mut board = board_from(&[("d4", WQ), ("e1", WK), ("e8", BK)]);
    board.copy_piece(sq("d4"), sq("g7"));
    board.wipe(sq("d4"));
    assert_eq!(
        board.piece_at(sq("g7")),
        Some((Color::White, crate::board::PieceKind::Queen))
    );
    assert_eq!(board.piece_at(sq("d4")), None);
}

#[test]
#[should_panic(expected = "king")]
fn missing_king_is_fatal() {
    let board = board_from(&[("e1", WK), ("a7", WP)]);
    let _ = board.king_square(Color::Black);
}
