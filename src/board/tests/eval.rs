//! Evaluator tests.

use super::{board_from, play, BK, BN, BR, WK, WN, WR};
use crate::board::{Board, Square};
use crate::eval::Evaluator;
use crate::tables::{parse_piece_tables, PieceSquareTable};

/// A small but square-dependent table, parsed through the real loader.
pub(crate) fn sample_tables() -> PieceSquareTable {
    let mut text = String::new();
    for grid in 0..6i32 {
        for sq in 0..64i32 {
            let value = (grid + 1) * 10 + sq % 8 - sq / 8;
            text.push_str(&value.to_string());
            text.push(' ');
        }
    }
    parse_piece_tables(&text).expect("sample table parses")
}

fn mirrored_with_colors_swapped(board: &Board) -> Board {
    let layout = board.layout();
    let mut mirrored = [0i8; 64];
    for (idx, &code) in layout.iter().enumerate() {
        let flipped = Square::from_index(idx).flip_vertical().index();
        mirrored[flipped] = -code;
    }
    Board::from_layout(&mirrored)
}

#[test]
fn score_negates_under_vertical_mirror_with_colors_swapped() {
    let evaluator = Evaluator::new(sample_tables(), sample_tables());

    let mut board = Board::new();
    play(
        &mut board,
        &[("e2", "e4"), ("g8", "f6"), ("d2", "d3"), ("d7", "d5")],
    );
    let mirrored = mirrored_with_colors_swapped(&board);

    for endgame in [false, true] {
        assert_eq!(
            evaluator.score(&board, endgame),
            -evaluator.score(&mirrored, endgame)
        );
    }
}

#[test]
fn phase_selects_the_matching_table() {
    let midgame = sample_tables();
    let mut endgame = sample_tables();
    for row in &mut endgame {
        for value in row.iter_mut() {
            *value *= 3;
        }
    }
    let evaluator = Evaluator::new(midgame, endgame);

    let board = board_from(&[("e1", WK), ("e8", BK), ("c3", WN)]);
    let mid = evaluator.score(&board, false);
    let end = evaluator.score(&board, true);
    assert_eq!(end, mid * 3);
}

#[test]
fn balanced_positions_score_zero() {
    // Perfectly mirrored material on mirrored squares cancels out.
    let board = board_from(&[
        ("e1", WK),
        ("e8", BK),
        ("a1", WR),
        ("a8", BR),
        ("b1", WN),
        ("b8", BN),
    ]);
    let evaluator = Evaluator::new(sample_tables(), sample_tables());
    assert_eq!(evaluator.score(&board, false), 0);
}
