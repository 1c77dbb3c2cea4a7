//! Draw rule tests.

use super::{board_from, find_move, play, BK, BQ, BR, WK, WP, WR};
use crate::board::{Board, Color};
use crate::eval::Evaluator;

fn any_evaluator() -> Evaluator {
    let tables = super::eval::sample_tables();
    Evaluator::new(tables, tables)
}

#[test]
fn fifty_quiet_plies_draw_the_game() {
    let mut board = Board::new();
    board.meta.set_halfmove_clock(49);
    assert!(!board.is_fifty_move_draw());

    let m = find_move(&mut board, "g1", "f3");
    board.apply(&m);
    assert_eq!(board.halfmove_clock(), 50);
    assert!(board.is_fifty_move_draw());
    assert!(board.is_draw());
}

#[test]
fn a_drawn_position_scores_zero_regardless_of_material() {
    // Black is a queen up, but the clock has run out of progress.
    let mut board = board_from(&[("e1", WK), ("e8", BK), ("d8", BQ), ("a2", WP)]);
    let evaluator = any_evaluator();
    assert_ne!(evaluator.score(&board, false), 0);

    board.meta.set_halfmove_clock(50);
    assert_eq!(evaluator.score(&board, false), 0);
    assert_eq!(evaluator.score(&board, true), 0);
}

#[test]
fn shuffling_back_and_forth_three_times_is_a_repetition_draw() {
    let mut board = Board::new();
    let shuffle = [
        ("g1", "f3"),
        ("g8", "f6"),
        ("f3", "g1"),
        ("f6", "g8"),
    ];
    assert!(!board.is_repetition_draw());
    play(&mut board, &shuffle);
    assert!(!board.is_repetition_draw());
    play(&mut board, &shuffle);
    assert!(board.is_repetition_draw());
    assert_eq!(any_evaluator().score(&board, false), 0);
}

#[test]
fn undo_rewinds_repetition_counts() {
    let mut board = Board::new();
    play(
        &mut board,
        &[("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")],
    );
    play(&mut board, &[("g1", "f3"), ("g8", "f6"), ("f3", "g1")]);
    let m = find_move(&mut board, "f6", "g8");
    let undo = board.apply(&m);
    assert!(board.is_repetition_draw());
    board.undo(&m, undo);
    assert!(!board.is_repetition_draw());
}

#[test]
fn repetition_distinguishes_positions_with_different_rights() {
    // The king wanders out and back: the pieces repeat, the rights do not.
    let mut board = board_from(&[("e1", WK), ("h1", WR), ("e8", BK), ("h8", BR)]);
    play(
        &mut board,
        &[("e1", "e2"), ("e8", "e7"), ("e2", "e1"), ("e7", "e8")],
    );
    play(
        &mut board,
        &[("e1", "e2"), ("e8", "e7"), ("e2", "e1"), ("e7", "e8")],
    );
    // Visits two and three carry identical moved flags, so only the
    // original rights-bearing position is excluded from the count.
    assert!(!board.is_repetition_draw());
    play(&mut board, &[("e1", "e2"), ("e8", "e7"), ("e2", "e1"), ("e7", "e8")]);
    assert!(board.is_repetition_draw());
}
