//! Benchmarks for move generation, move application, and evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fianchetto::board::{Board, Color};
use fianchetto::{parse_piece_tables, Evaluator};

fn midgame_board() -> Board {
    let mut board = Board::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("g8", "f6"),
    ] {
        let from = from.parse().expect("valid square");
        let to = to.parse().expect("valid square");
        let side = board.color_at(from).expect("piece on origin");
        let m = board
            .legal_moves(side, false)
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to)
            .expect("scripted move is legal");
        board.apply(&m);
    }
    board
}

fn flat_evaluator() -> Evaluator {
    let values = [10_000, 900, 500, 330, 320, 100];
    let mut text = String::new();
    for value in values {
        for _ in 0..64 {
            text.push_str(&value.to_string());
            text.push(' ');
        }
    }
    let table = parse_piece_tables(&text).expect("flat tables parse");
    Evaluator::new(table, table)
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let mut startpos = Board::new();
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(startpos.legal_moves(Color::White, false)))
    });

    let mut midgame = midgame_board();
    group.bench_function("midgame", |b| {
        b.iter(|| black_box(midgame.legal_moves(Color::White, false)))
    });

    group.finish();
}

fn bench_apply_undo(c: &mut Criterion) {
    let mut board = Board::new();
    let m = board
        .legal_moves(Color::White, false)
        .iter()
        .copied()
        .find(|m| m.to() == "e4".parse().unwrap())
        .expect("e2e4 is legal");

    c.bench_function("apply_undo", |b| {
        b.iter(|| {
            let undo = board.apply(black_box(&m));
            board.undo(&m, undo);
        })
    });
}

fn bench_eval(c: &mut Criterion) {
    let board = midgame_board();
    let evaluator = flat_evaluator();
    c.bench_function("eval_midgame", |b| {
        b.iter(|| black_box(evaluator.score(&board, false)))
    });
}

criterion_group!(benches, bench_movegen, bench_apply_undo, bench_eval);
criterion_main!(benches);
