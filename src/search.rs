//! Time-bounded parallel move search.
//!
//! One worker thread per root candidate move, each iteratively deepening
//! an alpha-beta search against a shared absolute deadline. Workers never
//! coordinate: each owns a private clone of the position and a result
//! slot of its own. The orchestrator sleeps for the time budget, then
//! harvests whatever depths the workers completed.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::Rng;

use crate::board::{Board, Color, Move};
use crate::eval::Evaluator;

/// Score of a checkmate before any per-ply decay
const MATE_SCORE: i32 = 100_000;

/// Bounds for the alpha-beta window, outside any reachable score
const SCORE_INF: i32 = 1_000_000;

/// Out-of-band value meaning "the deadline passed mid-subtree"; ancestors
/// must propagate it immediately without comparing it to real scores.
const OUT_OF_TIME: i32 = i32::MIN;

/// Per-ply decay: scores shrink toward zero by 1/64 of their magnitude
/// per ply, so a mate found sooner outscores the same mate found later.
const DECAY_SHIFT: u32 = 6;

/// Workers stop deepening this long before the orchestrator wakes, so
/// final iterations can unwind in time.
const DEADLINE_MARGIN: Duration = Duration::from_millis(200);

/// Depth at and above which a node checks the clock after its move loop
const TIME_CHECK_DEPTH: u32 = 3;

/// How many consecutive quiet moves a node will search before it starts
/// skipping further quiet moves (captures and promotions are always
/// searched). Scales with remaining depth.
fn quiet_quota(depth: u32) -> u32 {
    6 + 2 * depth
}

/// A worker's latest completed result: (score, completed depth).
type ResultSlot = Mutex<(i32, u32)>;

/// Iterative-deepening alpha-beta search over a fixed time budget.
pub struct SearchEngine {
    evaluator: Arc<Evaluator>,
}

impl SearchEngine {
    #[must_use]
    pub fn new(evaluator: Arc<Evaluator>) -> Self {
        SearchEngine { evaluator }
    }

    /// Pick a move for `side` from `candidates` within `budget` wall time.
    ///
    /// `candidates` must be the legal moves of `position` for `side`; the
    /// returned move is one of them. Pending-promotion placeholders are
    /// never selected. Returns `None` only when no candidate is searchable.
    ///
    /// The original position is never mutated; every worker searches a
    /// private clone.
    #[must_use]
    pub fn choose_move(
        &self,
        position: &Board,
        side: Color,
        budget: Duration,
        candidates: &[Move],
        endgame: bool,
    ) -> Option<Move> {
        let deadline = Instant::now() + budget;
        let slots: Arc<Vec<ResultSlot>> = Arc::new(
            candidates
                .iter()
                .map(|_| Mutex::new((0, 0)))
                .collect(),
        );
        let mut searched = vec![false; candidates.len()];

        for (i, &mv) in candidates.iter().enumerate() {
            if mv.is_promotion_pending() {
                continue;
            }
            searched[i] = true;

            let mut child = position.clone();
            child.apply(&mv);
            let reply = side.opponent();
            let evaluator = Arc::clone(&self.evaluator);
            let slots = Arc::clone(&slots);

            thread::Builder::new()
                .name(format!("search-{i}"))
                .spawn(move || {
                    let stop_deepening = deadline - DEADLINE_MARGIN;
                    let mut depth = 1u32;
                    while Instant::now() < deadline {
                        let score = alpha_beta(
                            &mut child,
                            depth,
                            -SCORE_INF,
                            SCORE_INF,
                            reply,
                            stop_deepening,
                            endgame,
                            &evaluator,
                        );
                        if score != OUT_OF_TIME {
                            *slots[i].lock() = (score, depth);
                            log::debug!("worker {i} finished depth {depth} score {score}");
                        }
                        depth += 1;
                    }
                })
                .expect("failed to spawn search worker");
        }

        thread::sleep(budget);

        // Harvest: extreme score for the side to move, random among ties.
        // Workers may still be running; each slot only ever holds a
        // coherent (score, depth) pair, possibly one iteration stale.
        let mut best_score = 0;
        let mut best: Vec<usize> = Vec::new();
        for (i, slot) in slots.iter().enumerate() {
            if !searched[i] {
                continue;
            }
            let (score, depth) = *slot.lock();
            log::debug!("candidate {} score {score} at depth {depth}", candidates[i]);
            let better = match side {
                Color::White => score > best_score,
                Color::Black => score < best_score,
            };
            if best.is_empty() || better {
                best_score = score;
                best = vec![i];
            } else if score == best_score {
                best.push(i);
            }
        }

        if best.is_empty() {
            return None;
        }
        let pick = best[rand::thread_rng().gen_range(0..best.len())];
        let chosen = candidates[pick];
        log::info!(
            "chose {chosen} (score {best_score}) from {} candidates in {budget:?}",
            candidates.len()
        );
        Some(chosen)
    }
}

/// Alpha-beta minimax on a privately owned board.
///
/// White maximizes. Terminal positions score +/-`MATE_SCORE` for a mated
/// side and 0 for stalemate; every score backed up a ply decays toward
/// zero. A node deep enough to matter checks the deadline once per move
/// loop and answers `OUT_OF_TIME`, which unwinds the whole subtree.
#[allow(clippy::too_many_arguments)]
fn alpha_beta(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    side: Color,
    deadline: Instant,
    endgame: bool,
    evaluator: &Evaluator,
) -> i32 {
    let moves = board.legal_moves(side, false);

    if moves.is_empty() {
        return if board.is_in_check(side) {
            match side {
                Color::White => -MATE_SCORE,
                Color::Black => MATE_SCORE,
            }
        } else {
            0
        };
    }

    let maximizing = side == Color::White;
    let mut best = if maximizing { -SCORE_INF } else { SCORE_INF };
    let quota = quiet_quota(depth);
    let mut quiet_run = 0u32;

    for m in moves.iter() {
        if m.is_tactical() {
            quiet_run = 0;
        } else {
            quiet_run += 1;
            if quiet_run > quota {
                continue;
            }
        }

        let undo = board.apply(m);
        let eval = if depth > 1 {
            alpha_beta(
                board,
                depth - 1,
                alpha,
                beta,
                side.opponent(),
                deadline,
                endgame,
                evaluator,
            )
        } else {
            evaluator.score(board, endgame)
        };
        board.undo(m, undo);

        if eval == OUT_OF_TIME {
            return OUT_OF_TIME;
        }
        let eval = eval - (eval >> DECAY_SHIFT);

        if maximizing {
            best = best.max(eval);
            alpha = alpha.max(eval);
        } else {
            best = best.min(eval);
            beta = beta.min(eval);
        }
        if beta <= alpha {
            break;
        }
    }

    if depth >= TIME_CHECK_DEPTH && Instant::now() > deadline {
        return OUT_OF_TIME;
    }
    best
}
