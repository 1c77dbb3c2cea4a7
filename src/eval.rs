//! Static position evaluation.

use crate::board::{Board, Square};
use crate::tables::PieceSquareTable;

/// Static scorer over externally-supplied piece-square tables.
///
/// Built once at startup from parsed configuration and shared read-only
/// (typically behind an `Arc`) by every search worker; it is never
/// mutated after construction. The evaluator has no game knowledge of its
/// own beyond applying the tables and the draw rules.
#[derive(Clone, Debug)]
pub struct Evaluator {
    midgame: PieceSquareTable,
    endgame: PieceSquareTable,
}

impl Evaluator {
    /// Wrap two phase tables (midgame, endgame).
    #[must_use]
    pub fn new(midgame: PieceSquareTable, endgame: PieceSquareTable) -> Self {
        Evaluator { midgame, endgame }
    }

    /// Score a position; positive favors white.
    ///
    /// Draws are consulted first: a drawn position scores 0 regardless of
    /// material.
    #[must_use]
    pub fn score(&self, board: &Board, endgame: bool) -> i32 {
        if board.is_draw() {
            return 0;
        }
        let table = if endgame { &self.endgame } else { &self.midgame };
        let mut score = 0;
        for idx in 0..64 {
            let code = board.code_at(Square::from_index(idx));
            if code != 0 {
                score += table[(code + 6) as usize][idx];
            }
        }
        score
    }
}
