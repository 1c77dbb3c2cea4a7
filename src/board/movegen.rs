//! Legal move generation.
//!
//! One king-safety pass per call computes pins, check blocks, and the
//! king's own escape squares; generation then prunes king-exposing moves
//! square by square instead of making every pseudo-legal move and testing
//! the resulting position.

use super::attack_tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use super::state::Board;
use super::types::{
    bit, king_origin, pop_lsb, rook_origin, Color, Move, MoveList, PieceKind, Promotion, Square,
    Wing, PROMOTION_CHOICES,
};

/// Compass directions; the first four are orthogonal, the last four
/// diagonal, and slider matching depends on that split.
const DIRS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ORTHO_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAG_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Step one square from `idx` in direction (`dr`, `df`), if still on the board.
#[inline]
fn step(idx: usize, dr: isize, df: isize) -> Option<usize> {
    let r = (idx / 8) as isize + dr;
    let f = (idx % 8) as isize + df;
    if (0..8).contains(&r) && (0..8).contains(&f) {
        Some((r * 8 + f) as usize)
    } else {
        None
    }
}

/// Result of the per-generation king-safety analysis.
pub(crate) struct KingSafety {
    pub(crate) in_check: bool,
    pub(crate) double_check: bool,
    /// Pieces that may only move within their pin path
    pub(crate) pinned: u64,
    /// For each pinned square, the squares it may still move to
    pub(crate) pin_paths: [u64; 64],
    /// Squares that interpose against, or capture, the current checker
    pub(crate) block_mask: u64,
    /// Squares the king itself may step to
    pub(crate) king_steps: u64,
}

impl Board {
    /// Is `sq` attacked by any piece of `by`?
    ///
    /// Slider rays treat the defending king as transparent, so it never
    /// shadows the squares behind it; this is what makes the king-step
    /// mask forbid stepping away from a checker along its ray.
    #[must_use]
    pub(crate) fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let idx = sq.index();
        let by_mask = self.side(by);
        let defender_king = self.kings.0 & self.side(by.opponent());

        for (i, &(dr, df)) in DIRS.iter().enumerate() {
            let ortho = i < 4;
            let mut cur = idx;
            while let Some(next) = step(cur, dr, df) {
                cur = next;
                if self.empty_at(cur) || defender_king & bit(cur) != 0 {
                    continue;
                }
                if by_mask & bit(cur) != 0
                    && ((ortho && self.ortho_at(cur)) || (!ortho && self.diag_at(cur)))
                {
                    return true;
                }
                break;
            }
        }

        if KNIGHT_ATTACKS[idx] & self.knights() & by_mask != 0 {
            return true;
        }
        if KING_ATTACKS[idx] & self.kings.0 & by_mask != 0 {
            return true;
        }
        if PAWN_ATTACKS[by.opponent().index()][idx] & self.pawns.0 & by_mask != 0 {
            return true;
        }
        false
    }

    /// Re-derive the in-check state of a side from the masks alone.
    #[must_use]
    pub fn is_in_check(&self, side: Color) -> bool {
        self.is_square_attacked(self.king_square(side), side.opponent())
    }

    /// One pass from the king: cast rays in the eight compass directions to
    /// find checkers, pinned pieces, and blockable squares, then test each
    /// adjacent square for the king itself.
    pub(crate) fn king_safety(&self, side: Color) -> KingSafety {
        let king_idx = self.king_square(side).index();
        let friendly = self.side(side);
        let enemy_mask = self.side(side.opponent());

        let mut safety = KingSafety {
            in_check: false,
            double_check: false,
            pinned: 0,
            pin_paths: [0; 64],
            block_mask: 0,
            king_steps: 0,
        };
        let mut checkers = 0u32;

        for (i, &(dr, df)) in DIRS.iter().enumerate() {
            let ortho = i < 4;
            let mut path = 0u64;
            let mut shield: Option<usize> = None;
            let mut cur = king_idx;

            while let Some(next) = step(cur, dr, df) {
                cur = next;
                if self.empty_at(cur) {
                    path |= bit(cur);
                    continue;
                }
                if friendly & bit(cur) != 0 {
                    if shield.is_none() {
                        shield = Some(cur);
                        continue;
                    }
                    // Two friendly pieces on the ray: nothing pinned here.
                    break;
                }
                if (ortho && self.ortho_at(cur)) || (!ortho && self.diag_at(cur)) {
                    path |= bit(cur);
                    match shield {
                        None => {
                            checkers += 1;
                            safety.block_mask |= path;
                        }
                        Some(pinned_idx) => {
                            safety.pinned |= bit(pinned_idx);
                            safety.pin_paths[pinned_idx] = path;
                        }
                    }
                }
                break;
            }
        }

        let mut knight_checkers = KNIGHT_ATTACKS[king_idx] & self.knights() & enemy_mask;
        while knight_checkers != 0 {
            let idx = pop_lsb(&mut knight_checkers);
            checkers += 1;
            safety.block_mask |= bit(idx);
        }

        let mut pawn_checkers = PAWN_ATTACKS[side.index()][king_idx] & self.pawns.0 & enemy_mask;
        while pawn_checkers != 0 {
            let idx = pop_lsb(&mut pawn_checkers);
            checkers += 1;
            safety.block_mask |= bit(idx);
        }

        safety.in_check = checkers > 0;
        safety.double_check = checkers > 1;

        let mut steps = KING_ATTACKS[king_idx] & !friendly;
        while steps != 0 {
            let idx = pop_lsb(&mut steps);
            if !self.is_square_attacked(Square::from_index(idx), side.opponent()) {
                safety.king_steps |= bit(idx);
            }
        }

        safety
    }

    /// Enumerate every legal move for `side`.
    ///
    /// Interactive callers receive a single pending-promotion move where a
    /// pawn reaches the back rank; everyone else gets the four fixed
    /// promotion variants.
    #[must_use]
    pub fn legal_moves(&mut self, side: Color, interactive: bool) -> MoveList {
        let safety = self.king_safety(side);
        let enemy_mask = self.side(side.opponent());
        let mut out = MoveList::new();

        let mut pieces = self.side(side);
        while pieces != 0 {
            let from_idx = pop_lsb(&mut pieces);
            let from = Square::from_index(from_idx);

            if self.king_at(from_idx) {
                let mut steps = safety.king_steps;
                while steps != 0 {
                    let to_idx = pop_lsb(&mut steps);
                    let is_capture = enemy_mask & bit(to_idx) != 0;
                    out.push(Move::piece(
                        from,
                        Square::from_index(to_idx),
                        side,
                        is_capture,
                    ));
                }
                self.castle_moves(side, &safety, &mut out);
                continue;
            }

            // Only the king can resolve a double check.
            if safety.double_check {
                continue;
            }

            if self.pawn_at(from_idx) {
                self.pawn_moves(from_idx, side, &safety, interactive, &mut out);
            } else if self.diag_at(from_idx) || self.ortho_at(from_idx) {
                let dirs: &[(isize, isize)] = match (self.ortho_at(from_idx), self.diag_at(from_idx))
                {
                    (true, true) => &DIRS,
                    (true, false) => &ORTHO_DIRS,
                    (false, true) => &DIAG_DIRS,
                    (false, false) => unreachable!(),
                };
                self.slider_moves(from_idx, side, dirs, &safety, &mut out);
            } else {
                self.knight_moves(from_idx, side, &safety, &mut out);
            }
        }

        out
    }

    /// True when `side` is checkmated: in check with no legal move.
    #[must_use]
    pub fn is_checkmate(&mut self, side: Color) -> bool {
        self.is_in_check(side) && self.legal_moves(side, false).is_empty()
    }

    /// True when `side` has no legal move but is not in check.
    #[must_use]
    pub fn is_stalemate(&mut self, side: Color) -> bool {
        !self.is_in_check(side) && self.legal_moves(side, false).is_empty()
    }

    /// May `from` move to `to` under the pin and check-block masks?
    #[inline]
    fn move_allowed(safety: &KingSafety, from_idx: usize, to_idx: usize) -> bool {
        if safety.pinned & bit(from_idx) != 0 && safety.pin_paths[from_idx] & bit(to_idx) == 0 {
            return false;
        }
        !(safety.in_check && safety.block_mask & bit(to_idx) == 0)
    }

    fn slider_moves(
        &self,
        from_idx: usize,
        side: Color,
        dirs: &[(isize, isize)],
        safety: &KingSafety,
        out: &mut MoveList,
    ) {
        let from = Square::from_index(from_idx);
        let friendly = self.side(side);
        let pinned = safety.pinned & bit(from_idx) != 0;

        for &(dr, df) in dirs {
            let mut cur = from_idx;
            while let Some(next) = step(cur, dr, df) {
                cur = next;
                if friendly & bit(cur) != 0 {
                    break;
                }
                if pinned && safety.pin_paths[from_idx] & bit(cur) == 0 {
                    if self.empty_at(cur) {
                        continue;
                    }
                    break;
                }
                if self.empty_at(cur) {
                    if !safety.in_check || safety.block_mask & bit(cur) != 0 {
                        out.push(Move::piece(from, Square::from_index(cur), side, false));
                    }
                    continue;
                }
                // Enemy piece: capturable, then the ray ends.
                if !safety.in_check || safety.block_mask & bit(cur) != 0 {
                    out.push(Move::piece(from, Square::from_index(cur), side, true));
                }
                break;
            }
        }
    }

    fn knight_moves(&self, from_idx: usize, side: Color, safety: &KingSafety, out: &mut MoveList) {
        let from = Square::from_index(from_idx);
        let enemy_mask = self.side(side.opponent());
        let mut targets = KNIGHT_ATTACKS[from_idx] & !self.side(side);
        while targets != 0 {
            let to_idx = pop_lsb(&mut targets);
            if !Self::move_allowed(safety, from_idx, to_idx) {
                continue;
            }
            let is_capture = enemy_mask & bit(to_idx) != 0;
            out.push(Move::piece(
                from,
                Square::from_index(to_idx),
                side,
                is_capture,
            ));
        }
    }

    fn pawn_moves(
        &mut self,
        from_idx: usize,
        side: Color,
        safety: &KingSafety,
        interactive: bool,
        out: &mut MoveList,
    ) {
        let from = Square::from_index(from_idx);
        let rank = from.rank();
        let file = from.file();
        let dir = side.pawn_direction();
        let enemy_mask = self.side(side.opponent());

        let next_rank = rank as isize + dir;
        if !(0..8).contains(&next_rank) {
            return;
        }
        let next_rank = next_rank as usize;
        let promotes = next_rank == side.opponent().back_rank();

        // Advances
        let one = Square(next_rank, file);
        if self.empty_at(one.index()) {
            if Self::move_allowed(safety, from_idx, one.index()) {
                if promotes {
                    push_promotions(out, from, one, side, false, interactive);
                } else {
                    out.push(Move::pawn_push(from, one, side));
                }
            }
            if rank == side.pawn_start_rank() {
                let two = Square((rank as isize + 2 * dir) as usize, file);
                if self.empty_at(two.index()) && Self::move_allowed(safety, from_idx, two.index()) {
                    out.push(Move::double_push(from, two, side));
                }
            }
        }

        // Diagonal captures and en passant
        let ep_rank = match side {
            Color::White => 4,
            Color::Black => 3,
        };
        for df in [-1isize, 1] {
            let target_file = file as isize + df;
            if !(0..8).contains(&target_file) {
                continue;
            }
            let target_file = target_file as usize;
            let to = Square(next_rank, target_file);
            let to_idx = to.index();

            if enemy_mask & bit(to_idx) != 0 {
                if Self::move_allowed(safety, from_idx, to_idx) {
                    if promotes {
                        push_promotions(out, from, to, side, true, interactive);
                    } else {
                        out.push(Move::pawn_capture(from, to, side));
                    }
                }
                continue;
            }

            if rank == ep_rank
                && self.meta.double_push_file() == Some(target_file)
                && self.empty_at(to_idx)
                && Self::move_allowed(safety, from_idx, to_idx)
            {
                let capture = Square(rank, target_file);
                let m = Move::en_passant(from, to, side, capture);
                // Both pawns leave the rank at once, which the ray pass
                // cannot model; verify the king stays safe the hard way.
                let undo = self.apply(&m);
                let exposed = self.is_in_check(side);
                self.undo(&m, undo);
                if !exposed {
                    out.push(m);
                }
            }
        }
    }

    fn castle_moves(&self, side: Color, safety: &KingSafety, out: &mut MoveList) {
        if safety.in_check || self.meta.king_moved(side) {
            return;
        }
        let back = side.back_rank();
        let king_from = king_origin(side);

        for wing in Wing::BOTH {
            if self.meta.rook_moved(side, wing) {
                continue;
            }
            let rook_from = rook_origin(side, wing);
            if self.piece_at(rook_from) != Some((side, PieceKind::Rook)) {
                continue;
            }

            let (between, king_path, king_to_file, rook_to_file) = match wing {
                Wing::King => (&[5usize, 6][..], &[5usize, 6][..], 6, 5),
                Wing::Queen => (&[1usize, 2, 3][..], &[3usize, 2][..], 2, 3),
            };

            if between.iter().any(|&f| !self.empty_at(Square(back, f).index())) {
                continue;
            }
            if king_path
                .iter()
                .any(|&f| self.is_square_attacked(Square(back, f), side.opponent()))
            {
                continue;
            }

            out.push(Move::castle(
                king_from,
                Square(back, king_to_file),
                side,
                rook_from,
                Square(back, rook_to_file),
            ));
        }
    }
}

fn push_promotions(
    out: &mut MoveList,
    from: Square,
    to: Square,
    side: Color,
    is_capture: bool,
    interactive: bool,
) {
    if interactive {
        out.push(Move::promotion(from, to, side, Promotion::Pending, is_capture));
    } else {
        for kind in PROMOTION_CHOICES {
            out.push(Move::promotion(
                from,
                to,
                side,
                Promotion::To(kind),
                is_capture,
            ));
        }
    }
}
