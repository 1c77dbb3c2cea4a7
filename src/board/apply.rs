//! Reversible move application.
//!
//! `apply` mutates the board in place and returns an [`Undo`] record
//! carrying the captured piece identities and the pre-move auxiliary
//! register; `undo` restores the position bit for bit from that record.
//! The register is never recomputed on undo — the snapshot is the only
//! source of truth for castling rights, the en-passant marker, and the
//! half-move clock.
//!
//! Moves are trusted to come from the generator. Malformed input (an
//! empty origin square, an unresolved promotion) is a caller bug and
//! panics rather than returning an error.

use super::state::Board;
use super::types::{
    king_origin, rook_origin, BoardMeta, Color, Move, MoveKind, PieceKind, Promotion, Square, Wing,
};

/// Everything needed to reverse one applied move.
#[derive(Clone, Debug)]
pub struct Undo {
    /// Piece formerly on the destination square
    captured: Option<(Color, PieceKind)>,
    /// Piece formerly on the secondary destination (en-passant capture)
    companion_captured: Option<(Color, PieceKind)>,
    /// Auxiliary register before the move, restored verbatim
    prev_meta: BoardMeta,
    /// Position key before the move
    prev_key: u64,
    /// Repetition count of the reached position before this move reached it
    prev_count: u32,
}

impl Board {
    /// Apply a generator-produced move, returning the record that undoes it.
    pub fn apply(&mut self, m: &Move) -> Undo {
        let prev_meta = self.meta;
        let prev_key = self.key;
        let mut captured = None;
        let mut companion_captured = None;

        match m.kind {
            MoveKind::EnPassant { capture } => {
                companion_captured = self.piece_at(capture);
                self.wipe(capture);
                self.copy_piece(m.from, m.to);
            }
            MoveKind::Castle { rook_from, rook_to } => {
                self.copy_piece(m.from, m.to);
                self.copy_piece(rook_from, rook_to);
                self.wipe(rook_from);
            }
            MoveKind::Promote(promotion) => {
                let Promotion::To(kind) = promotion else {
                    panic!("applied a promotion whose piece was never chosen: {m}");
                };
                captured = self.piece_at(m.to);
                self.set_piece(m.to, m.color, kind);
            }
            MoveKind::Normal | MoveKind::DoublePush => {
                captured = self.piece_at(m.to);
                self.copy_piece(m.from, m.to);
            }
        }
        self.wipe(m.from);

        self.update_meta(m);

        let key = self.position_key(m.color.opponent());
        let prev_count = self.repetitions.get(key);
        self.repetitions.increment(key);
        self.key = key;

        Undo {
            captured,
            companion_captured,
            prev_meta,
            prev_key,
            prev_count,
        }
    }

    /// Reverse a move applied to this exact position.
    pub fn undo(&mut self, m: &Move, undo: Undo) {
        self.repetitions.set(self.key, undo.prev_count);
        self.key = undo.prev_key;
        self.meta = undo.prev_meta;

        match m.kind {
            MoveKind::Castle { rook_from, rook_to } => {
                self.copy_piece(m.to, m.from);
                self.wipe(m.to);
                self.copy_piece(rook_to, rook_from);
                self.wipe(rook_to);
            }
            MoveKind::Promote(_) => {
                self.set_piece(m.from, m.color, PieceKind::Pawn);
                self.wipe(m.to);
                if let Some((color, kind)) = undo.captured {
                    self.set_piece(m.to, color, kind);
                }
            }
            MoveKind::EnPassant { capture } => {
                self.copy_piece(m.to, m.from);
                self.wipe(m.to);
                if let Some((color, kind)) = undo.companion_captured {
                    self.set_piece(capture, color, kind);
                }
            }
            MoveKind::Normal | MoveKind::DoublePush => {
                self.copy_piece(m.to, m.from);
                self.wipe(m.to);
                if let Some((color, kind)) = undo.captured {
                    self.set_piece(m.to, color, kind);
                }
            }
        }
    }

    /// Auxiliary-register update policy, applied on `apply` only.
    fn update_meta(&mut self, m: &Move) {
        let mut meta = self.meta;

        if m.is_castle() {
            meta.set_king_moved(m.color);
            meta.set_rook_moved(m.color, Wing::King);
            meta.set_rook_moved(m.color, Wing::Queen);
        } else {
            // A vacated origin square or a capture landing on one both
            // burn the corresponding castling right.
            for sq in [m.from, m.to] {
                mark_origin_square(&mut meta, sq);
            }
        }

        if m.resets_clock {
            meta.set_halfmove_clock(0);
        } else {
            meta.set_halfmove_clock(meta.halfmove_clock() + 1);
        }

        if matches!(m.kind, MoveKind::DoublePush) {
            meta.set_double_push(m.to.file());
        } else {
            meta.clear_double_push();
        }

        self.meta = meta;
    }
}

fn mark_origin_square(meta: &mut BoardMeta, sq: Square) {
    for color in Color::BOTH {
        if sq == king_origin(color) {
            meta.set_king_moved(color);
        }
        for wing in Wing::BOTH {
            if sq == rook_origin(color, wing) {
                meta.set_rook_moved(color, wing);
            }
        }
    }
}
