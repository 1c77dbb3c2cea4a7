//! Packed board state: six square-set masks plus the auxiliary register.

use std::collections::HashMap;
use std::fmt;

use super::types::{bit, pop_lsb, Bitboard, BoardMeta, Color, PieceKind, Square};
use super::zobrist::ZOBRIST;

/// Standard starting layout in layout-exchange order (rank 1 first,
/// file a first; positive codes are white).
#[rustfmt::skip]
pub const START_LAYOUT: [i8; 64] = [
     4,  2,  3,  5,  6,  3,  2,  4,
     1,  1,  1,  1,  1,  1,  1,  1,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
    -1, -1, -1, -1, -1, -1, -1, -1,
    -4, -2, -3, -5, -6, -3, -2, -4,
];

/// Total piece count below which the game counts as an endgame
const ENDGAME_PIECE_LIMIT: u32 = 14;

/// Occurrence counts of positions reached in the current game, keyed by
/// position key. Incremented by `apply`, restored exactly by `undo`.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: u64) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, key: u64, count: u32) {
        if count == 0 {
            self.counts.remove(&key);
        } else {
            self.counts.insert(key, count);
        }
    }

    pub(crate) fn increment(&mut self, key: u64) -> u32 {
        let next = self.get(key).saturating_add(1);
        self.set(key, next);
        next
    }
}

/// A chess position.
///
/// Six 64-bit masks give set membership per side and piece class: a queen
/// is set in both slider masks, and a knight is any occupied square set in
/// no class mask. The auxiliary register tracks castling-relevant has-moved
/// flags, the half-move clock, and the double-pawn-push marker.
///
/// A board is never shared mutably: search workers clone it and own the
/// clone exclusively.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    pub(crate) white: Bitboard,
    pub(crate) black: Bitboard,
    pub(crate) pawns: Bitboard,
    pub(crate) diag_sliders: Bitboard,
    pub(crate) ortho_sliders: Bitboard,
    pub(crate) kings: Bitboard,
    pub(crate) meta: BoardMeta,
    /// Position key for the side about to move
    pub(crate) key: u64,
    pub(crate) repetitions: RepetitionTable,
}

impl Board {
    /// Standard starting position, white to move.
    #[must_use]
    pub fn new() -> Self {
        Board::from_layout(&START_LAYOUT)
    }

    /// Build a position from a 64-element layout (see [`Board::layout`] for
    /// the encoding), white to move, nothing yet moved.
    ///
    /// The layout must be well-formed; use
    /// [`crate::tables::parse_layout`] to validate external data first.
    #[must_use]
    pub fn from_layout(layout: &[i8; 64]) -> Self {
        let mut board = Board {
            white: Bitboard::EMPTY,
            black: Bitboard::EMPTY,
            pawns: Bitboard::EMPTY,
            diag_sliders: Bitboard::EMPTY,
            ortho_sliders: Bitboard::EMPTY,
            kings: Bitboard::EMPTY,
            meta: BoardMeta::START,
            key: 0,
            repetitions: RepetitionTable::new(),
        };
        for (idx, &code) in layout.iter().enumerate() {
            if code == 0 {
                continue;
            }
            let color = if code > 0 { Color::White } else { Color::Black };
            let kind = PieceKind::from_code(code.abs()).expect("layout code out of range");
            board.set_piece(Square::from_index(idx), color, kind);
        }
        board.key = board.position_key(Color::White);
        board.repetitions.set(board.key, 1);
        board
    }

    #[inline]
    pub(crate) fn occupied(&self) -> u64 {
        self.white.0 | self.black.0
    }

    #[inline]
    pub(crate) fn side(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white.0,
            Color::Black => self.black.0,
        }
    }

    #[inline]
    pub(crate) fn knights(&self) -> u64 {
        self.occupied()
            & !self.pawns.0
            & !self.diag_sliders.0
            & !self.ortho_sliders.0
            & !self.kings.0
    }

    #[inline]
    pub(crate) fn empty_at(&self, idx: usize) -> bool {
        self.occupied() & bit(idx) == 0
    }

    #[inline]
    pub(crate) fn diag_at(&self, idx: usize) -> bool {
        self.diag_sliders.0 & bit(idx) != 0
    }

    #[inline]
    pub(crate) fn ortho_at(&self, idx: usize) -> bool {
        self.ortho_sliders.0 & bit(idx) != 0
    }

    #[inline]
    pub(crate) fn pawn_at(&self, idx: usize) -> bool {
        self.pawns.0 & bit(idx) != 0
    }

    #[inline]
    pub(crate) fn king_at(&self, idx: usize) -> bool {
        self.kings.0 & bit(idx) != 0
    }

    /// Color of the piece on a square, if any
    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        let b = bit(sq.index());
        if self.white.0 & b != 0 {
            Some(Color::White)
        } else if self.black.0 & b != 0 {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Piece kind on a square, if any
    #[must_use]
    pub fn kind_at(&self, sq: Square) -> Option<PieceKind> {
        let idx = sq.index();
        if self.empty_at(idx) {
            return None;
        }
        let kind = if self.king_at(idx) {
            PieceKind::King
        } else if self.pawn_at(idx) {
            PieceKind::Pawn
        } else if self.diag_at(idx) && self.ortho_at(idx) {
            PieceKind::Queen
        } else if self.diag_at(idx) {
            PieceKind::Bishop
        } else if self.ortho_at(idx) {
            PieceKind::Rook
        } else {
            PieceKind::Knight
        };
        Some(kind)
    }

    /// Full piece identity on a square, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, PieceKind)> {
        Some((self.color_at(sq)?, self.kind_at(sq)?))
    }

    /// Signed layout code of the piece on a square (0 if empty)
    #[must_use]
    pub fn code_at(&self, sq: Square) -> i8 {
        match self.piece_at(sq) {
            Some((color, kind)) => color.sign() * kind.code(),
            None => 0,
        }
    }

    /// Dense 64-element layout: 0 = empty, magnitude 1-6 = pawn, knight,
    /// bishop, rook, queen, king, sign = color; squares in index order
    /// (rank 1 first, file a first). This is the exchange format shared
    /// with the view layer.
    #[must_use]
    pub fn layout(&self) -> [i8; 64] {
        let mut out = [0i8; 64];
        for (idx, slot) in out.iter_mut().enumerate() {
            *slot = self.code_at(Square::from_index(idx));
        }
        out
    }

    /// Put a piece on a square, replacing whatever was there.
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, kind: PieceKind) {
        let b = bit(sq.index());
        self.wipe(sq);
        match color {
            Color::White => self.white.0 |= b,
            Color::Black => self.black.0 |= b,
        }
        match kind {
            PieceKind::Pawn => self.pawns.0 |= b,
            PieceKind::Knight => {}
            PieceKind::Bishop => self.diag_sliders.0 |= b,
            PieceKind::Rook => self.ortho_sliders.0 |= b,
            PieceKind::Queen => {
                self.diag_sliders.0 |= b;
                self.ortho_sliders.0 |= b;
            }
            PieceKind::King => self.kings.0 |= b,
        }
    }

    /// Clear a square in every mask.
    pub(crate) fn wipe(&mut self, sq: Square) {
        let clear = !bit(sq.index());
        self.white.0 &= clear;
        self.black.0 &= clear;
        self.pawns.0 &= clear;
        self.diag_sliders.0 &= clear;
        self.ortho_sliders.0 &= clear;
        self.kings.0 &= clear;
    }

    /// Copy the full piece identity of `from` onto `to` without decoding
    /// the piece type.
    pub(crate) fn copy_piece(&mut self, from: Square, to: Square) {
        let src = from.index();
        let dst = to.index();
        for mask in [
            &mut self.white,
            &mut self.black,
            &mut self.pawns,
            &mut self.diag_sliders,
            &mut self.ortho_sliders,
            &mut self.kings,
        ] {
            if mask.0 & bit(src) != 0 {
                mask.0 |= bit(dst);
            } else {
                mask.0 &= !bit(dst);
            }
        }
    }

    /// Square of a color's king.
    ///
    /// # Panics
    /// Panics if the color has no king bit set. That state is unreachable
    /// through correct move application, so hitting it means a caller or
    /// generator bug and aborting beats continuing with a corrupt game.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.kings.0 & self.side(color);
        assert!(kings != 0, "no {color} king on the board");
        Square::from_index(kings.trailing_zeros() as usize)
    }

    /// True when few enough pieces remain that endgame tables apply
    #[must_use]
    pub fn is_endgame(&self) -> bool {
        Bitboard(self.occupied()).popcount() < ENDGAME_PIECE_LIMIT
    }

    /// Plies since the last capture or pawn move
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.meta.halfmove_clock()
    }

    /// Fifty-move rule: no capture or pawn move for 50 plies
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.meta.halfmove_clock() >= 50
    }

    /// True three-fold repetition of the current position (piece
    /// placements, has-moved flags, double-push marker, and side to move)
    #[must_use]
    pub fn is_repetition_draw(&self) -> bool {
        self.repetitions.get(self.key) >= 3
    }

    /// Any rule-based draw
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_repetition_draw()
    }

    /// Key identifying this position with `side_to_move` on turn.
    pub(crate) fn position_key(&self, side_to_move: Color) -> u64 {
        let mut key = 0u64;

        let mut occ = self.occupied();
        while occ != 0 {
            let idx = pop_lsb(&mut occ);
            let sq = Square::from_index(idx);
            let (color, kind) = self.piece_at(sq).expect("occupied square");
            key ^= ZOBRIST.piece_keys[kind.index()][color.index()][idx];
        }

        if side_to_move == Color::Black {
            key ^= ZOBRIST.black_to_move_key;
        }

        let mut flags = self.meta.moved_flag_bits();
        while flags != 0 {
            let flag = flags.trailing_zeros() as usize;
            flags &= flags - 1;
            key ^= ZOBRIST.moved_flag_keys[flag];
        }

        if let Some(file) = self.meta.double_push_file() {
            key ^= ZOBRIST.en_passant_keys[file];
        }

        key
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let code = self.code_at(Square(rank, file));
                write!(f, "{code:3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
