//! Piece-square table and layout configuration parsing.
//!
//! The core consumes tables and layouts as already-parsed arrays; the
//! parsers here turn the external text formats into those arrays and
//! report malformed data as recoverable errors instead of limping along
//! with partially-initialized tables.

use std::fmt;

use crate::board::{Color, PieceKind};

/// Per-square scores indexed by `piece code + 6`, so row 0 is the black
/// king, row 6 (always zero) the empty square, and row 12 the white king.
pub type PieceSquareTable = [[i32; 64]; 13];

const SQUARES: usize = 64;
const GRIDS: usize = 6;

/// Error type for piece-square table parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Wrong number of values (needs 6 grids of 64)
    BadValueCount { expected: usize, found: usize },
    /// A token that is not an integer
    InvalidValue { index: usize, text: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::BadValueCount { expected, found } => {
                write!(f, "piece table needs {expected} values, found {found}")
            }
            TableError::InvalidValue { index, text } => {
                write!(f, "piece table value {index} is not an integer: '{text}'")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Error type for starting-layout parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Wrong number of values (needs 64)
    BadValueCount { expected: usize, found: usize },
    /// A token that is not an integer
    InvalidValue { index: usize, text: String },
    /// A piece code outside -6..=6
    InvalidCode { index: usize, code: i64 },
    /// A side with zero or several kings
    KingCount { color: Color, found: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::BadValueCount { expected, found } => {
                write!(f, "layout needs {expected} values, found {found}")
            }
            LayoutError::InvalidValue { index, text } => {
                write!(f, "layout value {index} is not an integer: '{text}'")
            }
            LayoutError::InvalidCode { index, code } => {
                write!(f, "layout value {index} is not a piece code: {code}")
            }
            LayoutError::KingCount { color, found } => {
                write!(f, "layout has {found} {color} kings, expected exactly 1")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Vertical mirror of a dense square index (a1 <-> a8)
#[inline]
const fn mirror(idx: usize) -> usize {
    8 * ((63 - idx) / 8) + idx % 8
}

/// Parse one phase's piece-square table.
///
/// The text holds six 64-value grids in descending piece-code order
/// (king, queen, rook, bishop, knight, pawn), each in square-index order.
/// Grid entries are written from black's point of view: entry `j` is
/// negated for a black piece on square `j` and credited unchanged to a
/// white piece on the vertically mirrored square.
pub fn parse_piece_tables(text: &str) -> Result<PieceSquareTable, TableError> {
    let expected = GRIDS * SQUARES;
    let mut values = Vec::with_capacity(expected);
    for (index, token) in text.split_whitespace().enumerate() {
        let value: i32 = token.parse().map_err(|_| TableError::InvalidValue {
            index,
            text: token.to_string(),
        })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(TableError::BadValueCount {
            expected,
            found: values.len(),
        });
    }

    let mut table: PieceSquareTable = [[0; SQUARES]; 13];
    for grid in 0..GRIDS {
        for sq in 0..SQUARES {
            let value = values[grid * SQUARES + sq];
            table[grid][sq] = -value;
            table[12 - grid][mirror(sq)] = value;
        }
    }
    log::debug!("parsed piece-square table ({GRIDS} grids)");
    Ok(table)
}

/// Parse a starting layout.
///
/// The text holds 64 piece codes listed top rank first (rank 8 down to
/// rank 1, files a to h), the way a board reads on screen. The returned
/// array is in dense index order (rank 1 first).
pub fn parse_layout(text: &str) -> Result<[i8; 64], LayoutError> {
    let mut layout = [0i8; 64];
    let mut count = 0usize;
    for (index, token) in text.split_whitespace().enumerate() {
        let value: i64 = token.parse().map_err(|_| LayoutError::InvalidValue {
            index,
            text: token.to_string(),
        })?;
        if !(-6..=6).contains(&value) {
            return Err(LayoutError::InvalidCode { index, code: value });
        }
        if index >= 64 {
            count = index + 1;
            continue;
        }
        let rank = 7 - index / 8;
        let file = index % 8;
        layout[rank * 8 + file] = value as i8;
        count = index + 1;
    }
    if count != 64 {
        return Err(LayoutError::BadValueCount {
            expected: 64,
            found: count,
        });
    }

    for color in Color::BOTH {
        let king_code = color.sign() * PieceKind::King.code();
        let found = layout.iter().filter(|&&c| c == king_code).count();
        if found != 1 {
            return Err(LayoutError::KingCount { color, found });
        }
    }

    log::debug!("parsed starting layout");
    Ok(layout)
}
