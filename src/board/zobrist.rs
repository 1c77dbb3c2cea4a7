//! Zobrist keys for position identity.
//!
//! Keys cover piece placements, the six has-moved flags, the double-push
//! file, and the side to move, so equal keys mean equal positions for the
//! purposes of the three-fold repetition rule.

use once_cell::sync::Lazy;
use rand::prelude::*;

pub(crate) struct ZobristKeys {
    // piece_keys[piece_kind][color][square_index]
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    // one key per has-moved flag, in register bit order
    pub(crate) moved_flag_keys: [u64; 6],
    // en_passant_keys[file of the double-pushed pawn]
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed keeps keys stable across runs
        let mut rng = StdRng::seed_from_u64(0x5EED_0F_B0A4D);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut moved_flag_keys = [0; 6];
        let mut en_passant_keys = [0; 8];

        for kind in &mut piece_keys {
            for color in kind.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut moved_flag_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            moved_flag_keys,
            en_passant_keys,
        }
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
