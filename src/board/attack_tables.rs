//! Precomputed jump-attack tables for knights, kings, and pawns.

use once_cell::sync::Lazy;

fn jump_table(deltas: &[(isize, isize)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, mask) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        for (dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                *mask |= 1u64 << ((nr as usize) * 8 + nf as usize);
            }
        }
    }
    attacks
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    jump_table(&[
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ])
});

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    jump_table(&[
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ])
});

/// `PAWN_ATTACKS[color][sq]` is the set of squares a pawn of `color` on
/// `sq` attacks. A square `t` is attacked by pawns of color `c` exactly
/// when `PAWN_ATTACKS[c.opponent()][t]` intersects those pawns.
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    [
        jump_table(&[(1, -1), (1, 1)]),
        jump_table(&[(-1, -1), (-1, 1)]),
    ]
});
