//! Precomputed attack maps for the stepping pieces (knight and king).
//!
//! Tables are built at compile time from the same offset lists that describe
//! each kind's geometry in `chess_types`, so the bitboard generator and the
//! square-by-square validator cannot disagree.

use crate::game_state::chess_types::{Square, KING_OFFSETS, KNIGHT_OFFSETS};

pub const KNIGHT_ATTACKS: [u64; 64] = build_stepping_table(&KNIGHT_OFFSETS);
pub const KING_ATTACKS: [u64; 64] = build_stepping_table(&KING_OFFSETS);

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

const fn build_stepping_table(offsets: &[(i8, i8)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;

        let mut i = 0usize;
        while i < offsets.len() {
            attacks |= set_if_valid(file + offsets[i].0 as i32, rank + offsets[i].1 as i32);
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn set_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }

    1u64 << ((rank as usize) * 8 + (file as usize))
}

#[cfg(test)]
mod tests {
    use super::{king_attacks, knight_attacks};

    #[test]
    fn knight_from_d4_has_eight_targets() {
        assert_eq!(knight_attacks(27).count_ones(), 8);
    }

    #[test]
    fn knight_from_corner_has_two_targets() {
        let a1 = 0u8;
        assert_eq!(knight_attacks(a1), (1u64 << 10) | (1u64 << 17));
    }

    #[test]
    fn king_from_a1_has_three_targets() {
        assert_eq!(king_attacks(0).count_ones(), 3);
        assert_eq!(king_attacks(27).count_ones(), 8);
    }
}
