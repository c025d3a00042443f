//! Pawn capture maps per colour.

use crate::game_state::chess_types::{Color, Square};

pub const WHITE_PAWN_ATTACKS: [u64; 64] = build_pawn_attacks(1);
pub const BLACK_PAWN_ATTACKS: [u64; 64] = build_pawn_attacks(-1);

/// Squares a pawn of `color` standing on `square` attacks.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

const fn build_pawn_attacks(rank_step: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32 + rank_step;
        let mut attacks = 0u64;

        if rank >= 0 && rank < 8 {
            if file > 0 {
                attacks |= 1u64 << ((rank * 8 + file - 1) as u32);
            }
            if file < 7 {
                attacks |= 1u64 << ((rank * 8 + file + 1) as u32);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}
