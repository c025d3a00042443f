//! Occupancy-aware ray attacks for bishops, rooks and queens.
//!
//! Rays stop at (and include) the first occupied square.

use crate::game_state::chess_types::Square;
use crate::game_state::coordinates::Direction;

pub fn sliding_attacks(square: Square, occupancy: u64, directions: &[Direction]) -> u64 {
    directions
        .iter()
        .fold(0u64, |acc, direction| acc | trace_ray(square, *direction, occupancy))
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    sliding_attacks(square, occupancy, &Direction::DIAGONAL)
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    sliding_attacks(square, occupancy, &Direction::ORTHOGONAL)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

fn trace_ray(square: Square, direction: Direction, occupancy: u64) -> u64 {
    let file_step = i32::from(direction.file_step);
    let rank_step = i32::from(direction.rank_step);
    let mut file = i32::from(square % 8) + file_step;
    let mut rank = i32::from(square / 8) + rank_step;
    let mut attacks = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << ((rank * 8 + file) as u32);
        attacks |= bit;

        if (occupancy & bit) != 0 {
            break;
        }

        file += file_step;
        rank += rank_step;
    }

    attacks
}
