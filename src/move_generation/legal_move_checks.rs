//! Attack and check detection.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::pawn_attacks::pawn_attacks;
use crate::moves::sliding_attacks::{bishop_attacks, rook_attacks};
use crate::moves::stepping_attacks::{king_attacks, knight_attacks};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.bitboard(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Is `square` attacked by any piece of `attacker_color`?
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    // A pawn of `attacker_color` attacks `square` exactly when a pawn of the
    // other colour on `square` would attack the pawn's square.
    let attacker_pawns = game_state.bitboard(attacker_color, PieceKind::Pawn);
    if pawn_attacks(attacker_color.opposite(), square) & attacker_pawns != 0 {
        return true;
    }

    if knight_attacks(square) & game_state.bitboard(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & game_state.bitboard(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    let queens = game_state.bitboard(attacker_color, PieceKind::Queen);

    let bishops_queens = game_state.bitboard(attacker_color, PieceKind::Bishop) | queens;
    if bishops_queens != 0 && bishop_attacks(square, game_state.occupancy_all) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = game_state.bitboard(attacker_color, PieceKind::Rook) | queens;
    if rooks_queens != 0 && rook_attacks(square, game_state.occupancy_all) & rooks_queens != 0 {
        return true;
    }

    false
}

/// Every `(square, kind)` of `attacker_color` attacking `square`.
pub fn attackers_to_square(
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
) -> Vec<(Square, PieceKind)> {
    let occ = game_state.occupancy_all;
    let mut out = Vec::new();
    for kind in PieceKind::ALL {
        let reach = match kind {
            PieceKind::Pawn => pawn_attacks(attacker_color.opposite(), square),
            PieceKind::Knight => knight_attacks(square),
            PieceKind::Bishop => bishop_attacks(square, occ),
            PieceKind::Rook => rook_attacks(square, occ),
            PieceKind::Queen => bishop_attacks(square, occ) | rook_attacks(square, occ),
            PieceKind::King => king_attacks(square),
        };
        let mut hits = reach & game_state.bitboard(attacker_color, kind);
        while hits != 0 {
            out.push((hits.trailing_zeros() as Square, kind));
            hits &= hits - 1;
        }
    }
    out
}
