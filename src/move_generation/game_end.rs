//! Game-ending predicates evaluated on a board.
//!
//! These look at the position only. Draw claims, clocks and resignation are
//! session concerns and live in `session::game`.

use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, FIVEFOLD_OCCURRENCES, THREEFOLD_OCCURRENCES};
use crate::game_state::coordinates::Coordinate;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

pub fn is_checkmate(game_state: &mut GameState) -> bool {
    is_king_in_check(game_state, game_state.side_to_move) && !has_legal_move(game_state)
}

pub fn is_stalemate(game_state: &mut GameState) -> bool {
    !is_king_in_check(game_state, game_state.side_to_move) && !has_legal_move(game_state)
}

#[inline]
pub fn is_fifty_move_draw(game_state: &GameState) -> bool {
    game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES
}

#[inline]
pub fn is_threefold_repetition(game_state: &GameState) -> bool {
    game_state.repetition_count() >= THREEFOLD_OCCURRENCES
}

#[inline]
pub fn is_fivefold_repetition(game_state: &GameState) -> bool {
    game_state.repetition_count() >= FIVEFOLD_OCCURRENCES
}

/// Neither side can ever mate: K v K, K+N v K, K+B v K, or only bishops
/// left and all of them on squares of one colour.
pub fn has_insufficient_material(game_state: &GameState) -> bool {
    let heavy_or_pawns = Color::ALL.into_iter().any(|color| {
        game_state.bitboard(color, PieceKind::Pawn)
            | game_state.bitboard(color, PieceKind::Rook)
            | game_state.bitboard(color, PieceKind::Queen)
            != 0
    });
    if heavy_or_pawns {
        return false;
    }

    let knights = game_state.bitboard(Color::White, PieceKind::Knight)
        | game_state.bitboard(Color::Black, PieceKind::Knight);
    let bishops = game_state.bitboard(Color::White, PieceKind::Bishop)
        | game_state.bitboard(Color::Black, PieceKind::Bishop);
    let minors = (knights | bishops).count_ones();

    if minors <= 1 {
        return true;
    }
    if knights != 0 {
        return false;
    }
    bishops_on_one_square_colour(bishops)
}

/// Whether `color` could still deliver mate with its remaining material.
///
/// A bare king or a king with a single minor piece cannot; anything more can.
pub fn has_mating_material(game_state: &GameState, color: Color) -> bool {
    let pawns_or_heavy = game_state.bitboard(color, PieceKind::Pawn)
        | game_state.bitboard(color, PieceKind::Rook)
        | game_state.bitboard(color, PieceKind::Queen);
    if pawns_or_heavy != 0 {
        return true;
    }
    let minors = game_state.bitboard(color, PieceKind::Knight) | game_state.bitboard(color, PieceKind::Bishop);
    minors.count_ones() >= 2
}

fn bishops_on_one_square_colour(mut bishops: u64) -> bool {
    let mut dark = 0;
    let mut light = 0;
    while bishops != 0 {
        let square = bishops.trailing_zeros() as Square;
        if Coordinate::from_square(square).is_dark() {
            dark += 1;
        } else {
            light += 1;
        }
        bishops &= bishops - 1;
    }
    dark == 0 || light == 0
}
