//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves per geometry class, then keeps the ones that
//! do not leave the mover's king attacked. Filtering is make / test / unmake
//! on the caller's board, so the board is unchanged on return.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliding::generate_sliding_moves;
use crate::move_generation::legal_moves_stepping::generate_knight_moves;
use crate::moves::move_descriptions::MoveDescription;

pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<MoveDescription> {
    let mut pseudo = Vec::with_capacity(128);
    generate_pawn_moves(game_state, &mut pseudo);
    generate_knight_moves(game_state, &mut pseudo);
    generate_sliding_moves(game_state, &mut pseudo);
    generate_king_moves(game_state, &mut pseudo);
    pseudo
}

pub fn generate_legal_moves(game_state: &mut GameState) -> Vec<MoveDescription> {
    let mover = game_state.side_to_move;
    let pseudo = generate_pseudo_legal_moves(game_state);
    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        make_move(game_state, mv);
        // Illegal if own king is in check after move.
        let leaves_check = is_king_in_check(game_state, mover);
        unmake_move(game_state);
        if !leaves_check {
            legal.push(mv);
        }
    }
    legal
}

/// Side-effect-free variant for callers holding a shared reference.
pub fn generate_all_valid_moves(game_state: &GameState) -> Vec<MoveDescription> {
    generate_legal_moves(&mut game_state.scratch_copy())
}

/// True as soon as one legal move is found.
pub fn has_legal_move(game_state: &mut GameState) -> bool {
    let mover = game_state.side_to_move;
    generate_pseudo_legal_moves(game_state).into_iter().any(|mv| {
        make_move(game_state, mv);
        let safe = !is_king_in_check(game_state, mover);
        unmake_move(game_state);
        safe
    })
}
