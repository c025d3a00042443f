use crate::game_state::chess_rules::castle_path;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::move_descriptions::{MoveDescription, FLAG_CASTLING};
use crate::moves::stepping_attacks::king_attacks;

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let king_bb = game_state.pieces[side.index()][PieceKind::King.index()];
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    push_target_moves(game_state, from, PieceKind::King, king_attacks(from) & !own_occ, out);

    generate_castling_moves(game_state, out, from);
}

fn generate_castling_moves(game_state: &GameState, out: &mut Vec<MoveDescription>, king_from: Square) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let rooks = game_state.pieces[side.index()][PieceKind::Rook.index()];

    for castle_side in CastleSide::ALL {
        if game_state.castling_rights & castle_side.right(side) == 0 {
            continue;
        }
        let path = castle_path(side, castle_side);
        if king_from != path.king_from
            || rooks & (1u64 << path.rook_from) == 0
            || game_state.occupancy_all & path.must_be_empty != 0
        {
            continue;
        }
        // Cannot castle out of, through or into check.
        if is_square_attacked(game_state, king_from, enemy)
            || path
                .king_path
                .iter()
                .any(|sq| is_square_attacked(game_state, *sq, enemy))
        {
            continue;
        }
        out.push(MoveDescription::new(
            path.king_from,
            path.king_to,
            PieceKind::King,
            None,
            None,
            FLAG_CASTLING,
        ));
    }
}
