use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::move_descriptions::MoveDescription;
use crate::moves::sliding_attacks::sliding_attacks;

const SLIDING_KINDS: [PieceKind; 3] = [PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

/// Bishop, rook and queen moves, each along its own ray set.
pub fn generate_sliding_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    for kind in SLIDING_KINDS {
        let Geometry::Sliding(directions) = kind.geometry() else {
            continue;
        };
        let mut sliders = game_state.pieces[side.index()][kind.index()];
        while sliders != 0 {
            let from = sliders.trailing_zeros() as Square;
            let targets = sliding_attacks(from, game_state.occupancy_all, directions) & !own_occ;
            push_target_moves(game_state, from, kind, targets, out);
            sliders &= sliders - 1;
        }
    }
}
