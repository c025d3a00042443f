use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::move_descriptions::MoveDescription;
use crate::moves::stepping_attacks::knight_attacks;

/// Knight moves; the king's steps are generated with castling in
/// `legal_moves_king`.
pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut knights = game_state.pieces[side.index()][PieceKind::Knight.index()];
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        push_target_moves(game_state, from, PieceKind::Knight, knight_attacks(from) & !own_occ, out);
        knights &= knights - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::generate_knight_moves;
    use crate::game_state::game_state::GameState;

    #[test]
    fn corner_knight_has_two_moves() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_knight_moves(&game, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn knight_captures_are_flagged() {
        let game = GameState::from_fen("4k3/8/8/8/8/1p6/8/N3K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_knight_moves(&game, &mut out);
        assert_eq!(out.iter().filter(|mv| mv.is_capture()).count(), 1);
    }
}
