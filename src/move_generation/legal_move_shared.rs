use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{MoveDescription, FLAG_CAPTURE};

#[inline]
pub fn piece_on_square_for_color(
    game_state: &GameState,
    color: Color,
    square: Square,
) -> Option<PieceKind> {
    let mask = 1u64 << square;
    PieceKind::ALL
        .into_iter()
        .find(|piece| game_state.pieces[color.index()][piece.index()] & mask != 0)
}

#[inline]
pub fn enemy_piece_on(game_state: &GameState, square: Square) -> Option<PieceKind> {
    piece_on_square_for_color(game_state, game_state.side_to_move.opposite(), square)
}

/// Emit one move per set bit in `targets`, flagging captures of enemy pieces.
pub fn push_target_moves(
    game_state: &GameState,
    from: Square,
    piece: PieceKind,
    mut targets: u64,
    out: &mut Vec<MoveDescription>,
) {
    let enemy_occ = game_state.occupancy_by_color[game_state.side_to_move.opposite().index()];
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        let is_capture = (1u64 << to) & enemy_occ != 0;
        let captured = if is_capture {
            enemy_piece_on(game_state, to)
        } else {
            None
        };
        out.push(MoveDescription::new(
            from,
            to,
            piece,
            captured,
            None,
            if is_capture { FLAG_CAPTURE } else { 0 },
        ));
        targets &= targets - 1;
    }
}
