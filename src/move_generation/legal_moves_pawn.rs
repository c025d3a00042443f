use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::move_descriptions::{
    MoveDescription, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};
use crate::moves::pawn_attacks::pawn_attacks;

pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let ep_mask = game_state.en_passant_square.map_or(0, |sq| 1u64 << sq);

    let mut pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        let rank = from / 8;

        // Pawns never stand on the promotion rank, so one step stays on the board.
        let one_step = (from as i8 + 8 * side.pawn_step()) as Square;
        if (1u64 << one_step) & empty != 0 {
            push_pawn_move(out, side, from, one_step, None, 0);

            if rank == side.pawn_home_rank() {
                let two_step = (from as i8 + 16 * side.pawn_step()) as Square;
                if (1u64 << two_step) & empty != 0 {
                    out.push(MoveDescription::new(
                        from,
                        two_step,
                        PieceKind::Pawn,
                        None,
                        None,
                        FLAG_DOUBLE_PAWN_PUSH,
                    ));
                }
            }
        }

        let attacks = pawn_attacks(side, from);
        let mut captures = attacks & enemy_occ;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            push_pawn_move(out, side, from, to, enemy_piece_on(game_state, to), FLAG_CAPTURE);
            captures &= captures - 1;
        }

        if attacks & ep_mask != 0 {
            out.push(MoveDescription::new(
                from,
                ep_mask.trailing_zeros() as Square,
                PieceKind::Pawn,
                Some(PieceKind::Pawn),
                None,
                FLAG_CAPTURE | FLAG_EN_PASSANT,
            ));
        }

        pawns &= pawns - 1;
    }
}

/// Push a non-double pawn move, expanding it into the four promotions when it
/// reaches the last rank.
fn push_pawn_move(
    out: &mut Vec<MoveDescription>,
    side: Color,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: u8,
) {
    if to / 8 == side.promotion_rank() {
        for promo in PieceKind::PROMOTIONS {
            out.push(MoveDescription::new(from, to, PieceKind::Pawn, captured, Some(promo), flags));
        }
    } else {
        out.push(MoveDescription::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}
