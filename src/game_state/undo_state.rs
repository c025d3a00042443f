use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::MoveDescription;

/// Single undo record pushed by `make_move` and consumed by `unmake_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub mv: MoveDescription,
    pub moved_piece: PieceKind,
    pub captured_piece: Option<PieceKind>,
    /// Where the captured piece stood; differs from the destination for
    /// en-passant captures.
    pub captured_square: Option<Square>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,

    pub prev_zobrist_key: u64,
}
