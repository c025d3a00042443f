//! In-place move application and its exact inverse.
//!
//! `make_move` assumes the move came from the generator or the validator; it
//! updates placement, rights, en-passant target, counters and the Zobrist key
//! incrementally and pushes an [`UndoState`]. `unmake_move` pops it and
//! restores every field bit for bit.

use crate::game_state::chess_rules::{castle_path, castle_side_for_king_move, CASTLING_RIGHTS_MASK};
use crate::game_state::zobrist::{
    castling_key, en_passant_file_key, piece_square_key, side_to_move_key,
};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::MoveDescription;

pub fn make_move(game_state: &mut GameState, mv: MoveDescription) {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let from = mv.from_square();
    let to = mv.to_square();
    let moved_piece = mv.moved_piece();

    let mut undo = UndoState {
        mv,
        moved_piece,
        captured_piece: None,
        captured_square: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
        prev_zobrist_key: game_state.zobrist_key,
    };

    let mut key = game_state.zobrist_key;
    if let Some(ep) = game_state.en_passant_square {
        key ^= en_passant_file_key(ep % 8);
    }
    key ^= castling_key(game_state.castling_rights);

    // Captures.
    if mv.is_en_passant() {
        let capture_sq = match us {
            Color::White => to - 8,
            Color::Black => to + 8,
        };
        game_state.remove_piece(capture_sq, them, PieceKind::Pawn);
        key ^= piece_square_key(them, PieceKind::Pawn, capture_sq);
        undo.captured_piece = Some(PieceKind::Pawn);
        undo.captured_square = Some(capture_sq);
    } else if let Some(captured) = game_state.piece_on(to).filter(|p| p.color == them) {
        game_state.remove_piece(to, them, captured.kind);
        key ^= piece_square_key(them, captured.kind, to);
        undo.captured_piece = Some(captured.kind);
        undo.captured_square = Some(to);
    }

    // Moved or promoted piece.
    game_state.remove_piece(from, us, moved_piece);
    key ^= piece_square_key(us, moved_piece, from);
    let landing = mv.promotion_piece().unwrap_or(moved_piece);
    game_state.put_piece(to, us, landing);
    key ^= piece_square_key(us, landing, to);

    // Castling rook.
    if mv.is_castling() {
        if let Some(side) = castle_side_for_king_move(us, from, to) {
            let path = castle_path(us, side);
            game_state.remove_piece(path.rook_from, us, PieceKind::Rook);
            game_state.put_piece(path.rook_to, us, PieceKind::Rook);
            key ^= piece_square_key(us, PieceKind::Rook, path.rook_from);
            key ^= piece_square_key(us, PieceKind::Rook, path.rook_to);
        }
    }

    game_state.castling_rights &=
        CASTLING_RIGHTS_MASK[from as usize] & CASTLING_RIGHTS_MASK[to as usize];
    key ^= castling_key(game_state.castling_rights);

    game_state.en_passant_square = if mv.is_double_pawn_push() {
        let ep = (from + to) / 2;
        key ^= en_passant_file_key(ep % 8);
        Some(ep)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || undo.captured_piece.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if us == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = them;
    key ^= side_to_move_key();

    game_state.zobrist_key = key;
    game_state.undo_stack.push(undo);
}

/// Reverse the most recent `make_move`. Returns the move undone, or `None`
/// when the history is empty.
pub fn unmake_move(game_state: &mut GameState) -> Option<MoveDescription> {
    let undo = game_state.undo_stack.pop()?;
    let mv = undo.mv;
    let us = game_state.side_to_move.opposite();
    let them = us.opposite();
    let from = mv.from_square();
    let to = mv.to_square();

    let landing = mv.promotion_piece().unwrap_or(undo.moved_piece);
    game_state.remove_piece(to, us, landing);
    game_state.put_piece(from, us, undo.moved_piece);

    if mv.is_castling() {
        if let Some(side) = castle_side_for_king_move(us, from, to) {
            let path = castle_path(us, side);
            game_state.remove_piece(path.rook_to, us, PieceKind::Rook);
            game_state.put_piece(path.rook_from, us, PieceKind::Rook);
        }
    }

    if let (Some(kind), Some(square)) = (undo.captured_piece, undo.captured_square) {
        game_state.put_piece(square, them, kind);
    }

    game_state.side_to_move = us;
    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;
    game_state.zobrist_key = undo.prev_zobrist_key;

    Some(mv)
}

/// Apply a move to a scratch copy and return it, leaving `game_state` as is.
pub fn apply_move(game_state: &GameState, mv: MoveDescription) -> GameState {
    let mut next = game_state.scratch_copy();
    make_move(&mut next, mv);
    next
}
