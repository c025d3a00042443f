//! Core incremental board state representation.
//!
//! `GameState` is the board: piece bitboards, occupancy caches, turn and
//! rights flags, move counters, the incremental Zobrist key and the undo
//! stack used by `make_move` / `unmake_move`. It is mutated only through
//! those two operations; probing a hypothetical continuation is done on an
//! explicit [`GameState::scratch_copy`].

use std::fmt;

use crate::errors::FenError;
use crate::game_state::chess_rules::BACK_RANK_LAYOUT;
use crate::game_state::chess_types::*;
use crate::game_state::coordinates::Coordinate;
use crate::game_state::zobrist::compute_zobrist_key;
use crate::moves::move_descriptions::MoveDescription;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::render_game_state::render_game_state;

#[derive(Debug, Clone)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,

    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,
            undo_stack: Vec::new(),
        }
    }
}

/// Two boards are equal when their positions are; undo history is ignored.
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for GameState {}

impl GameState {
    /// Board with no pieces; only FEN parsing builds on this.
    #[inline]
    pub(crate) fn new_empty() -> Self {
        Self::default()
    }

    /// Standard initial layout, white to move, all castling rights.
    pub fn new_game() -> Self {
        let mut game_state = Self::new_empty();
        for color in Color::ALL {
            let back = color.back_rank();
            let pawns = color.pawn_home_rank();
            for (file, kind) in BACK_RANK_LAYOUT.iter().enumerate() {
                let file = file as Square;
                game_state.put_piece(back * 8 + file, color, *kind);
                game_state.put_piece(pawns * 8 + file, color, PieceKind::Pawn);
            }
        }
        game_state.castling_rights = CASTLE_ALL;
        game_state.zobrist_key = compute_zobrist_key(&game_state);
        game_state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Copy of the position without undo history, for legality probing.
    pub fn scratch_copy(&self) -> Self {
        Self {
            undo_stack: Vec::new(),
            ..self.clone()
        }
    }

    pub fn piece_at(&self, coordinate: Coordinate) -> Option<Piece> {
        self.piece_on(coordinate.square())
    }

    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        let color = if self.occupancy_by_color[Color::White.index()] & mask != 0 {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[color.index()][kind.index()] & mask != 0)
            .map(|kind| Piece::new(kind, color))
    }

    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    /// Moves applied since this board was created and not yet undone.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn last_move(&self) -> Option<MoveDescription> {
        self.undo_stack.last().map(|undo| undo.mv)
    }

    /// Key identifying the position for repetition purposes: placement, side
    /// to move, castling rights and en-passant file, but not the counters.
    #[inline]
    pub fn repetition_key(&self) -> u64 {
        self.zobrist_key
    }

    /// How many times the current position has occurred, counting this one,
    /// since the board was created. Only positions inside the current
    /// reversible-move window can match.
    pub fn repetition_count(&self) -> usize {
        let key = self.repetition_key();
        1 + self
            .undo_stack
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .filter(|undo| undo.prev_zobrist_key == key)
            .count()
    }

    /// Place a piece without touching the hash.
    #[inline]
    pub(crate) fn put_piece(&mut self, square: Square, color: Color, kind: PieceKind) {
        let mask = 1u64 << square;
        self.pieces[color.index()][kind.index()] |= mask;
        self.occupancy_by_color[color.index()] |= mask;
        self.occupancy_all |= mask;
    }

    /// Remove a piece without touching the hash.
    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square, color: Color, kind: PieceKind) {
        let mask = !(1u64 << square);
        self.pieces[color.index()][kind.index()] &= mask;
        self.occupancy_by_color[color.index()] &= mask;
        self.occupancy_all &= mask;
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_game_state(self))
    }
}
