//! Canonical chess-rule constants.
//!
//! Starting layout, castling geometry and the thresholds of the automatic
//! draw rules.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Piece order on the back rank from the a-file to the h-file.
pub const BACK_RANK_LAYOUT: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Half-moves without pawn move or capture after which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Occurrences of a position that allow a draw claim.
pub const THREEFOLD_OCCURRENCES: usize = 3;

/// Occurrences of a position that end the game automatically.
pub const FIVEFOLD_OCCURRENCES: usize = 5;

/// Fixed squares involved in one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub must_be_empty: u64,
    /// Squares the king crosses or lands on; none may be attacked.
    pub king_path: [Square; 2],
}

pub const fn castle_path(color: Color, side: CastleSide) -> CastlePath {
    let base = color.back_rank() * 8;
    match side {
        CastleSide::KingSide => CastlePath {
            king_from: base + 4,
            king_to: base + 6,
            rook_from: base + 7,
            rook_to: base + 5,
            must_be_empty: (1u64 << (base + 5)) | (1u64 << (base + 6)),
            king_path: [base + 5, base + 6],
        },
        CastleSide::QueenSide => CastlePath {
            king_from: base + 4,
            king_to: base + 2,
            rook_from: base,
            rook_to: base + 3,
            must_be_empty: (1u64 << (base + 1)) | (1u64 << (base + 2)) | (1u64 << (base + 3)),
            king_path: [base + 3, base + 2],
        },
    }
}

/// Recognise a castling king move from its squares.
pub fn castle_side_for_king_move(color: Color, from: Square, to: Square) -> Option<CastleSide> {
    CastleSide::ALL.into_iter().find(|side| {
        let path = castle_path(color, *side);
        path.king_from == from && path.king_to == to
    })
}

/// Rights that survive a piece leaving or landing on each square.
pub const CASTLING_RIGHTS_MASK: [CastlingRights; 64] = build_castling_rights_mask();

const fn build_castling_rights_mask() -> [CastlingRights; 64] {
    let mut table = [CASTLE_ALL; 64];
    table[0] = CASTLE_ALL & !CASTLE_WHITE_QUEENSIDE;
    table[4] = CASTLE_ALL & !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE);
    table[7] = CASTLE_ALL & !CASTLE_WHITE_KINGSIDE;
    table[56] = CASTLE_ALL & !CASTLE_BLACK_QUEENSIDE;
    table[60] = CASTLE_ALL & !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
    table[63] = CASTLE_ALL & !CASTLE_BLACK_KINGSIDE;
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_paths_use_standard_squares() {
        let white_short = castle_path(Color::White, CastleSide::KingSide);
        assert_eq!((white_short.king_from, white_short.king_to), (4, 6));
        assert_eq!((white_short.rook_from, white_short.rook_to), (7, 5));

        let black_long = castle_path(Color::Black, CastleSide::QueenSide);
        assert_eq!((black_long.king_from, black_long.king_to), (60, 58));
        assert_eq!((black_long.rook_from, black_long.rook_to), (56, 59));
        assert_eq!(black_long.must_be_empty.count_ones(), 3);
    }

    #[test]
    fn recognises_castling_king_moves() {
        assert_eq!(
            castle_side_for_king_move(Color::White, 4, 2),
            Some(CastleSide::QueenSide)
        );
        assert_eq!(castle_side_for_king_move(Color::White, 4, 5), None);
        assert_eq!(
            castle_side_for_king_move(Color::Black, 60, 62),
            Some(CastleSide::KingSide)
        );
    }
}
