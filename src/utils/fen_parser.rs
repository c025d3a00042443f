//! FEN-to-GameState parser.
//!
//! Builds a fully-populated board from a Forsyth-Edwards Notation string:
//! piece bitboards, occupancies, rights, counters and the Zobrist key. Both
//! the text and the described position are validated; a board is returned
//! only if it could occur under the rules' invariants.

use crate::errors::FenError;
use crate::game_state::chess_rules::castle_path;
use crate::game_state::coordinates::Coordinate;
use crate::game_state::zobrist::compute_zobrist_key;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
    let halfmove_part = parts.next().ok_or(FenError::MissingField("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or(FenError::MissingField("fullmove number"))?;

    if parts.next().is_some() {
        return Err(FenError::ExtraFields);
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square =
        parse_en_passant_square(en_passant_part, game_state.side_to_move)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| FenError::InvalidHalfmoveClock(halfmove_part.to_owned()))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove_part.to_owned()))?;

    validate_material(&game_state)?;
    validate_castling_placement(&game_state)?;
    validate_en_passant_placement(&game_state)?;
    if is_king_in_check(&game_state, game_state.side_to_move.opposite()) {
        return Err(FenError::OpponentInCheck);
    }

    game_state.zobrist_key = compute_zobrist_key(&game_state);
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = (7 - fen_rank_idx) as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::InvalidEmptyCount(ch));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(FenError::RankWidth { rank: board_rank + 1 });
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
            if file >= 8 {
                return Err(FenError::RankWidth { rank: board_rank + 1 });
            }

            game_state.put_piece(board_rank * 8 + file, piece.color, piece.kind);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::RankWidth { rank: board_rank + 1 });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::InvalidSideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        let bit = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(FenError::InvalidCastling(castling_part.to_owned())),
        };
        if rights & bit != 0 {
            return Err(FenError::InvalidCastling(castling_part.to_owned()));
        }
        rights |= bit;
    }

    Ok(rights)
}

/// The target must lie behind a pawn that just double-pushed: rank 6 when
/// white is to move, rank 3 when black is.
fn parse_en_passant_square(en_passant_part: &str, side: Color) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| FenError::InvalidEnPassant(en_passant_part.to_owned()))?;
    let expected_rank = match side {
        Color::White => 5,
        Color::Black => 2,
    };
    if square / 8 != expected_rank {
        return Err(FenError::InvalidEnPassant(en_passant_part.to_owned()));
    }
    Ok(Some(square))
}

fn validate_material(game_state: &GameState) -> Result<(), FenError> {
    for color in Color::ALL {
        let count = game_state.bitboard(color, PieceKind::King).count_ones();
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
        let pawns = game_state.bitboard(color, PieceKind::Pawn);
        if pawns.count_ones() > 8 || game_state.occupancy_by_color[color.index()].count_ones() > 16 {
            return Err(FenError::TooManyPieces(color));
        }
    }

    const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;
    let misplaced = (game_state.bitboard(Color::White, PieceKind::Pawn)
        | game_state.bitboard(Color::Black, PieceKind::Pawn))
        & BACK_RANKS;
    if misplaced != 0 {
        return Err(FenError::PawnOnBackRank(Coordinate::from_square(
            misplaced.trailing_zeros() as Square,
        )));
    }
    Ok(())
}

/// An en-passant target needs the double-pushed pawn in front of it, and
/// both the target and the square the pawn came from must be empty.
fn validate_en_passant_placement(game_state: &GameState) -> Result<(), FenError> {
    let Some(target) = game_state.en_passant_square else {
        return Ok(());
    };
    let pusher = game_state.side_to_move.opposite();
    let (pawn_square, origin_square) = match pusher {
        Color::Black => (target - 8, target + 8),
        Color::White => (target + 8, target - 8),
    };
    let pawn_in_place = game_state.bitboard(pusher, PieceKind::Pawn) & (1u64 << pawn_square) != 0;
    let path_clear = game_state.occupancy_all & ((1u64 << target) | (1u64 << origin_square)) == 0;
    if pawn_in_place && path_clear {
        Ok(())
    } else {
        Err(FenError::InvalidEnPassant(
            Coordinate::from_square(target).to_string(),
        ))
    }
}

fn validate_castling_placement(game_state: &GameState) -> Result<(), FenError> {
    for color in Color::ALL {
        for side in CastleSide::ALL {
            if game_state.castling_rights & side.right(color) == 0 {
                continue;
            }
            let path = castle_path(color, side);
            let king_home = game_state.bitboard(color, PieceKind::King) & (1u64 << path.king_from) != 0;
            let rook_home = game_state.bitboard(color, PieceKind::Rook) & (1u64 << path.rook_from) != 0;
            if !king_home || !rook_home {
                let letter = match side {
                    CastleSide::KingSide => 'K',
                    CastleSide::QueenSide => 'Q',
                };
                let letter = if color == Color::White {
                    letter
                } else {
                    letter.to_ascii_lowercase()
                };
                return Err(FenError::CastlingRightsMismatch(letter));
            }
        }
    }
    Ok(())
}
