//! Single-move validation.
//!
//! [`is_legal`] decides whether one requested move is legal on a board and,
//! if so, describes it: the [`MoveDescription`] to apply, the moving piece
//! and the operations (capture, promotion, resulting check status) used to
//! build its notation. Checks run in a fixed order:
//!
//! 1. basic square and ownership checks,
//! 2. movement geometry of the piece class, including castling conditions
//!    and pawn promotion requirements,
//! 3. king safety, tested on a scratch copy of the board,
//! 4. classification of the resulting position for the opponent.
//!
//! The board passed in is never modified.

use serde::{Deserialize, Serialize};

use crate::errors::IllegalMove;
use crate::game_state::chess_rules::{castle_path, castle_side_for_king_move};
use crate::game_state::coordinates::{Coordinate, Direction};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::legal_move_checks::{is_king_in_check, is_square_attacked};
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::moves::move_descriptions::{
    Move, MoveDescription, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

/// Opponent's situation after a move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    #[default]
    None,
    Check,
    Checkmate,
    Stalemate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MoveOperations {
    pub capture: bool,
    pub promotion: Option<PieceKind>,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedMove {
    pub description: MoveDescription,
    pub piece: Piece,
    pub operations: MoveOperations,
}

impl ValidatedMove {
    pub fn castle_side(&self) -> Option<CastleSide> {
        if !self.description.is_castling() {
            return None;
        }
        castle_side_for_king_move(
            self.piece.color,
            self.description.from_square(),
            self.description.to_square(),
        )
    }
}

/// Validate a [`Move`] request.
#[inline]
pub fn validate_move(game_state: &GameState, mv: Move) -> Result<ValidatedMove, IllegalMove> {
    is_legal(game_state, mv.from, mv.to, mv.promotion)
}

pub fn is_legal(
    game_state: &GameState,
    from: Coordinate,
    to: Coordinate,
    promotion: Option<PieceKind>,
) -> Result<ValidatedMove, IllegalMove> {
    let piece = check_basics(game_state, from, to)?;
    let description = check_geometry(game_state, piece, from, to, promotion)?;

    let mut trial = game_state.scratch_copy();
    make_move(&mut trial, description);
    if is_king_in_check(&trial, piece.color) {
        return Err(IllegalMove::LeavesKingInCheck);
    }

    let operations = MoveOperations {
        capture: description.is_capture(),
        promotion: description.promotion_piece(),
        status: classify(&mut trial),
    };

    Ok(ValidatedMove {
        description,
        piece,
        operations,
    })
}

/// Check status of the side to move on `game_state`.
pub fn classify(game_state: &mut GameState) -> CheckStatus {
    let in_check = is_king_in_check(game_state, game_state.side_to_move);
    match (in_check, has_legal_move(game_state)) {
        (true, false) => CheckStatus::Checkmate,
        (true, true) => CheckStatus::Check,
        (false, false) => CheckStatus::Stalemate,
        (false, true) => CheckStatus::None,
    }
}

fn check_basics(game_state: &GameState, from: Coordinate, to: Coordinate) -> Result<Piece, IllegalMove> {
    if from == to {
        return Err(IllegalMove::SameSquare);
    }
    let piece = game_state
        .piece_at(from)
        .ok_or(IllegalMove::EmptySquare(from))?;
    if piece.color != game_state.side_to_move {
        return Err(IllegalMove::NotYourPiece(from));
    }
    if game_state.occupancy_by_color[piece.color.index()] & to.mask() != 0 {
        return Err(IllegalMove::OwnPieceOnTarget(to));
    }
    Ok(piece)
}

fn check_geometry(
    game_state: &GameState,
    piece: Piece,
    from: Coordinate,
    to: Coordinate,
    promotion: Option<PieceKind>,
) -> Result<MoveDescription, IllegalMove> {
    if piece.kind != PieceKind::Pawn && promotion.is_some() {
        return Err(IllegalMove::InvalidPromotion);
    }

    let captured = game_state.piece_at(to).map(|p| p.kind);
    let capture_flag = if captured.is_some() { FLAG_CAPTURE } else { 0 };
    let plain = |flags: u8| {
        MoveDescription::new(from.square(), to.square(), piece.kind, captured, None, flags)
    };

    match piece.kind.geometry() {
        Geometry::Sliding(directions) => {
            let on_ray = Direction::between(from, to).is_some_and(|d| directions.contains(&d));
            if !on_ray {
                return Err(IllegalMove::InvalidGeometry(piece.kind));
            }
            let blocked = from
                .squares_between(to)
                .iter()
                .any(|sq| game_state.occupancy_all & sq.mask() != 0);
            if blocked {
                return Err(IllegalMove::PathBlocked);
            }
            Ok(plain(capture_flag))
        }
        Geometry::Stepping(offsets) => {
            let delta = file_rank_delta(from, to);
            if !offsets.contains(&delta) {
                return Err(IllegalMove::InvalidGeometry(piece.kind));
            }
            Ok(plain(capture_flag))
        }
        Geometry::King => {
            let (df, dr) = file_rank_delta(from, to);
            if df.abs() <= 1 && dr.abs() <= 1 {
                return Ok(plain(capture_flag));
            }
            let side = castle_side_for_king_move(piece.color, from.square(), to.square())
                .ok_or(IllegalMove::InvalidGeometry(piece.kind))?;
            check_castling(game_state, piece.color, side)?;
            Ok(plain(FLAG_CASTLING))
        }
        Geometry::Pawn => check_pawn(game_state, piece.color, from, to, captured, promotion),
    }
}

fn check_castling(game_state: &GameState, color: Color, side: CastleSide) -> Result<(), IllegalMove> {
    let path = castle_path(color, side);
    let enemy = color.opposite();
    let rook_home = game_state.bitboard(color, PieceKind::Rook) & (1u64 << path.rook_from) != 0;
    let allowed = game_state.castling_rights & side.right(color) != 0
        && rook_home
        && game_state.occupancy_all & path.must_be_empty == 0
        && !is_square_attacked(game_state, path.king_from, enemy)
        && !path
            .king_path
            .iter()
            .any(|sq| is_square_attacked(game_state, *sq, enemy));
    if allowed {
        Ok(())
    } else {
        Err(IllegalMove::CastlingNotAllowed)
    }
}

fn check_pawn(
    game_state: &GameState,
    color: Color,
    from: Coordinate,
    to: Coordinate,
    captured: Option<PieceKind>,
    promotion: Option<PieceKind>,
) -> Result<MoveDescription, IllegalMove> {
    let (df, dr) = file_rank_delta(from, to);
    let step = color.pawn_step();
    let home_rank = color.pawn_home_rank() + 1;

    let (captured, flags) = if df == 0 && dr == step {
        if captured.is_some() {
            return Err(IllegalMove::PathBlocked);
        }
        (None, 0)
    } else if df == 0 && dr == 2 * step && from.rank() == home_rank {
        let middle = from
            .offset(0, step)
            .ok_or(IllegalMove::InvalidGeometry(PieceKind::Pawn))?;
        if captured.is_some() || game_state.occupancy_all & middle.mask() != 0 {
            return Err(IllegalMove::PathBlocked);
        }
        (None, FLAG_DOUBLE_PAWN_PUSH)
    } else if df.abs() == 1 && dr == step {
        if captured.is_some() {
            (captured, FLAG_CAPTURE)
        } else if game_state.en_passant_square == Some(to.square()) {
            (Some(PieceKind::Pawn), FLAG_CAPTURE | FLAG_EN_PASSANT)
        } else {
            return Err(IllegalMove::InvalidGeometry(PieceKind::Pawn));
        }
    } else {
        return Err(IllegalMove::InvalidGeometry(PieceKind::Pawn));
    };

    let reaches_last_rank = to.rank() == color.promotion_rank() + 1;
    let promotion = match (reaches_last_rank, promotion) {
        (true, None) => return Err(IllegalMove::PromotionRequired),
        (true, Some(kind)) if kind.is_promotion_target() => Some(kind),
        (false, None) => None,
        _ => return Err(IllegalMove::InvalidPromotion),
    };

    Ok(MoveDescription::new(
        from.square(),
        to.square(),
        PieceKind::Pawn,
        captured,
        promotion,
        flags,
    ))
}

#[inline]
fn file_rank_delta(from: Coordinate, to: Coordinate) -> (i8, i8) {
    (
        to.file() as i8 - from.file() as i8,
        to.rank() as i8 - from.rank() as i8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn sq(name: &str) -> Coordinate {
        name.parse().expect("square name should parse")
    }

    fn board(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn validator_accepts_exactly_the_generated_moves() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2",
        ] {
            let mut game = board(fen);
            let mut generated = generate_legal_moves(&mut game);
            generated.sort_by_key(|mv| (mv.from_square(), mv.to_square(), mv.promotion_piece().map(|p| p.index())));

            let mut validated = Vec::new();
            for from in Coordinate::ALL {
                for to in Coordinate::ALL {
                    for promotion in [None, Some(PieceKind::Queen), Some(PieceKind::Rook), Some(PieceKind::Bishop), Some(PieceKind::Knight), Some(PieceKind::King)] {
                        if let Ok(valid) = is_legal(&game, from, to, promotion) {
                            validated.push(valid.description);
                        }
                    }
                }
            }
            validated.sort_by_key(|mv| (mv.from_square(), mv.to_square(), mv.promotion_piece().map(|p| p.index())));
            assert_eq!(validated, generated, "validator and generator disagree on {fen}");
        }
    }

    #[test]
    fn basic_rejections() {
        let game = GameState::new_game();
        assert_eq!(is_legal(&game, sq("e2"), sq("e2"), None), Err(IllegalMove::SameSquare));
        assert_eq!(is_legal(&game, sq("e4"), sq("e5"), None), Err(IllegalMove::EmptySquare(sq("e4"))));
        assert_eq!(is_legal(&game, sq("e7"), sq("e5"), None), Err(IllegalMove::NotYourPiece(sq("e7"))));
        assert_eq!(is_legal(&game, sq("a1"), sq("a2"), None), Err(IllegalMove::OwnPieceOnTarget(sq("a2"))));
        assert_eq!(is_legal(&game, sq("f1"), sq("c4"), None), Err(IllegalMove::PathBlocked));
        assert_eq!(
            is_legal(&game, sq("g1"), sq("g3"), None),
            Err(IllegalMove::InvalidGeometry(PieceKind::Knight))
        );
        assert_eq!(is_legal(&game, sq("e2"), sq("e4"), Some(PieceKind::Queen)), Err(IllegalMove::InvalidPromotion));
    }

    #[test]
    fn leaving_king_in_check_is_rejected() {
        // White king e1, e-pawn shields it from the e8 rook.
        let game = board("4r1k1/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert!(is_legal(&game, sq("e2"), sq("e3"), None).is_ok());
        let open = board("4r1k1/8/8/8/8/3p4/4P3/4K3 w - - 0 1");
        assert_eq!(
            is_legal(&open, sq("e2"), sq("d3"), None),
            Err(IllegalMove::LeavesKingInCheck)
        );
    }

    #[test]
    fn promotion_rules() {
        let game = board("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(is_legal(&game, sq("a7"), sq("a8"), None), Err(IllegalMove::PromotionRequired));
        assert_eq!(
            is_legal(&game, sq("a7"), sq("a8"), Some(PieceKind::King)),
            Err(IllegalMove::InvalidPromotion)
        );
        let valid = is_legal(&game, sq("a7"), sq("a8"), Some(PieceKind::Queen)).expect("promotion is legal");
        assert_eq!(valid.operations.promotion, Some(PieceKind::Queen));
        assert_eq!(valid.operations.status, CheckStatus::Check);
    }

    #[test]
    fn castling_conditions() {
        let game = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castle = is_legal(&game, sq("e1"), sq("g1"), None).expect("king-side castle is legal");
        assert_eq!(castle.castle_side(), Some(CastleSide::KingSide));

        let no_rights = board("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1");
        assert_eq!(is_legal(&no_rights, sq("e1"), sq("g1"), None), Err(IllegalMove::CastlingNotAllowed));

        let through_check = board("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
        assert_eq!(
            is_legal(&through_check, sq("e1"), sq("g1"), None),
            Err(IllegalMove::CastlingNotAllowed)
        );
        assert!(is_legal(&through_check, sq("e1"), sq("c1"), None).is_ok());
    }

    #[test]
    fn en_passant_is_recognised() {
        let game = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let valid = is_legal(&game, sq("e5"), sq("d6"), None).expect("en passant is legal");
        assert!(valid.description.is_en_passant());
        assert!(valid.operations.capture);
        assert_eq!(
            is_legal(&game, sq("e5"), sq("f6"), None),
            Err(IllegalMove::InvalidGeometry(PieceKind::Pawn))
        );
    }

    #[test]
    fn mate_and_stalemate_are_classified() {
        let mate = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let valid = is_legal(&mate, sq("a1"), sq("a8"), None).expect("back-rank mate is legal");
        assert_eq!(valid.operations.status, CheckStatus::Checkmate);

        let stale = board("k7/8/1Q6/8/8/8/8/7K w - - 0 1");
        let valid = is_legal(&stale, sq("b6"), sq("c7"), None).expect("queen move is legal");
        assert_eq!(valid.operations.status, CheckStatus::Stalemate);
    }
}
