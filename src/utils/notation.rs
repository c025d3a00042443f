//! Algebraic move notation.
//!
//! The arena writes moves in an explicit from/to form that can be replayed
//! without disambiguation:
//!
//! ```text
//! e2-e4      Ng1-f3     e4xd5      Qh5xf7#
//! e7-e8=Q    d7xc8=N+   O-O        O-O-O
//! ```
//!
//! A piece letter (`K Q R B N`) precedes non-pawn moves, `-` separates the
//! squares of a quiet move and `x` those of a capture, `=X` names the
//! promotion piece. The optional suffix marks the opponent's resulting
//! situation: `+` check, `#` checkmate, `=` stalemate. Parsing also accepts
//! `0-0` / `0-0-0` for castling.

use std::fmt;
use std::str::FromStr;

use crate::errors::NotationError;
use crate::game_state::chess_types::{CastleSide, Color, PieceKind};
use crate::game_state::coordinates::Coordinate;
use crate::move_generation::move_validator::{CheckStatus, MoveOperations, ValidatedMove};
use crate::moves::move_descriptions::Move;

/// Structured content of a notation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedNotation {
    Move {
        piece: PieceKind,
        from: Coordinate,
        to: Coordinate,
        capture: bool,
        promotion: Option<PieceKind>,
        status: CheckStatus,
    },
    Castle {
        side: CastleSide,
        status: CheckStatus,
    },
}

impl ParsedNotation {
    pub fn status(&self) -> CheckStatus {
        match self {
            ParsedNotation::Move { status, .. } | ParsedNotation::Castle { status, .. } => *status,
        }
    }
}

/// King and rook squares of one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleCoordinates {
    pub king_from: Coordinate,
    pub king_to: Coordinate,
    pub rook_from: Coordinate,
    pub rook_to: Coordinate,
}

pub const fn castle_coordinates(color: Color, side: CastleSide) -> CastleCoordinates {
    match (color, side) {
        (Color::White, CastleSide::KingSide) => CastleCoordinates {
            king_from: Coordinate::E1,
            king_to: Coordinate::G1,
            rook_from: Coordinate::H1,
            rook_to: Coordinate::F1,
        },
        (Color::White, CastleSide::QueenSide) => CastleCoordinates {
            king_from: Coordinate::E1,
            king_to: Coordinate::C1,
            rook_from: Coordinate::A1,
            rook_to: Coordinate::D1,
        },
        (Color::Black, CastleSide::KingSide) => CastleCoordinates {
            king_from: Coordinate::E8,
            king_to: Coordinate::G8,
            rook_from: Coordinate::H8,
            rook_to: Coordinate::F8,
        },
        (Color::Black, CastleSide::QueenSide) => CastleCoordinates {
            king_from: Coordinate::E8,
            king_to: Coordinate::C8,
            rook_from: Coordinate::A8,
            rook_to: Coordinate::D8,
        },
    }
}

/// An immutable, validated notation string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgebraicNotation {
    text: String,
    parsed: ParsedNotation,
}

impl AlgebraicNotation {
    /// Build the notation of a move from its squares and operations.
    pub fn from_move(
        piece: PieceKind,
        from: Coordinate,
        to: Coordinate,
        castle: Option<CastleSide>,
        operations: &MoveOperations,
    ) -> Result<Self, NotationError> {
        let parsed = match castle {
            Some(side) => {
                if operations.capture || operations.promotion.is_some() {
                    return Err(NotationError::InvalidCombination);
                }
                ParsedNotation::Castle {
                    side,
                    status: operations.status,
                }
            }
            None => {
                if let Some(promotion) = operations.promotion {
                    if !promotion.is_promotion_target() {
                        return Err(NotationError::InvalidPromotionPiece(promotion));
                    }
                    if piece != PieceKind::Pawn {
                        return Err(NotationError::InvalidCombination);
                    }
                }
                ParsedNotation::Move {
                    piece,
                    from,
                    to,
                    capture: operations.capture,
                    promotion: operations.promotion,
                    status: operations.status,
                }
            }
        };
        Ok(Self {
            text: render(&parsed),
            parsed,
        })
    }

    pub fn from_validated(validated: &ValidatedMove) -> Result<Self, NotationError> {
        let mv = validated.description.to_move();
        Self::from_move(
            validated.piece.kind,
            mv.from,
            mv.to,
            validated.castle_side(),
            &validated.operations,
        )
    }

    pub fn parse(text: &str) -> Result<Self, NotationError> {
        let parsed = parse_notation(text)?;
        Ok(Self {
            text: text.to_owned(),
            parsed,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn parsed(&self) -> ParsedNotation {
        self.parsed
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(self.parsed, ParsedNotation::Castle { .. })
    }

    /// The move request this notation describes when played by `color`.
    pub fn to_move(&self, color: Color) -> Move {
        match self.parsed {
            ParsedNotation::Move {
                from, to, promotion, ..
            } => Move::new(from, to, promotion),
            ParsedNotation::Castle { side, .. } => {
                let squares = castle_coordinates(color, side);
                Move::new(squares.king_from, squares.king_to, None)
            }
        }
    }
}

impl fmt::Display for AlgebraicNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for AlgebraicNotation {
    type Err = NotationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

fn render(parsed: &ParsedNotation) -> String {
    let mut out = String::with_capacity(10);
    let status = match *parsed {
        ParsedNotation::Castle { side, status } => {
            out.push_str(match side {
                CastleSide::KingSide => "O-O",
                CastleSide::QueenSide => "O-O-O",
            });
            status
        }
        ParsedNotation::Move {
            piece,
            from,
            to,
            capture,
            promotion,
            status,
        } => {
            if piece != PieceKind::Pawn {
                out.push(piece.letter());
            }
            out.push_str(&from.to_string());
            out.push(if capture { 'x' } else { '-' });
            out.push_str(&to.to_string());
            if let Some(promotion) = promotion {
                out.push('=');
                out.push(promotion.letter());
            }
            status
        }
    };
    match status {
        CheckStatus::None => {}
        CheckStatus::Check => out.push('+'),
        CheckStatus::Checkmate => out.push('#'),
        CheckStatus::Stalemate => out.push('='),
    }
    out
}

fn parse_notation(text: &str) -> Result<ParsedNotation, NotationError> {
    if text.is_empty() {
        return Err(NotationError::Empty);
    }
    if !text.is_ascii() {
        return Err(NotationError::Malformed(text.to_owned()));
    }

    let (body, status) = match text.as_bytes()[text.len() - 1] {
        b'+' => (&text[..text.len() - 1], CheckStatus::Check),
        b'#' => (&text[..text.len() - 1], CheckStatus::Checkmate),
        b'=' => (&text[..text.len() - 1], CheckStatus::Stalemate),
        _ => (text, CheckStatus::None),
    };

    if body.starts_with("O-O") || body.starts_with("0-0") {
        return parse_castle(body, status);
    }

    let (body, promotion) = match body.split_once('=') {
        Some((head, "")) if !head.is_empty() => return Err(NotationError::MissingPromotionPiece),
        Some((head, letter)) => {
            let mut chars = letter.chars();
            let kind = chars
                .next()
                .and_then(PieceKind::from_letter)
                .filter(|_| chars.next().is_none())
                .ok_or_else(|| NotationError::Malformed(text.to_owned()))?;
            if !kind.is_promotion_target() {
                return Err(NotationError::InvalidPromotionPiece(kind));
            }
            (head, Some(kind))
        }
        None => (body, None),
    };

    let (piece, squares) = match body.chars().next() {
        Some(letter @ ('K' | 'Q' | 'R' | 'B' | 'N')) => {
            let kind = PieceKind::from_letter(letter).ok_or_else(|| NotationError::Malformed(text.to_owned()))?;
            (kind, &body[1..])
        }
        _ => (PieceKind::Pawn, body),
    };

    if squares.len() != 5 {
        return Err(NotationError::Malformed(text.to_owned()));
    }
    let capture = match squares.as_bytes()[2] {
        b'-' => false,
        b'x' => true,
        _ => return Err(NotationError::Malformed(text.to_owned())),
    };
    let from: Coordinate = squares[0..2].parse()?;
    let to: Coordinate = squares[3..5].parse()?;

    if promotion.is_some() && piece != PieceKind::Pawn {
        return Err(NotationError::InvalidCombination);
    }

    Ok(ParsedNotation::Move {
        piece,
        from,
        to,
        capture,
        promotion,
        status,
    })
}

fn parse_castle(body: &str, status: CheckStatus) -> Result<ParsedNotation, NotationError> {
    let side = match body {
        "O-O" | "0-0" => CastleSide::KingSide,
        "O-O-O" | "0-0-0" => CastleSide::QueenSide,
        _ if body.contains('x') || body.contains('=') => {
            return Err(NotationError::InvalidCombination)
        }
        _ => return Err(NotationError::Malformed(body.to_owned())),
    };
    Ok(ParsedNotation::Castle { side, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::generate_all_valid_moves;
    use crate::move_generation::move_validator::validate_move;

    fn sq(name: &str) -> Coordinate {
        name.parse().expect("square name should parse")
    }

    #[test]
    fn renders_each_format() {
        let quiet = MoveOperations::default();
        let capture_mate = MoveOperations {
            capture: true,
            promotion: None,
            status: CheckStatus::Checkmate,
        };
        let promote = MoveOperations {
            capture: false,
            promotion: Some(PieceKind::Queen),
            status: CheckStatus::Check,
        };

        let pawn = AlgebraicNotation::from_move(PieceKind::Pawn, sq("e2"), sq("e4"), None, &quiet)
            .expect("pawn push has notation");
        assert_eq!(pawn.as_str(), "e2-e4");

        let queen = AlgebraicNotation::from_move(PieceKind::Queen, sq("h5"), sq("f7"), None, &capture_mate)
            .expect("queen capture has notation");
        assert_eq!(queen.as_str(), "Qh5xf7#");

        let promotion = AlgebraicNotation::from_move(PieceKind::Pawn, sq("e7"), sq("e8"), None, &promote)
            .expect("promotion has notation");
        assert_eq!(promotion.as_str(), "e7-e8=Q+");

        let castle = AlgebraicNotation::from_move(
            PieceKind::King,
            sq("e1"),
            sq("c1"),
            Some(CastleSide::QueenSide),
            &quiet,
        )
        .expect("castle has notation");
        assert_eq!(castle.as_str(), "O-O-O");
    }

    #[test]
    fn castle_with_capture_or_promotion_is_rejected() {
        let capture = MoveOperations {
            capture: true,
            ..MoveOperations::default()
        };
        assert_eq!(
            AlgebraicNotation::from_move(
                PieceKind::King,
                sq("e1"),
                sq("g1"),
                Some(CastleSide::KingSide),
                &capture
            ),
            Err(NotationError::InvalidCombination)
        );
        assert_eq!(AlgebraicNotation::parse("O-Ox"), Err(NotationError::InvalidCombination));
        assert_eq!(AlgebraicNotation::parse("O-O=Q"), Err(NotationError::InvalidCombination));
    }

    #[test]
    fn parses_suffixes_and_promotions() {
        let parsed = AlgebraicNotation::parse("d7xc8=N+").expect("notation should parse").parsed();
        assert_eq!(
            parsed,
            ParsedNotation::Move {
                piece: PieceKind::Pawn,
                from: sq("d7"),
                to: sq("c8"),
                capture: true,
                promotion: Some(PieceKind::Knight),
                status: CheckStatus::Check,
            }
        );
        let stalemate = AlgebraicNotation::parse("Qb6-c7=").expect("notation should parse");
        assert_eq!(stalemate.parsed().status(), CheckStatus::Stalemate);
        let castle = AlgebraicNotation::parse("0-0-0#").expect("zero castle should parse");
        assert_eq!(
            castle.parsed(),
            ParsedNotation::Castle {
                side: CastleSide::QueenSide,
                status: CheckStatus::Checkmate
            }
        );
        assert_eq!(castle.to_move(Color::Black), Move::new(sq("e8"), sq("c8"), None));
    }

    #[test]
    fn parse_rejections() {
        assert_eq!(AlgebraicNotation::parse(""), Err(NotationError::Empty));
        assert_eq!(AlgebraicNotation::parse("e7-e8=+"), Err(NotationError::MissingPromotionPiece));
        assert_eq!(
            AlgebraicNotation::parse("e7-e8=K"),
            Err(NotationError::InvalidPromotionPiece(PieceKind::King))
        );
        assert_eq!(AlgebraicNotation::parse("Ng1-f3=Q"), Err(NotationError::InvalidCombination));
        assert!(matches!(AlgebraicNotation::parse("e2e4"), Err(NotationError::Malformed(_))));
        assert!(matches!(AlgebraicNotation::parse("Zg1-f3"), Err(NotationError::Malformed(_))));
        assert!(matches!(AlgebraicNotation::parse("e9-e4"), Err(NotationError::Square(_))));
    }

    #[test]
    fn castle_squares() {
        let black_short = castle_coordinates(Color::Black, CastleSide::KingSide);
        assert_eq!(black_short.king_from, sq("e8"));
        assert_eq!(black_short.king_to, sq("g8"));
        assert_eq!(black_short.rook_from, sq("h8"));
        assert_eq!(black_short.rook_to, sq("f8"));
        let white_long = castle_coordinates(Color::White, CastleSide::QueenSide);
        assert_eq!(white_long.rook_from, sq("a1"));
        assert_eq!(white_long.rook_to, sq("d1"));
    }

    #[test]
    fn every_legal_move_round_trips_through_text() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ] {
            let game = GameState::from_fen(fen).expect("FEN should parse");
            for description in generate_all_valid_moves(&game) {
                let mover = game.side_to_move;
                let validated = validate_move(&game, description.to_move()).expect("generated move validates");
                let notation = AlgebraicNotation::from_validated(&validated).expect("legal move has notation");
                let reparsed = AlgebraicNotation::parse(notation.as_str()).expect("rendered notation parses");
                assert_eq!(reparsed, notation, "{fen}: {notation}");
                assert_eq!(reparsed.to_move(mover), description.to_move());
            }
        }
    }
}
