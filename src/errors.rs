//! Error types used throughout the arena.
//!
//! Failures are split by domain so callers can tell a malformed input
//! (structural), a rule violation (legality) and an out-of-turn request
//! (session) apart without string matching:
//!
//! - [`SquareError`], [`FenError`], [`NotationError`], [`PgnError`] are
//!   structural and are always raised before any board is touched.
//! - [`IllegalMove`] is a legality rejection carrying a reason code.
//! - [`SessionError`] covers game-session requests that are not allowed in
//!   the current state. Undo races are not errors; see
//!   [`crate::session::outcome::UndoOutcome`].

use thiserror::Error;

use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::coordinates::Coordinate;

/// A square name such as `e4` could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("invalid square length in {0:?}")]
    BadLength(String),
    #[error("invalid file char {0:?}")]
    InvalidFile(char),
    #[error("invalid rank char {0:?}")]
    InvalidRank(char),
    #[error("square index {0} out of bounds")]
    OutOfBounds(u8),
}

/// Rejections produced while parsing a FEN record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("missing FEN field: {0}")]
    MissingField(&'static str),
    #[error("FEN has extra trailing fields")]
    ExtraFields,
    #[error("board layout must contain 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: u8 },
    #[error("invalid piece character {0:?} in board layout")]
    InvalidPiece(char),
    #[error("invalid empty-square count {0:?}")]
    InvalidEmptyCount(char),
    #[error("invalid side-to-move field: {0}")]
    InvalidSideToMove(String),
    #[error("invalid castling rights field: {0}")]
    InvalidCastling(String),
    #[error("castling right {0:?} does not match king and rook placement")]
    CastlingRightsMismatch(char),
    #[error("invalid en-passant field: {0}")]
    InvalidEnPassant(String),
    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),
    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
    #[error("{color:?} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },
    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Coordinate),
    #[error("{0:?} has more than 16 pieces or more than 8 pawns")]
    TooManyPieces(Color),
    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Rejections produced while building or parsing algebraic notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty notation")]
    Empty,
    #[error("malformed notation: {0}")]
    Malformed(String),
    #[error("castle notation cannot carry capture or promotion")]
    InvalidCombination,
    #[error("promotion flag without promotion piece")]
    MissingPromotionPiece,
    #[error("{0:?} cannot be a promotion target")]
    InvalidPromotionPiece(PieceKind),
    #[error(transparent)]
    Square(#[from] SquareError),
}

/// Rejections produced while reading or replaying PGN text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgnError {
    #[error("invalid PGN tag line: {0}")]
    InvalidTag(String),
    #[error("SetUp tag present without FEN tag")]
    MissingSetupFen,
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error("ply {ply}: {source}")]
    Notation { ply: usize, source: NotationError },
    #[error("ply {ply}: illegal move {token}: {source}")]
    Illegal {
        ply: usize,
        token: String,
        source: IllegalMove,
    },
    #[error("ply {ply}: notation {token} does not describe the move on the board")]
    Inconsistent { ply: usize, token: String },
}

/// Why the validator refused a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("from and to squares are the same")]
    SameSquare,
    #[error("no piece on {0}")]
    EmptySquare(Coordinate),
    #[error("piece on {0} does not belong to the side to move")]
    NotYourPiece(Coordinate),
    #[error("{0} is occupied by a piece of the moving side")]
    OwnPieceOnTarget(Coordinate),
    #[error("{0:?} cannot move that way")]
    InvalidGeometry(PieceKind),
    #[error("path is blocked")]
    PathBlocked,
    #[error("castling is not allowed")]
    CastlingNotAllowed,
    #[error("pawn reaching the last rank must promote")]
    PromotionRequired,
    #[error("invalid promotion")]
    InvalidPromotion,
    #[error("move leaves own king in check")]
    LeavesKingInCheck,
}

/// Unknown time-control catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeControlError {
    #[error("unknown time control: {0}")]
    Unknown(String),
}

/// Session requests that are not allowed in the game's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("game is already finished")]
    GameOver,
    #[error("player {0} is not seated in this game")]
    NotAParticipant(u64),
    #[error("a player cannot play against themselves")]
    SamePlayerTwice,
    #[error("it is not this player's turn")]
    NotYourTurn,
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),
    #[error("draw already offered by this player")]
    DrawAlreadyOffered,
    #[error("draw offer lapsed when a move was played instead")]
    DrawOfferLapsed,
    #[error("current position has not occurred three times")]
    NoThreefoldRepetition,
    #[error("chat message is empty")]
    EmptyChatMessage,
    #[error("unknown game {0}")]
    UnknownGame(u64),
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    TimeControl(#[from] TimeControlError),
}
