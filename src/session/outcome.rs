//! Game status, termination causes and the per-request state summary.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::Color;
use crate::session::identity::GameId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[default]
    Active,
    Drawn,
    WhiteWon,
    BlackWon,
}

impl GameStatus {
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteWon,
            Color::Black => GameStatus::BlackWon,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    /// PGN result token.
    pub const fn pgn_result(self) -> &'static str {
        match self {
            GameStatus::Active => "*",
            GameStatus::Drawn => "1/2-1/2",
            GameStatus::WhiteWon => "1-0",
            GameStatus::BlackWon => "0-1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationCause {
    Checkmate,
    Stalemate,
    Resignation,
    Agreement,
    Threefold,
    FivefoldRepetition,
    FiftyMove,
    InsufficientMaterial,
    FlagFall,
}

/// Snapshot returned to both players after every accepted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    pub game_id: GameId,
    pub fen: String,
    /// Notation of the last ply, if any.
    pub pgn_suffix: Option<String>,
    pub white_time: String,
    pub black_time: String,
    pub side_to_move: Color,
    pub threefold_claimable: bool,
    pub status: GameStatus,
    pub cause: Option<TerminationCause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgreementOutcome {
    /// Offer recorded; waiting for the opponent.
    Requested,
    Agreed(StateSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoFailure {
    GameOver,
    NotAParticipant,
    NothingToUndo,
    /// The last ply was not played by the caller.
    NotLastMover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UndoOutcome {
    Undone(StateSummary),
    Failed(UndoFailure),
}
