//! Boundary records and the collaborator traits a [`GameHost`] is wired with.
//!
//! [`GameHost`]: crate::session::host::GameHost

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::game::Game;
use crate::session::identity::{GameId, PlayerId, PlayerSeat};
use crate::session::outcome::{GameStatus, TerminationCause};
use crate::session::time_control::TimeControl;

/// Emitted once when a game is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStarted {
    pub game_id: GameId,
    pub white: PlayerSeat,
    pub black: PlayerSeat,
    pub time_control: TimeControl,
    pub initial_fen: String,
    pub started_at: DateTime<Utc>,
}

/// Emitted once when a game reaches a terminal status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameArchive {
    pub game_id: GameId,
    pub white: PlayerId,
    pub black: PlayerId,
    pub status: GameStatus,
    pub cause: TerminationCause,
    pub pgn: String,
    pub fen_history: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

/// Everything a rating service needs to update both players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingInput {
    pub game_id: GameId,
    pub white: PlayerSeat,
    pub black: PlayerSeat,
    pub status: GameStatus,
    pub time_control: TimeControl,
}

/// Where live games are kept between requests.
pub trait GameDirectory {
    fn lookup(&self, id: GameId) -> Option<&Game>;
    fn lookup_mut(&mut self, id: GameId) -> Option<&mut Game>;
    fn insert(&mut self, game: Game);
    fn remove(&mut self, id: GameId) -> Option<Game>;
}

pub trait ArchiveSink {
    fn game_started(&mut self, record: GameStarted);
    fn game_finished(&mut self, record: GameArchive);
}

/// Fire-and-forget rating submission.
pub trait RatingSink {
    fn submit(&mut self, input: RatingInput);
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    games: HashMap<GameId, Game>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameDirectory for InMemoryDirectory {
    fn lookup(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    fn lookup_mut(&mut self, id: GameId) -> Option<&mut Game> {
        self.games.get_mut(&id)
    }

    fn insert(&mut self, game: Game) {
        self.games.insert(game.id(), game);
    }

    fn remove(&mut self, id: GameId) -> Option<Game> {
        self.games.remove(&id)
    }
}

/// Archive and rating sink that only logs what it receives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ArchiveSink for TracingSink {
    fn game_started(&mut self, record: GameStarted) {
        info!(
            game_id = %record.game_id,
            white = %record.white.id,
            black = %record.black.id,
            time_control = %record.time_control,
            "game started"
        );
    }

    fn game_finished(&mut self, record: GameArchive) {
        info!(
            game_id = %record.game_id,
            status = ?record.status,
            cause = ?record.cause,
            plies = record.fen_history.len().saturating_sub(1),
            "game archived"
        );
    }
}

impl RatingSink for TracingSink {
    fn submit(&mut self, input: RatingInput) {
        info!(
            game_id = %input.game_id,
            white_rating = input.white.rating,
            black_rating = input.black.rating,
            status = ?input.status,
            "rating input submitted"
        );
    }
}
