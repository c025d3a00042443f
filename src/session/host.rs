//! Request routing for many concurrent games.
//!
//! The host owns no game itself: games live in the injected
//! [`GameDirectory`]. After each request the host checks whether the game
//! became terminal and, if so, emits the archive record and the rating input
//! exactly once and removes the game from the directory.

use std::sync::Arc;

use tracing::info;

use crate::errors::SessionError;
use crate::game_state::chess_types::PieceKind;
use crate::game_state::coordinates::Coordinate;
use crate::session::clock::TimeSource;
use crate::session::collaborators::{ArchiveSink, GameDirectory, RatingSink};
use crate::session::game::{Game, GameSettings};
use crate::session::identity::{GameId, PlayerId, PlayerSeat};
use crate::session::outcome::{AgreementOutcome, StateSummary, UndoOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameRequest {
    Move {
        from: Coordinate,
        to: Coordinate,
        promotion: Option<PieceKind>,
    },
    Resign,
    /// Offer a draw or accept the opponent's offer.
    Agreement,
    ClaimThreefold,
    Undo,
    Chat(String),
    CheckTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameResponse {
    State(StateSummary),
    Agreement(AgreementOutcome),
    Undo(UndoOutcome),
    ChatAccepted,
}

pub struct GameHost<D, A, R> {
    directory: D,
    archive: A,
    ratings: R,
    time_source: Arc<dyn TimeSource>,
    next_game_id: u64,
}

impl<D, A, R> GameHost<D, A, R>
where
    D: GameDirectory,
    A: ArchiveSink,
    R: RatingSink,
{
    pub fn new(directory: D, archive: A, ratings: R, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            directory,
            archive,
            ratings,
            time_source,
            next_game_id: 1,
        }
    }

    pub fn start_game(
        &mut self,
        white: PlayerSeat,
        black: PlayerSeat,
        settings: GameSettings,
    ) -> Result<GameId, SessionError> {
        let id = GameId(self.next_game_id);
        let game = Game::new(id, white, black, settings, Arc::clone(&self.time_source))?;
        self.next_game_id += 1;
        self.archive.game_started(game.start_record());
        self.directory.insert(game);
        info!(game_id = %id, "game hosted");
        Ok(id)
    }

    /// Route one request from `player` to game `game_id`.
    pub fn handle(
        &mut self,
        game_id: GameId,
        player: PlayerId,
        request: GameRequest,
    ) -> Result<GameResponse, SessionError> {
        let game = self
            .directory
            .lookup_mut(game_id)
            .ok_or(SessionError::UnknownGame(game_id.0))?;

        let response = match request {
            GameRequest::Move {
                from,
                to,
                promotion,
            } => game.make_move(player, from, to, promotion).map(GameResponse::State),
            GameRequest::Resign => game.resign(player).map(GameResponse::State),
            GameRequest::Agreement => game.agreement(player).map(GameResponse::Agreement),
            GameRequest::ClaimThreefold => game.end_game_by_three_fold(player).map(GameResponse::State),
            GameRequest::Undo => Ok(GameResponse::Undo(game.undo(player))),
            GameRequest::Chat(text) => game.chat(player, &text).map(|()| GameResponse::ChatAccepted),
            GameRequest::CheckTime => {
                game.check_time();
                Ok(GameResponse::State(game.summary()))
            }
        };

        let finished = game.status().is_terminal();
        if finished {
            self.settle(game_id);
        }
        response
    }

    pub fn game(&self, game_id: GameId) -> Option<&Game> {
        self.directory.lookup(game_id)
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn ratings(&self) -> &R {
        &self.ratings
    }

    fn settle(&mut self, game_id: GameId) {
        let Some(game) = self.directory.remove(game_id) else {
            return;
        };
        if let Some(record) = game.final_record() {
            self.archive.game_finished(record);
        }
        if let Some(input) = game.rating_input() {
            self.ratings.submit(input);
        }
        info!(game_id = %game_id, status = ?game.status(), "game settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::clock::ManualClock;
    use crate::session::collaborators::{GameArchive, GameStarted, InMemoryDirectory, RatingInput};
    use crate::session::outcome::{GameStatus, TerminationCause};
    use chrono::{TimeZone, Utc};

    #[derive(Debug, Default)]
    struct RecordingArchive {
        started: Vec<GameStarted>,
        finished: Vec<GameArchive>,
    }

    impl ArchiveSink for RecordingArchive {
        fn game_started(&mut self, record: GameStarted) {
            self.started.push(record);
        }

        fn game_finished(&mut self, record: GameArchive) {
            self.finished.push(record);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingRatings(Vec<RatingInput>);

    impl RatingSink for RecordingRatings {
        fn submit(&mut self, input: RatingInput) {
            self.0.push(input);
        }
    }

    type TestHost = GameHost<InMemoryDirectory, RecordingArchive, RecordingRatings>;

    const WHITE: PlayerId = PlayerId(10);
    const BLACK: PlayerId = PlayerId(20);

    fn host() -> TestHost {
        let start = Utc.with_ymd_and_hms(2024, 5, 4, 9, 0, 0).single().expect("valid instant");
        GameHost::new(
            InMemoryDirectory::new(),
            RecordingArchive::default(),
            RecordingRatings::default(),
            Arc::new(ManualClock::new(start)),
        )
    }

    fn mv(from: &str, to: &str) -> GameRequest {
        GameRequest::Move {
            from: from.parse().expect("valid square"),
            to: to.parse().expect("valid square"),
            promotion: None,
        }
    }

    fn start(host: &mut TestHost) -> GameId {
        host.start_game(
            PlayerSeat::new(WHITE.0, 1600.0),
            PlayerSeat::new(BLACK.0, 1550.0),
            GameSettings::default(),
        )
        .expect("game should start")
    }

    #[test]
    fn fools_mate_is_archived_and_rated_once() {
        let mut host = host();
        let id = start(&mut host);
        assert_eq!(host.archive().started.len(), 1);

        for (player, from, to) in [
            (WHITE, "f2", "f3"),
            (BLACK, "e7", "e5"),
            (WHITE, "g2", "g4"),
        ] {
            host.handle(id, player, mv(from, to)).expect("move accepted");
        }
        let response = host.handle(id, BLACK, mv("d8", "h4")).expect("mate accepted");
        match response {
            GameResponse::State(summary) => {
                assert_eq!(summary.status, GameStatus::BlackWon);
                assert_eq!(summary.cause, Some(TerminationCause::Checkmate));
            }
            other => panic!("expected state, got {other:?}"),
        }

        assert!(host.directory().is_empty());
        assert_eq!(host.archive().finished.len(), 1);
        let archive = &host.archive().finished[0];
        assert_eq!(archive.fen_history.len(), 5);
        assert!(archive.pgn.contains("2. g2-g4 Qd8-h4# 0-1"));
        assert_eq!(host.ratings().0.len(), 1);
        assert_eq!(host.ratings().0[0].status, GameStatus::BlackWon);

        assert_eq!(
            host.handle(id, WHITE, GameRequest::Resign),
            Err(SessionError::UnknownGame(id.0))
        );
    }

    #[test]
    fn rejected_requests_keep_the_game_hosted() {
        let mut host = host();
        let id = start(&mut host);
        assert_eq!(host.handle(id, BLACK, mv("e7", "e5")), Err(SessionError::NotYourTurn));
        assert_eq!(
            host.handle(id, WHITE, GameRequest::Chat(String::new())),
            Err(SessionError::EmptyChatMessage)
        );
        assert_eq!(
            host.handle(id, WHITE, GameRequest::Chat("gl".to_owned())),
            Ok(GameResponse::ChatAccepted)
        );
        assert_eq!(
            host.handle(id, WHITE, GameRequest::Undo),
            Ok(GameResponse::Undo(UndoOutcome::Failed(
                crate::session::outcome::UndoFailure::NothingToUndo
            )))
        );
        assert!(host.game(id).is_some());
        assert!(host.archive().finished.is_empty());
    }

    #[test]
    fn draw_by_agreement_settles_the_game() {
        let mut host = host();
        let id = start(&mut host);
        let offered = host.handle(id, WHITE, GameRequest::Agreement).expect("offer recorded");
        assert_eq!(offered, GameResponse::Agreement(AgreementOutcome::Requested));
        host.handle(id, BLACK, GameRequest::Agreement).expect("offer accepted");
        assert!(host.game(id).is_none());
        assert_eq!(host.archive().finished[0].cause, TerminationCause::Agreement);
        assert_eq!(host.ratings().0[0].status, GameStatus::Drawn);
    }

    #[test]
    fn game_ids_are_sequential() {
        let mut host = host();
        let first = start(&mut host);
        let second = start(&mut host);
        assert_ne!(first, second);
        assert_eq!(host.directory().len(), 2);
        assert_eq!(
            host.handle(GameId(404), WHITE, GameRequest::CheckTime),
            Err(SessionError::UnknownGame(404))
        );
    }
}
