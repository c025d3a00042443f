//! One live game between two seated players.
//!
//! A [`Game`] owns its board, clock, notation history and draw-offer state
//! and is driven by player requests. Every request either succeeds and
//! returns the new state, or fails with a [`SessionError`] and leaves the
//! game exactly as it was. Undo is the exception: losing an undo race is an
//! ordinary outcome ([`UndoOutcome::Failed`]), not an error.
//!
//! Time is never ticked. The clock keeps timestamps and remaining time is
//! derived from the injected [`TimeSource`] whenever a request arrives, so a
//! flag can fall either when the flagged player tries to move or when
//! [`Game::check_time`] is called.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::SessionError;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::coordinates::Coordinate;
use crate::game_state::game_state::GameState;
use crate::move_generation::game_end::{
    has_insufficient_material, has_mating_material, is_fifty_move_draw, is_fivefold_repetition,
    is_threefold_repetition,
};
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::move_validator::{is_legal, CheckStatus};
use crate::session::clock::{format_hms, ChessClock, TimeSource};
use crate::session::collaborators::{GameArchive, GameStarted, RatingInput};
use crate::session::identity::{GameId, PlayerId, PlayerSeat};
use crate::session::outcome::{
    AgreementOutcome, GameStatus, StateSummary, TerminationCause, UndoFailure, UndoOutcome,
};
use crate::session::time_control::TimeControl;
use crate::utils::notation::AlgebraicNotation;
use crate::utils::pgn::{write_pgn_with_headers, Pgn};

/// Per-game switches. Threefold repetition is claim-only unless
/// `automatic_threefold` is set; fivefold repetition always ends the game.
/// Running out of time loses, unless `flag_fall_draw_without_mating_material`
/// is set and the opponent could never mate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub time_control: TimeControl,
    pub automatic_threefold: bool,
    pub automatic_fifty_move: bool,
    pub automatic_insufficient_material: bool,
    pub flag_fall_draw_without_mating_material: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_control: TimeControl::Default,
            automatic_threefold: false,
            automatic_fifty_move: true,
            automatic_insufficient_material: true,
            flag_fall_draw_without_mating_material: false,
        }
    }
}

impl GameSettings {
    pub fn with_time_control(time_control: TimeControl) -> Self {
        Self {
            time_control,
            ..Self::default()
        }
    }
}

/// A pending or lapsed draw offer.
///
/// An offer stays pending while its author keeps moving and lapses as soon
/// as the opponent plays a move instead of accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOffer {
    pub by: Color,
    pub lapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: PlayerId,
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct PlyRecord {
    mover: Color,
    clock_before: ChessClock,
}

#[derive(Debug)]
pub struct Game {
    id: GameId,
    white: PlayerSeat,
    black: PlayerSeat,
    settings: GameSettings,
    initial: GameState,
    board: GameState,
    clock: ChessClock,
    time_source: Arc<dyn TimeSource>,
    pgn: Pgn,
    fen_history: Vec<String>,
    plies: Vec<PlyRecord>,
    chat: Vec<ChatMessage>,
    draw_offer: Option<DrawOffer>,
    status: GameStatus,
    cause: Option<TerminationCause>,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(
        id: GameId,
        white: PlayerSeat,
        black: PlayerSeat,
        settings: GameSettings,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, SessionError> {
        Self::with_board(id, white, black, settings, GameState::new_game(), time_source)
    }

    /// Create a game from a wire time-control name such as `"BLITZ"`.
    pub fn from_wire(
        id: GameId,
        white: PlayerSeat,
        black: PlayerSeat,
        time_control: &str,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, SessionError> {
        let time_control = time_control.parse::<TimeControl>()?;
        Self::new(id, white, black, GameSettings::with_time_control(time_control), time_source)
    }

    pub fn from_fen(
        id: GameId,
        white: PlayerSeat,
        black: PlayerSeat,
        settings: GameSettings,
        fen: &str,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, SessionError> {
        let board = GameState::from_fen(fen)?;
        Self::with_board(id, white, black, settings, board, time_source)
    }

    fn with_board(
        id: GameId,
        white: PlayerSeat,
        black: PlayerSeat,
        settings: GameSettings,
        board: GameState,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, SessionError> {
        if white.id == black.id {
            return Err(SessionError::SamePlayerTwice);
        }
        let now = time_source.now();
        let fen = board.get_fen();
        Ok(Self {
            id,
            white,
            black,
            settings,
            initial: board.scratch_copy(),
            clock: ChessClock::new(settings.time_control.base_allotment(), now),
            time_source,
            board,
            pgn: Pgn::new(),
            fen_history: vec![fen],
            plies: Vec::new(),
            chat: Vec::new(),
            draw_offer: None,
            status: GameStatus::Active,
            cause: None,
            created_at: now,
            finished_at: None,
        })
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Play `from`-`to` for `player`.
    ///
    /// If the mover's time has already run out the move is neither validated
    /// nor applied and the game ends on time; the returned summary reports
    /// that.
    pub fn make_move(
        &mut self,
        player: PlayerId,
        from: Coordinate,
        to: Coordinate,
        promotion: Option<PieceKind>,
    ) -> Result<StateSummary, SessionError> {
        self.try_make_move(player, from, to, promotion)
            .inspect_err(|err| warn!(game_id = %self.id, %player, %from, %to, %err, "move rejected"))
    }

    fn try_make_move(
        &mut self,
        player: PlayerId,
        from: Coordinate,
        to: Coordinate,
        promotion: Option<PieceKind>,
    ) -> Result<StateSummary, SessionError> {
        self.ensure_active()?;
        let color = self.seat_color(player)?;
        if color != self.board.side_to_move {
            return Err(SessionError::NotYourTurn);
        }

        let now = self.time_source.now();
        if self.clock.remaining(color, color, now) <= TimeDelta::zero() {
            self.flag_fall(color, now);
            return Ok(self.summary());
        }

        let validated = is_legal(&self.board, from, to, promotion)?;

        let notation = AlgebraicNotation::from_validated(&validated)?;
        let clock_before = self.clock;
        self.clock.debit(color, now);
        make_move(&mut self.board, validated.description);
        debug!(game_id = %self.id, ply = self.pgn.len() + 1, %notation, "move applied");
        self.pgn.push(notation);
        self.fen_history.push(self.board.get_fen());
        self.plies.push(PlyRecord {
            mover: color,
            clock_before,
        });

        self.draw_offer = match self.draw_offer {
            Some(offer) if !offer.lapsed && offer.by == color => Some(offer),
            Some(offer) if !offer.lapsed => Some(DrawOffer {
                lapsed: true,
                ..offer
            }),
            _ => None,
        };

        self.adjudicate_after_move(color, validated.operations.status, now);
        Ok(self.summary())
    }

    pub fn resign(&mut self, player: PlayerId) -> Result<StateSummary, SessionError> {
        let resigned = self.ensure_active().and_then(|()| self.seat_color(player));
        let color = resigned.inspect_err(|err| warn!(game_id = %self.id, %player, %err, "resign rejected"))?;
        let now = self.time_source.now();
        self.finish(GameStatus::win_for(color.opposite()), TerminationCause::Resignation, now);
        Ok(self.summary())
    }

    /// Offer a draw, or accept the opponent's pending offer.
    pub fn agreement(&mut self, player: PlayerId) -> Result<AgreementOutcome, SessionError> {
        self.try_agreement(player)
            .inspect_err(|err| warn!(game_id = %self.id, %player, %err, "draw request rejected"))
    }

    fn try_agreement(&mut self, player: PlayerId) -> Result<AgreementOutcome, SessionError> {
        self.ensure_active()?;
        let color = self.seat_color(player)?;
        let fresh_offer = DrawOffer {
            by: color,
            lapsed: false,
        };
        match self.draw_offer {
            Some(offer) if offer.by == color && !offer.lapsed => Err(SessionError::DrawAlreadyOffered),
            Some(offer) if offer.by != color && offer.lapsed => Err(SessionError::DrawOfferLapsed),
            Some(offer) if offer.by != color => {
                let now = self.time_source.now();
                self.finish(GameStatus::Drawn, TerminationCause::Agreement, now);
                Ok(AgreementOutcome::Agreed(self.summary()))
            }
            _ => {
                self.draw_offer = Some(fresh_offer);
                debug!(game_id = %self.id, by = ?color, "draw offered");
                Ok(AgreementOutcome::Requested)
            }
        }
    }

    /// Claim a draw because the current position has occurred three times.
    pub fn end_game_by_three_fold(&mut self, player: PlayerId) -> Result<StateSummary, SessionError> {
        let claim = self.ensure_active().and_then(|()| self.seat_color(player)).and_then(|_| {
            if self.is_threefold_claimable() {
                Ok(())
            } else {
                Err(SessionError::NoThreefoldRepetition)
            }
        });
        claim.inspect_err(|err| warn!(game_id = %self.id, %player, %err, "threefold claim rejected"))?;
        let now = self.time_source.now();
        self.finish(GameStatus::Drawn, TerminationCause::Threefold, now);
        Ok(self.summary())
    }

    /// Take back `player`'s last move, provided the opponent has not replied.
    ///
    /// The mover's clock is restored to what it showed before the move and
    /// their turn restarts now. Any draw offer is withdrawn.
    pub fn undo(&mut self, player: PlayerId) -> UndoOutcome {
        match self.try_undo(player) {
            Ok(summary) => UndoOutcome::Undone(summary),
            Err(reason) => {
                warn!(game_id = %self.id, %player, ?reason, "undo refused");
                UndoOutcome::Failed(reason)
            }
        }
    }

    fn try_undo(&mut self, player: PlayerId) -> Result<StateSummary, UndoFailure> {
        if self.status.is_terminal() {
            return Err(UndoFailure::GameOver);
        }
        let color = self.seat_color(player).map_err(|_| UndoFailure::NotAParticipant)?;
        let last_mover = self.plies.last().map(|ply| ply.mover).ok_or(UndoFailure::NothingToUndo)?;
        if last_mover != color {
            return Err(UndoFailure::NotLastMover);
        }
        let record = self.plies.pop().ok_or(UndoFailure::NothingToUndo)?;

        unmake_move(&mut self.board);
        let notation = self.pgn.pop();
        self.fen_history.pop();
        self.clock = record.clock_before;
        self.clock.restart_turn(self.time_source.now());
        self.draw_offer = None;
        if let Some(notation) = notation {
            debug!(game_id = %self.id, %notation, "move undone");
        }
        Ok(self.summary())
    }

    pub fn chat(&mut self, player: PlayerId, text: &str) -> Result<(), SessionError> {
        self.seat_color(player)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyChatMessage);
        }
        self.chat.push(ChatMessage {
            from: player,
            text: text.to_owned(),
            at: self.time_source.now(),
        });
        Ok(())
    }

    /// End the game if the side to move has run out of time.
    pub fn check_time(&mut self) -> GameStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        let now = self.time_source.now();
        let side = self.board.side_to_move;
        if self.clock.remaining(side, side, now) <= TimeDelta::zero() {
            self.flag_fall(side, now);
        }
        self.status
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn summary(&self) -> StateSummary {
        StateSummary {
            game_id: self.id,
            fen: self.board.get_fen(),
            pgn_suffix: self.pgn.last().map(ToString::to_string),
            white_time: format_hms(self.remaining_time(Color::White)),
            black_time: format_hms(self.remaining_time(Color::Black)),
            side_to_move: self.board.side_to_move,
            threefold_claimable: self.is_threefold_claimable(),
            status: self.status,
            cause: self.cause,
        }
    }

    /// Remaining time of `color`, frozen once the game is over.
    pub fn remaining_time(&self, color: Color) -> TimeDelta {
        let at = self.finished_at.unwrap_or_else(|| self.time_source.now());
        self.clock
            .remaining(color, self.board.side_to_move, at)
            .max(TimeDelta::zero())
    }

    pub fn is_threefold_claimable(&self) -> bool {
        !self.status.is_terminal() && is_threefold_repetition(&self.board)
    }

    #[inline]
    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn white(&self) -> PlayerSeat {
        self.white
    }

    pub fn black(&self) -> PlayerSeat {
        self.black
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn cause(&self) -> Option<TerminationCause> {
        self.cause
    }

    pub fn board(&self) -> &GameState {
        &self.board
    }

    pub fn fen_history(&self) -> &[String] {
        &self.fen_history
    }

    pub fn pgn(&self) -> &Pgn {
        &self.pgn
    }

    pub fn draw_offer(&self) -> Option<DrawOffer> {
        self.draw_offer
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Seat of `player`, if seated.
    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        self.seat_color(player).ok()
    }

    /// Full PGN text including tag pairs and the result token.
    pub fn pgn_text(&self) -> String {
        let mut headers = BTreeMap::new();
        headers.insert("Event".to_owned(), "Plum Arena Game".to_owned());
        headers.insert("Site".to_owned(), "Plum Arena".to_owned());
        headers.insert("Date".to_owned(), self.created_at.format("%Y.%m.%d").to_string());
        headers.insert("Round".to_owned(), "-".to_owned());
        headers.insert("White".to_owned(), self.white.id.to_string());
        headers.insert("Black".to_owned(), self.black.id.to_string());
        headers.insert("TimeControl".to_owned(), self.settings.time_control.to_string());
        headers.insert("Result".to_owned(), self.status.pgn_result().to_owned());
        write_pgn_with_headers(&self.initial, &self.pgn, &headers)
    }

    pub fn start_record(&self) -> GameStarted {
        GameStarted {
            game_id: self.id,
            white: self.white,
            black: self.black,
            time_control: self.settings.time_control,
            initial_fen: self.initial.get_fen(),
            started_at: self.created_at,
        }
    }

    /// Archive record; `None` while the game is still running.
    pub fn final_record(&self) -> Option<GameArchive> {
        let (Some(cause), Some(finished_at)) = (self.cause, self.finished_at) else {
            return None;
        };
        Some(GameArchive {
            game_id: self.id,
            white: self.white.id,
            black: self.black.id,
            status: self.status,
            cause,
            pgn: self.pgn_text(),
            fen_history: self.fen_history.clone(),
            finished_at,
        })
    }

    pub fn rating_input(&self) -> Option<RatingInput> {
        if !self.status.is_terminal() {
            return None;
        }
        Some(RatingInput {
            game_id: self.id,
            white: self.white,
            black: self.black,
            status: self.status,
            time_control: self.settings.time_control,
        })
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.status.is_terminal() {
            Err(SessionError::GameOver)
        } else {
            Ok(())
        }
    }

    fn seat_color(&self, player: PlayerId) -> Result<Color, SessionError> {
        if player == self.white.id {
            Ok(Color::White)
        } else if player == self.black.id {
            Ok(Color::Black)
        } else {
            Err(SessionError::NotAParticipant(player.0))
        }
    }

    fn adjudicate_after_move(&mut self, mover: Color, status: CheckStatus, now: DateTime<Utc>) {
        let settings = self.settings;
        let verdict = match status {
            CheckStatus::Checkmate => Some((GameStatus::win_for(mover), TerminationCause::Checkmate)),
            CheckStatus::Stalemate => Some((GameStatus::Drawn, TerminationCause::Stalemate)),
            _ if is_fivefold_repetition(&self.board) => {
                Some((GameStatus::Drawn, TerminationCause::FivefoldRepetition))
            }
            _ if settings.automatic_insufficient_material && has_insufficient_material(&self.board) => {
                Some((GameStatus::Drawn, TerminationCause::InsufficientMaterial))
            }
            _ if settings.automatic_fifty_move && is_fifty_move_draw(&self.board) => {
                Some((GameStatus::Drawn, TerminationCause::FiftyMove))
            }
            _ if settings.automatic_threefold && is_threefold_repetition(&self.board) => {
                Some((GameStatus::Drawn, TerminationCause::Threefold))
            }
            _ => None,
        };
        if let Some((status, cause)) = verdict {
            self.finish(status, cause, now);
        }
    }

    /// `flagged` ran out of time and loses. With
    /// `flag_fall_draw_without_mating_material` set, an opponent who could
    /// never mate only draws.
    fn flag_fall(&mut self, flagged: Color, now: DateTime<Utc>) {
        let opponent = flagged.opposite();
        let status = if self.settings.flag_fall_draw_without_mating_material
            && !has_mating_material(&self.board, opponent)
        {
            GameStatus::Drawn
        } else {
            GameStatus::win_for(opponent)
        };
        self.finish(status, TerminationCause::FlagFall, now);
    }

    fn finish(&mut self, status: GameStatus, cause: TerminationCause, now: DateTime<Utc>) {
        self.status = status;
        self.cause = Some(cause);
        self.finished_at = Some(now);
        self.draw_offer = None;
        info!(
            game_id = %self.id,
            status = ?status,
            cause = ?cause,
            plies = self.pgn.len(),
            "game finished"
        );
    }
}
