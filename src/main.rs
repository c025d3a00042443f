//! Console referee: two local players share one terminal and take turns.
//!
//! Run with:
//! `cargo run --release`
//! `cargo run --release -- BLITZ`
//!
//! Every command is played on behalf of the side to move, except `undo`,
//! which is requested by the player who made the last move.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use plum_arena::game_state::chess_types::{Color, PieceKind};
use plum_arena::game_state::coordinates::Coordinate;
use plum_arena::session::clock::SystemClock;
use plum_arena::session::collaborators::{InMemoryDirectory, TracingSink};
use plum_arena::session::game::GameSettings;
use plum_arena::session::host::{GameHost, GameRequest, GameResponse};
use plum_arena::session::identity::{PlayerId, PlayerSeat};
use plum_arena::session::outcome::{AgreementOutcome, StateSummary, UndoOutcome};
use plum_arena::session::time_control::TimeControl;

const WHITE_PLAYER: PlayerId = PlayerId(1);
const BLACK_PLAYER: PlayerId = PlayerId(2);

fn seat(color: Color) -> PlayerId {
    match color {
        Color::White => WHITE_PLAYER,
        Color::Black => BLACK_PLAYER,
    }
}

fn print_help() {
    println!("commands:");
    println!("  move <from> <to> [q|r|b|n]   play a move, e.g. `move e2 e4`");
    println!("  undo                         take back the last move");
    println!("  draw                         offer or accept a draw");
    println!("  resign                       resign the game");
    println!("  claim                        claim a threefold repetition");
    println!("  say <text>                   chat");
    println!("  board | fen | pgn | time     show the game");
    println!("  quit");
}

fn print_summary(summary: &StateSummary) {
    if let Some(last) = &summary.pgn_suffix {
        println!("last move: {last}");
    }
    println!(
        "white {} | black {} | {:?} to move{}",
        summary.white_time,
        summary.black_time,
        summary.side_to_move,
        if summary.threefold_claimable {
            " | threefold claimable"
        } else {
            ""
        }
    );
    if let Some(cause) = summary.cause {
        println!("result: {:?} by {:?}", summary.status, cause);
    }
}

fn parse_move(from: &str, to: &str, promotion: Option<&str>) -> Result<GameRequest, String> {
    let from = from.parse::<Coordinate>().map_err(|e| e.to_string())?;
    let to = to.parse::<Coordinate>().map_err(|e| e.to_string())?;
    let promotion = match promotion {
        None => None,
        Some(text) => {
            let mut chars = text.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(letter), None) => PieceKind::from_letter(letter),
                _ => None,
            };
            Some(kind.ok_or_else(|| format!("unknown promotion piece {text:?}"))?)
        }
    };
    Ok(GameRequest::Move {
        from,
        to,
        promotion,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let time_control = match std::env::args().nth(1) {
        Some(name) => name.parse::<TimeControl>()?,
        None => TimeControl::Default,
    };

    let mut host = GameHost::new(
        InMemoryDirectory::new(),
        TracingSink,
        TracingSink,
        Arc::new(SystemClock),
    );
    let game_id = host.start_game(
        PlayerSeat::new(WHITE_PLAYER.0, 1500.0),
        PlayerSeat::new(BLACK_PLAYER.0, 1500.0),
        GameSettings::with_time_control(time_control),
    )?;

    print_help();
    if let Some(game) = host.game(game_id) {
        println!("{}", game.board());
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(game) = host.game(game_id) else {
            break;
        };
        let side = game.board().side_to_move;
        let words: Vec<&str> = line.split_whitespace().collect();

        let (player, request) = match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => {
                print_help();
                continue;
            }
            ["board"] => {
                println!("{}", game.board());
                continue;
            }
            ["fen"] => {
                println!("{}", game.board().get_fen());
                continue;
            }
            ["pgn"] => {
                println!("{}", game.pgn_text());
                continue;
            }
            ["time"] => {
                print_summary(&game.summary());
                continue;
            }
            ["move", from, to] | ["move", from, to, _] => {
                match parse_move(from, to, words.get(3).copied()) {
                    Ok(request) => (seat(side), request),
                    Err(err) => {
                        println!("bad move: {err}");
                        continue;
                    }
                }
            }
            ["undo"] => (seat(side.opposite()), GameRequest::Undo),
            ["draw"] => (seat(side), GameRequest::Agreement),
            ["resign"] => (seat(side), GameRequest::Resign),
            ["claim"] => (seat(side), GameRequest::ClaimThreefold),
            ["say", ..] => (seat(side), GameRequest::Chat(words[1..].join(" "))),
            _ => {
                println!("unrecognized command; type `help`");
                continue;
            }
        };

        match host.handle(game_id, player, request) {
            Ok(GameResponse::State(summary)) => print_summary(&summary),
            Ok(GameResponse::Agreement(AgreementOutcome::Requested)) => println!("draw offered"),
            Ok(GameResponse::Agreement(AgreementOutcome::Agreed(summary))) => print_summary(&summary),
            Ok(GameResponse::Undo(UndoOutcome::Undone(summary))) => print_summary(&summary),
            Ok(GameResponse::Undo(UndoOutcome::Failed(reason))) => println!("undo refused: {reason:?}"),
            Ok(GameResponse::ChatAccepted) => {}
            Err(err) => println!("rejected: {err}"),
        }

        match host.game(game_id) {
            Some(game) => println!("{}", game.board()),
            None => {
                println!("game over");
                break;
            }
        }
        io::stdout().flush()?;
    }

    Ok(())
}
