//! Perft divide report for a position.
//!
//! Usage:
//! `cargo run --release --bin perft_report -- 5`
//! `cargo run --release --bin perft_report -- 3 "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"`

use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use plum_arena::game_state::chess_rules::STARTING_POSITION_FEN;
use plum_arena::game_state::game_state::GameState;
use plum_arena::move_generation::perft::perft_divide;

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let depth = match args.next() {
        Some(text) => text
            .parse::<u8>()
            .map_err(|e| format!("invalid depth {text:?}: {e}"))?,
        None => return Err("usage: perft_report <depth> [fen]".to_owned()),
    };
    let fen = args.next().unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());
    let mut game = GameState::from_fen(&fen).map_err(|e| e.to_string())?;

    info!(depth, fen = %fen, "running perft");
    let started = Instant::now();
    let divide = perft_divide(&mut game, depth);
    let elapsed = started.elapsed();

    let mut total = 0u64;
    for (mv, nodes) in &divide {
        println!("{mv}: {nodes}");
        total += nodes;
    }
    let secs = elapsed.as_secs_f64();
    let nps = if secs > 0.0 { total as f64 / secs } else { 0.0 };
    println!();
    println!("moves: {}", divide.len());
    println!("nodes: {total}");
    println!("elapsed_ms: {}", elapsed.as_millis());
    println!("nps: {nps:.0}");
    Ok(())
}
