//! Throughput of the rules core: perft, single-move validation and PGN replay.
//!
//! `PLUM_ARENA_PERFT_DEPTH` (default 3) caps the perft depth per position.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use plum_arena::game_state::coordinates::Coordinate;
use plum_arena::game_state::game_state::GameState;
use plum_arena::move_generation::move_validator::is_legal;
use plum_arena::move_generation::perft::perft;
use plum_arena::utils::pgn::read_pgn;

struct Position {
    name: &'static str,
    fen: &'static str,
    /// Leaf counts for depths 1, 2, 3, ...
    nodes: &'static [u64],
}

const POSITIONS: &[Position] = &[
    Position {
        name: "start",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        nodes: &[20, 400, 8902, 197_281],
    },
    Position {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        nodes: &[48, 2039, 97_862],
    },
    Position {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        nodes: &[14, 191, 2812, 43_238],
    },
    Position {
        name: "promotions",
        fen: "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        nodes: &[6, 264, 9467],
    },
];

const RUY_LOPEZ_PGN: &str = r#"[Event "Bench"]
[Result "*"]

1. e2-e4 e7-e5 2. Ng1-f3 Nb8-c6 3. Bf1-b5 a7-a6 4. Bb5-a4 Ng8-f6 5. O-O Bf8-e7
6. Rf1-e1 b7-b5 7. Ba4-b3 d7-d6 8. c2-c3 O-O *
"#;

fn max_perft_depth() -> usize {
    std::env::var("PLUM_ARENA_PERFT_DEPTH")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3)
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for position in POSITIONS {
        let game = GameState::from_fen(position.fen).expect("benchmark FEN should parse");
        for (depth, expected) in position.nodes.iter().enumerate().take(max_perft_depth()) {
            let depth = (depth + 1) as u8;
            assert_eq!(
                perft(&mut game.clone(), depth),
                *expected,
                "node count of {} at depth {depth}",
                position.name
            );

            group.throughput(Throughput::Elements(*expected));
            let mut board = game.clone();
            group.bench_function(BenchmarkId::new(position.name, depth), |b| {
                b.iter(|| black_box(perft(black_box(&mut board), depth)))
            });
        }
    }

    group.finish();
}

/// Every from/to pair on the board, as a client dragging pieces would submit them.
fn bench_validate_all_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_legal_all_pairs");
    group.throughput(Throughput::Elements(64 * 64));

    for position in POSITIONS {
        let game = GameState::from_fen(position.fen).expect("benchmark FEN should parse");
        let legal = Coordinate::ALL
            .iter()
            .flat_map(|from| Coordinate::ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| is_legal(&game, *from, *to, None).is_ok())
            .count();
        // Promotions collapse four moves onto one from/to pair.
        assert!(legal <= position.nodes[0] as usize);
        if position.name == "start" {
            assert_eq!(legal, 20);
        }

        group.bench_function(position.name, |b| {
            b.iter(|| {
                let mut accepted = 0usize;
                for from in Coordinate::ALL {
                    for to in Coordinate::ALL {
                        if is_legal(black_box(&game), from, to, None).is_ok() {
                            accepted += 1;
                        }
                    }
                }
                black_box(accepted)
            })
        });
    }

    group.finish();
}

fn bench_pgn_replay(c: &mut Criterion) {
    let replay = read_pgn(RUY_LOPEZ_PGN).expect("benchmark PGN should replay");
    assert_eq!(replay.notations.len(), 16);

    let mut group = c.benchmark_group("pgn_replay");
    group.throughput(Throughput::Elements(replay.notations.len() as u64));
    group.bench_function("ruy_lopez", |b| {
        b.iter(|| {
            let replay = read_pgn(black_box(RUY_LOPEZ_PGN)).expect("benchmark PGN should replay");
            black_box(replay.fen_history.len())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_perft, bench_validate_all_pairs, bench_pgn_replay);
criterion_main!(benches);
