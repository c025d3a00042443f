//! Perft: exhaustive legal move-path counting.
//!
//! Used to verify the move generator against published reference counts and
//! to benchmark it.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::{attackers_to_square, king_square};
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_legal_move};
use crate::moves::move_descriptions::MoveDescription;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub double_checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.double_checks += rhs.double_checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Number of leaf positions `depth` plies below `game_state`.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal_moves(game_state);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        make_move(game_state, mv);
        nodes += perft(game_state, depth - 1);
        unmake_move(game_state);
    }
    nodes
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(MoveDescription, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    generate_legal_moves(game_state)
        .into_iter()
        .map(|mv| {
            make_move(game_state, mv);
            let nodes = perft(game_state, depth - 1);
            unmake_move(game_state);
            (mv, nodes)
        })
        .collect()
}

/// Node count plus statistics on the moves leading into the leaves.
pub fn perft_counts(game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }
    let mut total = PerftCounts::default();
    for mv in generate_legal_moves(game_state) {
        make_move(game_state, mv);
        if depth == 1 {
            total.merge(leaf_counts(game_state, mv));
        } else {
            total.merge(perft_counts(game_state, depth - 1));
        }
        unmake_move(game_state);
    }
    total
}

fn leaf_counts(game_state: &mut GameState, mv: MoveDescription) -> PerftCounts {
    let mut counts = PerftCounts {
        nodes: 1,
        ..PerftCounts::default()
    };
    if mv.is_capture() {
        counts.captures += 1;
    }
    if mv.is_en_passant() {
        counts.en_passant += 1;
    }
    if mv.is_castling() {
        counts.castles += 1;
    }
    if mv.promotion_piece().is_some() {
        counts.promotions += 1;
    }

    let defender = game_state.side_to_move;
    let checkers = king_square(game_state, defender)
        .map(|sq| attackers_to_square(game_state, sq, defender.opposite()).len())
        .unwrap_or(0);
    if checkers > 0 {
        counts.checks += 1;
        if checkers >= 2 {
            counts.double_checks += 1;
        }
        if !has_legal_move(game_state) {
            counts.checkmates += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn assert_nodes(fen: &str, expected: &[u64]) {
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        for (idx, nodes) in expected.iter().enumerate() {
            let depth = (idx + 1) as u8;
            assert_eq!(perft(&mut game, depth), *nodes, "{fen} depth {depth}");
        }
        assert_eq!(game.get_fen(), fen);
    }

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let mut game = GameState::new_game();
        assert_eq!(perft(&mut game, 0), 1);
        assert_eq!(perft_counts(&mut game, 0).nodes, 1);
    }

    #[test]
    fn perft_startpos_to_depth_four() {
        assert_nodes(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902, 197_281],
        );
    }

    #[test]
    fn perft_kiwipete() {
        assert_nodes(KIWIPETE, &[48, 2039, 97_862]);
    }

    #[test]
    fn perft_position_3() {
        assert_nodes("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812, 43_238]);
    }

    #[test]
    fn perft_position_4() {
        assert_nodes(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            &[6, 264, 9467],
        );
    }

    #[test]
    fn perft_position_5() {
        assert_nodes("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", &[44, 1486, 62_379]);
    }

    #[test]
    fn perft_position_6() {
        assert_nodes(
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            &[46, 2079, 89_890],
        );
    }

    #[test]
    #[ignore = "slow in debug builds; run with --release -- --ignored"]
    fn perft_startpos_depth_five_and_six() {
        let mut game = GameState::new_game();
        assert_eq!(perft(&mut game, 5), 4_865_609);
        assert_eq!(perft(&mut game, 6), 119_060_324);
    }

    #[test]
    fn divide_sums_to_total() {
        let mut game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let divide = perft_divide(&mut game, 2);
        assert_eq!(divide.len(), 48);
        assert_eq!(divide.iter().map(|(_, nodes)| nodes).sum::<u64>(), 2039);
    }

    #[test]
    fn leaf_statistics_match_reference() {
        let mut start = GameState::new_game();
        assert_eq!(
            perft_counts(&mut start, 4),
            PerftCounts {
                nodes: 197_281,
                captures: 1576,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 469,
                double_checks: 0,
                checkmates: 8,
            }
        );

        let mut kiwipete = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        assert_eq!(
            perft_counts(&mut kiwipete, 2),
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                double_checks: 0,
                checkmates: 0,
            }
        );

        let mut position_3 =
            GameState::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").expect("FEN should parse");
        let counts = perft_counts(&mut position_3, 3);
        assert_eq!(counts.nodes, 2812);
        assert_eq!(counts.captures, 209);
        assert_eq!(counts.en_passant, 2);
        assert_eq!(counts.checks, 267);
        assert_eq!(counts.checkmates, 0);
    }
}
