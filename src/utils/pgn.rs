//! PGN read/write utilities for game history interchange.
//!
//! A [`Pgn`] is the ordered list of notation tokens of a game. It serializes
//! to PGN text with tag pairs and move numbers, and PGN text replays back
//! through the notation parser and the move validator into the initial and
//! final boards plus a FEN snapshot per ply.

use std::collections::BTreeMap;

use crate::errors::PgnError;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::move_validator::{validate_move, CheckStatus};
use crate::utils::notation::{AlgebraicNotation, ParsedNotation};

/// Ordered notation tokens of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pgn {
    moves: Vec<AlgebraicNotation>,
}

impl Pgn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notation: AlgebraicNotation) {
        self.moves.push(notation);
    }

    pub fn pop(&mut self) -> Option<AlgebraicNotation> {
        self.moves.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&AlgebraicNotation> {
        self.moves.last()
    }

    pub fn moves(&self) -> &[AlgebraicNotation] {
        &self.moves
    }

    /// Tokens joined by single spaces, without move numbers.
    pub fn movetext(&self) -> String {
        self.moves
            .iter()
            .map(AlgebraicNotation::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of replaying PGN text.
#[derive(Debug, Clone)]
pub struct PgnReplay {
    pub headers: BTreeMap<String, String>,
    pub initial: GameState,
    pub final_state: GameState,
    pub notations: Pgn,
    /// FEN of the initial position followed by the FEN after every ply.
    pub fen_history: Vec<String>,
    pub result: String,
}

pub fn write_pgn(initial_state: &GameState, pgn: &Pgn, result: &str) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Plum Arena Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert("Date".to_owned(), "????.??.??".to_owned());
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    write_pgn_with_headers(initial_state, pgn, &headers)
}

pub fn write_pgn_with_headers(
    initial_state: &GameState,
    pgn: &Pgn,
    headers: &BTreeMap<String, String>,
) -> String {
    let mut headers = headers.clone();
    let initial_fen = initial_state.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }

    let mut out = String::new();
    for (key, value) in &headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut movetext_parts = Vec::<String>::with_capacity(pgn.len() + 1);
    let mut move_number = initial_state.fullmove_number;
    let mut side = initial_state.side_to_move;
    for (ply, notation) in pgn.moves().iter().enumerate() {
        match side {
            Color::White => movetext_parts.push(format!("{move_number}. {notation}")),
            Color::Black if ply == 0 => movetext_parts.push(format!("{move_number}... {notation}")),
            Color::Black => movetext_parts.push(notation.to_string()),
        }
        if side == Color::Black {
            move_number += 1;
        }
        side = side.opposite();
    }

    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    movetext_parts.push(result.to_owned());
    out.push_str(&movetext_parts.join(" "));
    out.push('\n');

    out
}

pub fn read_pgn(pgn: &str) -> Result<PgnReplay, PgnError> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<String>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if trimmed.starts_with('[') {
            let (k, v) = parse_header_line(trimmed)?;
            headers.insert(k, v);
        } else {
            // Rest-of-line comments.
            let text = trimmed.split(';').next().unwrap_or_default();
            movetext_lines.push(text.to_owned());
        }
    }

    let initial = if headers.get("SetUp").map(|x| x.as_str()) == Some("1") {
        let fen = headers.get("FEN").ok_or(PgnError::MissingSetupFen)?;
        GameState::from_fen(fen)?
    } else if let Some(fen) = headers.get("FEN") {
        GameState::from_fen(fen)?
    } else {
        GameState::new_game()
    };

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    let mut tokens = Vec::new();
    let mut result = "*".to_owned();
    for raw in movetext.split_whitespace() {
        if is_move_number_token(raw) || raw.starts_with('$') {
            continue;
        }
        let token = trim_annotation_suffix(strip_move_number_prefix(raw));
        if token.is_empty() {
            continue;
        }
        if is_result_token(token) {
            result = token.to_owned();
            break;
        }
        tokens.push(token.to_owned());
    }

    if let Some(header_result) = headers.get("Result") {
        if result == "*" {
            result = normalize_result(header_result).to_owned();
        }
    }

    let mut replay = replay_tokens(&initial, &tokens)?;
    replay.headers = headers;
    replay.result = result;
    Ok(replay)
}

/// Replay notation tokens from `initial`, validating every ply.
pub fn replay_tokens<S: AsRef<str>>(initial: &GameState, tokens: &[S]) -> Result<PgnReplay, PgnError> {
    let mut state = initial.clone();
    let mut notations = Pgn::new();
    let mut fen_history = vec![initial.get_fen()];

    for (idx, token) in tokens.iter().enumerate() {
        let ply = idx + 1;
        let token = token.as_ref();
        let written = AlgebraicNotation::parse(token).map_err(|source| PgnError::Notation { ply, source })?;
        let validated = validate_move(&state, written.to_move(state.side_to_move)).map_err(|source| {
            PgnError::Illegal {
                ply,
                token: token.to_owned(),
                source,
            }
        })?;
        let actual = AlgebraicNotation::from_validated(&validated)
            .map_err(|source| PgnError::Notation { ply, source })?;
        if !describes_same_move(&written.parsed(), &actual.parsed()) {
            return Err(PgnError::Inconsistent {
                ply,
                token: token.to_owned(),
            });
        }

        make_move(&mut state, validated.description);
        fen_history.push(state.get_fen());
        notations.push(actual);
    }

    Ok(PgnReplay {
        headers: BTreeMap::new(),
        initial: initial.clone(),
        final_state: state,
        notations,
        fen_history,
        result: "*".to_owned(),
    })
}

/// A token without a status suffix matches whatever status the move has.
fn describes_same_move(written: &ParsedNotation, actual: &ParsedNotation) -> bool {
    let status_matches = written.status() == CheckStatus::None || written.status() == actual.status();
    let body_matches = match (written, actual) {
        (ParsedNotation::Castle { side: a, .. }, ParsedNotation::Castle { side: b, .. }) => a == b,
        (
            ParsedNotation::Move {
                piece: pa,
                from: fa,
                to: ta,
                capture: ca,
                promotion: xa,
                ..
            },
            ParsedNotation::Move {
                piece: pb,
                from: fb,
                to: tb,
                capture: cb,
                promotion: xb,
                ..
            },
        ) => pa == pb && fa == fb && ta == tb && ca == cb && xa == xb,
        _ => false,
    };
    status_matches && body_matches
}

fn parse_header_line(line: &str) -> Result<(String, String), PgnError> {
    let invalid = || PgnError::InvalidTag(line.to_owned());
    if !line.starts_with('[') || !line.ends_with(']') {
        return Err(invalid());
    }
    let inner = &line[1..line.len() - 1];
    let (key, value_raw) = inner.split_once(' ').ok_or_else(invalid)?;
    let value_raw = value_raw.trim();

    if !value_raw.starts_with('"') || !value_raw.ends_with('"') || value_raw.len() < 2 {
        return Err(invalid());
    }
    let value = value_raw[1..value_raw.len() - 1].replace("\\\"", "\"");
    Ok((key.trim().to_owned(), value))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                out.push(' ');
            }
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(' ');
            }
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

fn is_move_number_token(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// `12.e2-e4` and `12...e7-e5` carry the move number glued to the move.
fn strip_move_number_prefix(token: &str) -> &str {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token
    }
}

fn trim_annotation_suffix(token: &str) -> &str {
    token.trim_end_matches(['!', '?'])
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{IllegalMove, NotationError};

    const SCHOLARS_MATE: [&str; 7] = [
        "e2-e4", "e7-e5", "Bf1-c4", "Nb8-c6", "Qd1-h5", "Ng8-f6", "Qh5xf7#",
    ];

    #[test]
    fn movetext_is_a_flat_join() {
        let replay = replay_tokens(&GameState::new_game(), &SCHOLARS_MATE).expect("tokens replay");
        assert_eq!(
            replay.notations.movetext(),
            "e2-e4 e7-e5 Bf1-c4 Nb8-c6 Qd1-h5 Ng8-f6 Qh5xf7#"
        );
        assert_eq!(replay.fen_history.len(), 8);
        assert_eq!(replay.fen_history[0], STARTING_POSITION_FEN);
        assert_eq!(
            replay.fen_history[7],
            "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4"
        );
    }

    #[test]
    fn pgn_round_trip_start_position_history() {
        let initial = GameState::new_game();
        let replay = replay_tokens(&initial, &SCHOLARS_MATE).expect("tokens replay");

        let text = write_pgn(&initial, &replay.notations, "1-0");
        assert!(text.contains("[Result \"1-0\"]"));
        assert!(text.contains("1. e2-e4 e7-e5 2. Bf1-c4 Nb8-c6 3. Qd1-h5 Ng8-f6 4. Qh5xf7# 1-0"));

        let parsed = read_pgn(&text).expect("PGN should parse");
        assert_eq!(parsed.notations, replay.notations);
        assert_eq!(parsed.final_state.get_fen(), replay.final_state.get_fen());
        assert_eq!(parsed.fen_history, replay.fen_history);
        assert_eq!(parsed.result, "1-0");
    }

    #[test]
    fn pgn_round_trip_custom_fen_setup() {
        let initial =
            GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 7").expect("FEN should parse");
        let replay = replay_tokens(&initial, &["Ke8-d7", "e2-e4"]).expect("tokens replay");

        let mut headers = BTreeMap::<String, String>::new();
        headers.insert("Event".to_owned(), "Custom".to_owned());
        headers.insert("Result".to_owned(), "*".to_owned());

        let text = write_pgn_with_headers(&initial, &replay.notations, &headers);
        assert!(text.contains("[SetUp \"1\"]"));
        assert!(text.contains("7... Ke8-d7 8. e2-e4 *"));

        let parsed = read_pgn(&text).expect("PGN should parse");
        assert_eq!(parsed.initial.get_fen(), initial.get_fen());
        assert_eq!(parsed.notations, replay.notations);
        assert_eq!(parsed.headers.get("Event").map(String::as_str), Some("Custom"));
    }

    #[test]
    fn reader_replays_castling_on_both_sides() {
        let text = "1. e2-e4 e7-e5 2. Ng1-f3 Nb8-c6 3. Bf1-b5 a7-a6 4. Bb5-a4 Ng8-f6 5. O-O Bf8-e7\n6. Rf1-e1 b7-b5 7. Ba4-b3 d7-d6 8. c2-c3 O-O *\n";
        let parsed = read_pgn(text).expect("PGN should parse");
        assert_eq!(parsed.notations.len(), 16);
        assert_eq!(parsed.fen_history.len(), 17);
        assert_eq!(
            parsed.final_state.get_fen(),
            "r1bq1rk1/2p1bppp/p1np1n2/1p2p3/4P3/1BP2N2/PP1P1PPP/RNBQR1K1 w - - 1 9"
        );
    }

    #[test]
    fn reader_skips_comments_variations_and_nags() {
        let text = "[Event \"Annotated\"]\n\n1. e2-e4 {best by test} e7-e5 $1 2.Ng1-f3 (2. f2-f4 e5xf4) Nb8-c6!? ; trailing\n3. Bf1-b5 *\n";
        let parsed = read_pgn(text).expect("PGN should parse");
        assert_eq!(parsed.notations.movetext(), "e2-e4 e7-e5 Ng1-f3 Nb8-c6 Bf1-b5");
        assert_eq!(parsed.result, "*");
    }

    #[test]
    fn reader_reports_bad_tokens_by_ply() {
        let illegal = read_pgn("1. e2-e5 *");
        assert!(matches!(
            illegal,
            Err(PgnError::Illegal {
                ply: 1,
                source: IllegalMove::InvalidGeometry(_),
                ..
            })
        ));

        let malformed = read_pgn("1. e2-e4 e7e5 *");
        assert!(matches!(
            malformed,
            Err(PgnError::Notation {
                ply: 2,
                source: NotationError::Malformed(_)
            })
        ));

        // Right squares, wrong capture marker.
        let inconsistent = read_pgn("1. e2xe4 *");
        assert!(matches!(inconsistent, Err(PgnError::Inconsistent { ply: 1, .. })));

        assert!(matches!(
            read_pgn("[SetUp \"1\"]\n\n*"),
            Err(PgnError::MissingSetupFen)
        ));
        assert!(matches!(read_pgn("[Event Custom]\n\n*"), Err(PgnError::InvalidTag(_))));
    }
}
