//! Crate root module declarations for the Plum Arena game server core.
//!
//! The layers build on each other from the bottom up: board state and raw
//! piece geometry, then move generation and validation, then the notation
//! codecs, and finally the game session state machine that referees live
//! games between two players.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod coordinates;
    pub mod game_state;
    pub mod undo_state;
    pub mod zobrist;
}

pub mod moves {
    pub mod move_descriptions;
    pub mod pawn_attacks;
    pub mod sliding_attacks;
    pub mod stepping_attacks;
}

pub mod move_generation {
    pub mod game_end;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliding;
    pub mod legal_moves_stepping;
    pub mod move_validator;
    pub mod perft;
}

pub mod session {
    pub mod clock;
    pub mod collaborators;
    pub mod game;
    pub mod host;
    pub mod identity;
    pub mod outcome;
    pub mod time_control;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod notation;
    pub mod pgn;
    pub mod render_game_state;
}
