//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and the square
//! indices and one-hot bitboards used by the board internals.

use crate::errors::SquareError;
use crate::game_state::chess_types::Square;
use crate::game_state::coordinates::Coordinate;

/// Convert a square name (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, SquareError> {
    square.parse::<Coordinate>().map(Coordinate::square)
}

/// Convert a square name (for example: "e4") to a one-hot bitboard.
#[inline]
pub fn algebraic_to_bitboard(square: &str) -> Result<u64, SquareError> {
    let index = algebraic_to_square(square)?;
    Ok(1u64 << index)
}

/// Convert a square index (`0..=63`) to its name (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, SquareError> {
    Coordinate::from_index(square)
        .map(|coordinate| coordinate.to_string())
        .ok_or(SquareError::OutOfBounds(square))
}
