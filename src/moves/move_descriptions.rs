//! Move values.
//!
//! [`Move`] is the request shape (from, to, optional promotion) that callers
//! hand to the validator. [`MoveDescription`] is what the generator and the
//! board work with: the same squares plus the moved and captured kinds and
//! the special-move flags needed to apply and reverse it.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::game_state::coordinates::Coordinate;

pub const FLAG_CAPTURE: u8 = 1 << 0;
pub const FLAG_DOUBLE_PAWN_PUSH: u8 = 1 << 1;
pub const FLAG_EN_PASSANT: u8 = 1 << 2;
pub const FLAG_CASTLING: u8 = 1 << 3;

/// A requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coordinate,
    pub to: Coordinate,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const fn new(from: Coordinate, to: Coordinate, promotion: Option<PieceKind>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }
}

/// A fully described move as produced by generation or validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveDescription {
    from: Square,
    to: Square,
    moved_piece: PieceKind,
    captured_piece: Option<PieceKind>,
    promotion_piece: Option<PieceKind>,
    flags: u8,
}

impl MoveDescription {
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: Option<PieceKind>,
        promotion_piece: Option<PieceKind>,
        flags: u8,
    ) -> Self {
        Self {
            from,
            to,
            moved_piece,
            captured_piece,
            promotion_piece,
            flags,
        }
    }

    #[inline]
    pub const fn from_square(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to_square(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn moved_piece(self) -> PieceKind {
        self.moved_piece
    }

    #[inline]
    pub const fn captured_piece(self) -> Option<PieceKind> {
        self.captured_piece
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion_piece
    }

    #[inline]
    pub const fn flags(self) -> u8 {
        self.flags
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags & FLAG_CAPTURE != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.flags & FLAG_CASTLING != 0
    }

    #[inline]
    pub const fn is_double_pawn_push(self) -> bool {
        self.flags & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    pub const fn to_move(self) -> Move {
        Move::new(
            Coordinate::from_square(self.from),
            Coordinate::from_square(self.to),
            self.promotion_piece,
        )
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for MoveDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            Coordinate::from_square(self.from),
            Coordinate::from_square(self.to)
        )?;
        if let Some(promotion) = self.promotion_piece {
            write!(f, "{}", promotion.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
