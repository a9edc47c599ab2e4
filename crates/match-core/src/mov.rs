//! The transient move record produced by a drop gesture.

use crate::{Color, PieceKind, Square};

/// A single validated drag-drop move.
///
/// Constructed at drop time, consumed once by the notation encoder,
/// then discarded. The authoritative position lives on the server; the
/// client never stores moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub start: Square,
    pub target: Square,
    pub piece: PieceKind,
    pub color: Color,
    pub capture: bool,
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a move with no capture or promotion.
    pub fn new(start: Square, target: Square, piece: PieceKind, color: Color) -> Self {
        Move {
            start,
            target,
            piece,
            color,
            capture: false,
            promotion: None,
        }
    }

    /// Marks this move as a capture.
    pub fn with_capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Sets the promotion choice.
    pub fn with_promotion(mut self, choice: PieceKind) -> Self {
        self.promotion = Some(choice);
        self
    }
}
