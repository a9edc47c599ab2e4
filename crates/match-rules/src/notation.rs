//! Algebraic-notation encoding for outgoing moves.
//!
//! The server consumes moves as SAN-like strings:
//! `[piece][x][target][=promotion]`, with `O-O`/`O-O-O` for castles
//! and the start-file prefix on pawn captures (`dxe5`).

use match_core::{Move, PieceKind, Square};

use crate::rules::{castle_kind, en_passant_step, CastleSide, Occupancy};

/// Raw notation concatenation: piece letter, capture marker, target
/// coordinate, optional promotion suffix.
///
/// The pawn's empty letter means a plain advance encodes as just the
/// target square; the start-file prefix on pawn captures is the
/// caller's to supply (see [`encode_move`]).
pub fn encode(
    piece: PieceKind,
    capture: bool,
    target: Square,
    promotion: Option<PieceKind>,
) -> String {
    let mut out = String::with_capacity(6);
    out.push_str(piece.letter());
    if capture {
        out.push('x');
    }
    out.push_str(&target.to_algebraic());
    if let Some(choice) = promotion {
        out.push('=');
        out.push_str(choice.letter());
    }
    out
}

/// The castle notation for a side.
pub const fn castle_notation(side: CastleSide) -> &'static str {
    match side {
        CastleSide::KingSide => "O-O",
        CastleSide::QueenSide => "O-O-O",
    }
}

/// Encodes a validated gesture move into the string the server expects.
///
/// A king move matching the fixed castle geometry overrides normal
/// encoding; a pawn capture (en-passant included) forces the capture
/// marker and gains the start-file prefix; a promotion choice appends
/// `=<letter>`.
pub fn encode_move(m: &Move, occ: &impl Occupancy) -> String {
    if m.piece == PieceKind::King {
        if let Some(side) = castle_kind(m.color, m.start, m.target) {
            return castle_notation(side).to_string();
        }
    }

    if m.piece == PieceKind::Pawn {
        let capture = m.capture || en_passant_step(m.color, m.start, m.target, occ);
        let mut out = String::with_capacity(8);
        if capture {
            out.push(m.start.file_char());
        }
        out.push_str(&encode(PieceKind::Pawn, capture, m.target, m.promotion));
        return out;
    }

    encode(m.piece, m.capture, m.target, m.promotion)
}
