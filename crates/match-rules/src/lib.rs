//! Per-piece move legality and algebraic notation.
//!
//! The predicates here form the client's fast local gate: they prune
//! obviously illegal drag targets before a move ever reaches the
//! server. The server stays authoritative and re-validates everything,
//! so these rules are deliberately geometric. Known gaps, preserved on
//! purpose to match the server's authority boundary:
//!
//! - sliding pieces (bishop, rook, queen) ignore intervening pieces;
//! - castling checks only the fixed start/target squares, not rook
//!   presence, empty path, or check safety;
//! - en-passant checks adjacency and emptiness, not whether the
//!   adjacent pawn actually just double-stepped.

mod notation;
mod rules;

pub use notation::{castle_notation, encode, encode_move};
pub use rules::{
    bishop_step, castle_kind, en_passant_step, is_promotion, king_step, knight_step, legal_step,
    pawn_step, queen_step, rook_step, CastleSide, Occupancy,
};
