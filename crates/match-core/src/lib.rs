//! Core types for the chess match client.
//!
//! This crate provides the fundamental types shared by the rules and
//! protocol crates:
//! - [`PieceKind`] and [`Color`] for piece identity
//! - [`Square`] and [`Perspective`] for the 0-63 board index space
//! - [`Move`] for the transient drag-gesture move record
//! - FEN piece-placement decoding into a [`Placement`]

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::{Color, ColorParseError};
pub use fen::{decode_placement, FenError, Placement, START_PLACEMENT};
pub use mov::Move;
pub use piece::PieceKind;
pub use square::{GeometryError, Perspective, Square};
