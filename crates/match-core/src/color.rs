//! Player color representation.
//!
//! The match server identifies the two sides as `"light"` and `"dark"`
//! in every payload that carries a color, so the wire names live here.

use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string is not `"light"` or `"dark"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color: '{0}'")]
pub struct ColorParseError(pub String);

/// Represents the two players in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Light = 0,
    Dark = 1,
}

impl Color {
    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Returns the wire name for this color.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Light => "light",
            Color::Dark => "dark",
        }
    }

    /// Row delta of a forward pawn step in the canonical index space.
    ///
    /// Index 0 is the dark back rank, so light pawns move toward lower
    /// rows (-1) and dark pawns toward higher rows (+1).
    #[inline]
    pub const fn pawn_row_direction(self) -> i8 {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Color::Light),
            "dark" => Ok(Color::Dark),
            other => Err(ColorParseError(other.to_string())),
        }
    }
}
