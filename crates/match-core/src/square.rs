//! Board square indexing and algebraic coordinates.

use std::fmt;
use thiserror::Error;

use crate::Color;

/// Errors from coordinate conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("square index out of range: {0}")]
    IndexOutOfRange(u8),

    #[error("malformed coordinate: '{0}'")]
    MalformedCoordinate(String),
}

/// A square on the board, indexed 0-63.
///
/// The canonical index space runs row-major from the dark back rank:
/// a8 = 0, b8 = 1, ..., h1 = 63. All movement-rule arithmetic uses
/// this orientation; rendering for the dark player applies
/// [`Perspective`] at the adapter boundary only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a square from a canonical index.
    pub const fn from_index(index: u8) -> Result<Self, GeometryError> {
        if index < 64 {
            Ok(Square(index))
        } else {
            Err(GeometryError::IndexOutOfRange(index))
        }
    }

    /// Parses a square from algebraic notation (e.g. "e4").
    pub fn from_algebraic(coord: &str) -> Result<Self, GeometryError> {
        let malformed = || GeometryError::MalformedCoordinate(coord.to_string());

        let bytes = coord.as_bytes();
        if bytes.len() != 2 {
            return Err(malformed());
        }
        let file = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            _ => return Err(malformed()),
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => b - b'0',
            _ => return Err(malformed()),
        };

        Ok(Square((8 - rank) * 8 + file))
    }

    /// Returns the canonical index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the file (column), 0 = 'a' through 7 = 'h'.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Returns the row counted from the dark back rank (0 = rank 8).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Returns the rank digit (1-8) under the light-at-bottom view.
    #[inline]
    pub const fn rank(self) -> u8 {
        (63 - self.0) / 8 + 1
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// Returns the algebraic coordinate (e.g. "e4").
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank())
    }

    /// King start square for the given color.
    #[inline]
    pub const fn king_start(color: Color) -> Square {
        match color {
            Color::Light => Square(60),
            Color::Dark => Square(4),
        }
    }

    /// Kingside castle target for the given color.
    #[inline]
    pub const fn kingside_target(color: Color) -> Square {
        match color {
            Color::Light => Square(62),
            Color::Dark => Square(6),
        }
    }

    /// Queenside castle target for the given color.
    #[inline]
    pub const fn queenside_target(color: Color) -> Square {
        match color {
            Color::Light => Square(58),
            Color::Dark => Square(2),
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank())
    }
}

/// Board orientation for rendering.
///
/// The dark player sees the board rotated; this transform applies only
/// when laying squares out on screen, never in legality math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Light,
    Dark,
}

impl Perspective {
    /// Maps a canonical square to its render slot (0-63, top-left first).
    #[inline]
    pub const fn render_index(self, square: Square) -> u8 {
        match self {
            Perspective::Light => square.index(),
            Perspective::Dark => 63 - square.index(),
        }
    }
}

impl From<Color> for Perspective {
    fn from(color: Color) -> Self {
        match color {
            Color::Light => Perspective::Light,
            Color::Dark => Perspective::Dark,
        }
    }
}
