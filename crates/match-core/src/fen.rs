//! FEN piece-placement decoding.
//!
//! Only the first field of a FEN string is consumed; the server sends
//! full FEN but the client re-derives its board projection from the
//! placement alone.

use thiserror::Error;

use crate::{Color, PieceKind};

/// The standard starting-position placement field.
pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// A decoded board projection: piece-or-empty per canonical square.
///
/// FEN placement scans a8 first, which matches the canonical index
/// order exactly, so decoding is a single left-to-right pass.
pub type Placement = [Option<(PieceKind, Color)>; 64];

/// Errors from decoding a FEN placement field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid character '{ch}' at square {at}")]
    InvalidChar { ch: char, at: usize },

    #[error("placement covers {0} squares, expected 64")]
    WrongSquareCount(usize),
}

/// Decodes a FEN placement field into a [`Placement`].
///
/// Accepts either a bare placement field or a full FEN string, in
/// which case everything from the first space on is ignored. `/` rank
/// separators advance nothing; a digit skips that many empty squares;
/// any other character must be a piece letter.
pub fn decode_placement(fen: &str) -> Result<Placement, FenError> {
    let field = match fen.find(' ') {
        Some(end) => &fen[..end],
        None => fen,
    };

    let mut board: Placement = [None; 64];
    let mut at: usize = 0;

    for ch in field.chars() {
        if ch == '/' {
            continue;
        }

        if let Some(skip) = ch.to_digit(10) {
            at += skip as usize;
            if at > 64 {
                return Err(FenError::WrongSquareCount(at));
            }
            continue;
        }

        let piece = PieceKind::from_fen_char(ch).ok_or(FenError::InvalidChar { ch, at })?;
        if at >= 64 {
            return Err(FenError::WrongSquareCount(at + 1));
        }
        board[at] = Some(piece);
        at += 1;
    }

    if at != 64 {
        return Err(FenError::WrongSquareCount(at));
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn empty_board() {
        let board = decode_placement("8/8/8/8/8/8/8/8").unwrap();
        assert!(board.iter().all(|sq| sq.is_none()));
    }

    #[test]
    fn start_position() {
        let board = decode_placement(START_PLACEMENT).unwrap();
        // Dark back rank occupies indices 0-7.
        assert_eq!(board[0], Some((PieceKind::Rook, Color::Dark)));
        assert_eq!(board[4], Some((PieceKind::King, Color::Dark)));
        // Light king on e1 = index 60.
        let e1 = Square::from_algebraic("e1").unwrap();
        assert_eq!(board[e1.index() as usize], Some((PieceKind::King, Color::Light)));
        assert_eq!(board.iter().filter(|sq| sq.is_some()).count(), 32);
    }

    #[test]
    fn full_fen_uses_placement_only() {
        let board =
            decode_placement("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(board[e4.index() as usize], Some((PieceKind::Pawn, Color::Light)));
        let e2 = Square::from_algebraic("e2").unwrap();
        assert_eq!(board[e2.index() as usize], None);
    }

    #[test]
    fn decoding_is_idempotent() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R";
        assert_eq!(decode_placement(fen).unwrap(), decode_placement(fen).unwrap());
    }

    #[test]
    fn rejects_short_placement() {
        assert_eq!(
            decode_placement("8/8/8/8/8/8/8"),
            Err(FenError::WrongSquareCount(56))
        );
    }

    #[test]
    fn rejects_long_placement() {
        assert!(matches!(
            decode_placement("8/8/8/8/8/8/8/8/8"),
            Err(FenError::WrongSquareCount(_))
        ));
    }

    #[test]
    fn rejects_invalid_piece_letter() {
        assert_eq!(
            decode_placement("8/8/8/3x4/8/8/8/8"),
            Err(FenError::InvalidChar { ch: 'x', at: 27 })
        );
    }

    #[test]
    fn rejects_overfull_rank() {
        assert!(matches!(
            decode_placement("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::WrongSquareCount(_))
        ));
    }
}
