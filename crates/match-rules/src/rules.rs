//! Geometric legality predicates, one per piece kind.
//!
//! All arithmetic runs in the canonical index space (a8 = 0, h1 = 63).
//! Predicates are pure: occupancy is supplied through [`Occupancy`]
//! and nothing here mutates board state.

use match_core::{Color, PieceKind, Placement, Square};

/// Board occupancy query supplied by the caller.
///
/// Keeps the rule predicates independent of the live board; the
/// session passes its projection, tests pass hand-built positions.
pub trait Occupancy {
    fn piece_at(&self, square: Square) -> Option<(PieceKind, Color)>;
}

impl Occupancy for Placement {
    fn piece_at(&self, square: Square) -> Option<(PieceKind, Color)> {
        self[square.index() as usize]
    }
}

/// Which side a castle move targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Pawn starting row in canonical terms (light pawns sit on row 6,
/// dark pawns on row 1).
const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::Light => 6,
        Color::Dark => 1,
    }
}

/// Row a pawn of this color promotes on (the opposing back rank).
const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::Light => 0,
        Color::Dark => 7,
    }
}

#[inline]
fn deltas(start: Square, target: Square) -> (i8, i8) {
    let df = target.file() as i8 - start.file() as i8;
    let dr = target.row() as i8 - start.row() as i8;
    (df, dr)
}

/// Pawn step: forward one to an empty square, forward two from the
/// starting row over an empty path, diagonal one onto an opposing
/// piece, or the en-passant geometry (see [`en_passant_step`]).
pub fn pawn_step(color: Color, start: Square, target: Square, occ: &impl Occupancy) -> bool {
    let (df, dr) = deltas(start, target);
    let dir = color.pawn_row_direction();

    // Forward one.
    if df == 0 && dr == dir && occ.piece_at(target).is_none() {
        return true;
    }

    // Forward two, only from the starting row, both squares empty.
    if df == 0 && dr == 2 * dir && start.row() == pawn_start_row(color) {
        let between = (start.index() as i8 + dir * 8) as u8;
        let between_empty = Square::from_index(between)
            .map(|sq| occ.piece_at(sq).is_none())
            .unwrap_or(false);
        if between_empty && occ.piece_at(target).is_none() {
            return true;
        }
    }

    // Diagonal one, capture only.
    if df.abs() == 1 && dr == dir {
        if let Some((_, occupant)) = occ.piece_at(target) {
            return occupant != color;
        }
        return en_passant_step(color, start, target, occ);
    }

    false
}

/// En-passant geometry: the diagonal target is empty but the square on
/// the start row under the target file holds an opposing pawn.
///
/// Whether that pawn actually just double-stepped is not tracked here;
/// the server re-checks move history.
pub fn en_passant_step(color: Color, start: Square, target: Square, occ: &impl Occupancy) -> bool {
    let (df, dr) = deltas(start, target);
    if df.abs() != 1 || dr != color.pawn_row_direction() {
        return false;
    }
    if occ.piece_at(target).is_some() {
        return false;
    }

    let beside = match Square::from_index(start.row() * 8 + target.file()) {
        Ok(sq) => sq,
        Err(_) => return false,
    };
    matches!(occ.piece_at(beside), Some((PieceKind::Pawn, c)) if c != color)
}

/// Knight step: exactly one of the eight L-shaped offsets.
pub fn knight_step(start: Square, target: Square) -> bool {
    let (df, dr) = deltas(start, target);
    matches!((df.abs(), dr.abs()), (1, 2) | (2, 1))
}

/// Bishop step: any non-zero diagonal. Intervening pieces are not
/// checked.
pub fn bishop_step(start: Square, target: Square) -> bool {
    let (df, dr) = deltas(start, target);
    df != 0 && df.abs() == dr.abs()
}

/// Rook step: any non-zero move along a single file or rank.
/// Intervening pieces are not checked.
pub fn rook_step(start: Square, target: Square) -> bool {
    let (df, dr) = deltas(start, target);
    (df == 0) != (dr == 0)
}

/// Queen step: bishop or rook geometry.
pub fn queen_step(start: Square, target: Square) -> bool {
    bishop_step(start, target) || rook_step(start, target)
}

/// King step: one square in any direction, or one of the two fixed
/// castle geometries for the mover's color.
pub fn king_step(color: Color, start: Square, target: Square) -> bool {
    let (df, dr) = deltas(start, target);
    if df.abs().max(dr.abs()) == 1 {
        return true;
    }
    castle_kind(color, start, target).is_some()
}

/// Recognizes the fixed castle geometries: king start square to the
/// kingside or queenside target two files away. Start/target identity
/// only; rook presence and path safety are the server's problem.
pub fn castle_kind(color: Color, start: Square, target: Square) -> Option<CastleSide> {
    if start != Square::king_start(color) {
        return None;
    }
    if target == Square::kingside_target(color) {
        Some(CastleSide::KingSide)
    } else if target == Square::queenside_target(color) {
        Some(CastleSide::QueenSide)
    } else {
        None
    }
}

/// A pawn move is a promotion candidate iff it lands on the opposing
/// back rank. The caller must collect a promotion choice before
/// finalizing notation.
pub fn is_promotion(color: Color, target: Square) -> bool {
    target.row() == promotion_row(color)
}

/// Total dispatch from piece kind to its predicate.
pub fn legal_step(
    kind: PieceKind,
    color: Color,
    start: Square,
    target: Square,
    occ: &impl Occupancy,
) -> bool {
    match kind {
        PieceKind::Pawn => pawn_step(color, start, target, occ),
        PieceKind::Knight => knight_step(start, target),
        PieceKind::Bishop => bishop_step(start, target),
        PieceKind::Rook => rook_step(start, target),
        PieceKind::Queen => queen_step(start, target),
        PieceKind::King => king_step(color, start, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_core::{decode_placement, START_PLACEMENT};
    use proptest::prelude::*;

    const EMPTY: Placement = [None; 64];

    fn sq(coord: &str) -> Square {
        Square::from_algebraic(coord).unwrap()
    }

    fn place(board: &mut Placement, coord: &str, kind: PieceKind, color: Color) {
        board[sq(coord).index() as usize] = Some((kind, color));
    }

    #[test]
    fn pawn_forward_one() {
        assert!(pawn_step(Color::Light, sq("e2"), sq("e3"), &EMPTY));
        assert!(pawn_step(Color::Dark, sq("e7"), sq("e6"), &EMPTY));
        // Backwards is never legal.
        assert!(!pawn_step(Color::Light, sq("e3"), sq("e2"), &EMPTY));
        // Blocked forward square.
        let mut board = EMPTY;
        place(&mut board, "e3", PieceKind::Knight, Color::Dark);
        assert!(!pawn_step(Color::Light, sq("e2"), sq("e3"), &board));
    }

    #[test]
    fn pawn_forward_two_from_start_row_only() {
        assert!(pawn_step(Color::Light, sq("e2"), sq("e4"), &EMPTY));
        assert!(pawn_step(Color::Dark, sq("d7"), sq("d5"), &EMPTY));
        assert!(!pawn_step(Color::Light, sq("e3"), sq("e5"), &EMPTY));
        // Intervening piece blocks the double step.
        let mut board = EMPTY;
        place(&mut board, "e3", PieceKind::Bishop, Color::Light);
        assert!(!pawn_step(Color::Light, sq("e2"), sq("e4"), &board));
        // Occupied target blocks it too.
        let mut board = EMPTY;
        place(&mut board, "e4", PieceKind::Bishop, Color::Dark);
        assert!(!pawn_step(Color::Light, sq("e2"), sq("e4"), &board));
    }

    #[test]
    fn pawn_diagonal_needs_opposing_piece() {
        let mut board = EMPTY;
        place(&mut board, "d5", PieceKind::Pawn, Color::Dark);
        assert!(pawn_step(Color::Light, sq("e4"), sq("d5"), &board));
        // Empty diagonal is not a move.
        assert!(!pawn_step(Color::Light, sq("e4"), sq("f5"), &board));
        // Own piece is not a capture.
        place(&mut board, "f5", PieceKind::Knight, Color::Light);
        assert!(!pawn_step(Color::Light, sq("e4"), sq("f5"), &board));
    }

    #[test]
    fn en_passant_adjacency() {
        let mut board = EMPTY;
        place(&mut board, "d5", PieceKind::Pawn, Color::Dark);
        // Light pawn on e5, dark pawn beside it on d5, d6 empty.
        assert!(en_passant_step(Color::Light, sq("e5"), sq("d6"), &board));
        assert!(pawn_step(Color::Light, sq("e5"), sq("d6"), &board));
        // Not en-passant if the adjacent piece is not a pawn.
        let mut board = EMPTY;
        place(&mut board, "d5", PieceKind::Rook, Color::Dark);
        assert!(!en_passant_step(Color::Light, sq("e5"), sq("d6"), &board));
        // Not en-passant if the target square is occupied.
        let mut board = EMPTY;
        place(&mut board, "d5", PieceKind::Pawn, Color::Dark);
        place(&mut board, "d6", PieceKind::Knight, Color::Dark);
        assert!(!en_passant_step(Color::Light, sq("e5"), sq("d6"), &board));
    }

    #[test]
    fn knight_interior_targets() {
        // From e5 (interior), exactly the eight L-offsets are legal.
        let start = sq("e5");
        let legal: Vec<u8> = (0..64)
            .filter(|&i| knight_step(start, Square::from_index(i).unwrap()))
            .collect();
        let expected: Vec<u8> = ["d7", "f7", "c6", "g6", "c4", "g4", "d3", "f3"]
            .iter()
            .map(|c| sq(c).index())
            .collect();
        let mut expected = expected;
        expected.sort_unstable();
        assert_eq!(legal, expected);
    }

    #[test]
    fn knight_corner_targets() {
        let start = sq("a1");
        let count = (0..64)
            .filter(|&i| knight_step(start, Square::from_index(i).unwrap()))
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn sliders_ignore_intervening_pieces() {
        // Start position: c1 bishop "sees" h6 straight through the
        // pawn chain. This is the documented no-path-blocking gap.
        let board = decode_placement(START_PLACEMENT).unwrap();
        assert!(legal_step(PieceKind::Bishop, Color::Light, sq("c1"), sq("h6"), &board));
        assert!(legal_step(PieceKind::Rook, Color::Light, sq("a1"), sq("a5"), &board));
        assert!(legal_step(PieceKind::Queen, Color::Light, sq("d1"), sq("d7"), &board));
    }

    #[test]
    fn bishop_rejects_non_diagonals() {
        assert!(!bishop_step(sq("c1"), sq("c4")));
        assert!(!bishop_step(sq("c1"), sq("d4")));
        assert!(!bishop_step(sq("c1"), sq("c1")));
    }

    #[test]
    fn rook_rejects_non_lines() {
        assert!(rook_step(sq("a1"), sq("a8")));
        assert!(rook_step(sq("a1"), sq("h1")));
        assert!(!rook_step(sq("a1"), sq("b2")));
        assert!(!rook_step(sq("a1"), sq("a1")));
    }

    #[test]
    fn king_single_step() {
        for target in ["d3", "d4", "d5", "e3", "e5", "f3", "f4", "f5"] {
            assert!(king_step(Color::Light, sq("e4"), sq(target)));
        }
        assert!(!king_step(Color::Light, sq("e4"), sq("e6")));
    }

    #[test]
    fn castle_geometry() {
        assert_eq!(
            castle_kind(Color::Light, sq("e1"), sq("g1")),
            Some(CastleSide::KingSide)
        );
        assert_eq!(
            castle_kind(Color::Light, sq("e1"), sq("c1")),
            Some(CastleSide::QueenSide)
        );
        assert_eq!(castle_kind(Color::Light, sq("e1"), sq("f1")), None);
        assert_eq!(
            castle_kind(Color::Dark, sq("e8"), sq("g8")),
            Some(CastleSide::KingSide)
        );
        assert_eq!(
            castle_kind(Color::Dark, sq("e8"), sq("c8")),
            Some(CastleSide::QueenSide)
        );
        // Castle geometry counts as a legal king step even on an empty
        // board: the start/target identity is all that is checked.
        assert!(king_step(Color::Light, sq("e1"), sq("g1")));
        assert!(king_step(Color::Light, sq("e1"), sq("c1")));
    }

    #[test]
    fn promotion_rows() {
        assert!(is_promotion(Color::Light, sq("e8")));
        assert!(!is_promotion(Color::Light, sq("e7")));
        assert!(is_promotion(Color::Dark, sq("a1")));
        assert!(!is_promotion(Color::Dark, sq("a8")));
    }

    // Reflects a square across the board's horizontal midline (rank
    // flip, file preserved): e1 maps to e8. This is the transform that
    // swaps the two colors' geometry, castle squares included.
    fn rank_flip(i: u8) -> Square {
        Square::from_index((7 - i / 8) * 8 + i % 8).unwrap()
    }

    proptest! {
        // Light moving "up" behaves identically to dark moving "down"
        // under rank reflection of an empty board.
        #[test]
        fn pawn_rule_mirrors_under_color_flip(start in 0u8..64, target in 0u8..64) {
            let s = Square::from_index(start).unwrap();
            let t = Square::from_index(target).unwrap();
            prop_assert_eq!(
                pawn_step(Color::Light, s, t, &EMPTY),
                pawn_step(Color::Dark, rank_flip(start), rank_flip(target), &EMPTY)
            );
        }

        #[test]
        fn king_rule_mirrors_under_color_flip(start in 0u8..64, target in 0u8..64) {
            let s = Square::from_index(start).unwrap();
            let t = Square::from_index(target).unwrap();
            prop_assert_eq!(
                king_step(Color::Light, s, t),
                king_step(Color::Dark, rank_flip(start), rank_flip(target))
            );
        }

        #[test]
        fn colorless_rules_are_reflection_invariant(start in 0u8..64, target in 0u8..64) {
            let s = Square::from_index(start).unwrap();
            let t = Square::from_index(target).unwrap();
            let (ms, mt) = (rank_flip(start), rank_flip(target));
            prop_assert_eq!(knight_step(s, t), knight_step(ms, mt));
            prop_assert_eq!(bishop_step(s, t), bishop_step(ms, mt));
            prop_assert_eq!(rook_step(s, t), rook_step(ms, mt));
            prop_assert_eq!(queen_step(s, t), queen_step(ms, mt));
        }
    }
}
