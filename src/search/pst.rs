//! Piece-square tables (component H / spec.md §4.H), reproduced verbatim
//! from the reference this spec was distilled from. No queen table: the
//! reference leaves queen placement to material value alone.

#[rustfmt::skip]
pub const PAWN_SCORE: [i32; 64] = [
    90, 90, 90, 90, 90, 90, 90, 90,
    30, 30, 30, 40, 40, 30, 30, 30,
    20, 20, 20, 30, 30, 30, 20, 20,
    10, 10, 10, 20, 20, 10, 10, 10,
     5,  5, 10, 20, 20,  5,  5,  5,
     0,  0,  0,  5,  5,  0,  0,  0,
     0,  0,  0,-10,-10,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
pub const KNIGHT_SCORE: [i32; 64] = [
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0, 10, 10,  0,  0, -5,
    -5,  5, 20, 20, 20, 20,  5, -5,
    -5, 10, 20, 30, 30, 20, 10, -5,
    -5, 10, 20, 30, 30, 20, 10, -5,
    -5,  5, 20, 10, 10, 20,  5, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,-10,  0,  0,  0,  0,-10, -5,
];

#[rustfmt::skip]
pub const BISHOP_SCORE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0, 10, 10,  0,  0,  0,
     0,  0, 10, 20, 20, 10,  0,  0,
     0,  0, 10, 20, 20, 10,  0,  0,
     0, 10,  0,  0,  0,  0, 10,  0,
     0, 30,  0,  0,  0,  0, 30,  0,
     0,  0,-10,  0,  0,-10,  0,  0,
];

#[rustfmt::skip]
pub const ROOK_SCORE: [i32; 64] = [
    50, 50, 50, 50, 50, 50, 50, 50,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0, 10, 20, 20, 10,  0,  0,
     0,  0, 10, 20, 20, 10,  0,  0,
     0,  0, 10, 20, 20, 10,  0,  0,
     0,  0, 10, 20, 20, 10,  0,  0,
     0,  0, 10, 20, 20, 10,  0,  0,
     0,  0,  0, 20, 20,  0,  0,  0,
];

#[rustfmt::skip]
pub const KING_SCORE: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  5,  5,  5,  5,  0,  0,
    0,  5,  5, 10, 10,  5,  5,  0,
    0,  5, 10, 20, 20, 10,  5,  0,
    0,  5, 10, 20, 20, 10,  5,  0,
    0,  0,  5, 10, 10,  5,  0,  0,
    0,  5,  5, -5, -5,  0,  5,  0,
    0,  0,  5,  0,-15,  0, 10,  0,
];

use crate::board::Piece;

#[inline]
pub fn table_for(piece: Piece) -> Option<&'static [i32; 64]> {
    match piece {
        Piece::Pawn => Some(&PAWN_SCORE),
        Piece::Knight => Some(&KNIGHT_SCORE),
        Piece::Bishop => Some(&BISHOP_SCORE),
        Piece::Rook => Some(&ROOK_SCORE),
        Piece::Queen => None,
        Piece::King => Some(&KING_SCORE),
    }
}
