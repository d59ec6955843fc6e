//! Pseudo-legal attack sets for every piece type.
//!
//! Sliding pieces use the "o - 2s" subtraction trick on one line at a time: subtracting twice the
//! slider bit from the line occupancy borrows through every empty square above the slider and stops
//! at the first blocker. Running the same subtraction on the bit-reversed board gives the squares
//! below the slider. Knights and kings are unions of eight shifts, each followed by a mask that
//! clears the squares the shift wrapped onto from the other edge of the board.

use crate::bitboard::{
    backward, forward, reverse_bits64, shift, BitboardIter, FILE_A, FILE_AB, FILE_GH, FILE_H,
    GEOMETRY, RANK_4, RANK_5,
};
use crate::types::{Color, PieceType};

/// (shift, squares to clear afterwards)
type Step = (i8, u64);

const KNIGHT_STEPS: [Step; 8] = [
    (-17, FILE_H),
    (-15, FILE_A),
    (-10, FILE_GH),
    (-6, FILE_AB),
    (6, FILE_GH),
    (10, FILE_AB),
    (15, FILE_H),
    (17, FILE_A),
];

const KING_STEPS: [Step; 8] = [
    (-9, FILE_H),
    (-8, 0),
    (-7, FILE_A),
    (-1, FILE_H),
    (1, FILE_A),
    (7, FILE_H),
    (8, 0),
    (9, FILE_A),
];

#[inline(always)]
fn step_attacks(pieces: u64, steps: &[Step; 8]) -> u64 {
    steps
        .iter()
        .fold(0, |acc, &(amount, guard)| acc | (shift(pieces, amount) & !guard))
}

/// Every square a knight in `knights` attacks. Accepts any number of knights.
#[inline]
pub fn knight_attacks(knights: u64) -> u64 {
    step_attacks(knights, &KNIGHT_STEPS)
}

/// Every square a king in `kings` attacks. Accepts any number of kings.
#[inline]
pub fn king_attacks(kings: u64) -> u64 {
    step_attacks(kings, &KING_STEPS)
}

/// Attacks of the slider on `sq` along the line `mask`, stopping at (and including) the first
/// occupied square in each direction.
#[inline]
pub fn line_attacks(sq: u8, occupied: u64, mask: u64) -> u64 {
    let slider = 1u64 << sq;
    let o = occupied & mask;
    let up = o.wrapping_sub(slider.wrapping_mul(2));
    let down = reverse_bits64(
        reverse_bits64(o).wrapping_sub(reverse_bits64(slider).wrapping_mul(2)),
    );
    (up ^ down) & mask
}

#[inline]
pub fn rook_attacks(sq: u8, occupied: u64) -> u64 {
    line_attacks(sq, occupied, GEOMETRY.rank[sq as usize])
        | line_attacks(sq, occupied, GEOMETRY.file[sq as usize])
}

#[inline]
pub fn bishop_attacks(sq: u8, occupied: u64) -> u64 {
    line_attacks(sq, occupied, GEOMETRY.diagonal[sq as usize])
        | line_attacks(sq, occupied, GEOMETRY.anti_diagonal[sq as usize])
}

#[inline]
pub fn queen_attacks(sq: u8, occupied: u64) -> u64 {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Attacks of a single non-pawn piece on `sq`.
pub fn piece_attacks(piece_type: PieceType, sq: u8, occupied: u64) -> u64 {
    let bb = 1u64 << sq;
    match piece_type {
        PieceType::Knight => knight_attacks(bb),
        PieceType::King => king_attacks(bb),
        PieceType::Rook => rook_attacks(sq, occupied),
        PieceType::Bishop => bishop_attacks(sq, occupied),
        PieceType::Queen => queen_attacks(sq, occupied),
        PieceType::Pawn => 0,
    }
}

/// Union of the attacks of every piece in `pieces`, iterating the set one bit at a time.
pub fn attacks_from_set(piece_type: PieceType, pieces: u64, occupied: u64, color: Color) -> u64 {
    match piece_type {
        PieceType::Knight => knight_attacks(pieces),
        PieceType::King => king_attacks(pieces),
        PieceType::Pawn => pawn_attacks_west(pieces, color) | pawn_attacks_east(pieces, color),
        _ => BitboardIter(pieces).fold(0, |acc, sq| acc | piece_attacks(piece_type, sq, occupied)),
    }
}

/// Diagonal pawn attacks towards the a-file, for every pawn in `pawns`.
#[inline]
pub fn pawn_attacks_west(pawns: u64, color: Color) -> u64 {
    (forward(pawns, color) >> 1) & !FILE_H
}

/// Diagonal pawn attacks towards the h-file, for every pawn in `pawns`.
#[inline]
pub fn pawn_attacks_east(pawns: u64, color: Color) -> u64 {
    (forward(pawns, color) << 1) & !FILE_A
}

/// Squares reached by a one-square push.
#[inline]
pub fn pawn_single_pushes(pawns: u64, empty: u64, color: Color) -> u64 {
    forward(pawns, color) & empty
}

/// Squares reached by a two-square push. Only pawns on their home rank can make it there, and the
/// square in between must be empty as well.
#[inline]
pub fn pawn_double_pushes(pawns: u64, empty: u64, color: Color) -> u64 {
    let double_push_rank = match color {
        Color::White => RANK_4,
        Color::Black => RANK_5,
    };
    forward(pawn_single_pushes(pawns, empty, color), color) & empty & double_push_rank
}

/// The square a `color` pawn may capture onto en passant, if the last move was a two-square push
/// by an enemy pawn. `last_move_origin` and `last_move_destination` are single bits (or zero).
pub fn en_passant_target(
    color: Color,
    enemy_pawns: u64,
    last_move_origin: u64,
    last_move_destination: u64,
) -> u64 {
    let enemy = color.other_color();
    let enemy_double_push_rank = match enemy {
        Color::White => RANK_4,
        Color::Black => RANK_5,
    };
    let pushed = last_move_destination & enemy_pawns & enemy_double_push_rank;
    if pushed == 0 || backward(backward(pushed, enemy), enemy) != last_move_origin {
        return 0;
    }
    backward(pushed, enemy)
}
