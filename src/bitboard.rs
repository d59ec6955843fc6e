//! Bitboard primitives and the precomputed geometry masks used for move generation.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a8 = 0, b8 = 1, ..., h8 = 7, a7 = 8, ..., h1 = 63.
//! This corresponds to: square_index = (8 - rank) * 8 + (file - 1) where rank/file are 1-indexed,
//! so "up the board" for white is towards lower indices.
//!
//! The per-square line masks (rank, file, diagonal, anti-diagonal) are built once, on first use or
//! through [`init`], and never change afterwards.

use once_cell::sync::Lazy;

use crate::types::Color;

pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_B: u64 = FILE_A << 1;
pub const FILE_G: u64 = FILE_A << 6;
pub const FILE_H: u64 = FILE_A << 7;
/// Files a and b, cleared after knight shifts that move two files towards h.
pub const FILE_AB: u64 = FILE_A | FILE_B;
/// Files g and h, cleared after knight shifts that move two files towards a.
pub const FILE_GH: u64 = FILE_G | FILE_H;

pub const RANK_8: u64 = 0xFF;
pub const RANK_7: u64 = RANK_8 << 8;
pub const RANK_5: u64 = RANK_8 << 24;
pub const RANK_4: u64 = RANK_8 << 32;
pub const RANK_2: u64 = RANK_8 << 48;
pub const RANK_1: u64 = RANK_8 << 56;

/// d4, e4, d5, e5
pub const CENTER: u64 = (0x18 << 24) | (0x18 << 32);
/// c3 through f6
pub const EXTENDED_CENTER: u64 = (0x3C << 16) | (0x3C << 24) | (0x3C << 32) | (0x3C << 40);

/// Convert a square index to a bitboard with that single bit set
#[inline(always)]
pub const fn sq_to_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Rank (1-8) of a square index
#[inline(always)]
pub const fn sq_rank(sq: u8) -> u8 {
    8 - (sq >> 3)
}

/// File (1-8) of a square index
#[inline(always)]
pub const fn sq_file(sq: u8) -> u8 {
    (sq & 7) + 1
}

/// Convert a 1-indexed rank and file to a square index (0-63)
#[inline(always)]
pub const fn pos_to_sq(rank: u8, file: u8) -> u8 {
    (8 - rank) * 8 + (file - 1)
}

/// Reverse the bit order of a 64-bit value: bit 0 swaps with bit 63, bit 1 with bit 62, ...
#[inline(always)]
pub const fn reverse_bits64(bb: u64) -> u64 {
    bb.reverse_bits()
}

/// Shift a bitboard by a signed number of squares. Positive amounts move towards h1.
#[inline(always)]
pub const fn shift(bb: u64, amount: i8) -> u64 {
    if amount >= 0 {
        bb << amount
    } else {
        bb >> -amount
    }
}

/// Bitboard one rank forward from `color`'s point of view.
#[inline(always)]
pub const fn forward(bb: u64, color: Color) -> u64 {
    match color {
        Color::White => bb >> 8,
        Color::Black => bb << 8,
    }
}

/// Bitboard one rank backward from `color`'s point of view.
#[inline(always)]
pub const fn backward(bb: u64, color: Color) -> u64 {
    match color {
        Color::White => bb << 8,
        Color::Black => bb >> 8,
    }
}

/// Iterate over set bits in a bitboard, returning square indices
pub struct BitboardIter(pub u64);

impl Iterator for BitboardIter {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1; // Clear the lowest set bit
            Some(sq)
        }
    }
}

/// One of the four castling rights, with the squares involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRight {
    /// Bit in [`crate::position::Position::castling`] set once this right is forfeited
    pub flag: u8,
    pub color: Color,
    pub king_from: u8,
    pub king_to: u8,
    pub rook_from: u8,
    pub rook_to: u8,
    /// Squares between king and rook, which must hold no piece
    pub empty: u64,
    /// King origin, transit and destination, none of which may be attacked
    pub safe: u64,
}

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;
pub const ALL_CASTLING: u8 = WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE;

pub const CASTLING_RIGHTS: [CastlingRight; 4] = [
    CastlingRight {
        flag: WHITE_KINGSIDE,
        color: Color::White,
        king_from: pos_to_sq(1, 5),
        king_to: pos_to_sq(1, 7),
        rook_from: pos_to_sq(1, 8),
        rook_to: pos_to_sq(1, 6),
        empty: sq_to_bb(pos_to_sq(1, 6)) | sq_to_bb(pos_to_sq(1, 7)),
        safe: sq_to_bb(pos_to_sq(1, 5)) | sq_to_bb(pos_to_sq(1, 6)) | sq_to_bb(pos_to_sq(1, 7)),
    },
    CastlingRight {
        flag: WHITE_QUEENSIDE,
        color: Color::White,
        king_from: pos_to_sq(1, 5),
        king_to: pos_to_sq(1, 3),
        rook_from: pos_to_sq(1, 1),
        rook_to: pos_to_sq(1, 4),
        empty: sq_to_bb(pos_to_sq(1, 2)) | sq_to_bb(pos_to_sq(1, 3)) | sq_to_bb(pos_to_sq(1, 4)),
        safe: sq_to_bb(pos_to_sq(1, 3)) | sq_to_bb(pos_to_sq(1, 4)) | sq_to_bb(pos_to_sq(1, 5)),
    },
    CastlingRight {
        flag: BLACK_KINGSIDE,
        color: Color::Black,
        king_from: pos_to_sq(8, 5),
        king_to: pos_to_sq(8, 7),
        rook_from: pos_to_sq(8, 8),
        rook_to: pos_to_sq(8, 6),
        empty: sq_to_bb(pos_to_sq(8, 6)) | sq_to_bb(pos_to_sq(8, 7)),
        safe: sq_to_bb(pos_to_sq(8, 5)) | sq_to_bb(pos_to_sq(8, 6)) | sq_to_bb(pos_to_sq(8, 7)),
    },
    CastlingRight {
        flag: BLACK_QUEENSIDE,
        color: Color::Black,
        king_from: pos_to_sq(8, 5),
        king_to: pos_to_sq(8, 3),
        rook_from: pos_to_sq(8, 1),
        rook_to: pos_to_sq(8, 4),
        empty: sq_to_bb(pos_to_sq(8, 2)) | sq_to_bb(pos_to_sq(8, 3)) | sq_to_bb(pos_to_sq(8, 4)),
        safe: sq_to_bb(pos_to_sq(8, 3)) | sq_to_bb(pos_to_sq(8, 4)) | sq_to_bb(pos_to_sq(8, 5)),
    },
];

/// Per-square line masks. Each entry includes the square itself.
pub struct GeometryMasks {
    pub rank: [u64; 64],
    pub file: [u64; 64],
    /// Towards a1 / h8
    pub diagonal: [u64; 64],
    /// Towards a8 / h1
    pub anti_diagonal: [u64; 64],
}

impl GeometryMasks {
    fn new() -> Self {
        let mut rank = [0u64; 64];
        let mut file = [0u64; 64];
        let mut diagonal = [0u64; 64];
        let mut anti_diagonal = [0u64; 64];

        for sq in 0..64usize {
            let row = (sq / 8) as i32;
            let col = (sq % 8) as i32;
            for other in 0..64usize {
                let other_row = (other / 8) as i32;
                let other_col = (other % 8) as i32;
                let bit = 1u64 << other;
                if other_row == row {
                    rank[sq] |= bit;
                }
                if other_col == col {
                    file[sq] |= bit;
                }
                // a step towards h8 is one column right and one row up
                if other_col + other_row == col + row {
                    diagonal[sq] |= bit;
                }
                if other_col - other_row == col - row {
                    anti_diagonal[sq] |= bit;
                }
            }
        }

        GeometryMasks {
            rank,
            file,
            diagonal,
            anti_diagonal,
        }
    }
}

/// Global geometry masks (built once)
pub static GEOMETRY: Lazy<GeometryMasks> = Lazy::new(GeometryMasks::new);

/// Build the geometry masks now rather than on first use.
pub fn init() {
    Lazy::force(&GEOMETRY);
}
