//! Square names and move strings.
//!
//! Bit index `i` names the square on file `'a' + i % 8` and rank `8 - i / 8`.

use color_eyre::eyre::{bail, eyre, Result};

use crate::bitboard::{BitboardIter, RANK_1, RANK_8};
use crate::types::{Move, PieceType, PIECES_CAN_PROMOTE_TO};

/// Algebraic name of a square index, e.g. `0 -> "a8"`, `63 -> "h1"`
pub fn square_name(sq: u8) -> String {
    let file = (b'a' + (sq & 7)) as char;
    let rank = (b'8' - (sq >> 3)) as char;
    format!("{file}{rank}")
}

/// Square index of an algebraic name, e.g. `"e4" -> 36`
pub fn parse_square(name: &str) -> Result<u8> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        bail!("square `{name}` must be a file letter followed by a rank digit");
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) {
        bail!("invalid file `{}` in square `{name}`", file as char);
    }
    if !(b'1'..=b'8').contains(&rank) {
        bail!("invalid rank `{}` in square `{name}`", rank as char);
    }
    Ok((b'8' - rank) * 8 + (file - b'a'))
}

/// Parse a move string as printed by [`Move::to_algebraic`].
pub fn parse_move(s: &str) -> Result<Move> {
    if !s.is_ascii() || !(4..=5).contains(&s.len()) {
        bail!("move `{s}` must be 4 or 5 characters long");
    }
    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    match s[4..].chars().next() {
        None => Ok(Move::new(from, to)),
        Some('c') => Ok(Move::castling(from, to)),
        Some(c) => {
            let piece_type = PieceType::from_char(c)
                .filter(|p| PIECES_CAN_PROMOTE_TO.contains(p))
                .ok_or_else(|| eyre!("invalid promotion piece `{c}` in move `{s}`"))?;
            Ok(Move::promoting(from, to, piece_type))
        }
    }
}

/// One move from `from` to every square in `targets`.
pub fn expand_moves(from: u8, targets: u64, moves: &mut Vec<Move>) {
    for to in BitboardIter(targets) {
        moves.push(Move::new(from, to));
    }
}

/// Pawn moves for a whole destination set, where each origin is the destination
/// plus `origin_offset`. Destinations on the first or last rank expand into one
/// move per promotion piece.
pub fn expand_pawn_moves(targets: u64, origin_offset: i8, moves: &mut Vec<Move>) {
    for to in BitboardIter(targets) {
        let from = (to as i8 + origin_offset) as u8;
        if (RANK_1 | RANK_8) & (1u64 << to) != 0 {
            for piece_type in PIECES_CAN_PROMOTE_TO {
                moves.push(Move::promoting(from, to, piece_type));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    }
}

pub fn move_strings(moves: &[Move]) -> Vec<String> {
    moves.iter().map(Move::to_algebraic).collect()
}
