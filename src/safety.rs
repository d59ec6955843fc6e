//! Squares a side attacks, for king move filtering, castling and check detection.

use crate::attacks::attacks_from_set;
use crate::position::Position;
use crate::types::{Color, PieceType};

/// Every square attacked by the opponent of `defender`.
///
/// The defending king is taken off the board for the sliders' occupancy, so that a square behind
/// the king on a checking line still counts as attacked and the king cannot step along the ray.
pub fn unsafe_squares(position: &Position, defender: Color) -> u64 {
    let attacker = defender.other_color();
    let occupied =
        position.get_occupied() & !position.get_piece_bb(defender, PieceType::King);

    PieceType::ALL.iter().fold(0, |acc, &piece_type| {
        acc | attacks_from_set(
            piece_type,
            position.get_piece_bb(attacker, piece_type),
            occupied,
            attacker,
        )
    })
}

/// Is `color`'s king attacked?
pub fn is_in_check(position: &Position, color: Color) -> bool {
    position.get_piece_bb(color, PieceType::King) & unsafe_squares(position, color) != 0
}
