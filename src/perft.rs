use rayon::prelude::*;

use crate::movegen::legal_moves;
use crate::position::Position;
use crate::types::Move;

/// Number of leaf nodes of the legal move tree of the given depth.
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(position, position.side_to_move);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|m| perft(&position.make_move(m), depth - 1))
        .sum()
}

/// [`perft`] with the root moves split across rayon's thread pool.
pub fn parallel_perft(position: &Position, depth: u8) -> u64 {
    if depth <= 1 {
        return perft(position, depth);
    }
    legal_moves(position, position.side_to_move)
        .par_iter()
        .map(|m| perft(&position.make_move(m), depth - 1))
        .sum()
}

/// Node counts below each root move, in move order.
pub fn divide(position: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    legal_moves(position, position.side_to_move)
        .into_par_iter()
        .map(|m| {
            let nodes = perft(&position.make_move(&m), depth - 1);
            (m, nodes)
        })
        .collect()
}

/// Perft from starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// | Depth | Nodes         |
/// | ----- | ------------- |
/// | 0     | 1             |
/// | 1     | 20            |
/// | 2     | 400           |
/// | 3     | 8,902         |
/// | 4     | 197,281       |
/// | 5     | 4,865,609     |
/// | 6     | 119,060,324   |
/// | 7     | 3,195,901,860 |
pub fn get_perft_expected_node_count(depth: u8) -> Option<u64> {
    match depth {
        0 => Some(1),
        1 => Some(20),
        2 => Some(400),
        3 => Some(8902),
        4 => Some(197_281),
        5 => Some(4_865_609),
        6 => Some(119_060_324),
        7 => Some(3_195_901_860),
        _ => None,
    }
}
