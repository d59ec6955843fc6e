pub mod types;
pub mod bitboard;
pub mod notation;
pub mod attacks;
pub mod position;
pub mod safety;
pub mod movegen;
pub mod perft;
