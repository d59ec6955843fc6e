use std::fmt;

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use itertools::Itertools;

use crate::bitboard::{
    backward, sq_to_bb, ALL_CASTLING, BLACK_KINGSIDE, BLACK_QUEENSIDE, CASTLING_RIGHTS,
    WHITE_KINGSIDE, WHITE_QUEENSIDE,
};
use crate::notation::{parse_square, square_name};
use crate::types::{Color, Move, PieceType};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One board state. The twelve piece bitboards are indexed by `[color][piece type]` and never
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pieces: [[u64; 6]; 2],
    /// Origin square of the move that produced this position (single bit, or zero if unknown)
    pub last_move_origin: u64,
    /// Destination square of the move that produced this position (single bit, or zero if unknown)
    pub last_move_destination: u64,
    /// Castling rights that have been forfeited, as `WHITE_KINGSIDE | ...` flags
    pub castling: u8,
    pub side_to_move: Color,
    // number of half moves since last capture or pawn advance
    pub halfmove_clock: u32,
    // number of full moves. Starts at 1, and gets incremented after every black move
    pub fullmove_clock: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting arrangement
    pub fn new() -> Self {
        let mut position = Self {
            castling: 0,
            ..Self::empty()
        };
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, piece_type) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            position.add_piece(Color::Black, piece_type, file);
            position.add_piece(Color::Black, PieceType::Pawn, 8 + file);
            position.add_piece(Color::White, PieceType::Pawn, 48 + file);
            position.add_piece(Color::White, piece_type, 56 + file);
        }
        position
    }

    /// A board with no pieces, white to move and every castling right forfeited
    pub fn empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            last_move_origin: 0,
            last_move_destination: 0,
            castling: ALL_CASTLING,
            side_to_move: Color::White,
            halfmove_clock: 0,
            fullmove_clock: 1,
        }
    }

    pub fn from_fen(fen_string: &str) -> Result<Position> {
        let parts: Vec<&str> = fen_string.split_whitespace().collect();
        if parts.len() < 4 || parts.len() > 6 {
            bail!("FEN `{fen_string}` must have between 4 and 6 space-delimited fields");
        }

        let mut position = Self::empty();

        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != 8 {
            bail!("FEN board `{}` must have 8 ranks", parts[0]);
        }
        for (row, row_data) in rows.iter().enumerate() {
            let mut col = 0u8;
            for piece_char in row_data.chars() {
                if let Some(skip) = piece_char.to_digit(10) {
                    if col as u32 + skip > 8 {
                        bail!("rank `{row_data}` in FEN has more than 8 squares");
                    }
                    col += skip as u8;
                } else {
                    let piece_type = PieceType::from_char(piece_char)
                        .ok_or_else(|| eyre!("unrecognized piece `{piece_char}` in FEN"))?;
                    if col >= 8 {
                        bail!("rank `{row_data}` in FEN has more than 8 squares");
                    }
                    position.add_piece(Color::from_case(piece_char), piece_type, row as u8 * 8 + col);
                    col += 1;
                }
            }
            if col != 8 {
                bail!("rank `{row_data}` in FEN must describe exactly 8 squares");
            }
        }

        let mut color_chars = parts[1].chars();
        position.side_to_move = match (color_chars.next().and_then(Color::from_char), color_chars.next()) {
            (Some(color), None) => color,
            _ => bail!("active color `{}` must be either `w` or `b`", parts[1]),
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                let flag = match c {
                    'K' => WHITE_KINGSIDE,
                    'Q' => WHITE_QUEENSIDE,
                    'k' => BLACK_KINGSIDE,
                    'q' => BLACK_QUEENSIDE,
                    other => bail!("unrecognized castling right `{other}` in FEN"),
                };
                position.castling &= !flag;
            }
        }

        if parts[3] != "-" {
            // the en passant square is the one the pawn skipped over
            let target = sq_to_bb(
                parse_square(parts[3]).wrap_err("invalid en passant square in FEN")?,
            );
            let pushed_by = position.side_to_move.other_color();
            position.last_move_destination = backward(target, position.side_to_move);
            position.last_move_origin = backward(target, pushed_by);
        }

        if let Some(halfmove) = parts.get(4) {
            position.halfmove_clock = halfmove
                .parse()
                .wrap_err_with(|| format!("invalid halfmove clock `{halfmove}`"))?;
        }
        if let Some(fullmove) = parts.get(5) {
            position.fullmove_clock = fullmove
                .parse()
                .wrap_err_with(|| format!("invalid fullmove clock `{fullmove}`"))?;
        }

        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let board = (0..8u8)
            .map(|row| {
                let mut s = String::new();
                let mut gap = 0;
                for col in 0..8u8 {
                    match self.piece_at(row * 8 + col) {
                        Some((color, piece_type)) => {
                            if gap > 0 {
                                s.push_str(&gap.to_string());
                                gap = 0;
                            }
                            s.push(piece_type.to_fen_char(color));
                        }
                        None => gap += 1,
                    }
                }
                if gap > 0 {
                    s.push_str(&gap.to_string());
                }
                s
            })
            .join("/");

        let castling: String = [
            (WHITE_KINGSIDE, 'K'),
            (WHITE_QUEENSIDE, 'Q'),
            (BLACK_KINGSIDE, 'k'),
            (BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(flag, _)| self.castling & flag == 0)
        .map(|(_, c)| c)
        .collect();

        let en_passant = self.en_passant_square().map_or("-".to_string(), square_name);

        format!(
            "{} {} {} {} {} {}",
            board,
            self.side_to_move.to_char(),
            if castling.is_empty() { "-" } else { &castling },
            en_passant,
            self.halfmove_clock,
            self.fullmove_clock
        )
    }

    /// Square skipped by the last move if it was a two-square pawn push
    pub fn en_passant_square(&self) -> Option<u8> {
        let pushed_by = self.side_to_move.other_color();
        let pawns = self.get_piece_bb(pushed_by, PieceType::Pawn);
        if self.last_move_destination & pawns == 0 {
            return None;
        }
        let skipped = backward(self.last_move_destination, pushed_by);
        (backward(skipped, pushed_by) == self.last_move_origin)
            .then(|| skipped.trailing_zeros() as u8)
    }

    #[inline(always)]
    pub fn get_piece_bb(&self, color: Color, piece_type: PieceType) -> u64 {
        self.pieces[color.index()][piece_type.index()]
    }

    #[inline(always)]
    pub fn get_pieces_bb(&self, color: Color) -> u64 {
        self.pieces[color.index()].iter().fold(0, |acc, bb| acc | bb)
    }

    #[inline(always)]
    pub fn get_occupied(&self) -> u64 {
        self.get_pieces_bb(Color::White) | self.get_pieces_bb(Color::Black)
    }

    pub fn piece_at(&self, sq: u8) -> Option<(Color, PieceType)> {
        let bb = sq_to_bb(sq);
        Color::ALL
            .iter()
            .cartesian_product(PieceType::ALL.iter())
            .find(|&(&color, &piece_type)| self.get_piece_bb(color, piece_type) & bb != 0)
            .map(|(&color, &piece_type)| (color, piece_type))
    }

    pub fn add_piece(&mut self, color: Color, piece_type: PieceType, sq: u8) {
        self.pieces[color.index()][piece_type.index()] |= sq_to_bb(sq);
    }

    fn remove_piece(&mut self, color: Color, piece_type: PieceType, sq: u8) {
        self.pieces[color.index()][piece_type.index()] &= !sq_to_bb(sq);
    }

    fn forfeit_castling_at(&mut self, sq: u8) {
        for right in CASTLING_RIGHTS {
            if sq == right.king_from || sq == right.rook_from {
                self.castling |= right.flag;
            }
        }
    }

    /// The position after `m` is played. `m` is expected to come from the move generator for the
    /// side to move; a move with no piece on its origin returns the position unchanged.
    pub fn make_move(&self, m: &Move) -> Position {
        let mut next = *self;
        let Some((color, piece_type)) = self.piece_at(m.from) else {
            return next;
        };
        let to_bb = sq_to_bb(m.to);

        let captured = self.piece_at(m.to).filter(|(c, _)| *c != color);
        if let Some((captured_color, captured_type)) = captured {
            next.remove_piece(captured_color, captured_type, m.to);
        }

        next.remove_piece(color, piece_type, m.from);
        next.add_piece(color, m.promotion.unwrap_or(piece_type), m.to);

        if piece_type == PieceType::Pawn && captured.is_none() && (m.to & 7) != (m.from & 7) {
            // diagonal pawn move onto an empty square: en passant
            let taken = backward(to_bb, color).trailing_zeros() as u8;
            next.remove_piece(color.other_color(), PieceType::Pawn, taken);
        }

        if m.castle {
            if let Some(right) = CASTLING_RIGHTS
                .iter()
                .find(|r| r.color == color && r.king_from == m.from && r.king_to == m.to)
            {
                next.remove_piece(color, PieceType::Rook, right.rook_from);
                next.add_piece(color, PieceType::Rook, right.rook_to);
            }
        }

        next.forfeit_castling_at(m.from);
        next.forfeit_castling_at(m.to);

        next.last_move_origin = sq_to_bb(m.from);
        next.last_move_destination = to_bb;
        next.side_to_move = color.other_color();
        next.halfmove_clock = if piece_type == PieceType::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if color == Color::Black {
            next.fullmove_clock += 1;
        }
        next
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::new();
        for row in 0..8u8 {
            string.push((b'8' - row) as char);
            for col in 0..8u8 {
                string.push(' ');
                string.push(match self.piece_at(row * 8 + col) {
                    Some((color, piece_type)) => piece_type.to_fen_char(color),
                    None => '.',
                });
            }
            string.push('\n');
        }
        string.push_str("  a b c d e f g h\n");
        string
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.draw_board())
    }
}
