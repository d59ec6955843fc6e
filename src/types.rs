use std::fmt;

use crate::notation::square_name;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Uppercase letters are white pieces in FEN, lowercase are black.
    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
    ];

    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }

    /// Uppercase FEN letter of the piece
    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Symbol of a piece of this type and color, as written in FEN
    pub fn to_fen_char(&self, color: Color) -> char {
        match color {
            Color::White => self.to_char(),
            Color::Black => self.to_char().to_ascii_lowercase(),
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Promotion choices, in the order they are emitted for one pawn move.
pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// A move as produced by the generator. Squares are bit indices (0 = a8, 63 = h1).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub promotion: Option<PieceType>,
    pub castle: bool,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promotion: None,
            castle: false,
        }
    }

    pub fn promoting(from: u8, to: u8, piece_type: PieceType) -> Self {
        Self {
            promotion: Some(piece_type),
            ..Self::new(from, to)
        }
    }

    pub fn castling(from: u8, to: u8) -> Self {
        Self {
            castle: true,
            ..Self::new(from, to)
        }
    }

    /// `e2e4`, `a7a8q` or `e1g1c`
    pub fn to_algebraic(&self) -> String {
        let mut s = String::with_capacity(5);
        s.push_str(&square_name(self.from));
        s.push_str(&square_name(self.to));
        if let Some(p) = self.promotion {
            s.push(p.to_char().to_ascii_lowercase());
        }
        if self.castle {
            s.push('c');
        }
        s
    }

    /// Output ordering: lexicographic on the origin/destination squares, then
    /// promotions in [`PIECES_CAN_PROMOTE_TO`] order.
    pub fn sort_key(&self) -> (String, usize) {
        let promotion_rank = match self.promotion {
            Some(p) => 1 + PIECES_CAN_PROMOTE_TO
                .iter()
                .position(|&q| q == p)
                .unwrap_or(PIECES_CAN_PROMOTE_TO.len()),
            None => 0,
        };
        (self.to_algebraic()[..4].to_string(), promotion_rank)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
