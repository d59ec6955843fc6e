use itertools::Itertools;

use crate::attacks::{
    en_passant_target, pawn_attacks_east, pawn_attacks_west, pawn_double_pushes,
    pawn_single_pushes, piece_attacks,
};
use crate::bitboard::{sq_to_bb, BitboardIter, CASTLING_RIGHTS};
use crate::notation::{expand_moves, expand_pawn_moves, move_strings};
use crate::position::Position;
use crate::safety::{is_in_check, unsafe_squares};
use crate::types::{Color, Move, PieceType};

const MAX_MOVES: usize = 218;

/// Pieces whose moves are their attacks, in generation order
const PIECE_MOVERS: [PieceType; 5] = [
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
    PieceType::King,
];

/// Generates the moves of one side in one position.
///
/// The result is pseudo-legal with respect to discovered checks: king moves and castling are
/// filtered against the squares the opponent attacks, but a move of any other piece may still leave
/// its own king in check. Use [`legal_moves`] to drop those as well.
pub struct MoveGenerator<'a> {
    position: &'a Position,
    color: Color,
    moves: Vec<Move>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(position: &'a Position, color: Color) -> Self {
        Self {
            position,
            color,
            moves: Vec::with_capacity(MAX_MOVES),
        }
    }

    /// All moves, sorted by their algebraic string (promotions in queen, rook, bishop, knight order)
    pub fn collect(&mut self) -> Vec<Move> {
        let occupied = self.position.get_occupied();
        let friendly = self.position.get_pieces_bb(self.color);
        let enemy = self.position.get_pieces_bb(self.color.other_color());
        let unsafe_bb = unsafe_squares(self.position, self.color);

        for piece_type in PIECE_MOVERS {
            self.generate_piece_moves(piece_type, occupied, friendly, unsafe_bb);
        }
        self.generate_pawn_moves(occupied, enemy);
        self.generate_castling_moves(occupied, unsafe_bb);

        std::mem::take(&mut self.moves)
            .into_iter()
            .sorted_by_key(Move::sort_key)
            .collect()
    }

    /// Knight, bishop, rook, queen and king moves, one origin square at a time
    fn generate_piece_moves(
        &mut self,
        piece_type: PieceType,
        occupied: u64,
        friendly: u64,
        unsafe_bb: u64,
    ) {
        let pieces = self.position.get_piece_bb(self.color, piece_type);
        if pieces == 0 {
            return;
        }

        let forbidden = if piece_type == PieceType::King {
            friendly | unsafe_bb
        } else {
            friendly
        };

        for from_sq in BitboardIter(pieces) {
            let targets = piece_attacks(piece_type, from_sq, occupied) & !forbidden;
            expand_moves(from_sq, targets, &mut self.moves);
        }
    }

    /// Pushes, double pushes and captures for all pawns at once. Each destination set maps back
    /// to its origins by a fixed offset.
    fn generate_pawn_moves(&mut self, occupied: u64, enemy: u64) {
        let pawns = self.position.get_piece_bb(self.color, PieceType::Pawn);
        if pawns == 0 {
            return;
        }

        let empty = !occupied;
        let en_passant = en_passant_target(
            self.color,
            self.position.get_piece_bb(self.color.other_color(), PieceType::Pawn),
            self.position.last_move_origin,
            self.position.last_move_destination,
        );
        let capturable = enemy | en_passant;

        // (origin - destination) for single push, double push, west and east captures
        let (single, double, west, east): (i8, i8, i8, i8) = match self.color {
            Color::White => (8, 16, 9, 7),
            Color::Black => (-8, -16, -7, -9),
        };

        let single_pushes = pawn_single_pushes(pawns, empty, self.color);
        let double_pushes = pawn_double_pushes(pawns, empty, self.color);
        let west_captures = pawn_attacks_west(pawns, self.color) & capturable;
        let east_captures = pawn_attacks_east(pawns, self.color) & capturable;

        expand_pawn_moves(single_pushes, single, &mut self.moves);
        expand_pawn_moves(double_pushes, double, &mut self.moves);
        expand_pawn_moves(west_captures, west, &mut self.moves);
        expand_pawn_moves(east_captures, east, &mut self.moves);
    }

    fn generate_castling_moves(&mut self, occupied: u64, unsafe_bb: u64) {
        let king = self.position.get_piece_bb(self.color, PieceType::King);
        let rooks = self.position.get_piece_bb(self.color, PieceType::Rook);

        for right in CASTLING_RIGHTS.iter().filter(|r| r.color == self.color) {
            if self.position.castling & right.flag != 0
                || king & sq_to_bb(right.king_from) == 0
                || rooks & sq_to_bb(right.rook_from) == 0
            {
                continue;
            }
            if occupied & right.empty == 0 && unsafe_bb & right.safe == 0 {
                self.moves.push(Move::castling(right.king_from, right.king_to));
            }
        }
    }
}

/// Moves for `color`, pseudo-legal with respect to discovered checks (see [`MoveGenerator`]).
pub fn generate_moves(position: &Position, color: Color) -> Vec<Move> {
    MoveGenerator::new(position, color).collect()
}

/// [`generate_moves`] rendered as move strings (`e2e4`, `a7a8q`, `e1g1c`)
pub fn generate_move_strings(position: &Position, color: Color) -> Vec<String> {
    move_strings(&generate_moves(position, color))
}

/// Fully legal moves: the generated moves minus those that leave `color`'s king attacked.
pub fn legal_moves(position: &Position, color: Color) -> Vec<Move> {
    generate_moves(position, color)
        .into_iter()
        .filter(|m| !is_in_check(&position.make_move(m), color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::pos_to_sq;
    use crate::notation::parse_move;
    use pretty_assertions::assert_eq;

    fn has_move(position: &Position, color: Color, mv: &str) -> bool {
        generate_move_strings(position, color).iter().any(|m| m == mv)
    }

    #[test]
    fn count_moves_from_start_position() {
        let board = Position::new();
        let white = generate_move_strings(&board, Color::White);
        assert_eq!(
            white,
            vec![
                "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4",
                "e2e3", "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4",
            ]
        );
        let black = generate_move_strings(&board, Color::Black);
        assert_eq!(black.len(), 20);
        assert!(black.contains(&"b8c6".to_string()));
        assert!(black.contains(&"e7e5".to_string()));
        assert_eq!(legal_moves(&board, Color::White).len(), 20);
    }

    #[test]
    fn test_output_is_sorted() {
        let board = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let moves = generate_move_strings(&board, Color::White);
        let mut sorted = moves.clone();
        sorted.sort();
        assert_eq!(moves, sorted);
        assert_eq!(moves.len(), 48);
    }

    #[test]
    fn test_empty_piece_sets() {
        let board = Position::empty();
        assert!(generate_moves(&board, Color::White).is_empty());
        assert!(generate_moves(&board, Color::Black).is_empty());
    }

    #[test]
    fn test_black_and_white_generation_are_not_coupled() {
        // only white has rooks and bishops; black must not pick them up
        let board = Position::from_fen("4k3/8/8/8/8/8/8/RB2K2R b - - 0 1").unwrap();
        let black = generate_moves(&board, Color::Black);
        let black_pieces = board.get_pieces_bb(Color::Black);
        assert!(black.iter().all(|m| black_pieces & sq_to_bb(m.from) != 0));
        assert_eq!(black.len(), 5);

        // and the reverse, with black rooks and bishops
        let board = Position::from_fen("rb2k2r/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let white = generate_moves(&board, Color::White);
        let white_pieces = board.get_pieces_bb(Color::White);
        assert!(white.iter().all(|m| white_pieces & sq_to_bb(m.from) != 0));
        let black = generate_moves(&board, Color::Black);
        assert!(black.iter().any(|m| m.from == pos_to_sq(8, 2)));
        assert!(black.iter().any(|m| m.from == pos_to_sq(8, 8)));
    }

    #[test]
    fn test_king_never_moves_into_attack() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/r3K3 w - - 0 1",
            "3qk3/8/8/8/8/8/3n4/4K3 w - - 0 1",
            "4k3/8/4R3/8/8/8/8/4K3 b - - 0 1",
        ] {
            let board = Position::from_fen(fen).unwrap();
            for color in Color::ALL {
                let attacked = unsafe_squares(&board, color);
                let king = board.get_piece_bb(color, PieceType::King);
                for m in generate_moves(&board, color) {
                    if king & sq_to_bb(m.from) != 0 {
                        assert_eq!(attacked & sq_to_bb(m.to), 0, "{fen}: {m}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_king_cannot_retreat_along_checking_ray() {
        let board = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        let moves = generate_move_strings(&board, Color::White);
        assert_eq!(moves, vec!["e1d2", "e1e2", "e1f2"]);
    }

    #[test]
    fn test_pinned_piece_moves_are_pseudo_legal() {
        // the e2 knight is pinned by the e8 rook
        let board = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(has_move(&board, Color::White, "e2c3"));
        let legal: Vec<String> = move_strings(&legal_moves(&board, Color::White));
        assert!(!legal.contains(&"e2c3".to_string()));
        assert!(legal.iter().all(|m| m.starts_with("e1")));
    }

    #[test]
    fn test_castling_available_when_clear() {
        let board = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(has_move(&board, Color::White, "e1g1c"));
        assert!(has_move(&board, Color::White, "e1c1c"));
        assert!(has_move(&board, Color::Black, "e8g8c"));
        assert!(has_move(&board, Color::Black, "e8c8c"));
    }

    #[test]
    fn white_cannot_castle_kingside_through_attacked_f1() {
        let board = Position::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").unwrap();
        assert!(!has_move(&board, Color::White, "e1g1c"));
        assert!(has_move(&board, Color::White, "e1c1c"));
    }

    #[test]
    fn white_cannot_castle_queenside_through_attacked_d1() {
        let board = Position::from_fen("4k3/3r4/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has_move(&board, Color::White, "e1c1c"));
        assert!(has_move(&board, Color::White, "e1g1c"));
    }

    #[test]
    fn black_cannot_castle_kingside_through_attacked_f8() {
        let board = Position::from_fen("r3k2r/8/8/8/8/8/5R2/4K3 b kq - 0 1").unwrap();
        assert!(!has_move(&board, Color::Black, "e8g8c"));
        assert!(has_move(&board, Color::Black, "e8c8c"));
    }

    #[test]
    fn black_cannot_castle_queenside_through_attacked_d8() {
        let board = Position::from_fen("r3k2r/8/8/8/8/8/3R4/4K3 b kq - 0 1").unwrap();
        assert!(!has_move(&board, Color::Black, "e8c8c"));
        assert!(has_move(&board, Color::Black, "e8g8c"));
    }

    #[test]
    fn cannot_castle_into_attacked_destination() {
        let board = Position::from_fen("6r1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has_move(&board, Color::White, "e1g1c"));
        let board = Position::from_fen("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has_move(&board, Color::White, "e1c1c"));
    }

    #[test]
    fn cannot_castle_while_in_check() {
        let board = Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has_move(&board, Color::White, "e1g1c"));
        assert!(!has_move(&board, Color::White, "e1c1c"));
    }

    #[test]
    fn can_castle_queenside_when_b_file_square_attacked() {
        let board = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(has_move(&board, Color::White, "e1c1c"));
        let board = Position::from_fen("r3k2r/8/8/8/8/8/8/1R2K3 b kq - 0 1").unwrap();
        assert!(has_move(&board, Color::Black, "e8c8c"));
    }

    #[test]
    fn cannot_castle_through_occupied_squares() {
        let board = Position::from_fen("rn2k1nr/8/8/8/8/8/8/R2QKB1R w KQkq - 0 1").unwrap();
        assert!(!has_move(&board, Color::White, "e1g1c"));
        assert!(!has_move(&board, Color::White, "e1c1c"));
        assert!(!has_move(&board, Color::Black, "e8g8c"));
        assert!(!has_move(&board, Color::Black, "e8c8c"));
    }

    #[test]
    fn cannot_castle_after_forfeiting_right() {
        let board = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        assert!(has_move(&board, Color::White, "e1g1c"));
        assert!(!has_move(&board, Color::White, "e1c1c"));
        assert!(!has_move(&board, Color::Black, "e8g8c"));
        assert!(has_move(&board, Color::Black, "e8c8c"));

        // moving the king away and back forfeits both rights
        let board = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let board = board.make_move(&parse_move("e1f1").unwrap());
        let board = board.make_move(&parse_move("e8f8").unwrap());
        let board = board.make_move(&parse_move("f1e1").unwrap());
        assert!(!has_move(&board, Color::White, "e1g1c"));
        assert!(!has_move(&board, Color::White, "e1c1c"));
    }

    #[test]
    fn test_en_passant_after_double_push() {
        let board = Position::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
        let board = board.make_move(&parse_move("e2e4").unwrap());
        assert!(has_move(&board, Color::Black, "d4e3"));

        // one tempo later the capture is gone
        let later = board
            .make_move(&parse_move("e8d8").unwrap())
            .make_move(&parse_move("e1d1").unwrap());
        assert!(!has_move(&later, Color::Black, "d4e3"));

        // a single push onto the fourth rank does not allow it
        let board = Position::from_fen("4k3/8/8/8/3p4/4P3/8/4K3 w - - 0 1").unwrap();
        let board = board.make_move(&parse_move("e3e4").unwrap());
        assert!(!has_move(&board, Color::Black, "d4e3"));
    }

    #[test]
    fn test_en_passant_for_white_on_both_sides() {
        let board = Position::from_fen("4k3/4p3/8/3P1P2/8/8/8/4K3 b - - 0 1").unwrap();
        let board = board.make_move(&parse_move("e7e5").unwrap());
        assert!(has_move(&board, Color::White, "d5e6"));
        assert!(has_move(&board, Color::White, "f5e6"));

        let mut board = board;
        board.last_move_destination = 0;
        assert!(!has_move(&board, Color::White, "d5e6"));
        assert!(!has_move(&board, Color::White, "f5e6"));
    }

    #[test]
    fn test_en_passant_does_not_wrap_files() {
        // h5 pawn next to a freshly pushed a-pawn on the other edge
        let board = Position::from_fen("4k3/p7/8/7P/8/8/8/4K3 b - - 0 1").unwrap();
        let board = board.make_move(&parse_move("a7a5").unwrap());
        let moves = generate_move_strings(&board, Color::White);
        assert!(moves.iter().all(|m| !m.starts_with("h5a") && !m.ends_with("a6")));
    }

    #[test]
    fn test_promotion_expansion() {
        let board = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let moves: Vec<String> = generate_move_strings(&board, Color::White)
            .into_iter()
            .filter(|m| m.starts_with("a7"))
            .collect();
        assert_eq!(moves, vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);
    }

    #[test]
    fn test_black_capture_promotion() {
        let board = Position::from_fen("k7/8/8/8/8/8/6p1/K6R b - - 0 1").unwrap();
        let moves: Vec<String> = generate_move_strings(&board, Color::Black)
            .into_iter()
            .filter(|m| m.starts_with("g2"))
            .collect();
        assert_eq!(
            moves,
            vec![
                "g2g1q", "g2g1r", "g2g1b", "g2g1n", "g2h1q", "g2h1r", "g2h1b", "g2h1n",
            ]
        );
    }
}
