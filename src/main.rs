//! Usage: cargo run --release --bin movegen -- perft --depth 5
//!        cargo run --release --bin movegen -- moves --fen "<fen>" --moves e2e4 e7e5

use std::time::Instant;

use bitboard_movegen::bitboard;
use bitboard_movegen::movegen::{generate_moves, legal_moves};
use bitboard_movegen::notation::{move_strings, parse_move};
use bitboard_movegen::perft::{divide, parallel_perft};
use bitboard_movegen::position::{Position, STARTING_POSITION_FEN};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};

#[derive(Parser, Debug)]
#[command(name = "movegen")]
#[command(about = "Bitboard move generation and perft")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PositionArgs {
    /// Position in Forsyth-Edwards Notation
    #[arg(long, default_value = STARTING_POSITION_FEN)]
    fen: String,

    /// Moves in coordinate notation to play from the position first
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the moves of the side to move
    Moves {
        #[command(flatten)]
        position: PositionArgs,

        /// Drop moves that leave the king in check
        #[arg(long)]
        legal: bool,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[command(flatten)]
        position: PositionArgs,

        #[arg(short, long, default_value_t = 4)]
        depth: u8,

        /// Print the node count below every root move
        #[arg(long)]
        divide: bool,
    },
    /// Print the board and its FEN
    Show {
        #[command(flatten)]
        position: PositionArgs,
    },
}

fn setup(args: &PositionArgs) -> Result<Position> {
    let mut position = Position::from_fen(&args.fen)?;
    for s in &args.moves {
        let parsed = parse_move(s)?;
        // castling may be given with or without its suffix
        let Some(m) = legal_moves(&position, position.side_to_move)
            .into_iter()
            .find(|m| m.from == parsed.from && m.to == parsed.to && m.promotion == parsed.promotion)
        else {
            bail!("illegal move {} in position {}", s, position.to_fen());
        };
        position = position.make_move(&m);
    }
    Ok(position)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    bitboard::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Moves { position, legal } => {
            let position = setup(&position).wrap_err("could not set up position")?;
            let moves = if legal {
                legal_moves(&position, position.side_to_move)
            } else {
                generate_moves(&position, position.side_to_move)
            };
            println!("{}", move_strings(&moves).join(" "));
        }
        Command::Perft {
            position,
            depth,
            divide: split,
        } => {
            let position = setup(&position).wrap_err("could not set up position")?;
            let start = Instant::now();
            let nodes = if split {
                let counts = divide(&position, depth);
                for (m, n) in &counts {
                    println!("{}: {}", m, n);
                }
                println!();
                counts.iter().map(|(_, n)| n).sum::<u64>()
            } else {
                parallel_perft(&position, depth)
            };
            let elapsed = start.elapsed();
            println!("Depth {}: {} nodes", depth, nodes);
            println!("Time: {:?}", elapsed);
            if elapsed.as_secs_f64() > 0.0 {
                println!("NPS: {:.0}", nodes as f64 / elapsed.as_secs_f64());
            }
        }
        Command::Show { position } => {
            let position = setup(&position).wrap_err("could not set up position")?;
            println!("{}", position.draw_board());
            println!("FEN: {}", position.to_fen());
        }
    }
    Ok(())
}
