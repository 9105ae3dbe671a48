use std::time::Instant;

use chessgrid::{
    config::{get_config, initialize, ConfigError},
    notation::{parse_coordinate_notation, NotationError},
    perft::{divide, perft, PerftError},
    player::MoveStatus,
    position::Position,
    r#move::MoveError,
};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum ChessgridError {
    #[error("Error in the configuration: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Unable to parse the move: {0}")]
    NotationError(#[from] NotationError),

    #[error("Error while applying a move: {0}")]
    MoveError(#[from] MoveError),

    #[error("Error during the perft command: {0}")]
    PerftError(#[from] PerftError),

    #[error("The move {0} was rejected: {1}")]
    RejectedMove(String, MoveStatus),
}

mod arguments {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    /// A chess rules engine
    #[derive(Parser)]
    #[command(name = "chessgrid", version, about = "A chess rules engine")]
    pub struct ChessgridArgs {
        /// Path of a configuration file (TOML, JSON or YAML)
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        #[command(subcommand)]
        pub command: Commands,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Commands {
        /// List the moves of the side to move
        Moves {
            /// Moves to play from the standard position first, in coordinate notation (e.g. e2e4)
            moves: Vec<String>,
        },

        /// Play a sequence of moves and show the resulting position
        Play {
            /// Moves to play from the standard position, in coordinate notation (e.g. e2e4)
            moves: Vec<String>,
        },

        /// Count the leaf nodes of the move tree of the standard position
        Perft {
            /// The depth to calculate the perft
            #[arg(short, long)]
            depth: u32,

            /// The number of threads to use for the perft calculation
            #[arg(short, long)]
            threads: Option<usize>,

            /// Print the node count of each root move
            #[arg(long)]
            divide: bool,
        },
    }
}

/// Plays moves in coordinate notation from the standard position, printing the token of each move.
///
/// The first move that is not done stops the sequence with an error.
fn play_moves(moves: &[String], verbose: bool) -> Result<Position, ChessgridError> {
    let mut position = Position::standard();

    for notation in moves {
        let (from, to) = parse_coordinate_notation(notation)?;
        let transition = chessgrid::attempt_move(&position, from, to)?;
        let status = transition.status();
        if !status.is_done() {
            return Err(ChessgridError::RejectedMove(notation.clone(), status));
        }
        if verbose {
            println!("{}\t{}", notation, chessgrid::render_token(&transition.transition_move()));
        }
        position = transition.into_position();
    }

    Ok(position)
}

fn run() -> Result<(), ChessgridError> {
    // Parse command line arguments
    let args = arguments::ChessgridArgs::parse();

    // Initialize the configuration and the logs
    initialize(args.config)?;
    let config = get_config();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // Run the command
    match args.command {
        arguments::Commands::Moves { moves } => {
            let position = play_moves(&moves, false)?;
            let mut tokens: Vec<String> =
                chessgrid::current_legal_moves(&position).iter().map(chessgrid::render_token).collect();
            tokens.sort();
            println!("{}", tokens.join(" "));
        }
        arguments::Commands::Play { moves } => {
            let position = play_moves(&moves, true)?;
            let player = position.current_player();
            println!("\n{}", position);
            println!("{} to move", player.color());
            if player.in_checkmate()? {
                println!("Checkmate");
            } else if player.in_stalemate()? {
                println!("Stalemate");
            } else if player.in_check() {
                println!("Check");
            }
        }
        arguments::Commands::Perft { depth, threads, divide: show_divide } => {
            let position = Position::standard();
            println!("Perft ({}) for position:\n\n{}", depth, position);

            let start = Instant::now();
            let nodes = if show_divide {
                let results = divide(&position, depth)?;
                for (mv, nodes) in results.iter() {
                    println!("{}\t{}", mv, nodes);
                }
                results.iter().map(|(_, nodes)| nodes).sum()
            } else {
                perft(&position, depth, threads.unwrap_or(config.perft_threads))?
            };
            let duration = start.elapsed();

            println!("\nNodes: {}", nodes);
            println!("Time: {:.3}", duration.as_secs_f64());
            println!("Nodes per second: {:.0}", nodes as f64 / duration.as_secs_f64());
        }
    }

    Ok(())
}

/// Main entry point for the chessgrid command line driver.
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
