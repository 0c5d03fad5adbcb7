//! Rally CLI - run, batch and inspect robot races from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Rally - a programmable robot race
#[derive(Parser, Debug)]
#[command(name = "rally")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine detail at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a single game
    Run {
        /// Board definition file (default: bundled starter board)
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Number of players (default: 2)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum rounds (default: 50)
        #[arg(short, long, default_value = "50")]
        rounds: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save the final game to this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run many independent games in parallel and aggregate statistics
    Batch {
        /// Board definition file (default: bundled starter board)
        #[arg(short, long)]
        board: Option<PathBuf>,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Number of players per game (default: 4)
        #[arg(short, long, default_value = "4")]
        players: usize,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum rounds per game (default: 50)
        #[arg(short, long, default_value = "50")]
        rounds: u32,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Check a board definition file
    ValidateBoard {
        /// Board definition file
        #[arg(required = true)]
        board: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = cli::load_config(args.config.as_deref()).and_then(|config| match args.command {
        Commands::Run {
            board,
            players,
            seed,
            rounds,
            format,
            save,
        } => cli::run::execute(config, board.as_deref(), players, seed, rounds, format, save),

        Commands::Batch {
            board,
            games,
            players,
            seed,
            rounds,
            threads,
            format,
            progress,
        } => cli::batch::execute(
            config,
            &cli::batch::BatchOptions {
                board,
                games,
                players,
                seed,
                rounds,
                threads,
                format,
                progress,
            },
        ),

        Commands::ValidateBoard { board } => cli::validate::execute(&board),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
