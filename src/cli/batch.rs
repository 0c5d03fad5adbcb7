//! Batch command implementation.

use super::output::{BatchStats, format_batch_text};
use super::{CliError, OutputFormat, load_board, seed_or_random};
use indicatif::{ProgressBar, ProgressStyle};
use rally::EngineConfig;
use rally::simulation::run_simulation;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Options of the batch command.
#[derive(Debug)]
pub(crate) struct BatchOptions {
    pub(crate) board: Option<PathBuf>,
    pub(crate) games: u64,
    pub(crate) players: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) rounds: u32,
    pub(crate) threads: Option<usize>,
    pub(crate) format: OutputFormat,
    pub(crate) progress: bool,
}

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the board or configuration is unusable.
pub(crate) fn execute(config: EngineConfig, options: &BatchOptions) -> Result<(), CliError> {
    let board = load_board(options.board.as_deref())?;
    let base_seed = seed_or_random(options.seed.or(config.seed));

    // Fail fast on a bad setup instead of once per game
    run_simulation(
        EngineConfig {
            seed: Some(base_seed),
            ..config
        },
        board.clone(),
        options.players,
        0,
    )?;

    // Set thread pool size if specified
    if let Some(num_threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if options.progress {
        let pb = ProgressBar::new(options.games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let players = options.players;
    let rounds = options.rounds;

    // Each worker folds into its own stats; the partial stats are merged at the end
    let stats = (0..options.games)
        .into_par_iter()
        .fold(
            || BatchStats::new(players),
            |mut local, i| {
                let game_config = EngineConfig {
                    seed: Some(base_seed.wrapping_add(i)),
                    ..config
                };
                match run_simulation(game_config, board.clone(), players, rounds) {
                    Ok(result) => local.add_result(&result),
                    Err(e) => tracing::warn!(game = i, error = %e, "game failed"),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local
            },
        )
        .reduce(
            || BatchStats::new(players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = stats.games_per_sec(duration);

    match options.format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, base_seed));
            println!();
            println!("Duration: {:.2}s ({games_per_sec:.0} games/sec)", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
