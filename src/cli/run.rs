//! Run command implementation.

use super::output::format_text;
use super::{CliError, OutputFormat, load_board, seed_or_random};
use rally::persistence::{GameRepository, GameSnapshot, JsonFileRepository};
use rally::simulation::play_rounds;
use rally::{EngineConfig, GameController};
use std::path::{Path, PathBuf};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the game fails to run or cannot be saved.
pub(crate) fn execute(
    config: EngineConfig,
    board: Option<&Path>,
    players: usize,
    seed: Option<u64>,
    rounds: u32,
    format: OutputFormat,
    save: Option<PathBuf>,
) -> Result<(), CliError> {
    let board = load_board(board)?;
    let config = EngineConfig {
        seed: Some(seed_or_random(seed.or(config.seed))),
        ..config
    };

    let mut controller = GameController::new_game(board, config, players)?;
    let result = play_rounds(&mut controller, rounds)?;

    if let Some(dir) = save {
        let repository = JsonFileRepository::open(dir)?;
        let id = format!("game-{}", result.seed);
        repository.save(&GameSnapshot::from_game(id.clone(), controller.game()))?;
        if format == OutputFormat::Text {
            println!("Game saved as {id} in {}", repository.dir().display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
