//! CLI command implementations for Rally.

pub(crate) mod batch;
pub(crate) mod run;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use rally::{Board, BoardError, ConfigError, EngineConfig, GameError, PersistenceError};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` and `batch` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<BoardError> for CliError {
    fn from(e: BoardError) -> Self {
        Self::new(format!("Board error: {e}"))
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(format!("Game error: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(format!("Config error: {e}"))
    }
}

impl From<PersistenceError> for CliError {
    fn from(e: PersistenceError) -> Self {
        Self::new(format!("Save failed: {e}"))
    }
}

/// Load the engine configuration, or the defaults without a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Load a board file, or the bundled starter board.
///
/// # Errors
///
/// Returns an error if the board cannot be loaded.
pub(crate) fn load_board(path: Option<&Path>) -> Result<Board, CliError> {
    match path {
        Some(path) => Ok(Board::load(path)?),
        None => Ok(Board::starter()?),
    }
}

/// A random seed when none is given.
pub(crate) fn seed_or_random(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_or_random_keeps_given_seed() {
        assert_eq!(seed_or_random(Some(7)), 7);
        // two draws colliding is vanishingly unlikely
        assert_ne!(seed_or_random(None), seed_or_random(None));
    }
}
