//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Command, CommandCard, NO_CARDS, NO_REGISTERS};

/// Number of copies of each command in a player's starting deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Copies of `Forward`.
    pub forward: usize,
    /// Copies of `Right`.
    pub right: usize,
    /// Copies of `Left`.
    pub left: usize,
    /// Copies of `FastForward`.
    pub fast_forward: usize,
    /// Copies of `OptionLeftRight`.
    pub option_left_right: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            forward: 6,
            right: 4,
            left: 4,
            fast_forward: 4,
            option_left_right: 2,
        }
    }
}

impl DeckConfig {
    /// Total number of cards.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.forward + self.right + self.left + self.fast_forward + self.option_left_right
    }

    /// The unshuffled starting deck.
    #[must_use]
    pub fn cards(&self) -> Vec<CommandCard> {
        [
            (Command::Forward, self.forward),
            (Command::Right, self.right),
            (Command::Left, self.left),
            (Command::FastForward, self.fast_forward),
            (Command::OptionLeftRight, self.option_left_right),
        ]
        .into_iter()
        .flat_map(|(command, count)| std::iter::repeat_n(CommandCard::new(command), count))
        .collect()
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for deck shuffling; `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Maximum number of players in a game.
    pub max_players: usize,
    /// Register (0-based) in which an energy space pays out even without a
    /// cube; `None` disables the bonus.
    pub energy_bonus_register: Option<usize>,
    /// Starting deck composition.
    pub deck: DeckConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_players: 6,
            energy_bonus_register: Some(NO_REGISTERS - 1),
            deck: DeckConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can run a game.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.deck.size() < NO_CARDS {
            return Err(ConfigError::DeckTooSmall {
                size: self.deck.size(),
                needed: NO_CARDS,
            });
        }
        if let Some(register) = self.energy_bonus_register {
            if register >= NO_REGISTERS {
                return Err(ConfigError::BonusRegisterOutOfRange(register));
            }
        }
        Ok(())
    }
}
