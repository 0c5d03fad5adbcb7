//! Program commands and the cards carrying them.

use serde::{Deserialize, Serialize};

/// An instruction a robot executes from a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Move one cell forward.
    Forward,
    /// Turn a quarter turn clockwise.
    Right,
    /// Turn a quarter turn counter-clockwise.
    Left,
    /// Move two cells forward.
    FastForward,
    /// Choose between turning left and turning right when executed.
    OptionLeftRight,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Command; 5] = [
        Command::Forward,
        Command::Right,
        Command::Left,
        Command::FastForward,
        Command::OptionLeftRight,
    ];

    /// Sub-commands the player must choose from; empty for plain commands.
    #[must_use]
    pub const fn options(self) -> &'static [Command] {
        match self {
            Command::OptionLeftRight => &[Command::Left, Command::Right],
            Command::Forward | Command::Right | Command::Left | Command::FastForward => &[],
        }
    }

    /// Whether executing the command needs a player choice.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        !self.options().is_empty()
    }

    /// Human-readable name shown on the card.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Command::Forward => "Fwd",
            Command::Right => "Turn Right",
            Command::Left => "Turn Left",
            Command::FastForward => "Fast Fwd",
            Command::OptionLeftRight => "Left OR Right",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A program card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandCard {
    /// The command printed on the card.
    pub command: Command,
}

impl CommandCard {
    /// Create a card for `command`.
    #[must_use]
    pub const fn new(command: Command) -> Self {
        Self { command }
    }
}
