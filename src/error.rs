//! Error types for the rules engine.

use thiserror::Error;

use crate::model::{CardField, Command, Phase, PlayerId, Position};

/// A board could not be built or loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Width or height is zero.
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
    /// A position lies outside the board.
    #[error("position {position} is off the board")]
    OutOfBounds {
        /// The offending position.
        position: Position,
    },
    /// A cell appears more than once in a board definition.
    #[error("space {position} is defined twice")]
    DuplicateSpace {
        /// The repeated position.
        position: Position,
    },
    /// Checkpoint numbers are not exactly `1..=N`.
    #[error("checkpoints must be numbered 1..=N without gaps, found {found:?}")]
    CheckpointSequence {
        /// Checkpoint numbers found, sorted.
        found: Vec<u32>,
    },
    /// The definition document could not be parsed.
    #[error("malformed board definition: {0}")]
    Malformed(String),
}

/// Rejected operation on a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The operation is not allowed in the current phase.
    #[error("{operation} is not allowed during the {phase:?} phase")]
    InvalidPhase {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Phase the game was in.
        phase: Phase,
    },
    /// The player index does not exist.
    #[error("no player with index {0}")]
    UnknownPlayer(PlayerId),
    /// Activation has no current player.
    #[error("no player is currently acting")]
    NoCurrentPlayer,
    /// An interactive choice was supplied but no interactive card is pending.
    #[error("the current register does not hold an interactive card")]
    NoInteractiveCard,
    /// The supplied command is not one of the pending card's options.
    #[error("{command:?} is not an option of the pending card")]
    InvalidOption {
        /// The rejected choice.
        command: Command,
    },
    /// Player count outside the supported range.
    #[error("player count {count} is outside 1..={max}")]
    InvalidPlayerCount {
        /// Requested count.
        count: usize,
        /// Maximum supported.
        max: usize,
    },
    /// The source slot of a card move holds no card.
    #[error("source slot {field:?} is empty")]
    SlotEmpty {
        /// The empty slot.
        field: CardField,
    },
    /// The destination slot of a card move already holds a card.
    #[error("destination slot {field:?} is occupied")]
    SlotOccupied {
        /// The occupied slot.
        field: CardField,
    },
    /// A card move spans two different players.
    #[error("cards can only move within one player's mat")]
    ForeignSlot,
    /// The slot index is out of range.
    #[error("slot {field:?} does not exist")]
    SlotOutOfRange {
        /// The invalid slot.
        field: CardField,
    },
    /// Deck and discard pile are both empty.
    #[error("player {player} has no cards left to draw")]
    EmptyCardPool {
        /// Name of the player.
        player: String,
    },
    /// The game already has a winner.
    #[error("the game is over, player {winner} won")]
    GameOver {
        /// Index of the winner.
        winner: PlayerId,
    },
    /// The engine configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Board construction failed.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Saving or loading a game failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// No saved game with this id.
    #[error("no saved game with id {0}")]
    NotFound(String),
    /// Ids may only contain ASCII letters, digits, `-` and `_`.
    #[error("invalid game id {0:?}")]
    InvalidId(String),
    /// The snapshot refers to a different board.
    #[error("snapshot is for board {expected:?}, got {actual:?}")]
    BoardMismatch {
        /// Board name recorded in the snapshot.
        expected: String,
        /// Board name supplied.
        actual: String,
    },
    /// The snapshot is internally inconsistent.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
    /// Rebuilding the game failed.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Engine configuration is unreadable or unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for `EngineConfig`.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    /// The deck cannot fill a hand.
    #[error("deck of {size} cards cannot deal a hand of {needed}")]
    DeckTooSmall {
        /// Cards in the configured deck.
        size: usize,
        /// Cards needed for one hand.
        needed: usize,
    },
    /// `max_players` is zero.
    #[error("max_players must be at least 1")]
    NoPlayers,
    /// The energy bonus register does not exist.
    #[error("energy bonus register {0} is out of range")]
    BonusRegisterOutOfRange(usize),
}
