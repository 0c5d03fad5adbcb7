// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Rally: a rules engine for a programmable robot race.
//!
//! Players program their robots with five command cards per round. The
//! registers then execute one at a time, in order of distance to the priority
//! antenna, moving robots across a wrapping board of conveyors, gears,
//! walls, lasers, energy spaces and checkpoints. The first robot to reach the
//! final checkpoint wins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / simulation / persistence    │
//! ├─────────────────────────────────────┤
//! │   GameController (phase machine)    │
//! ├─────────────────────────────────────┤
//! │ movement · activation · priority    │
//! ├─────────────────────────────────────┤
//! │   model: board, spaces, players     │
//! └─────────────────────────────────────┘
//! ```

pub mod board_format;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod persistence;
pub mod simulation;

pub use config::{DeckConfig, EngineConfig};
pub use engine::{GameController, Progress};
pub use error::{BoardError, ConfigError, GameError, PersistenceError};

// Re-export key model types at crate root for convenience
pub use model::{
    Board, BoardElement, CardField, CardSlot, Command, CommandCard, Game, Heading, Phase, Player,
    PlayerId, Position, Space,
};
