//! Data model for the rules engine.
//!
//! - Board geometry with wrap-around and a priority antenna
//! - Board elements (walls, checkpoints, energy spaces, hazards, lasers)
//! - Players with their program registers, hand, deck and discard pile
//! - The `Game` aggregate that owns all of it

pub mod element;

mod board;
mod card;
mod game;
mod heading;
mod player;
mod position;
mod space;

pub use board::Board;
pub use card::{Command, CommandCard};
pub use element::{BoardElement, Laser};
pub use game::{Game, Phase};
pub use heading::{Heading, HeadingSet};
pub use player::{CardField, CardSlot, NO_CARDS, NO_REGISTERS, Player, PlayerId};
pub use position::Position;
pub use space::Space;
