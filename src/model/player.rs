//! Player state: robot pose, progress and cards.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::model::{CommandCard, Heading, Position};

/// Index of a player in join order.
pub type PlayerId = usize;

/// Number of program registers per player.
pub const NO_REGISTERS: usize = 5;

/// Number of hand slots per player.
pub const NO_CARDS: usize = 8;

/// A card location on a player mat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    /// Program register `0..NO_REGISTERS`.
    Program(usize),
    /// Hand slot `0..NO_CARDS`.
    Hand(usize),
}

/// A card location of a specific player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardSlot {
    /// Owner of the slot.
    pub player: PlayerId,
    /// Slot on the owner's mat.
    pub field: CardField,
}

impl CardSlot {
    /// Program register `index` of `player`.
    #[must_use]
    pub const fn program(player: PlayerId, index: usize) -> Self {
        Self {
            player,
            field: CardField::Program(index),
        }
    }

    /// Hand slot `index` of `player`.
    #[must_use]
    pub const fn hand(player: PlayerId, index: usize) -> Self {
        Self {
            player,
            field: CardField::Hand(index),
        }
    }
}

/// State for a single player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Current cell; written only through `Game::place_player`.
    position: Option<Position>,
    /// Direction the robot faces.
    pub heading: Heading,
    /// Energy cubes collected.
    pub energy: u32,
    /// Highest checkpoint reached, 0 before the first.
    checkpoint: u32,
    /// Laser hits taken.
    pub damage: u32,
    /// Program registers.
    pub program: [Option<CommandCard>; NO_REGISTERS],
    /// Hand slots.
    pub hand: [Option<CommandCard>; NO_CARDS],
    /// Draw pile; the top card is the last element.
    pub deck: Vec<CommandCard>,
    /// Discard pile.
    pub discard: Vec<CommandCard>,
}

impl Player {
    /// Create a player with an empty mat and no position.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            position: None,
            heading: Heading::South,
            energy: 0,
            checkpoint: 0,
            damage: 0,
            program: [None; NO_REGISTERS],
            hand: [None; NO_CARDS],
            deck: Vec::new(),
            discard: Vec::new(),
        }
    }

    /// Current cell, if the robot is on the board.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    /// Highest checkpoint reached.
    #[must_use]
    pub const fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    /// Record a visit to checkpoint `number`.
    ///
    /// Progress only advances when `number` is the next one in sequence.
    /// Returns whether progress advanced.
    pub(crate) fn reach_checkpoint(&mut self, number: u32) -> bool {
        if number == self.checkpoint + 1 {
            self.checkpoint = number;
            true
        } else {
            false
        }
    }

    pub(crate) fn restore_checkpoint(&mut self, checkpoint: u32) {
        self.checkpoint = checkpoint;
    }

    /// The card at `field`, `None` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot index is out of range.
    pub fn card(&self, field: CardField) -> Result<Option<CommandCard>, GameError> {
        match field {
            CardField::Program(i) => self.program.get(i).copied(),
            CardField::Hand(i) => self.hand.get(i).copied(),
        }
        .ok_or(GameError::SlotOutOfRange { field })
    }

    pub(crate) fn card_mut(
        &mut self,
        field: CardField,
    ) -> Result<&mut Option<CommandCard>, GameError> {
        match field {
            CardField::Program(i) => self.program.get_mut(i),
            CardField::Hand(i) => self.hand.get_mut(i),
        }
        .ok_or(GameError::SlotOutOfRange { field })
    }

    /// Draw the top card, reshuffling the discard pile into an empty deck.
    ///
    /// # Errors
    ///
    /// Returns an error if both the deck and the discard pile are empty.
    pub fn draw_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<CommandCard, GameError> {
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return Err(GameError::EmptyCardPool {
                    player: self.name.clone(),
                });
            }
            self.deck.append(&mut self.discard);
            self.deck.shuffle(rng);
        }
        self.deck.pop().ok_or(GameError::EmptyCardPool {
            player: self.name.clone(),
        })
    }

    /// Move every register and hand card to the discard pile.
    pub fn discard_mat(&mut self) {
        let cards = self.program.iter_mut().chain(self.hand.iter_mut());
        for slot in cards {
            if let Some(card) = slot.take() {
                self.discard.push(card);
            }
        }
    }

    /// Total number of cards owned, wherever they are.
    #[must_use]
    pub fn card_count(&self) -> usize {
        let on_mat = self
            .program
            .iter()
            .chain(self.hand.iter())
            .filter(|slot| slot.is_some())
            .count();
        on_mat + self.deck.len() + self.discard.len()
    }
}
