//! Round orchestration.
//!
//! `GameController` drives the phase state machine:
//!
//! ```text
//! Initialisation -> Programming -> Activation <-> PlayerInteraction
//!                        ^              |
//!                        +--------------+  (after the last register)
//! ```
//!
//! Activation proceeds one player-register at a time. In run mode the
//! controller keeps going until the round ends, a choice is needed or a robot
//! wins; in step mode it returns after every single activation.

pub mod activation;
pub mod invariants;
pub mod movement;
pub mod priority;

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::GameError;
use crate::model::{
    Board, CardSlot, Command, Game, Heading, NO_CARDS, NO_REGISTERS, Phase, Player, PlayerId,
    Position,
};

/// Display colors handed out to new players, in join order.
pub const PLAYER_COLORS: [&str; 6] = ["red", "green", "blue", "orange", "grey", "magenta"];

/// Where the controller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Activation continues with the current player (step mode yield).
    Activating,
    /// The current player must pick one of its card's options.
    AwaitingChoice {
        /// The deciding player.
        player: PlayerId,
    },
    /// All registers ran and a new programming phase began.
    Programming {
        /// Number of the round now being programmed.
        round: u32,
    },
    /// A robot reached the final checkpoint.
    Won {
        /// The winner.
        player: PlayerId,
    },
}

/// Drives a [`Game`] through its rounds.
#[derive(Debug, Clone)]
pub struct GameController {
    game: Game,
}

impl GameController {
    /// Take control of an existing game.
    #[must_use]
    pub const fn new(game: Game) -> Self {
        Self { game }
    }

    /// Set up a game for `player_count` players on `board` and deal the first
    /// hands.
    ///
    /// Player `i` starts at the first free cell at or after `(i, i)` (row
    /// major, wrapping), facing `South`, with a shuffled starting deck.
    ///
    /// # Errors
    ///
    /// Returns an error if the player count or configuration is unusable, or
    /// the board has too few cells.
    pub fn new_game(
        board: Board,
        config: EngineConfig,
        player_count: usize,
    ) -> Result<Self, GameError> {
        config
            .validate()
            .map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        let cells = usize::from(board.width()) * usize::from(board.height());
        if player_count == 0 || player_count > config.max_players || player_count > cells {
            return Err(GameError::InvalidPlayerCount {
                count: player_count,
                max: config.max_players.min(cells),
            });
        }

        let mut game = Game::new(board, config);
        for i in 0..player_count {
            let color = PLAYER_COLORS[i % PLAYER_COLORS.len()];
            let mut player = Player::new(format!("Player {}", i + 1), color);
            player.heading = Heading::South;
            player.deck = config.deck.cards();
            player.deck.shuffle(game.rng());

            let start = start_position(&game, i);
            game.add_player(player, start)?;
        }
        info!(players = player_count, board = game.board().name(), seed = game.seed(), "new game");

        let mut controller = Self::new(game);
        controller.start_programming_phase()?;
        Ok(controller)
    }

    /// The controlled game.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access to the controlled game.
    #[must_use]
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Give up control of the game.
    #[must_use]
    pub fn into_game(self) -> Game {
        self.game
    }

    fn require_phase(&self, operation: &'static str, allowed: &[Phase]) -> Result<(), GameError> {
        if let Some(winner) = self.game.winner() {
            return Err(GameError::GameOver { winner });
        }
        let phase = self.game.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(GameError::InvalidPhase { operation, phase })
        }
    }

    /// Deal the first round.
    ///
    /// Later rounds begin on their own once the last register has resolved.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is initialising, or if a player runs
    /// out of cards.
    pub fn start_programming_phase(&mut self) -> Result<(), GameError> {
        self.require_phase("start_programming_phase", &[Phase::Initialisation])?;
        self.begin_round()
    }

    /// Clear the mats and deal every player a fresh hand.
    fn begin_round(&mut self) -> Result<(), GameError> {
        let round = self.game.round() + 1;
        self.game.set_round(round);
        self.game.reseed_for_round();

        let (rng, players) = self.game.rng_and_players();
        for player in players.iter_mut() {
            player.discard_mat();
            let mut hand = [None; NO_CARDS];
            for slot in &mut hand {
                *slot = Some(player.draw_card(rng)?);
            }
            player.hand = hand;
        }

        self.game.set_phase(Phase::Programming);
        self.game.set_step(0);
        self.game.queue_mut().clear();
        let first = (self.game.player_count() > 0).then_some(0);
        self.game.set_current_player(first);
        info!(round, "programming phase started");
        Ok(())
    }

    /// Lock in all programs and start executing the first register.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is in the programming phase.
    pub fn finish_programming_phase(&mut self) -> Result<(), GameError> {
        self.require_phase("finish_programming_phase", &[Phase::Programming])?;
        self.game.set_phase(Phase::Activation);
        self.game.set_step(0);
        priority::rebuild_queue(&mut self.game);
        info!(round = self.game.round(), "activation phase started");
        Ok(())
    }

    /// Run activations until the round ends, a choice is needed or a robot
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is in the activation phase.
    pub fn execute_programs(&mut self) -> Result<Progress, GameError> {
        self.require_phase("execute_programs", &[Phase::Activation])?;
        self.game.set_step_mode(false);
        self.continue_programs()
    }

    /// Run exactly one player's current register.
    ///
    /// # Errors
    ///
    /// Returns an error unless the game is in the activation phase.
    pub fn execute_step(&mut self) -> Result<Progress, GameError> {
        self.require_phase("execute_step", &[Phase::Activation])?;
        self.game.set_step_mode(true);
        self.continue_programs()
    }

    fn continue_programs(&mut self) -> Result<Progress, GameError> {
        loop {
            let progress = self.execute_next_step()?;
            if progress != Progress::Activating || self.game.is_step_mode() {
                return Ok(progress);
            }
        }
    }

    fn execute_next_step(&mut self) -> Result<Progress, GameError> {
        let player = self.game.current_player().ok_or(GameError::NoCurrentPlayer)?;
        let step = self.game.step();
        let card = self.game.player_checked(player)?.program[step];

        if let Some(card) = card {
            if card.command.is_interactive() {
                self.game.set_phase(Phase::PlayerInteraction);
                debug!(player, step, command = %card.command, "waiting for player choice");
                return Ok(Progress::AwaitingChoice { player });
            }
            self.run_command(player, card.command)?;
            if let Some(winner) = self.game.winner() {
                return Ok(Progress::Won { player: winner });
            }
        }
        self.advance()
    }

    /// Resume a suspended interactive card with the chosen option.
    ///
    /// # Errors
    ///
    /// Returns an error unless a choice is pending and `command` is one of the
    /// pending card's options.
    pub fn execute_command_option_and_continue(
        &mut self,
        command: Command,
    ) -> Result<Progress, GameError> {
        self.require_phase(
            "execute_command_option_and_continue",
            &[Phase::PlayerInteraction],
        )?;
        let player = self.game.current_player().ok_or(GameError::NoCurrentPlayer)?;
        let step = self.game.step();
        let card = self.game.player_checked(player)?.program[step]
            .filter(|card| card.command.is_interactive())
            .ok_or(GameError::NoInteractiveCard)?;
        if !card.command.options().contains(&command) {
            return Err(GameError::InvalidOption { command });
        }

        self.game.set_phase(Phase::Activation);
        debug!(player, step, choice = %command, "player choice received");
        self.run_command(player, command)?;
        if let Some(winner) = self.game.winner() {
            return Ok(Progress::Won { player: winner });
        }

        let progress = self.advance()?;
        if progress == Progress::Activating && !self.game.is_step_mode() {
            self.continue_programs()
        } else {
            Ok(progress)
        }
    }

    /// Execute a plain command for `player`, then activate the landing space.
    ///
    /// # Errors
    ///
    /// Returns an error outside the activation phase, if `player` does not
    /// exist or if `command` needs a choice.
    pub fn execute_command(&mut self, player: PlayerId, command: Command) -> Result<(), GameError> {
        self.require_phase("execute_command", &[Phase::Activation])?;
        self.run_command(player, command)
    }

    fn run_command(&mut self, player: PlayerId, command: Command) -> Result<(), GameError> {
        debug!(player, %command, "executing command");
        match command {
            Command::Forward => self.move_forward(player, 1)?,
            Command::FastForward => self.move_forward(player, 2)?,
            Command::Right => movement::turn_player(&mut self.game, player, 1)?,
            Command::Left => movement::turn_player(&mut self.game, player, -1)?,
            Command::OptionLeftRight => return Err(GameError::InvalidOption { command }),
        }
        activation::activate_space(&mut self.game, player)
    }

    fn move_forward(&mut self, player: PlayerId, distance: u32) -> Result<(), GameError> {
        let heading = self.game.player_checked(player)?.heading;
        movement::move_player(&mut self.game, player, heading, distance)?;
        Ok(())
    }

    /// Hand the turn to the next player, ending the register or round when
    /// everyone has acted.
    fn advance(&mut self) -> Result<Progress, GameError> {
        self.game.queue_mut().pop_front();
        let next = self.game.activation_queue().next();
        if let Some(next) = next {
            self.game.set_current_player(Some(next));
            return Ok(Progress::Activating);
        }

        activation::fire_board_lasers(&mut self.game)?;
        let next_step = self.game.step() + 1;
        if next_step < NO_REGISTERS {
            self.game.set_step(next_step);
            priority::rebuild_queue(&mut self.game);
            debug!(step = next_step, "next register");
            Ok(Progress::Activating)
        } else {
            self.begin_round()?;
            Ok(Progress::Programming {
                round: self.game.round(),
            })
        }
    }

    /// Move a card between two slots of the same player.
    ///
    /// # Errors
    ///
    /// Returns an error outside the programming phase, across players, or
    /// unless the source holds a card and the destination is empty.
    pub fn move_card(&mut self, from: CardSlot, to: CardSlot) -> Result<(), GameError> {
        self.require_phase("move_card", &[Phase::Programming])?;
        if from.player != to.player {
            return Err(GameError::ForeignSlot);
        }
        let player = self.game.player_checked_mut(from.player)?;
        if player.card(from.field)?.is_none() {
            return Err(GameError::SlotEmpty { field: from.field });
        }
        if player.card(to.field)?.is_some() {
            return Err(GameError::SlotOccupied { field: to.field });
        }
        let card = player.card_mut(from.field)?.take();
        *player.card_mut(to.field)? = card;
        Ok(())
    }
}

/// First free cell at or after `(i mod width, i mod height)` in row-major
/// order, wrapping around the board.
fn start_position(game: &Game, index: usize) -> Option<Position> {
    let board = game.board();
    let width = usize::from(board.width());
    let height = usize::from(board.height());
    let cells = width * height;
    let first = (index % height) * width + index % width;
    (0..cells)
        .map(|offset| (first + offset) % cells)
        .find(|&cell| game.board().spaces()[cell].player().is_none())
        .map(|cell| board.spaces()[cell].position())
}
