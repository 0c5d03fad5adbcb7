//! The game aggregate: board, players and round state.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::{BoardError, GameError};
use crate::model::{Board, Player, PlayerId, Position};

/// Phase of the round state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Set-up before the first round.
    Initialisation,
    /// Players arrange their registers.
    Programming,
    /// Registers are being executed.
    Activation,
    /// Activation is suspended until a player picks an option.
    PlayerInteraction,
}

/// Complete session state.
///
/// Robot positions are written only through [`Game::place_player`], which
/// keeps each player's position and each space's occupant in agreement.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    phase: Phase,
    /// Register being executed, `0..NO_REGISTERS`.
    step: usize,
    current: Option<PlayerId>,
    /// Players still to act in the current register; the head is acting.
    queue: VecDeque<PlayerId>,
    /// Rounds started so far.
    round: u32,
    winner: Option<PlayerId>,
    step_mode: bool,
    config: EngineConfig,
    seed: u64,
    rng: SmallRng,
}

impl Game {
    /// Create a game with no players on `board`.
    ///
    /// The card RNG is seeded from `config.seed`, or from entropy if unset.
    #[must_use]
    pub fn new(board: Board, config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            board,
            players: Vec::new(),
            phase: Phase::Initialisation,
            step: 0,
            current: None,
            queue: VecDeque::new(),
            round: 0,
            winner: None,
            step_mode: false,
            config,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed of the card RNG.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn rng_and_players(&mut self) -> (&mut SmallRng, &mut [Player]) {
        (&mut self.rng, &mut self.players)
    }

    pub(crate) fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Derive the card RNG for the current round from the game seed.
    ///
    /// Each round's draws depend only on `(seed, round)`, so a game restored
    /// from a snapshot deals the same cards as one that never stopped.
    pub(crate) fn reseed_for_round(&mut self) {
        let mix = u64::from(self.round).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        self.rng = SmallRng::seed_from_u64(self.seed ^ mix);
    }

    /// Players in join order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player with index `id`.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Mutable access to the player with index `id`.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub(crate) fn player_checked(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id).ok_or(GameError::UnknownPlayer(id))
    }

    pub(crate) fn player_checked_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players.get_mut(id).ok_or(GameError::UnknownPlayer(id))
    }

    /// Add a player, optionally placing its robot.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is off the board.
    pub fn add_player(
        &mut self,
        player: Player,
        position: Option<Position>,
    ) -> Result<PlayerId, GameError> {
        let id = self.players.len();
        let mut player = player;
        player.set_position(None);
        self.players.push(player);
        if let Err(e) = self.place_player(id, position) {
            self.players.pop();
            return Err(e);
        }
        Ok(id)
    }

    /// Move a robot to `target`, or take it off the board with `None`.
    ///
    /// This is the only writer of robot positions. A different robot already
    /// on `target` is taken off the board first.
    ///
    /// # Errors
    ///
    /// Returns an error if the player does not exist or `target` is off the
    /// board.
    pub fn place_player(&mut self, id: PlayerId, target: Option<Position>) -> Result<(), GameError> {
        let current = self.player_checked(id)?.position();
        if let Some(position) = target {
            if !self.board.in_bounds(position) {
                return Err(BoardError::OutOfBounds { position }.into());
            }
        }
        if current == target {
            return Ok(());
        }

        if let Some(old) = current {
            if let Some(space) = self.board.space_mut(old) {
                if space.player() == Some(id) {
                    space.set_player(None);
                }
            }
        }

        if let Some(position) = target {
            if let Some(space) = self.board.space_mut(position) {
                if let Some(other) = space.player() {
                    if other != id {
                        warn!(player = other, %position, "evicting robot from occupied space");
                        if let Some(evicted) = self.players.get_mut(other) {
                            evicted.set_position(None);
                        }
                    }
                }
                space.set_player(Some(id));
            }
        }

        self.player_checked_mut(id)?.set_position(target);
        Ok(())
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Register currently executing.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    pub(crate) fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    /// The acting player.
    #[must_use]
    pub const fn current_player(&self) -> Option<PlayerId> {
        self.current
    }

    pub(crate) fn set_current_player(&mut self, current: Option<PlayerId>) {
        self.current = current;
    }

    /// Players still to act in this register, head first.
    pub fn activation_queue(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.queue.iter().copied()
    }

    pub(crate) fn queue_mut(&mut self) -> &mut VecDeque<PlayerId> {
        &mut self.queue
    }

    /// Rounds started so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    pub(crate) fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    /// The winner, once someone has reached the final checkpoint.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub(crate) fn set_winner(&mut self, winner: Option<PlayerId>) {
        self.winner = winner;
    }

    /// Whether activation yields after every single player activation.
    #[must_use]
    pub const fn is_step_mode(&self) -> bool {
        self.step_mode
    }

    pub(crate) fn set_step_mode(&mut self, step_mode: bool) {
        self.step_mode = step_mode;
    }

    /// The player standing on `position`.
    #[must_use]
    pub fn occupant(&self, position: Position) -> Option<PlayerId> {
        self.board.space(position).and_then(crate::model::Space::player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_game() -> Game {
        let board = Board::new("test", 8, 8, Position::new(0, 0)).unwrap();
        let config = EngineConfig {
            seed: Some(1),
            ..EngineConfig::default()
        };
        Game::new(board, config)
    }

    #[test]
    fn test_add_player_places_robot() {
        let mut game = create_test_game();
        let id = game
            .add_player(Player::new("A", "red"), Some(Position::new(2, 3)))
            .unwrap();
        assert_eq!(id, 0);
        assert_eq!(game.player(id).unwrap().position(), Some(Position::new(2, 3)));
        assert_eq!(game.occupant(Position::new(2, 3)), Some(id));
        assert_eq!(game.phase(), Phase::Initialisation);
    }

    #[test]
    fn test_add_player_off_board_is_rejected() {
        let mut game = create_test_game();
        assert!(game.add_player(Player::new("A", "red"), Some(Position::new(9, 0))).is_err());
        assert_eq!(game.player_count(), 0);
    }

    #[test]
    fn test_place_player_keeps_both_sides_in_sync() {
        let mut game = create_test_game();
        let id = game
            .add_player(Player::new("A", "red"), Some(Position::new(0, 0)))
            .unwrap();

        game.place_player(id, Some(Position::new(1, 0))).unwrap();
        assert_eq!(game.occupant(Position::new(0, 0)), None);
        assert_eq!(game.occupant(Position::new(1, 0)), Some(id));

        game.place_player(id, None).unwrap();
        assert_eq!(game.occupant(Position::new(1, 0)), None);
        assert_eq!(game.player(id).unwrap().position(), None);
    }

    #[test]
    fn test_place_player_evicts_previous_occupant() {
        let mut game = create_test_game();
        let a = game
            .add_player(Player::new("A", "red"), Some(Position::new(0, 0)))
            .unwrap();
        let b = game
            .add_player(Player::new("B", "blue"), Some(Position::new(1, 0)))
            .unwrap();

        game.place_player(b, Some(Position::new(0, 0))).unwrap();
        assert_eq!(game.occupant(Position::new(0, 0)), Some(b));
        assert_eq!(game.player(a).unwrap().position(), None);
        assert_eq!(game.occupant(Position::new(1, 0)), None);
    }

    #[test]
    fn test_unknown_player() {
        let mut game = create_test_game();
        assert_eq!(
            game.place_player(3, None),
            Err(GameError::UnknownPlayer(3))
        );
    }
}
