//! Unattended games.
//!
//! Every round each robot runs the first five cards it was dealt, in hand
//! order, and interactive cards are resolved with a seeded random choice. The
//! whole game is a pure function of the seed.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::invariants::assert_invariants;
use crate::engine::{GameController, Progress};
use crate::error::GameError;
use crate::model::{Board, CardSlot, Command, Game, Heading, NO_REGISTERS, PlayerId, Position};

/// Final state of one robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Final cell.
    pub position: Option<Position>,
    /// Final heading.
    pub heading: Heading,
    /// Highest checkpoint reached.
    pub checkpoint: u32,
    /// Energy collected.
    pub energy: u32,
    /// Laser hits taken.
    pub damage: u32,
}

/// Outcome of a simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    /// Seed the game ran with.
    pub seed: u64,
    /// Rounds fully or partially executed.
    pub rounds_played: u32,
    /// Winner, if a robot finished.
    pub winner: Option<PlayerId>,
    /// Final checkpoint of the board.
    pub checkpoints: u32,
    /// Per-player results in join order.
    pub players: Vec<PlayerSummary>,
}

impl SimulationResult {
    /// Summarise `game` after `rounds_played` rounds.
    #[must_use]
    pub fn from_game(game: &Game, rounds_played: u32) -> Self {
        Self {
            seed: game.seed(),
            rounds_played,
            winner: game.winner(),
            checkpoints: game.board().checkpoint_count(),
            players: game
                .players()
                .iter()
                .map(|player| PlayerSummary {
                    name: player.name.clone(),
                    color: player.color.clone(),
                    position: player.position(),
                    heading: player.heading,
                    checkpoint: player.checkpoint(),
                    energy: player.energy,
                    damage: player.damage,
                })
                .collect(),
        }
    }
}

/// Set up a game and play it to a winner or `max_rounds`.
///
/// # Errors
///
/// Returns an error if the game cannot be created.
pub fn run_simulation(
    config: EngineConfig,
    board: Board,
    players: usize,
    max_rounds: u32,
) -> Result<SimulationResult, GameError> {
    let mut controller = GameController::new_game(board, config, players)?;
    play_rounds(&mut controller, max_rounds)
}

/// Play up to `max_rounds` rounds of a game waiting in its programming phase.
///
/// # Errors
///
/// Returns an error if the game is not ready to be programmed.
pub fn play_rounds(
    controller: &mut GameController,
    max_rounds: u32,
) -> Result<SimulationResult, GameError> {
    let mut choices = SmallRng::seed_from_u64(controller.game().seed().rotate_left(17));
    let mut rounds_played = 0;

    while rounds_played < max_rounds && controller.game().winner().is_none() {
        program_from_hand(controller)?;
        controller.finish_programming_phase()?;

        let mut progress = controller.execute_programs()?;
        loop {
            match progress {
                Progress::AwaitingChoice { player } => {
                    let choice = choose_option(controller.game(), player, &mut choices)?;
                    debug!(player, %choice, "simulated choice");
                    progress = controller.execute_command_option_and_continue(choice)?;
                }
                Progress::Activating => progress = controller.execute_programs()?,
                Progress::Programming { .. } | Progress::Won { .. } => break,
            }
        }
        rounds_played += 1;
        assert_invariants(controller.game());
    }

    let result = SimulationResult::from_game(controller.game(), rounds_played);
    info!(seed = result.seed, rounds = rounds_played, winner = ?result.winner, "simulation finished");
    Ok(result)
}

/// Fill every register from the hand slot with the same index.
fn program_from_hand(controller: &mut GameController) -> Result<(), GameError> {
    for player in 0..controller.game().player_count() {
        for register in 0..NO_REGISTERS {
            controller.move_card(
                CardSlot::hand(player, register),
                CardSlot::program(player, register),
            )?;
        }
    }
    Ok(())
}

fn choose_option(
    game: &Game,
    player: PlayerId,
    rng: &mut SmallRng,
) -> Result<Command, GameError> {
    let card = game
        .player(player)
        .ok_or(GameError::UnknownPlayer(player))?
        .program[game.step()]
    .ok_or(GameError::NoInteractiveCard)?;
    card.command
        .options()
        .choose(rng)
        .copied()
        .ok_or(GameError::NoInteractiveCard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> EngineConfig {
        EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let a = run_simulation(config(5), Board::starter().unwrap(), 4, 20).unwrap();
        let b = run_simulation(config(5), Board::starter().unwrap(), 4, 20).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 5);
        assert_eq!(a.players.len(), 4);
    }

    #[test]
    fn test_simulation_respects_round_limit() {
        let result = run_simulation(config(9), Board::starter().unwrap(), 2, 3).unwrap();
        assert!(result.rounds_played <= 3);
        if result.winner.is_none() {
            assert_eq!(result.rounds_played, 3);
        }
    }

    #[test]
    fn test_simulation_keeps_robots_apart() {
        for seed in 0..10 {
            let result = run_simulation(config(seed), Board::starter().unwrap(), 6, 10).unwrap();
            let mut cells: Vec<_> = result.players.iter().filter_map(|p| p.position).collect();
            let placed = cells.len();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), placed, "seed {seed}");
        }
    }

    #[test]
    fn test_play_rounds_requires_programming_phase() {
        let mut controller =
            GameController::new_game(Board::starter().unwrap(), config(1), 2).unwrap();
        controller.finish_programming_phase().unwrap();
        assert!(matches!(
            play_rounds(&mut controller, 1),
            Err(GameError::InvalidPhase { .. })
        ));
    }
}
