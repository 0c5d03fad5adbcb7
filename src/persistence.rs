//! Saving and restoring games.
//!
//! A [`GameSnapshot`] captures everything a game needs to resume except the
//! board itself, which is referenced by name and supplied on restore.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::invariants::check_invariants;
use crate::error::PersistenceError;
use crate::model::{
    Board, BoardElement, Command, CommandCard, Game, Heading, NO_CARDS, NO_REGISTERS, Phase,
    Player, PlayerId, Position, Space,
};

/// Persisted state of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Robot cell, `None` when off the board.
    pub position: Option<Position>,
    /// Direction the robot faces.
    pub heading: Heading,
    /// Energy cubes collected.
    pub energy: u32,
    /// Highest checkpoint reached.
    pub checkpoint: u32,
    /// Laser hits taken.
    pub damage: u32,
    /// Register contents.
    pub program: Vec<Option<Command>>,
    /// Hand contents.
    pub hand: Vec<Option<Command>>,
    /// Draw pile, top last.
    pub deck: Vec<Command>,
    /// Discard pile.
    pub discard: Vec<Command>,
}

/// Persisted state of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Repository key.
    pub id: String,
    /// Name of the board the game is played on.
    pub board: String,
    /// Game seed.
    pub seed: u64,
    /// Current phase.
    pub phase: Phase,
    /// Register being executed.
    pub step: usize,
    /// Index of the acting player.
    pub current_player: Option<PlayerId>,
    /// Players still to act in this register, head first.
    pub activation_queue: Vec<PlayerId>,
    /// Rounds started.
    pub round: u32,
    /// Winner, once there is one.
    pub winner: Option<PlayerId>,
    /// Whether activation was running one step at a time.
    pub step_mode: bool,
    /// Players in join order.
    pub players: Vec<PlayerSnapshot>,
    /// Energy spaces whose cube has been taken.
    #[serde(default)]
    pub spent_energy: Vec<Position>,
}

fn spent_energy(board: &Board) -> Vec<Position> {
    board
        .spaces()
        .iter()
        .filter(|space| {
            space
                .elements()
                .iter()
                .any(|element| matches!(element, BoardElement::EnergySpace { has_cube: false, .. }))
        })
        .map(Space::position)
        .collect()
}

fn spend_energy(board: &mut Board, position: Position) -> Result<(), PersistenceError> {
    let space = board.space_mut(position).ok_or_else(|| {
        PersistenceError::Corrupt(format!("spent energy at {position} is off the board"))
    })?;
    let mut found = false;
    for index in 0..space.elements().len() {
        if let Some(BoardElement::EnergySpace { has_cube, .. }) = space.element_mut(index) {
            *has_cube = false;
            found = true;
        }
    }
    if found {
        Ok(())
    } else {
        Err(PersistenceError::Corrupt(format!("no energy space at {position}")))
    }
}

fn commands(cards: &[Option<CommandCard>]) -> Vec<Option<Command>> {
    cards.iter().map(|card| card.map(|c| c.command)).collect()
}

fn cards<const N: usize>(
    commands: &[Option<Command>],
    what: &str,
) -> Result<[Option<CommandCard>; N], PersistenceError> {
    if commands.len() != N {
        return Err(PersistenceError::Corrupt(format!(
            "{what} has {} slots, expected {N}",
            commands.len()
        )));
    }
    let mut slots = [None; N];
    for (slot, command) in slots.iter_mut().zip(commands) {
        *slot = command.map(CommandCard::new);
    }
    Ok(slots)
}

impl PlayerSnapshot {
    fn from_player(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            color: player.color.clone(),
            position: player.position(),
            heading: player.heading,
            energy: player.energy,
            checkpoint: player.checkpoint(),
            damage: player.damage,
            program: commands(&player.program),
            hand: commands(&player.hand),
            deck: player.deck.iter().map(|c| c.command).collect(),
            discard: player.discard.iter().map(|c| c.command).collect(),
        }
    }

    fn to_player(&self) -> Result<Player, PersistenceError> {
        let mut player = Player::new(self.name.clone(), self.color.clone());
        player.heading = self.heading;
        player.energy = self.energy;
        player.damage = self.damage;
        player.restore_checkpoint(self.checkpoint);
        player.program = cards::<NO_REGISTERS>(&self.program, "program")?;
        player.hand = cards::<NO_CARDS>(&self.hand, "hand")?;
        player.deck = self.deck.iter().copied().map(CommandCard::new).collect();
        player.discard = self.discard.iter().copied().map(CommandCard::new).collect();
        Ok(player)
    }
}

impl GameSnapshot {
    /// Capture `game` under `id`.
    #[must_use]
    pub fn from_game(id: impl Into<String>, game: &Game) -> Self {
        Self {
            id: id.into(),
            board: game.board().name().to_string(),
            seed: game.seed(),
            phase: game.phase(),
            step: game.step(),
            current_player: game.current_player(),
            activation_queue: game.activation_queue().collect(),
            round: game.round(),
            winner: game.winner(),
            step_mode: game.is_step_mode(),
            players: game.players().iter().map(PlayerSnapshot::from_player).collect(),
            spent_energy: spent_energy(game.board()),
        }
    }

    /// Rebuild the game on `board`.
    ///
    /// The seed comes from the snapshot; the rest of `config` applies as
    /// given.
    ///
    /// # Errors
    ///
    /// Returns an error if `board` is not the one the snapshot was taken on,
    /// or the snapshot does not describe a consistent game.
    pub fn restore(&self, mut board: Board, config: EngineConfig) -> Result<Game, PersistenceError> {
        if board.name() != self.board {
            return Err(PersistenceError::BoardMismatch {
                expected: self.board.clone(),
                actual: board.name().to_string(),
            });
        }
        for &position in &self.spent_energy {
            spend_energy(&mut board, position)?;
        }

        let config = EngineConfig {
            seed: Some(self.seed),
            ..config
        };
        let mut game = Game::new(board, config);
        for snapshot in &self.players {
            let player = snapshot.to_player()?;
            if let Some(position) = snapshot.position {
                if game.occupant(position).is_some() {
                    return Err(PersistenceError::Corrupt(format!(
                        "two robots share {position}"
                    )));
                }
            }
            game.add_player(player, snapshot.position)?;
        }

        let count = game.player_count();
        if self.current_player.is_some_and(|id| id >= count)
            || self.winner.is_some_and(|id| id >= count)
        {
            return Err(PersistenceError::Corrupt("player index out of range".into()));
        }

        game.set_phase(self.phase);
        game.set_step(self.step);
        game.set_round(self.round);
        game.set_winner(self.winner);
        game.set_step_mode(self.step_mode);
        game.queue_mut().extend(self.activation_queue.iter().copied());
        game.set_current_player(self.current_player);

        if let Some(violation) = check_invariants(&game).into_iter().next() {
            return Err(PersistenceError::Corrupt(violation.message));
        }
        debug!(id = %self.id, round = self.round, "snapshot restored");
        Ok(game)
    }
}

/// Storage of game snapshots by id.
pub trait GameRepository {
    /// Store `snapshot` under its id, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &GameSnapshot) -> Result<(), PersistenceError>;

    /// Fetch the snapshot stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if no such snapshot exists or it cannot be read.
    fn load(&self, id: &str) -> Result<GameSnapshot, PersistenceError>;

    /// Ids of all stored snapshots, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    fn list(&self) -> Result<Vec<String>, PersistenceError>;
}

/// Snapshots stored as `<id>.json` files in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Use `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl GameRepository for JsonFileRepository {
    fn save(&self, snapshot: &GameSnapshot) -> Result<(), PersistenceError> {
        let path = self.path(&snapshot.id)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        info!(id = %snapshot.id, path = %path.display(), "game saved");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<GameSnapshot, PersistenceError> {
        let path = self.path(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn list(&self) -> Result<Vec<String>, PersistenceError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameController;

    fn started_game() -> Game {
        let board = Board::starter().unwrap();
        let config = EngineConfig {
            seed: Some(11),
            ..EngineConfig::default()
        };
        GameController::new_game(board, config, 3).unwrap().into_game()
    }

    #[test]
    fn test_snapshot_restores_same_state() {
        let game = started_game();
        let snapshot = GameSnapshot::from_game("g1", &game);
        let restored = snapshot
            .restore(Board::starter().unwrap(), EngineConfig::default())
            .unwrap();
        assert_eq!(GameSnapshot::from_game("g1", &restored), snapshot);
        assert_eq!(restored.seed(), 11);
    }

    #[test]
    fn test_restore_rejects_other_board() {
        let snapshot = GameSnapshot::from_game("g1", &started_game());
        let other = Board::new("other", 10, 10, Position::new(0, 0)).unwrap();
        assert!(matches!(
            snapshot.restore(other, EngineConfig::default()),
            Err(PersistenceError::BoardMismatch { .. })
        ));
    }

    #[test]
    fn test_restore_rejects_shared_cell() {
        let mut snapshot = GameSnapshot::from_game("g1", &started_game());
        snapshot.players[1].position = snapshot.players[0].position;
        assert!(matches!(
            snapshot.restore(Board::starter().unwrap(), EngineConfig::default()),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn test_restore_rejects_short_program() {
        let mut snapshot = GameSnapshot::from_game("g1", &started_game());
        snapshot.players[0].program.pop();
        assert!(matches!(
            snapshot.restore(Board::starter().unwrap(), EngineConfig::default()),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn test_restore_rejects_spent_energy_without_energy_space() {
        let mut snapshot = GameSnapshot::from_game("g1", &started_game());
        snapshot.spent_energy.push(Position::new(0, 0));
        assert!(matches!(
            snapshot.restore(Board::starter().unwrap(), EngineConfig::default()),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn test_repository_save_load_list() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::open(dir.path().join("saves")).unwrap();
        let game = started_game();
        repository.save(&GameSnapshot::from_game("beta", &game)).unwrap();
        repository.save(&GameSnapshot::from_game("alpha", &game)).unwrap();

        assert_eq!(repository.list().unwrap(), vec!["alpha", "beta"]);
        let loaded = repository.load("beta").unwrap();
        assert_eq!(loaded, GameSnapshot::from_game("beta", &game));
    }

    #[test]
    fn test_repository_errors() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::open(dir.path()).unwrap();
        assert!(matches!(
            repository.load("missing"),
            Err(PersistenceError::NotFound(_))
        ));
        assert!(matches!(
            repository.load("../escape"),
            Err(PersistenceError::InvalidId(_))
        ));
    }
}
