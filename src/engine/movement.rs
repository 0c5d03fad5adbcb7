//! Movement, pushing and laser line of sight.
//!
//! A blocked move is not an error: the resolvers report how far a robot
//! actually got and leave every robot on a distinct cell.

use tracing::debug;

use crate::error::{BoardError, GameError};
use crate::model::{Game, Heading, PlayerId, Position};

/// Move `player` up to `distance` cells towards `heading`, pushing robots in
/// the way.
///
/// Returns the number of cells actually moved. The move stops early at a
/// blocked edge, or when a robot ahead cannot be pushed out of the way.
///
/// # Errors
///
/// Returns an error only if `player` does not exist.
pub fn move_player(
    game: &mut Game,
    player: PlayerId,
    heading: Heading,
    distance: u32,
) -> Result<u32, GameError> {
    let mut moved = 0;
    for _ in 0..distance {
        let mut chain = Vec::new();
        if !step(game, player, heading, &mut chain)? {
            break;
        }
        moved += 1;
    }
    debug!(player, %heading, distance, moved, "move resolved");
    Ok(moved)
}

/// Move `player` one cell, first pushing any robot on the target one cell on.
///
/// `chain` holds the robots already pushing in this step; meeting one of them
/// again means the row wraps around the board and is full.
fn step(
    game: &mut Game,
    player: PlayerId,
    heading: Heading,
    chain: &mut Vec<PlayerId>,
) -> Result<bool, GameError> {
    let Some(from) = game.player_checked(player)?.position() else {
        return Ok(false);
    };
    let Some(to) = game.board().neighbor(from, heading) else {
        return Ok(false);
    };
    if to == from {
        return Ok(true);
    }

    chain.push(player);
    if let Some(other) = game.occupant(to) {
        if chain.contains(&other) {
            return Ok(false);
        }
        if !step(game, other, heading, chain)? {
            return Ok(false);
        }
        debug!(pusher = player, pushed = other, %heading, "robot pushed");
    }

    game.place_player(player, Some(to))?;
    Ok(true)
}

/// Rotate `player` by `quarter_turns`; positive turns clockwise.
///
/// # Errors
///
/// Returns an error if `player` does not exist.
pub fn turn_player(game: &mut Game, player: PlayerId, quarter_turns: i32) -> Result<(), GameError> {
    let robot = game.player_checked_mut(player)?;
    robot.heading = robot.heading.rotate(quarter_turns);
    debug!(player, quarter_turns, heading = %robot.heading, "robot turned");
    Ok(())
}

/// Fire a beam from `origin` towards `heading`.
///
/// The beam travels cell by cell until it is stopped by an opaque side or
/// leaves the board. Every robot hit takes `damage`. With
/// `stop_at_first_robot` the beam ends at the first robot it hits; the origin
/// cell itself is never hit.
///
/// Returns the robots hit in beam order.
///
/// # Errors
///
/// Returns an error if `origin` is off the board.
pub fn fire_laser(
    game: &mut Game,
    origin: Position,
    heading: Heading,
    stop_at_first_robot: bool,
    damage: u32,
) -> Result<Vec<PlayerId>, GameError> {
    if !game.board().in_bounds(origin) {
        return Err(BoardError::OutOfBounds { position: origin }.into());
    }

    let mut hits = Vec::new();
    let mut cell = origin;
    while let Some(next) = game.board().sight_neighbor(cell, heading) {
        cell = next;
        if let Some(target) = game.occupant(cell) {
            hits.push(target);
            if stop_at_first_robot {
                break;
            }
        }
    }

    for &target in &hits {
        damage_player(game, target, damage)?;
    }
    Ok(hits)
}

/// Apply laser damage to a robot.
pub(crate) fn damage_player(game: &mut Game, player: PlayerId, damage: u32) -> Result<(), GameError> {
    let robot = game.player_checked_mut(player)?;
    robot.damage = robot.damage.saturating_add(damage);
    debug!(player, damage, total = robot.damage, "robot hit by laser");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::{Board, BoardElement, Player};

    fn game_with(players: &[(u16, u16)]) -> Game {
        let board = Board::new("test", 8, 8, Position::new(0, 0)).unwrap();
        let mut game = Game::new(board, EngineConfig::default());
        for (i, &(x, y)) in players.iter().enumerate() {
            game.add_player(Player::new(format!("P{i}"), "red"), Some(Position::new(x, y)))
                .unwrap();
        }
        game
    }

    fn position_of(game: &Game, player: PlayerId) -> Position {
        game.player(player).unwrap().position().unwrap()
    }

    #[test]
    fn test_straight_move() {
        let mut game = game_with(&[(2, 2)]);
        assert_eq!(move_player(&mut game, 0, Heading::East, 3).unwrap(), 3);
        assert_eq!(position_of(&game, 0), Position::new(5, 2));
        assert_eq!(game.player(0).unwrap().heading, Heading::South);
    }

    #[test]
    fn test_move_wraps_around() {
        let mut game = game_with(&[(4, 7)]);
        move_player(&mut game, 0, Heading::South, 1).unwrap();
        assert_eq!(position_of(&game, 0), Position::new(4, 0));
    }

    #[test]
    fn test_wall_gives_partial_move() {
        let mut game = game_with(&[(0, 0)]);
        game.board_mut()
            .add_element(Position::new(0, 1), BoardElement::wall(Heading::South))
            .unwrap();
        assert_eq!(move_player(&mut game, 0, Heading::South, 3).unwrap(), 1);
        assert_eq!(position_of(&game, 0), Position::new(0, 1));
    }

    #[test]
    fn test_push_single_robot() {
        let mut game = game_with(&[(0, 0), (0, 1)]);
        assert_eq!(move_player(&mut game, 0, Heading::South, 1).unwrap(), 1);
        assert_eq!(position_of(&game, 0), Position::new(0, 1));
        assert_eq!(position_of(&game, 1), Position::new(0, 2));
        assert_eq!(game.occupant(Position::new(0, 0)), None);
    }

    #[test]
    fn test_push_chain() {
        let mut game = game_with(&[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(move_player(&mut game, 0, Heading::South, 2).unwrap(), 2);
        assert_eq!(position_of(&game, 0), Position::new(0, 2));
        assert_eq!(position_of(&game, 1), Position::new(0, 3));
        assert_eq!(position_of(&game, 2), Position::new(0, 4));
    }

    #[test]
    fn test_push_blocked_by_wall() {
        let mut game = game_with(&[(0, 0), (0, 1)]);
        game.board_mut()
            .add_element(Position::new(0, 1), BoardElement::wall(Heading::South))
            .unwrap();
        assert_eq!(move_player(&mut game, 0, Heading::South, 2).unwrap(), 0);
        assert_eq!(position_of(&game, 0), Position::new(0, 0));
        assert_eq!(position_of(&game, 1), Position::new(0, 1));
    }

    #[test]
    fn test_push_partial_then_blocked() {
        let mut game = game_with(&[(0, 0), (0, 2)]);
        game.board_mut()
            .add_element(Position::new(0, 2), BoardElement::wall(Heading::South))
            .unwrap();
        // first step is free, second would push robot 1 through the wall
        assert_eq!(move_player(&mut game, 0, Heading::South, 2).unwrap(), 1);
        assert_eq!(position_of(&game, 0), Position::new(0, 1));
        assert_eq!(position_of(&game, 1), Position::new(0, 2));
    }

    #[test]
    fn test_full_wrapped_row_cannot_move() {
        let board = Board::new("ring", 3, 3, Position::new(0, 0)).unwrap();
        let mut game = Game::new(board, EngineConfig::default());
        for x in 0..3 {
            game.add_player(Player::new(format!("P{x}"), "red"), Some(Position::new(x, 0)))
                .unwrap();
        }
        assert_eq!(move_player(&mut game, 0, Heading::East, 1).unwrap(), 0);
        for x in 0..3 {
            assert_eq!(position_of(&game, usize::from(x)), Position::new(x, 0));
        }
    }

    #[test]
    fn test_turn() {
        let mut game = game_with(&[(0, 0)]);
        turn_player(&mut game, 0, 1).unwrap();
        assert_eq!(game.player(0).unwrap().heading, Heading::West);
        turn_player(&mut game, 0, -2).unwrap();
        assert_eq!(game.player(0).unwrap().heading, Heading::East);
    }

    #[test]
    fn test_laser_hits_robot() {
        let mut game = game_with(&[(3, 3)]);
        let hits = fire_laser(&mut game, Position::new(3, 1), Heading::South, true, 1).unwrap();
        assert_eq!(hits, vec![0]);
        assert_eq!(game.player(0).unwrap().damage, 1);
    }

    #[test]
    fn test_laser_blocked_by_wall() {
        let mut game = game_with(&[(3, 3)]);
        game.board_mut()
            .add_element(Position::new(3, 2), BoardElement::wall(Heading::South))
            .unwrap();
        let hits = fire_laser(&mut game, Position::new(3, 1), Heading::South, true, 1).unwrap();
        assert!(hits.is_empty());
        assert_eq!(game.player(0).unwrap().damage, 0);
    }

    #[test]
    fn test_laser_hits_only_first_robot() {
        let mut game = game_with(&[(3, 3), (3, 5)]);
        let hits = fire_laser(&mut game, Position::new(3, 0), Heading::South, true, 1).unwrap();
        assert_eq!(hits, vec![0]);
        assert_eq!(game.player(1).unwrap().damage, 0);
    }

    #[test]
    fn test_piercing_beam_hits_every_robot() {
        let mut game = game_with(&[(3, 3), (3, 5)]);
        let hits = fire_laser(&mut game, Position::new(3, 0), Heading::South, false, 2).unwrap();
        assert_eq!(hits, vec![0, 1]);
        assert_eq!(game.player(1).unwrap().damage, 2);
    }
}
