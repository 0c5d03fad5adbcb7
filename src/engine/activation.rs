//! Board element activation.

use tracing::{debug, info};

use crate::engine::movement::{damage_player, fire_laser, move_player, turn_player};
use crate::error::GameError;
use crate::model::{BoardElement, Game, PlayerId, Position};

/// Fire the activatable elements of the space `player` landed on.
///
/// Elements fire in the space's activation order and only while the robot is
/// still on that space; a hazard that carries the robot away ends the chain.
/// Movement caused here never triggers the elements of the space it ends on.
///
/// # Errors
///
/// Returns an error if `player` does not exist.
pub fn activate_space(game: &mut Game, player: PlayerId) -> Result<(), GameError> {
    let Some(landing) = game.player_checked(player)?.position() else {
        return Ok(());
    };
    let Some(space) = game.board().space(landing) else {
        return Ok(());
    };
    let elements: Vec<(usize, BoardElement)> = space
        .activatable_elements()
        .map(|(index, element)| (index, element.clone()))
        .collect();

    for (index, element) in elements {
        if game.player_checked(player)?.position() != Some(landing) {
            break;
        }
        match element {
            BoardElement::MoveHazard {
                heading,
                rotation,
                distance,
                ..
            } => {
                if rotation != 0 {
                    turn_player(game, player, rotation)?;
                }
                if distance > 0 {
                    move_player(game, player, heading, distance)?;
                }
            }
            BoardElement::EnergySpace { has_cube, .. } => {
                collect_energy(game, player, landing, index, has_cube)?;
            }
            BoardElement::Checkpoint { number, .. } => {
                reach_checkpoint(game, player, number)?;
            }
            // Board lasers fire together at the end of the register.
            BoardElement::BoardLaser { .. } | BoardElement::Wall { .. } => {}
        }
    }
    Ok(())
}

fn collect_energy(
    game: &mut Game,
    player: PlayerId,
    landing: Position,
    index: usize,
    has_cube: bool,
) -> Result<(), GameError> {
    let bonus = game.config().energy_bonus_register == Some(game.step());
    if !has_cube && !bonus {
        return Ok(());
    }
    if has_cube {
        if let Some(BoardElement::EnergySpace { has_cube, .. }) = game
            .board_mut()
            .space_mut(landing)
            .and_then(|space| space.element_mut(index))
        {
            *has_cube = false;
        }
    }
    let robot = game.player_checked_mut(player)?;
    robot.energy += 1;
    debug!(player, energy = robot.energy, bonus, "energy collected");
    Ok(())
}

fn reach_checkpoint(game: &mut Game, player: PlayerId, number: u32) -> Result<(), GameError> {
    let last = game.board().checkpoint_count();
    let robot = game.player_checked_mut(player)?;
    if !robot.reach_checkpoint(number) {
        return Ok(());
    }
    info!(player, checkpoint = number, "checkpoint reached");
    if number == last && game.winner().is_none() {
        info!(player, "final checkpoint reached, game won");
        game.set_winner(Some(player));
    }
    Ok(())
}

/// Fire every board laser, lowest priority first.
///
/// A robot standing on the emitter's own space takes the hit; otherwise the
/// beam travels along the laser's heading and stops at the first robot.
///
/// Returns the robots hit.
///
/// # Errors
///
/// Returns an error if a laser sits off the board.
pub fn fire_board_lasers(game: &mut Game) -> Result<Vec<PlayerId>, GameError> {
    let mut hits = Vec::new();
    for (origin, laser) in game.board().lasers() {
        if let Some(target) = game.occupant(origin) {
            damage_player(game, target, laser.damage)?;
            hits.push(target);
        } else {
            hits.extend(fire_laser(game, origin, laser.heading, true, laser.damage)?);
        }
    }
    if !hits.is_empty() {
        debug!(?hits, "board lasers fired");
    }
    Ok(hits)
}
