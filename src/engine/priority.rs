//! Activation order by distance to the priority antenna.

use crate::model::{Game, PlayerId};

/// Players ranked for activation.
///
/// Sorted by rectilinear distance to the board's priority position; equal
/// distances keep join order. Robots off the board go last.
#[must_use]
pub fn activation_order(game: &Game) -> Vec<PlayerId> {
    let board = game.board();
    let mut order: Vec<(u32, PlayerId)> = game
        .players()
        .iter()
        .enumerate()
        .map(|(id, player)| {
            let distance = player
                .position()
                .map_or(u32::MAX, |position| board.priority_distance(position));
            (distance, id)
        })
        .collect();
    order.sort_unstable();
    order.into_iter().map(|(_, id)| id).collect()
}

/// Replace the activation queue with a fresh ranking and make its head the
/// current player.
pub(crate) fn rebuild_queue(game: &mut Game) {
    let order = activation_order(game);
    let head = order.first().copied();
    let queue = game.queue_mut();
    queue.clear();
    queue.extend(order);
    game.set_current_player(head);
}
