//! Game invariants - sanity checks that detect bugs.
//!
//! These should never trigger for a game driven through `GameController`.
//! If they do, the engine has a bug.

use std::collections::HashSet;

use crate::model::{Game, NO_REGISTERS, Phase};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    // Occupancy agrees in both directions
    for (id, player) in game.players().iter().enumerate() {
        if let Some(position) = player.position() {
            if game.occupant(position) != Some(id) {
                push(format!(
                    "Player {id} is at {position} but the space records {:?}",
                    game.occupant(position)
                ));
            }
        }
    }
    for space in game.board().spaces() {
        if let Some(id) = space.player() {
            let recorded = game.player(id).and_then(crate::model::Player::position);
            if recorded != Some(space.position()) {
                push(format!(
                    "Space {} records player {id} who is at {recorded:?}",
                    space.position()
                ));
            }
        }
    }

    // Register index in range
    if game.step() >= NO_REGISTERS {
        push(format!("Step {} exceeds last register", game.step()));
    }

    // Queue holds each existing player at most once
    let mut seen = HashSet::new();
    for id in game.activation_queue() {
        if id >= game.player_count() {
            push(format!("Activation queue holds unknown player {id}"));
        }
        if !seen.insert(id) {
            push(format!("Player {id} appears twice in the activation queue"));
        }
    }
    if matches!(game.phase(), Phase::Activation | Phase::PlayerInteraction)
        && game.current_player() != game.activation_queue().next()
    {
        push(format!(
            "Current player {:?} is not the head of the activation queue",
            game.current_player()
        ));
    }

    // Progress bounded by the final checkpoint
    let last = game.board().checkpoint_count();
    for (id, player) in game.players().iter().enumerate() {
        if player.checkpoint() > last {
            push(format!(
                "Player {id} reached checkpoint {} of {last}",
                player.checkpoint()
            ));
        }
    }

    // Cards are conserved once dealt
    let deck_size = game.config().deck.size();
    for (id, player) in game.players().iter().enumerate() {
        let count = player.card_count();
        if count != 0 && count != deck_size {
            push(format!("Player {id} owns {count} cards, expected {deck_size}"));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &Game) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &Game) {}
