//! Output formatting utilities for CLI.

// Statistics are reported as floating point ratios
#![allow(clippy::cast_precision_loss)]

use rally::simulation::SimulationResult;
use serde::Serialize;
use std::time::Duration;

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &SimulationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Game Result (seed: {})\n", result.seed));
    match result.winner.and_then(|w| result.players.get(w).map(|p| (w, p))) {
        Some((winner, player)) => {
            output.push_str(&format!("  Winner: Player {} ({})\n", winner + 1, player.name));
        }
        None => output.push_str("  Winner: none\n"),
    }
    output.push_str(&format!("  Rounds: {}\n\n", result.rounds_played));

    for (i, player) in result.players.iter().enumerate() {
        let position = player
            .position
            .map_or_else(|| "off board".to_string(), |p| p.to_string());
        output.push_str(&format!(
            "  Player {} ({}): checkpoint {}/{} at {position} facing {}, energy {}, damage {}\n",
            i + 1,
            player.color,
            player.checkpoint,
            result.checkpoints,
            player.heading,
            player.energy,
            player.damage
        ));
    }

    output
}

/// Aggregated statistics of many games.
#[derive(Debug, Clone, Serialize)]
pub(super) struct BatchStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per player seat.
    pub(super) wins: Vec<u64>,
    /// Games that hit the round limit without a winner.
    pub(super) unfinished: u64,
    /// Rounds played across all games.
    total_rounds: u64,
    /// Checkpoints reached per player seat, summed over games.
    total_checkpoints: Vec<u64>,
    /// Laser damage per player seat, summed over games.
    total_damage: Vec<u64>,
}

impl BatchStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_players],
            unfinished: 0,
            total_rounds: 0,
            total_checkpoints: vec![0; num_players],
            total_damage: vec![0; num_players],
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &SimulationResult) {
        self.games_played += 1;
        self.total_rounds += u64::from(result.rounds_played);

        match result.winner.and_then(|w| self.wins.get_mut(w)) {
            Some(wins) => *wins += 1,
            None => self.unfinished += 1,
        }

        for (i, player) in result.players.iter().enumerate() {
            if let Some(total) = self.total_checkpoints.get_mut(i) {
                *total += u64::from(player.checkpoint);
            }
            if let Some(total) = self.total_damage.get_mut(i) {
                *total += u64::from(player.damage);
            }
        }
    }

    /// Merge another stats object into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.unfinished += other.unfinished;
        self.total_rounds += other.total_rounds;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_checkpoints.iter_mut().zip(&other.total_checkpoints) {
            *a += b;
        }
        for (a, b) in self.total_damage.iter_mut().zip(&other.total_damage) {
            *a += b;
        }
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }

    /// Win rate for a player seat (0.0-1.0).
    pub(super) fn win_rate(&self, seat: usize) -> f64 {
        self.per_game(self.wins.get(seat).copied().unwrap_or(0))
    }

    /// Average rounds per game.
    pub(super) fn avg_rounds(&self) -> f64 {
        self.per_game(self.total_rounds)
    }

    /// Average checkpoint reached by a seat.
    pub(super) fn avg_checkpoint(&self, seat: usize) -> f64 {
        self.per_game(self.total_checkpoints.get(seat).copied().unwrap_or(0))
    }

    /// Average damage taken by a seat.
    pub(super) fn avg_damage(&self, seat: usize) -> f64 {
        self.per_game(self.total_damage.get(seat).copied().unwrap_or(0))
    }

    /// Throughput over `elapsed`.
    pub(super) fn games_per_sec(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.games_played as f64 / secs
        } else {
            0.0
        }
    }
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats, base_seed: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Batch Results ({} games, seeds from {base_seed})\n",
        stats.games_played
    ));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, wins) in stats.wins.iter().enumerate() {
        output.push_str(&format!(
            "  Player {}: {:.1}% ({wins} wins)\n",
            i + 1,
            stats.win_rate(i) * 100.0
        ));
    }
    output.push_str(&format!(
        "  Unfinished: {} ({:.1}%)\n\n",
        stats.unfinished,
        stats.per_game(stats.unfinished) * 100.0
    ));

    output.push_str("Progress:\n");
    for i in 0..stats.wins.len() {
        output.push_str(&format!(
            "  Player {}: avg checkpoint {:.2}, avg damage {:.2}\n",
            i + 1,
            stats.avg_checkpoint(i),
            stats.avg_damage(i)
        ));
    }
    output.push_str(&format!("\nAverage rounds: {:.1}\n", stats.avg_rounds()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rally::simulation::PlayerSummary;
    use rally::{Heading, Position};

    fn result(winner: Option<usize>, rounds: u32) -> SimulationResult {
        let player = |checkpoint| PlayerSummary {
            name: "P".into(),
            color: "red".into(),
            position: Some(Position::new(0, 0)),
            heading: Heading::South,
            checkpoint,
            energy: 0,
            damage: 1,
        };
        SimulationResult {
            seed: 1,
            rounds_played: rounds,
            winner,
            checkpoints: 3,
            players: vec![player(3), player(1)],
        }
    }

    #[test]
    fn test_stats_merge() {
        let mut a = BatchStats::new(2);
        a.add_result(&result(Some(0), 10));
        let mut b = BatchStats::new(2);
        b.add_result(&result(None, 20));
        a.merge(&b);

        assert_eq!(a.games_played, 2);
        assert_eq!(a.wins, vec![1, 0]);
        assert_eq!(a.unfinished, 1);
        assert!((a.avg_rounds() - 15.0).abs() < 1e-9);
        assert!((a.win_rate(0) - 0.5).abs() < 1e-9);
        assert!((a.avg_checkpoint(1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_text_names_winner() {
        let text = format_text(&result(Some(0), 4));
        assert!(text.contains("Winner: Player 1"));
        assert!(text.contains("checkpoint 3/3"));
    }
}
