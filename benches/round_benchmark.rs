//! Benchmarks for round execution.
//!
//! Covers the two hot paths: resolving a full simulated game and the movement
//! resolver on a crowded board.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rally::engine::movement::move_player;
use rally::simulation::run_simulation;
use rally::{Board, EngineConfig, Game, Heading, Player, Position};

fn config(seed: u64) -> EngineConfig {
    EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    }
}

fn bench_simulated_game_2p(c: &mut Criterion) {
    let board = Board::starter().unwrap();
    c.bench_function("simulated_game_2p", |b| {
        b.iter(|| {
            let result = run_simulation(config(black_box(42)), board.clone(), 2, 20);
            black_box(result)
        });
    });
}

fn bench_simulated_game_6p(c: &mut Criterion) {
    let board = Board::starter().unwrap();
    c.bench_function("simulated_game_6p", |b| {
        b.iter(|| {
            let result = run_simulation(config(black_box(42)), board.clone(), 6, 20);
            black_box(result)
        });
    });
}

fn bench_push_chain(c: &mut Criterion) {
    // a column of robots pushed around the board
    let board = Board::new("column", 16, 16, Position::new(0, 0)).unwrap();
    let mut game = Game::new(board, config(1));
    for y in 0..8 {
        game.add_player(Player::new(format!("P{y}"), "red"), Some(Position::new(0, y)))
            .unwrap();
    }

    c.bench_function("push_chain_8", |b| {
        b.iter(|| {
            let moved = move_player(&mut game, 0, Heading::South, black_box(2)).unwrap();
            black_box(moved)
        });
    });
}

criterion_group!(
    benches,
    bench_simulated_game_2p,
    bench_simulated_game_6p,
    bench_push_chain
);
criterion_main!(benches);
