#![no_main]

//! Full round fuzzer.
//!
//! Drives a game on a fuzzer-built board through arbitrary programs and
//! interactive choices:
//! 1. Place conveyors, gears, walls, lasers, energy spaces and checkpoints
//! 2. Program each robot from arbitrary hand slots
//! 3. Execute registers, stepping or running
//! 4. Check game invariants after every call

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rally::engine::invariants::check_invariants;
use rally::{
    Board, BoardElement, CardSlot, Command, EngineConfig, GameController, Heading, Position,
    Progress,
};

/// A fuzzer-generated board element.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzElement {
    Wall { heading: u8 },
    Conveyor { heading: u8, distance: u8 },
    Gear { clockwise: bool },
    Laser { heading: u8 },
    Energy,
}

/// Structured input for round fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundInput {
    width: u8,
    height: u8,
    players: u8,
    seed: u64,
    elements: Vec<(u8, u8, FuzzElement)>,
    checkpoints: Vec<(u8, u8)>,
    /// Hand slot moved into each register, per round and player.
    programs: Vec<[u8; 5]>,
    choices: Vec<bool>,
    step_mode: bool,
}

fn heading(value: u8) -> Heading {
    Heading::ALL[usize::from(value) % Heading::ALL.len()]
}

fuzz_target!(|input: RoundInput| {
    let width = u16::from(input.width % 12) + 1;
    let height = u16::from(input.height % 12) + 1;
    let Ok(mut board) = Board::new("fuzz", width, height, Position::new(0, 0)) else {
        return;
    };
    let at = |x: u8, y: u8| Position::new(u16::from(x) % width, u16::from(y) % height);

    for &(x, y, element) in input.elements.iter().take(64) {
        let element = match element {
            FuzzElement::Wall { heading: h } => BoardElement::wall(heading(h)),
            FuzzElement::Conveyor { heading: h, distance } => {
                BoardElement::conveyor(heading(h), u32::from(distance % 3))
            }
            FuzzElement::Gear { clockwise } => BoardElement::gear(if clockwise { 1 } else { -1 }),
            FuzzElement::Laser { heading: h } => BoardElement::laser(heading(h)),
            FuzzElement::Energy => BoardElement::energy_space(),
        };
        board.add_element(at(x, y), element).expect("position is in bounds");
    }
    for (number, &(x, y)) in (1..).zip(input.checkpoints.iter().take(4)) {
        board
            .add_element(at(x, y), BoardElement::checkpoint(number))
            .expect("position is in bounds");
    }

    let config = EngineConfig {
        seed: Some(input.seed),
        ..EngineConfig::default()
    };
    let players = usize::from(input.players % 6) + 1;
    let Ok(mut controller) = GameController::new_game(board, config, players) else {
        return;
    };
    let mut choices = input.choices.iter().cycle();

    for program in input.programs.iter().take(8) {
        if controller.game().winner().is_some() {
            break;
        }
        for player in 0..players {
            for (register, &slot) in program.iter().enumerate() {
                let from = CardSlot::hand(player, usize::from(slot) % 8);
                // Taken or occupied slots are rejected, which is fine
                let _ = controller.move_card(from, CardSlot::program(player, register));
            }
        }
        controller.finish_programming_phase().expect("programming phase");
        assert!(check_invariants(controller.game()).is_empty());

        let mut progress = if input.step_mode {
            controller.execute_step()
        } else {
            controller.execute_programs()
        }
        .expect("activation phase");

        loop {
            assert!(
                check_invariants(controller.game()).is_empty(),
                "{:?}",
                check_invariants(controller.game())
            );
            progress = match progress {
                Progress::AwaitingChoice { .. } => {
                    let left = choices.next().copied().unwrap_or(true);
                    let choice = if left { Command::Left } else { Command::Right };
                    controller
                        .execute_command_option_and_continue(choice)
                        .expect("valid choice")
                }
                Progress::Activating => controller.execute_step().expect("activation phase"),
                Progress::Programming { .. } | Progress::Won { .. } => break,
            };
        }
    }
});
