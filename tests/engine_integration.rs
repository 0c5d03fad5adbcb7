//! End-to-end tests for round execution.
//!
//! These drive games through the public controller API only: programming,
//! activation, interaction and the transition back to programming.
//!
//! Run with: cargo test --release engine_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use rally::engine::invariants::check_invariants;
use rally::simulation::run_simulation;
use rally::{
    Board, BoardElement, Command, EngineConfig, Game, GameController, Heading, Phase, Player,
    PlayerId, Position, Progress,
};

fn config() -> EngineConfig {
    EngineConfig {
        seed: Some(2024),
        ..EngineConfig::default()
    }
}

fn empty_board() -> Board {
    Board::new("empty", 8, 8, Position::new(0, 0)).unwrap()
}

/// Start a game with robots at `spots`, all facing south.
fn setup(board: Board, spots: &[(u16, u16)]) -> GameController {
    let config = config();
    let mut game = Game::new(board, config);
    for (i, &(x, y)) in spots.iter().enumerate() {
        let mut player = Player::new(format!("P{i}"), "red");
        player.deck = config.deck.cards();
        game.add_player(player, Some(Position::new(x, y))).unwrap();
    }
    let mut controller = GameController::new(game);
    controller.start_programming_phase().unwrap();
    controller
}

/// Replace a player's program with `commands` taken from its own cards.
fn program(controller: &mut GameController, player: PlayerId, commands: &[Command]) {
    let robot = controller.game_mut().player_mut(player).unwrap();
    robot.discard_mat();
    robot.deck.append(&mut robot.discard);
    for (register, command) in commands.iter().enumerate() {
        let index = robot.deck.iter().position(|c| c.command == *command).unwrap();
        robot.program[register] = Some(robot.deck.remove(index));
    }
}

fn run_round(controller: &mut GameController) -> Progress {
    controller.finish_programming_phase().unwrap();
    controller.execute_programs().unwrap()
}

fn position(controller: &GameController, player: PlayerId) -> Position {
    controller.game().player(player).unwrap().position().unwrap()
}

#[test]
fn test_forward_moves_one_cell_south() {
    let mut controller = setup(empty_board(), &[(0, 0)]);
    program(&mut controller, 0, &[Command::Forward]);
    run_round(&mut controller);
    assert_eq!(position(&controller, 0), Position::new(0, 1));
}

#[test]
fn test_fast_forward_moves_two_cells() {
    let mut controller = setup(empty_board(), &[(0, 0)]);
    program(&mut controller, 0, &[Command::FastForward]);
    run_round(&mut controller);
    assert_eq!(position(&controller, 0), Position::new(0, 2));
}

#[test]
fn test_right_turns_south_to_west() {
    let mut controller = setup(empty_board(), &[(0, 0)]);
    program(&mut controller, 0, &[Command::Right]);
    run_round(&mut controller);
    let player = controller.game().player(0).unwrap();
    assert_eq!(player.heading, Heading::West);
    assert_eq!(player.position(), Some(Position::new(0, 0)));
}

#[test]
fn test_left_turns_south_to_east() {
    let mut controller = setup(empty_board(), &[(0, 0)]);
    program(&mut controller, 0, &[Command::Left]);
    run_round(&mut controller);
    assert_eq!(controller.game().player(0).unwrap().heading, Heading::East);
}

#[test]
fn test_turn_then_move_follows_new_heading() {
    let mut controller = setup(empty_board(), &[(3, 3)]);
    program(&mut controller, 0, &[Command::Left, Command::Forward, Command::Forward]);
    run_round(&mut controller);
    assert_eq!(position(&controller, 0), Position::new(5, 3));
}

#[test]
fn test_forward_pushes_robot_ahead() {
    let mut controller = setup(empty_board(), &[(0, 0), (0, 1)]);
    program(&mut controller, 0, &[Command::Forward]);
    run_round(&mut controller);
    assert_eq!(position(&controller, 0), Position::new(0, 1));
    assert_eq!(position(&controller, 1), Position::new(0, 2));
}

#[test]
fn test_move_off_edge_wraps() {
    let mut controller = setup(empty_board(), &[(2, 7)]);
    program(&mut controller, 0, &[Command::Forward]);
    run_round(&mut controller);
    assert_eq!(position(&controller, 0), Position::new(2, 0));
}

#[test]
fn test_conveyor_carries_robot_after_its_move() {
    let mut board = empty_board();
    board
        .add_element(Position::new(0, 1), BoardElement::conveyor(Heading::East, 2))
        .unwrap();
    let mut controller = setup(board, &[(0, 0)]);
    program(&mut controller, 0, &[Command::Forward]);
    run_round(&mut controller);
    assert_eq!(position(&controller, 0), Position::new(2, 1));
}

#[test]
fn test_board_laser_hits_robot_every_register() {
    let mut board = empty_board();
    board
        .add_element(Position::new(3, 0), BoardElement::laser(Heading::South))
        .unwrap();
    let mut controller = setup(board, &[(3, 2)]);
    program(&mut controller, 0, &[]);
    run_round(&mut controller);
    assert_eq!(controller.game().player(0).unwrap().damage, 5);
}

#[test]
fn test_wall_shields_robot_from_laser() {
    let mut board = empty_board();
    board
        .add_element(Position::new(3, 0), BoardElement::laser(Heading::South))
        .unwrap();
    board
        .add_element(Position::new(3, 1), BoardElement::wall(Heading::South))
        .unwrap();
    let mut controller = setup(board, &[(3, 2)]);
    program(&mut controller, 0, &[]);
    run_round(&mut controller);
    assert_eq!(controller.game().player(0).unwrap().damage, 0);
}

#[test]
fn test_checkpoints_must_be_taken_in_order() {
    let mut board = empty_board();
    board.add_element(Position::new(0, 1), BoardElement::checkpoint(2)).unwrap();
    board.add_element(Position::new(0, 3), BoardElement::checkpoint(1)).unwrap();
    let mut controller = setup(board, &[(0, 0)]);

    // passes checkpoint 2 first, then reaches 1
    program(&mut controller, 0, &[Command::Forward, Command::FastForward]);
    assert!(matches!(run_round(&mut controller), Progress::Programming { round: 2 }));
    assert_eq!(controller.game().player(0).unwrap().checkpoint(), 1);

    // back north onto 2
    program(
        &mut controller,
        0,
        &[Command::Right, Command::Right, Command::FastForward],
    );
    assert_eq!(run_round(&mut controller), Progress::Won { player: 0 });
    assert_eq!(controller.game().player(0).unwrap().checkpoint(), 2);
}

#[test]
fn test_activation_follows_priority_distance() {
    let board = Board::new("antenna", 8, 8, Position::new(4, 4)).unwrap();
    // distances 8, 1, 2
    let mut controller = setup(board, &[(0, 0), (4, 5), (5, 5)]);
    controller.finish_programming_phase().unwrap();

    let queue: Vec<PlayerId> = controller.game().activation_queue().collect();
    assert_eq!(queue, vec![1, 2, 0]);
    assert_eq!(controller.game().current_player(), Some(1));
}

#[test]
fn test_step_mode_visits_every_player_register() {
    let mut controller = setup(empty_board(), &[(0, 0), (4, 4), (7, 2)]);
    controller.finish_programming_phase().unwrap();

    let mut steps = 0;
    loop {
        steps += 1;
        match controller.execute_step().unwrap() {
            Progress::Activating => assert!(check_invariants(controller.game()).is_empty()),
            Progress::Programming { round } => {
                assert_eq!(round, 2);
                break;
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(steps, 3 * 5);
    assert_eq!(controller.game().phase(), Phase::Programming);
}

#[test]
fn test_interaction_resumes_in_step_mode() {
    let mut controller = setup(empty_board(), &[(0, 0), (5, 5)]);
    program(&mut controller, 0, &[Command::OptionLeftRight]);
    program(&mut controller, 1, &[Command::Forward]);
    controller.finish_programming_phase().unwrap();

    assert_eq!(
        controller.execute_step().unwrap(),
        Progress::AwaitingChoice { player: 0 }
    );
    assert_eq!(
        controller.execute_command_option_and_continue(Command::Right).unwrap(),
        Progress::Activating
    );
    assert_eq!(controller.game().player(0).unwrap().heading, Heading::West);
    // step mode halts before the next player moves
    assert_eq!(controller.game().current_player(), Some(1));
    assert_eq!(position(&controller, 1), Position::new(5, 5));
}

#[test]
fn test_many_rounds_keep_invariants() {
    for seed in 0..20 {
        let config = EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        };
        let mut controller =
            GameController::new_game(Board::starter().unwrap(), config, 6).unwrap();
        for _ in 0..10 {
            for player in 0..6 {
                for register in 0..5 {
                    controller
                        .move_card(
                            rally::CardSlot::hand(player, register + 3),
                            rally::CardSlot::program(player, register),
                        )
                        .unwrap();
                }
            }
            controller.finish_programming_phase().unwrap();
            let mut progress = controller.execute_programs().unwrap();
            while let Progress::AwaitingChoice { .. } = progress {
                progress = controller
                    .execute_command_option_and_continue(Command::Left)
                    .unwrap();
            }
            let violations = check_invariants(controller.game());
            assert!(violations.is_empty(), "seed {seed}: {violations:?}");
            if matches!(progress, Progress::Won { .. }) {
                break;
            }
        }
    }
}

#[test]
fn test_simulation_reaches_a_winner_on_small_board() {
    let mut board = Board::new("tiny", 3, 3, Position::new(0, 0)).unwrap();
    board.add_element(Position::new(1, 2), BoardElement::checkpoint(1)).unwrap();
    let result = run_simulation(config(), board, 2, 200).unwrap();
    assert!(result.winner.is_some());
    assert!(result.rounds_played <= 200);
}
