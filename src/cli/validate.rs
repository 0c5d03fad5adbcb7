//! Board validation command implementation.

use super::CliError;
use rally::board_format::BoardDefinition;
use rally::{Board, BoardElement};
use std::fs;
use std::path::Path;

/// Execute the validate-board command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or describes an invalid board.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;

    println!("Validating: {}", path.display());
    println!();

    let definition = BoardDefinition::from_json(&text);
    print_check("JSON board definition", definition.is_ok());
    let definition = definition?;

    let board = Board::from_definition(&definition);
    print_check("Dimensions, bounds and checkpoint order", board.is_ok());
    let board = board?;

    let mut walls = 0;
    let mut hazards = 0;
    let mut energy = 0;
    for element in board.spaces().iter().flat_map(|space| space.elements()) {
        match element {
            BoardElement::Wall { .. } => walls += 1,
            BoardElement::MoveHazard { .. } => hazards += 1,
            BoardElement::EnergySpace { .. } => energy += 1,
            BoardElement::Checkpoint { .. } | BoardElement::BoardLaser { .. } => {}
        }
    }

    println!();
    println!("Summary:");
    println!("  Name:         {}", board.name());
    println!("  Size:         {}x{}", board.width(), board.height());
    println!("  Priority:     {}", board.priority_position());
    println!("  Checkpoints:  {}", board.checkpoint_count());
    println!("  Lasers:       {}", board.lasers().len());
    println!("  Walls:        {walls}");
    println!("  Hazards:      {hazards}");
    println!("  Energy:       {energy}");

    if board.checkpoint_count() == 0 {
        println!();
        println!("Warning: board has no checkpoints, games cannot be won");
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    println!("  {name:.<40} {status}");
}
