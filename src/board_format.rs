//! Board definition documents.
//!
//! Boards are stored as JSON:
//!
//! ```json
//! {
//!   "name": "starter",
//!   "width": 10,
//!   "height": 10,
//!   "priority": { "x": 0, "y": 0 },
//!   "spaces": [
//!     { "x": 2, "y": 3, "elements": [{ "kind": "wall", "sides": ["SOUTH"] }] }
//!   ]
//! }
//! ```
//!
//! Only spaces that carry elements are listed.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::model::{Board, BoardElement, Position};

/// The board shipped with the crate.
pub const STARTER_BOARD: &str = include_str!("../assets/boards/starter.json");

/// Serializable description of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    /// Board name.
    pub name: String,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
    /// Priority antenna cell.
    pub priority: Position,
    /// Spaces carrying at least one element.
    #[serde(default)]
    pub spaces: Vec<SpaceDefinition>,
}

/// Elements of a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDefinition {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Elements in insertion order.
    pub elements: Vec<BoardElement>,
}

impl BoardDefinition {
    /// Parse a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid definition.
    pub fn from_json(text: &str) -> Result<Self, BoardError> {
        serde_json::from_str(text).map_err(|e| BoardError::Malformed(e.to_string()))
    }

    /// Render the definition as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, BoardError> {
        serde_json::to_string_pretty(self).map_err(|e| BoardError::Malformed(e.to_string()))
    }
}

impl Board {
    /// Build and validate a board from its definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero, a space or the priority
    /// cell is off the board, a space is listed twice, or checkpoints are not
    /// numbered `1..=N`.
    pub fn from_definition(definition: &BoardDefinition) -> Result<Self, BoardError> {
        let mut board = Board::new(
            definition.name.clone(),
            definition.width,
            definition.height,
            definition.priority,
        )?;

        let mut seen = HashSet::new();
        let mut checkpoints = Vec::new();
        for space in &definition.spaces {
            let position = Position::new(space.x, space.y);
            if !seen.insert(position) {
                return Err(BoardError::DuplicateSpace { position });
            }
            for element in &space.elements {
                if let BoardElement::Checkpoint { number, .. } = element {
                    checkpoints.push(*number);
                }
                board.add_element(position, element.clone())?;
            }
        }

        checkpoints.sort_unstable();
        let sequential = checkpoints
            .iter()
            .zip(1u32..)
            .all(|(&number, expected)| number == expected);
        if !sequential {
            return Err(BoardError::CheckpointSequence { found: checkpoints });
        }
        Ok(board)
    }

    /// Describe the board; spaces without elements are left out.
    #[must_use]
    pub fn to_definition(&self) -> BoardDefinition {
        let spaces = self
            .spaces()
            .iter()
            .filter(|space| !space.is_plain())
            .map(|space| SpaceDefinition {
                x: space.position().x,
                y: space.position().y,
                elements: space.elements().to_vec(),
            })
            .collect();
        BoardDefinition {
            name: self.name().to_string(),
            width: self.width(),
            height: self.height(),
            priority: self.priority_position(),
            spaces,
        }
    }

    /// Parse and validate a board from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or the board is invalid.
    pub fn from_json(text: &str) -> Result<Self, BoardError> {
        Self::from_definition(&BoardDefinition::from_json(text)?)
    }

    /// Load a board from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds an invalid board.
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BoardError::Malformed(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Write the board to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), BoardError> {
        let text = self.to_definition().to_json()?;
        std::fs::write(path, text)
            .map_err(|e| BoardError::Malformed(format!("{}: {e}", path.display())))
    }

    /// The board shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled definition is broken.
    pub fn starter() -> Result<Self, BoardError> {
        Self::from_json(STARTER_BOARD)
    }
}
