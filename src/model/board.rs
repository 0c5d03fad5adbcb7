//! Board geometry: a torus of spaces with a fixed priority reference cell.

use crate::error::BoardError;
use crate::model::{BoardElement, Heading, Laser, Position, Space};

/// The game board.
#[derive(Debug, Clone)]
pub struct Board {
    /// Name used to match persisted games with their board.
    name: String,
    /// Width of the board in cells.
    width: u16,
    /// Height of the board in cells.
    height: u16,
    /// Spaces stored in row-major order.
    spaces: Vec<Space>,
    /// The priority antenna cell.
    priority: Position,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or the priority position is
    /// off the board.
    pub fn new(
        name: impl Into<String>,
        width: u16,
        height: u16,
        priority: Position,
    ) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        if priority.x >= width || priority.y >= height {
            return Err(BoardError::OutOfBounds { position: priority });
        }

        let spaces = (0..height)
            .flat_map(|y| (0..width).map(move |x| Space::new(Position::new(x, y))))
            .collect();

        Ok(Self {
            name: name.into(),
            width,
            height,
            spaces,
            priority,
        })
    }

    /// Board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the board.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the board.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The priority antenna position.
    #[must_use]
    pub const fn priority_position(&self) -> Position {
        self.priority
    }

    /// Check if a position is within the board bounds.
    #[must_use]
    pub const fn in_bounds(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.in_bounds(position) {
            Some(usize::from(position.y) * usize::from(self.width) + usize::from(position.x))
        } else {
            None
        }
    }

    /// The space at `position`.
    #[must_use]
    pub fn space(&self, position: Position) -> Option<&Space> {
        self.index(position).map(|idx| &self.spaces[idx])
    }

    /// Mutable access to the space at `position`.
    #[must_use]
    pub fn space_mut(&mut self, position: Position) -> Option<&mut Space> {
        self.index(position).map(|idx| &mut self.spaces[idx])
    }

    /// Add an element to the space at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is off the board.
    pub fn add_element(&mut self, position: Position, element: BoardElement) -> Result<(), BoardError> {
        let space = self
            .space_mut(position)
            .ok_or(BoardError::OutOfBounds { position })?;
        space.add_element(element);
        Ok(())
    }

    /// All spaces in row-major order.
    #[must_use]
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// The wrapped neighbor of `position` towards `heading`, if a robot may
    /// cross between them.
    ///
    /// The crossing is refused when the source blocks exit towards `heading`
    /// or the destination blocks entry through its `heading.opposite()` side.
    #[must_use]
    pub fn neighbor(&self, position: Position, heading: Heading) -> Option<Position> {
        let from = self.space(position)?;
        if from.blocks_exit_to(heading) {
            return None;
        }
        let target = position.wrapped_step(heading, self.width, self.height);
        let to = self.space(target)?;
        if to.blocks_entry_from(heading.opposite()) {
            return None;
        }
        Some(target)
    }

    /// The next cell a beam reaches from `position` towards `heading`.
    ///
    /// Unlike [`Board::neighbor`] this consults opacity instead of
    /// passability, and beams leave the board at its edge instead of wrapping.
    #[must_use]
    pub fn sight_neighbor(&self, position: Position, heading: Heading) -> Option<Position> {
        let from = self.space(position)?;
        if from.is_opaque_from(heading) {
            return None;
        }
        let target = position.checked_step(heading, self.width, self.height)?;
        let to = self.space(target)?;
        if to.is_opaque_from(heading.opposite()) {
            return None;
        }
        Some(target)
    }

    /// Manhattan distance between two positions, ignoring walls and wrap.
    #[must_use]
    pub fn rectilinear_distance(a: Position, b: Position) -> u32 {
        a.manhattan(b)
    }

    /// Distance from `position` to the priority antenna.
    #[must_use]
    pub fn priority_distance(&self, position: Position) -> u32 {
        Self::rectilinear_distance(position, self.priority)
    }

    /// Number of the final checkpoint, or 0 if the board has none.
    #[must_use]
    pub fn checkpoint_count(&self) -> u32 {
        self.spaces
            .iter()
            .flat_map(Space::elements)
            .filter_map(|element| match element {
                BoardElement::Checkpoint { number, .. } => Some(*number),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Positions holding a laser emitter with the emitter itself, ordered by
    /// laser priority then position.
    #[must_use]
    pub fn lasers(&self) -> Vec<(Position, Laser)> {
        let mut lasers: Vec<_> = self
            .spaces
            .iter()
            .flat_map(|space| {
                space.elements().iter().filter_map(move |element| match element {
                    BoardElement::BoardLaser { laser } => Some((space.position(), *laser)),
                    _ => None,
                })
            })
            .collect();
        lasers.sort_by_key(|(position, laser)| (laser.priority, position.y, position.x));
        lasers
    }
}
