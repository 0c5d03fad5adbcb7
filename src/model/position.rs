//! Grid coordinates.

use serde::{Deserialize, Serialize};

use crate::model::Heading;

/// A cell coordinate on the board.
///
/// `x` grows towards `East`, `y` grows towards `South`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// The adjacent position one step in `heading`, wrapped around a
    /// `width` x `height` torus.
    ///
    /// Callers guarantee both dimensions are non-zero.
    #[must_use]
    // rem_euclid by a u16 modulus always lands in 0..u16::MAX
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn wrapped_step(self, heading: Heading, width: u16, height: u16) -> Self {
        let (dx, dy) = heading.delta();
        let x = (i32::from(self.x) + dx).rem_euclid(i32::from(width));
        let y = (i32::from(self.y) + dy).rem_euclid(i32::from(height));
        Self::new(x as u16, y as u16)
    }

    /// The adjacent position one step in `heading`, or `None` past the edge
    /// of a `width` x `height` board.
    #[must_use]
    pub fn checked_step(self, heading: Heading, width: u16, height: u16) -> Option<Self> {
        let (dx, dy) = heading.delta();
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        (x < width && y < height).then_some(Self::new(x, y))
    }

    /// Manhattan distance, without wrap-around.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_step_interior() {
        let pos = Position::new(3, 3);
        assert_eq!(pos.wrapped_step(Heading::South, 8, 8), Position::new(3, 4));
        assert_eq!(pos.wrapped_step(Heading::North, 8, 8), Position::new(3, 2));
        assert_eq!(pos.wrapped_step(Heading::East, 8, 8), Position::new(4, 3));
        assert_eq!(pos.wrapped_step(Heading::West, 8, 8), Position::new(2, 3));
    }

    #[test]
    fn test_wrapped_step_edges() {
        assert_eq!(Position::new(0, 7).wrapped_step(Heading::South, 8, 8), Position::new(0, 0));
        assert_eq!(Position::new(0, 0).wrapped_step(Heading::North, 8, 8), Position::new(0, 7));
        assert_eq!(Position::new(0, 2).wrapped_step(Heading::West, 8, 8), Position::new(7, 2));
        assert_eq!(Position::new(7, 2).wrapped_step(Heading::East, 8, 8), Position::new(0, 2));
    }

    #[test]
    fn test_checked_step_stops_at_edge() {
        assert_eq!(Position::new(0, 0).checked_step(Heading::North, 8, 8), None);
        assert_eq!(Position::new(7, 0).checked_step(Heading::East, 8, 8), None);
        assert_eq!(Position::new(0, 0).checked_step(Heading::South, 8, 8), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(3, 4)), 7);
        assert_eq!(Position::new(5, 1).manhattan(Position::new(2, 1)), 3);
    }
}
