//! Board elements: the static and activatable features of a cell.

use serde::{Deserialize, Serialize};

use crate::model::{Heading, HeadingSet};

/// Default priority of conveyor belts and other moving hazards.
pub const CONVEYOR_PRIORITY: i32 = 1;
/// Default priority of board lasers.
pub const LASER_PRIORITY: i32 = 4;
/// Default priority of energy spaces.
pub const ENERGY_PRIORITY: i32 = 5;
/// Default priority of checkpoints.
pub const CHECKPOINT_PRIORITY: i32 = 6;

const fn default_conveyor_priority() -> i32 {
    CONVEYOR_PRIORITY
}

const fn default_laser_priority() -> i32 {
    LASER_PRIORITY
}

const fn default_energy_priority() -> i32 {
    ENERGY_PRIORITY
}

const fn default_checkpoint_priority() -> i32 {
    CHECKPOINT_PRIORITY
}

const fn default_damage() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

/// A laser beam source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laser {
    /// Direction the beam travels.
    pub heading: Heading,
    /// Firing order among lasers; lower fires first.
    #[serde(default = "default_laser_priority")]
    pub priority: i32,
    /// Damage dealt to the robot hit.
    #[serde(default = "default_damage")]
    pub damage: u32,
}

impl Laser {
    /// A laser with default priority and a damage of one.
    #[must_use]
    pub const fn new(heading: Heading) -> Self {
        Self {
            heading,
            priority: LASER_PRIORITY,
            damage: 1,
        }
    }
}

/// A feature occupying a board cell.
///
/// Walls are purely static. Every other variant is activatable and carries a
/// priority; on a cell, lower priorities fire first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardElement {
    /// Wall segments on one or more sides of the cell.
    Wall {
        /// Sides of the cell covered by the wall.
        sides: HeadingSet,
    },
    /// A checkpoint that must be reached in sequence.
    Checkpoint {
        /// Sequence number, starting at 1.
        number: u32,
        /// Activation priority.
        #[serde(default = "default_checkpoint_priority")]
        priority: i32,
    },
    /// A space that hands out energy cubes.
    EnergySpace {
        /// Whether a cube is currently lying on the space.
        #[serde(default = "default_true")]
        has_cube: bool,
        /// Activation priority.
        #[serde(default = "default_energy_priority")]
        priority: i32,
    },
    /// Conveyor belt, gear or push panel: moves and/or rotates the robot.
    MoveHazard {
        /// Direction the robot is moved in.
        heading: Heading,
        /// Signed quarter turns applied to the robot; positive is clockwise.
        #[serde(default)]
        rotation: i32,
        /// Number of cells the robot is moved.
        #[serde(default)]
        distance: u32,
        /// Activation priority.
        #[serde(default = "default_conveyor_priority")]
        priority: i32,
    },
    /// A wall-mounted laser emitter.
    BoardLaser {
        /// The emitted beam.
        laser: Laser,
    },
}

impl BoardElement {
    /// A wall on a single side.
    #[must_use]
    pub const fn wall(side: Heading) -> Self {
        BoardElement::Wall {
            sides: HeadingSet::only(side),
        }
    }

    /// Checkpoint number `number` at default priority.
    #[must_use]
    pub const fn checkpoint(number: u32) -> Self {
        BoardElement::Checkpoint {
            number,
            priority: CHECKPOINT_PRIORITY,
        }
    }

    /// An energy space holding a cube.
    #[must_use]
    pub const fn energy_space() -> Self {
        BoardElement::EnergySpace {
            has_cube: true,
            priority: ENERGY_PRIORITY,
        }
    }

    /// A conveyor belt moving `distance` cells towards `heading`.
    #[must_use]
    pub const fn conveyor(heading: Heading, distance: u32) -> Self {
        BoardElement::MoveHazard {
            heading,
            rotation: 0,
            distance,
            priority: CONVEYOR_PRIORITY,
        }
    }

    /// A gear rotating the robot in place.
    #[must_use]
    pub const fn gear(rotation: i32) -> Self {
        BoardElement::MoveHazard {
            heading: Heading::South,
            rotation,
            distance: 0,
            priority: CONVEYOR_PRIORITY,
        }
    }

    /// A laser emitter firing towards `heading`.
    #[must_use]
    pub const fn laser(heading: Heading) -> Self {
        BoardElement::BoardLaser {
            laser: Laser::new(heading),
        }
    }

    /// Whether the element stops robots entering through `side` of its cell.
    #[must_use]
    pub const fn blocks_entry_from(&self, side: Heading) -> bool {
        match self {
            BoardElement::Wall { sides } => sides.contains(side),
            _ => false,
        }
    }

    /// Whether the element stops robots leaving its cell towards `heading`.
    #[must_use]
    pub const fn blocks_exit_to(&self, heading: Heading) -> bool {
        match self {
            BoardElement::Wall { sides } => sides.contains(heading),
            _ => false,
        }
    }

    /// Whether the element stops line of sight through `side` of its cell.
    #[must_use]
    pub const fn is_opaque_from(&self, side: Heading) -> bool {
        match self {
            BoardElement::Wall { sides } => sides.contains(side),
            _ => false,
        }
    }

    /// The facing of the element, if it has one.
    #[must_use]
    pub fn heading(&self) -> Option<Heading> {
        match self {
            BoardElement::Wall { sides } => sides.iter().next(),
            BoardElement::MoveHazard { heading, .. } => Some(*heading),
            BoardElement::BoardLaser { laser } => Some(laser.heading),
            BoardElement::Checkpoint { .. } | BoardElement::EnergySpace { .. } => None,
        }
    }

    /// Activation priority; `None` for static elements.
    #[must_use]
    pub const fn priority(&self) -> Option<i32> {
        match self {
            BoardElement::Wall { .. } => None,
            BoardElement::Checkpoint { priority, .. }
            | BoardElement::EnergySpace { priority, .. }
            | BoardElement::MoveHazard { priority, .. } => Some(*priority),
            BoardElement::BoardLaser { laser } => Some(laser.priority),
        }
    }

    /// Whether the element fires during activation.
    #[must_use]
    pub const fn is_activatable(&self) -> bool {
        self.priority().is_some()
    }
}
