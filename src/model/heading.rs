//! Cardinal headings and small heading sets.

use serde::{Deserialize, Serialize};

/// One of the four cardinal directions.
///
/// The declaration order is the clockwise rotation order: turning right from
/// `South` faces `West`, then `North`, then `East`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Heading {
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
}

impl Heading {
    /// All headings in clockwise order, starting from `South`.
    pub const ALL: [Heading; 4] = [Heading::South, Heading::West, Heading::North, Heading::East];

    const fn index(self) -> usize {
        match self {
            Heading::South => 0,
            Heading::West => 1,
            Heading::North => 2,
            Heading::East => 3,
        }
    }

    /// The clockwise successor (a right turn).
    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// The counter-clockwise predecessor (a left turn).
    #[must_use]
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }

    /// The heading pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self.index() + 2) % 4]
    }

    /// Rotate by a signed number of quarter turns; positive is clockwise.
    #[must_use]
    pub fn rotate(self, quarter_turns: i32) -> Self {
        let turns = quarter_turns.rem_euclid(4);
        (0..turns).fold(self, |heading, _| heading.next())
    }

    /// Grid offset of one step in this heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
            Heading::North => (0, -1),
            Heading::East => (1, 0),
        }
    }

    const fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Heading::South => "SOUTH",
            Heading::West => "WEST",
            Heading::North => "NORTH",
            Heading::East => "EAST",
        };
        f.write_str(name)
    }
}

/// A set of headings, used for the sides of a cell an element covers.
///
/// Serialized as a list of headings so board files stay readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Heading>", into = "Vec<Heading>")]
pub struct HeadingSet(u8);

impl HeadingSet {
    /// The empty set.
    pub const EMPTY: HeadingSet = HeadingSet(0);

    /// Set containing a single heading.
    #[must_use]
    pub const fn only(heading: Heading) -> Self {
        Self(heading.bit())
    }

    /// Return a copy of this set with `heading` added.
    #[must_use]
    pub const fn with(self, heading: Heading) -> Self {
        Self(self.0 | heading.bit())
    }

    /// Add a heading in place.
    pub fn insert(&mut self, heading: Heading) {
        self.0 |= heading.bit();
    }

    /// Whether the set contains `heading`.
    #[must_use]
    pub const fn contains(self, heading: Heading) -> bool {
        self.0 & heading.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterate the members in clockwise order from `South`.
    pub fn iter(self) -> impl Iterator<Item = Heading> {
        Heading::ALL.into_iter().filter(move |h| self.contains(*h))
    }
}

impl FromIterator<Heading> for HeadingSet {
    fn from_iter<I: IntoIterator<Item = Heading>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, HeadingSet::with)
    }
}

impl From<Vec<Heading>> for HeadingSet {
    fn from(headings: Vec<Heading>) -> Self {
        headings.into_iter().collect()
    }
}

impl From<HeadingSet> for Vec<Heading> {
    fn from(set: HeadingSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clockwise_order() {
        assert_eq!(Heading::South.next(), Heading::West);
        assert_eq!(Heading::West.next(), Heading::North);
        assert_eq!(Heading::North.next(), Heading::East);
        assert_eq!(Heading::East.next(), Heading::South);
    }

    #[test]
    fn test_prev_undoes_next() {
        for heading in Heading::ALL {
            assert_eq!(heading.next().prev(), heading);
        }
    }

    #[test]
    fn test_rotate_negative() {
        assert_eq!(Heading::South.rotate(-1), Heading::East);
        assert_eq!(Heading::South.rotate(1), Heading::West);
        assert_eq!(Heading::South.rotate(-6), Heading::North);
        assert_eq!(Heading::North.rotate(4), Heading::North);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Heading::South.opposite(), Heading::North);
        assert_eq!(Heading::East.opposite(), Heading::West);
    }

    #[test]
    fn test_heading_set() {
        let set = HeadingSet::only(Heading::South).with(Heading::East);
        assert!(set.contains(Heading::South));
        assert!(set.contains(Heading::East));
        assert!(!set.contains(Heading::North));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Heading::South, Heading::East]);
        assert!(HeadingSet::EMPTY.is_empty());
    }

    #[test]
    fn test_heading_set_serializes_as_list() {
        let set = HeadingSet::only(Heading::North);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["NORTH"]"#);
        let back: HeadingSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
