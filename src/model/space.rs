//! A single board cell.

use crate::model::{BoardElement, Heading, PlayerId, Position};

/// One cell of the board: its elements and at most one occupying robot.
#[derive(Debug, Clone)]
pub struct Space {
    position: Position,
    /// Elements in insertion order.
    elements: Vec<BoardElement>,
    /// Indices into `elements` of the activatable ones, in firing order.
    activation_order: Vec<usize>,
    /// Occupying player, written only by `Game::place_player`.
    player: Option<PlayerId>,
}

impl Space {
    /// Create an empty space.
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            elements: Vec::new(),
            activation_order: Vec::new(),
            player: None,
        }
    }

    /// Position of this space on the board.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[BoardElement] {
        &self.elements
    }

    /// Mutable access to one element; used for cube pickup.
    pub(crate) fn element_mut(&mut self, index: usize) -> Option<&mut BoardElement> {
        self.elements.get_mut(index)
    }

    /// Add an element at the end of the insertion order.
    pub fn add_element(&mut self, element: BoardElement) {
        self.elements.push(element);
        self.sort_activation_order();
    }

    /// Remove and return the element at `index` (insertion order).
    pub fn remove_element(&mut self, index: usize) -> Option<BoardElement> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        self.sort_activation_order();
        Some(removed)
    }

    /// Rebuild the firing order: priority ascending, insertion order on ties.
    fn sort_activation_order(&mut self) {
        let elements = &self.elements;
        let mut order: Vec<usize> = (0..elements.len())
            .filter(|&i| elements[i].is_activatable())
            .collect();
        // Stable sort keeps insertion order for equal priorities.
        order.sort_by_key(|&i| elements[i].priority());
        self.activation_order = order;
    }

    /// Indices of the activatable elements, in firing order.
    #[must_use]
    pub fn activation_order(&self) -> &[usize] {
        &self.activation_order
    }

    /// Activatable elements, in firing order.
    pub fn activatable_elements(&self) -> impl Iterator<Item = (usize, &BoardElement)> {
        self.activation_order
            .iter()
            .map(|&i| (i, &self.elements[i]))
    }

    /// The occupying player, if any.
    #[must_use]
    pub const fn player(&self) -> Option<PlayerId> {
        self.player
    }

    pub(crate) fn set_player(&mut self, player: Option<PlayerId>) {
        self.player = player;
    }

    /// Whether any element stops robots entering through `side`.
    #[must_use]
    pub fn blocks_entry_from(&self, side: Heading) -> bool {
        self.elements.iter().any(|e| e.blocks_entry_from(side))
    }

    /// Whether any element stops robots leaving towards `heading`.
    #[must_use]
    pub fn blocks_exit_to(&self, heading: Heading) -> bool {
        self.elements.iter().any(|e| e.blocks_exit_to(heading))
    }

    /// Whether any element stops line of sight through `side`.
    #[must_use]
    pub fn is_opaque_from(&self, side: Heading) -> bool {
        self.elements.iter().any(|e| e.is_opaque_from(side))
    }

    /// Whether the space carries no elements.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.elements.is_empty()
    }
}
