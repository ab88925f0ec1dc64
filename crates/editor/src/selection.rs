// Chunk: docs/chunks/selection_overlay - Selection range for cell styling

//! Text selection as an anchor and a cursor.
//!
//! The anchor is where the selection started; the cursor is where it ends
//! now, and may sit before the anchor. Membership is half-open over the
//! normalised range: the character under the later end is not selected.

use psedit_buffer::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub cursor: Position,
}

impl Selection {
    pub fn new(anchor: Position, cursor: Position) -> Self {
        Self { anchor, cursor }
    }

    /// Returns `(start, end)` with `start <= end`.
    pub fn range(&self) -> (Position, Position) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.cursor
    }

    pub fn contains(&self, pos: Position) -> bool {
        let (start, end) = self.range();
        start <= pos && pos < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_normalised() {
        let sel = Selection::new(Position::new(2, 5), Position::new(1, 0));
        assert_eq!(sel.range(), (Position::new(1, 0), Position::new(2, 5)));
    }

    #[test]
    fn test_contains_is_half_open() {
        let sel = Selection::new(Position::new(0, 2), Position::new(0, 4));
        assert!(!sel.contains(Position::new(0, 1)));
        assert!(sel.contains(Position::new(0, 2)));
        assert!(sel.contains(Position::new(0, 3)));
        assert!(!sel.contains(Position::new(0, 4)));
    }

    #[test]
    fn test_multiline_selection() {
        let sel = Selection::new(Position::new(3, 1), Position::new(1, 6));
        assert!(sel.contains(Position::new(1, 6)));
        assert!(sel.contains(Position::new(2, 0)));
        assert!(sel.contains(Position::new(2, 500)));
        assert!(!sel.contains(Position::new(3, 1)));
    }

    #[test]
    fn test_empty_selection_contains_nothing() {
        let sel = Selection::new(Position::new(1, 1), Position::new(1, 1));
        assert!(sel.is_empty());
        assert!(!sel.contains(Position::new(1, 1)));
    }
}
