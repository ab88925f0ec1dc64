// Chunk: docs/chunks/viewport_mapping - Visible window over the line buffer
//!
//! The visible window over a document.
//!
//! A viewport is four numbers: the first visible row, how many rows fit, and
//! the horizontal window `[left_column, right_column)`. Horizontal bounds
//! count logical characters scrolled off the left edge, so the screen width
//! is `right_column - left_column` cells.
//!
//! The highlight cache compares whole viewports: any change to any field
//! forces a remap, never a reparse.

use std::ops::Range;

/// A viewport over rows of the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// First visible row (0-indexed)
    pub top_row: usize,
    /// Number of visible rows
    pub height: usize,
    /// Logical characters scrolled off the left edge
    pub left_column: usize,
    /// Exclusive right edge, in the same space as `left_column`
    pub right_column: usize,
}

impl Viewport {
    pub fn new(top_row: usize, height: usize, left_column: usize, right_column: usize) -> Self {
        Self {
            top_row,
            height,
            left_column,
            right_column,
        }
    }

    /// A viewport of `width` x `height` cells at the top-left of the document.
    pub fn sized(width: usize, height: usize) -> Self {
        Self::new(0, height, 0, width)
    }

    /// Screen width in cells.
    pub fn width(&self) -> usize {
        self.right_column.saturating_sub(self.left_column)
    }

    /// Rows of a document with `row_count` rows that are on screen.
    pub fn visible_rows(&self, row_count: usize) -> Range<usize> {
        let start = self.top_row.min(row_count);
        let end = self.top_row.saturating_add(self.height).min(row_count);
        start..end
    }

    /// Returns a copy scrolled so `top_row` is the first visible row.
    pub fn scrolled_to(&self, top_row: usize) -> Self {
        Self { top_row, ..*self }
    }

    /// Returns a copy scrolled horizontally so `left_column` is the first
    /// visible character, keeping the width.
    pub fn panned_to(&self, left_column: usize) -> Self {
        Self {
            left_column,
            right_column: left_column + self.width(),
            ..*self
        }
    }
}
