// Chunk: docs/chunks/line_buffer - Rows of display units for the highlighting engine

//! Line buffer: document text split into rows of display units.
//!
//! # Overview
//!
//! [`LineBuffer::split`] is a pure function of the text. Each [`Row`] holds
//! one [`DisplayUnit`] per `char`, carrying the number of terminal cells the
//! character occupies. Tabs are kept as an expandable marker because their
//! width depends on the editor's tab setting.
//!
//! Zero-width and control characters are given a width of one cell so that
//! logical character columns and painted cells stay in one-to-one
//! correspondence (except for tabs and wide glyphs).
//!
//! ## Invariants
//!
//! - A line buffer always has at least one row, even for empty text.
//! - A carriage return immediately before a line feed is not row content.
//! - Asking for a row past the end yields the last row.

use unicode_width::UnicodeWidthChar;

// =============================================================================
// Display Units
// =============================================================================

/// How many cells a unit occupies before tab expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitWidth {
    /// One terminal cell.
    Narrow,
    /// Two terminal cells (CJK, most emoji).
    Wide,
    /// A tab; expands to the configured tab width.
    Tab,
}

/// A single character together with its display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayUnit {
    pub ch: char,
    pub width: UnitWidth,
}

impl DisplayUnit {
    pub fn new(ch: char) -> Self {
        let width = if ch == '\t' {
            UnitWidth::Tab
        } else if ch.width().unwrap_or(1) >= 2 {
            UnitWidth::Wide
        } else {
            UnitWidth::Narrow
        };
        Self { ch, width }
    }

    /// Returns the number of display columns this unit occupies.
    pub fn columns(&self, tab_width: usize) -> usize {
        match self.width {
            UnitWidth::Narrow => 1,
            UnitWidth::Wide => 2,
            UnitWidth::Tab => tab_width.max(1),
        }
    }

    pub fn is_tab(&self) -> bool {
        self.width == UnitWidth::Tab
    }
}

// =============================================================================
// Rows
// =============================================================================

/// One logical line of the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    units: Vec<DisplayUnit>,
}

impl Row {
    pub fn new(line: &str) -> Self {
        Self {
            units: line.chars().map(DisplayUnit::new).collect(),
        }
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    /// Number of logical characters in the row.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns the row's text.
    pub fn text(&self) -> String {
        self.units.iter().map(|u| u.ch).collect()
    }

    /// Total display columns of the row with tabs expanded.
    pub fn display_width(&self, tab_width: usize) -> usize {
        self.units.iter().map(|u| u.columns(tab_width)).sum()
    }
}

/// The document split into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    rows: Vec<Row>,
}

impl LineBuffer {
    /// Splits text into rows on line feeds.
    ///
    /// # Example
    ///
    /// ```
    /// use psedit_buffer::LineBuffer;
    ///
    /// let buffer = LineBuffer::split("a\r\nbc");
    /// assert_eq!(buffer.row_count(), 2);
    /// assert_eq!(buffer.row(1).text(), "bc");
    /// assert_eq!(LineBuffer::split("").row_count(), 1);
    /// ```
    pub fn split(text: &str) -> Self {
        let rows = text
            .split('\n')
            .map(|line| Row::new(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        // str::split always yields at least one item, so rows is never empty
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row at `index`, or the last row when `index` is at or
    /// past the row count.
    pub fn row(&self, index: usize) -> &Row {
        let last = self.rows.len() - 1;
        &self.rows[index.min(last)]
    }

    /// Returns the row at `index` if it exists.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::split("")
    }
}
