// Chunk: docs/chunks/line_buffer - Logical and source positions

/// Position in the document as (line, column) where both are 0-indexed.
///
/// `col` counts logical characters, not display cells. Selections and the
/// per-cell diagnostic map use this space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Compare by line first, then by column
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.col.cmp(&other.col),
            ord => ord,
        }
    }
}

/// A 1-based (line, column) location in source text.
///
/// This is the coordinate space parsers report in and the one `Token` and
/// `DiagnosticSpan` bounds are expressed in. Columns count logical
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPos {
    pub line: usize,
    pub column: usize,
}

impl TextPos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Converts to a 0-indexed [`Position`].
    pub fn to_position(self) -> Position {
        Position::new(self.line.saturating_sub(1), self.column.saturating_sub(1))
    }
}

impl Default for TextPos {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}
