// Chunk: docs/chunks/line_index - Byte offset to line/column conversion

//! Line index for converting byte offsets into source positions.
//!
//! Parsers that work over `&str` report byte offsets. Tokens are expressed in
//! 1-based (line, character column) coordinates, so every provider routes its
//! offsets through a [`LineIndex`] built once per tokenize call.

use crate::types::TextPos;

/// Tracks line boundaries of a borrowed text.
///
/// The index holds the byte offset where each line starts. This enables O(1)
/// line count and O(log n) lookup of which line contains a given offset.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offsets where each line starts. line_starts[0] = 0 always.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Builds the index in one pass over `text`.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the number of lines. Always at least one.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the byte offset where the given 0-based line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Returns the content of a 0-based line without its line terminator.
    ///
    /// A carriage return immediately before the line feed is not content.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.text.len(),
        };
        let raw = &self.text[start..end];
        Some(raw.strip_suffix('\r').unwrap_or(raw))
    }

    /// Returns the 0-based line number containing the given byte offset.
    ///
    /// Uses binary search for O(log n) lookup.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Converts a byte offset into a 1-based source position.
    ///
    /// Offsets past the end clamp to the end of the text. Offsets inside a
    /// multi-byte character snap back to that character.
    pub fn position(&self, offset: usize) -> TextPos {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_at_offset(offset);
        let start = self.line_starts[line];
        let column = self.text[start..offset].chars().count() + 1;
        TextPos::new(line + 1, column)
    }

    /// Converts a 1-based source position back into a byte offset.
    ///
    /// Columns past the end of the line clamp to the end of the line.
    pub fn offset(&self, pos: TextPos) -> usize {
        let line = pos.line.saturating_sub(1).min(self.line_count() - 1);
        let start = self.line_starts[line];
        let content = self.line_text(line).unwrap_or("");
        let skip = pos.column.saturating_sub(1);
        let within = content
            .char_indices()
            .nth(skip)
            .map(|(i, _)| i)
            .unwrap_or(content.len());
        start + within
    }

    /// Returns the position one past the last character of the text.
    pub fn end_position(&self) -> TextPos {
        self.position(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("hello");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_text(0), Some("hello"));
        assert_eq!(index.position(0), TextPos::new(1, 1));
        assert_eq!(index.position(5), TextPos::new(1, 6));
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_text(0), Some(""));
        assert_eq!(index.end_position(), TextPos::new(1, 1));
    }

    #[test]
    fn test_multiple_lines() {
        let index = LineIndex::new("ab\ncd\nef");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(3), TextPos::new(2, 1));
        assert_eq!(index.position(7), TextPos::new(3, 2));
        assert_eq!(index.line_text(2), Some("ef"));
    }

    #[test]
    fn test_crlf_is_not_line_content() {
        let index = LineIndex::new("ab\r\ncd");
        assert_eq!(index.line_text(0), Some("ab"));
        assert_eq!(index.line_text(1), Some("cd"));
        assert_eq!(index.position(4), TextPos::new(2, 1));
    }

    #[test]
    fn test_multibyte_columns_count_chars() {
        let index = LineIndex::new("é=1");
        // 'é' is two bytes
        assert_eq!(index.position(2), TextPos::new(1, 2));
        // Offset inside 'é' snaps back
        assert_eq!(index.position(1), TextPos::new(1, 1));
    }

    #[test]
    fn test_offset_round_trips_position() {
        let text = "x\nyé z";
        let index = LineIndex::new(text);
        for offset in [0, 2, 3, 5, 6, text.len()] {
            assert_eq!(index.offset(index.position(offset)), offset);
        }
    }

    #[test]
    fn test_offset_clamps_past_line_end() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(TextPos::new(1, 50)), 2);
        assert_eq!(index.offset(TextPos::new(9, 1)), 3);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_text(1), Some(""));
        assert_eq!(index.end_position(), TextPos::new(2, 1));
    }
}
