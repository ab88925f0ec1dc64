// Chunk: docs/chunks/coordinate_mapper - Token spans to screen cells

//! Coordinate mapper: line-based token spans to a viewport-local color map.
//!
//! # Overview
//!
//! Tokens and diagnostics are expressed in 1-based logical character
//! columns. The screen is measured in display cells, where a wide glyph takes
//! two cells and a tab expands to `tab_width`. The mapper walks each visible
//! row once, keeping the logical column (`token_col`) and the screen cell
//! (`x`) side by side:
//!
//! ```text
//! row:        a  \t          b  界
//! token_col:  1  2           3  4
//! x:          0  1  2  3  4  5  6  7
//! ```
//!
//! Every cell a unit occupies gets the same [`MappedCell`], so a renderer
//! can paint cell by cell without knowing about widths. A row stops at the
//! first unit that would cross the right edge, except a tab, which is
//! clipped to the remaining cells.
//!
//! The spans themselves are grouped per line once per reparse, in a
//! [`LineTable`], so remapping after a scroll never touches the tokenizer.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use psedit_buffer::{Color, LineBuffer, Position};
use psedit_syntax::{ColumnRange, ParseOutput, Tokenizer};

use crate::viewport::Viewport;

/// A cell on screen, relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: usize,
    pub y: usize,
}

impl ScreenPoint {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl PartialOrd for ScreenPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScreenPoint {
    // Row-major, the order a renderer paints in
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

/// What the mapper decided for one screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedCell {
    /// Token foreground, or the default foreground if no token covers it
    pub color: Color,
    /// Logical position the cell displays
    pub source: Position,
    /// Whether a diagnostic covers the cell
    pub diagnostic: bool,
}

pub type ColorMap = BTreeMap<ScreenPoint, MappedCell>;

/// Logical cell to diagnostic message, first write wins.
pub type CellDiagnostics = BTreeMap<Position, String>;

// =============================================================================
// Line table
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct LineEntry {
    tokens: Vec<(ColumnRange, Color)>,
    diagnostics: Vec<(ColumnRange, String)>,
}

impl LineEntry {
    fn color_at(&self, col: usize) -> Option<Color> {
        self.tokens
            .iter()
            .find(|(range, _)| range.contains(col))
            .map(|(_, color)| *color)
    }

    fn diagnostic_at(&self, col: usize) -> Option<&str> {
        self.diagnostics
            .iter()
            .find(|(range, _)| range.contains(col))
            .map(|(_, message)| message.as_str())
    }
}

/// Token colors and diagnostics grouped by 1-based line number.
///
/// Colors are resolved when the table is built, so the theme is consulted
/// once per token per reparse rather than once per cell per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineTable {
    lines: HashMap<usize, LineEntry>,
}

impl LineTable {
    pub fn build<T: Tokenizer + ?Sized>(output: &ParseOutput, tokenizer: &T) -> Self {
        let mut lines: HashMap<usize, LineEntry> = HashMap::new();
        for token in &output.tokens {
            lines
                .entry(token.line)
                .or_default()
                .tokens
                .push((token.range, tokenizer.color_of(token.kind)));
        }
        for span in &output.diagnostics {
            lines
                .entry(span.line)
                .or_default()
                .diagnostics
                .push((span.range, span.message.clone()));
        }
        Self { lines }
    }

    /// Color of the first token covering `col` on `line`.
    pub fn color_at(&self, line: usize, col: usize) -> Option<Color> {
        self.lines.get(&line)?.color_at(col)
    }

    /// Message of the first diagnostic covering `col` on `line`.
    pub fn diagnostic_at(&self, line: usize, col: usize) -> Option<&str> {
        self.lines.get(&line)?.diagnostic_at(col)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// Output of one mapping pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedView {
    pub colors: ColorMap,
    pub cell_diagnostics: CellDiagnostics,
}

/// Maps every visible cell of `rows` to a color.
///
/// `default_color` is used for cells no token covers.
pub fn map_viewport(
    viewport: &Viewport,
    rows: &LineBuffer,
    table: &LineTable,
    tab_width: usize,
    default_color: Color,
) -> MappedView {
    let mut view = MappedView::default();
    let limit = viewport.width();

    for (y, line_idx) in viewport.visible_rows(rows.row_count()).enumerate() {
        let row = rows.row(line_idx);
        let line = line_idx + 1;
        let mut x = 0usize;

        for (offset, unit) in row.units().iter().enumerate().skip(viewport.left_column) {
            let token_col = offset + 1;
            let mut width = unit.columns(tab_width);
            if x + width > limit {
                if unit.is_tab() && x < limit {
                    width = limit - x;
                } else {
                    break;
                }
            }

            let source = Position::new(line_idx, offset);
            let diagnostic = table.diagnostic_at(line, token_col);
            if let Some(message) = diagnostic {
                view.cell_diagnostics
                    .entry(source)
                    .or_insert_with(|| message.to_string());
            }
            let cell = MappedCell {
                color: table.color_at(line, token_col).unwrap_or(default_color),
                source,
                diagnostic: diagnostic.is_some(),
            };
            for dx in 0..width {
                view.colors.insert(ScreenPoint::new(x + dx, y), cell);
            }
            x += width;
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use psedit_buffer::{NamedColor, TextPos};
    use psedit_syntax::{Token, TokenKind};

    const DEFAULT: Color = Color::Named(NamedColor::White);
    const RED: Color = Color::Named(NamedColor::Red);

    /// Colors every kind red.
    struct Red;

    impl Tokenizer for Red {
        fn tokenize(&self, _text: &str) -> ParseOutput {
            ParseOutput::new()
        }

        fn color_of(&self, _kind: TokenKind) -> Color {
            RED
        }
    }

    fn table(tokens: &[(usize, ColumnRange)]) -> LineTable {
        let mut output = ParseOutput::new();
        for &(line, range) in tokens {
            output.tokens.push(Token::new(line, range, TokenKind::String));
        }
        LineTable::build(&output, &Red)
    }

    fn xs_on_row(view: &MappedView, y: usize) -> Vec<usize> {
        view.colors.keys().filter(|p| p.y == y).map(|p| p.x).collect()
    }

    // ==================== Coverage Tests ====================

    #[test]
    fn test_every_visible_cell_mapped_once() {
        let rows = LineBuffer::split("abc\nde");
        let view = map_viewport(&Viewport::sized(10, 5), &rows, &LineTable::default(), 4, DEFAULT);
        assert_eq!(view.colors.len(), 5);
        assert_eq!(xs_on_row(&view, 0), vec![0, 1, 2]);
        assert_eq!(xs_on_row(&view, 1), vec![0, 1]);
        assert!(view.colors.values().all(|c| c.color == DEFAULT && !c.diagnostic));
    }

    #[test]
    fn test_token_columns_are_half_open() {
        let rows = LineBuffer::split("abcd");
        let tokens = table(&[(1, ColumnRange::bounded(2, 4))]);
        let view = map_viewport(&Viewport::sized(10, 1), &rows, &tokens, 4, DEFAULT);
        let colors: Vec<Color> = view.colors.values().map(|c| c.color).collect();
        assert_eq!(colors, vec![DEFAULT, RED, RED, DEFAULT]);
    }

    #[test]
    fn test_open_ended_tokens() {
        let rows = LineBuffer::split("ab\ncd\nef");
        let tokens = table(&[
            (1, ColumnRange::new(Some(2), None)),
            (2, ColumnRange::full()),
            (3, ColumnRange::new(None, Some(2))),
        ]);
        let view = map_viewport(&Viewport::sized(10, 3), &rows, &tokens, 4, DEFAULT);
        let red: Vec<ScreenPoint> = view
            .colors
            .iter()
            .filter(|(_, c)| c.color == RED)
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(
            red,
            vec![
                ScreenPoint::new(1, 0),
                ScreenPoint::new(0, 1),
                ScreenPoint::new(1, 1),
                ScreenPoint::new(0, 2),
            ]
        );
    }

    #[test]
    fn test_rows_past_document_end_are_skipped() {
        let rows = LineBuffer::split("a");
        let view = map_viewport(&Viewport::new(0, 20, 0, 10), &rows, &LineTable::default(), 4, DEFAULT);
        assert_eq!(view.colors.len(), 1);
    }

    #[test]
    fn test_top_row_offsets_screen_rows() {
        let rows = LineBuffer::split("a\nb\nc");
        let view = map_viewport(&Viewport::new(1, 5, 0, 10), &rows, &LineTable::default(), 4, DEFAULT);
        let sources: Vec<Position> = view.colors.values().map(|c| c.source).collect();
        assert_eq!(sources, vec![Position::new(1, 0), Position::new(2, 0)]);
        assert_eq!(view.colors.keys().map(|p| p.y).max(), Some(1));
    }

    // ==================== Width Tests ====================

    #[test]
    fn test_tab_expands_and_keeps_token_column() {
        let rows = LineBuffer::split("a\tb");
        let tokens = table(&[(1, ColumnRange::bounded(3, 4))]);
        let view = map_viewport(&Viewport::sized(10, 1), &rows, &tokens, 4, DEFAULT);
        assert_eq!(xs_on_row(&view, 0), vec![0, 1, 2, 3, 4, 5]);
        // `b` is logical column 3 even though it is drawn at x = 5
        assert_eq!(view.colors[&ScreenPoint::new(5, 0)].color, RED);
        assert_eq!(view.colors[&ScreenPoint::new(4, 0)].source, Position::new(0, 1));
    }

    #[test]
    fn test_tab_clipped_at_right_edge() {
        let rows = LineBuffer::split("ab\tc");
        let view = map_viewport(&Viewport::sized(4, 1), &rows, &LineTable::default(), 4, DEFAULT);
        assert_eq!(xs_on_row(&view, 0), vec![0, 1, 2, 3]);
        assert!(view.colors.keys().all(|p| p.x < 4));
    }

    #[test]
    fn test_wide_glyph_not_split_at_right_edge() {
        let rows = LineBuffer::split("ab界");
        let view = map_viewport(&Viewport::sized(3, 1), &rows, &LineTable::default(), 4, DEFAULT);
        assert_eq!(xs_on_row(&view, 0), vec![0, 1]);

        let view = map_viewport(&Viewport::sized(4, 1), &rows, &LineTable::default(), 4, DEFAULT);
        assert_eq!(xs_on_row(&view, 0), vec![0, 1, 2, 3]);
        assert_eq!(view.colors[&ScreenPoint::new(3, 0)].source, Position::new(0, 2));
    }

    #[test]
    fn test_left_column_scrolls_logical_columns() {
        let rows = LineBuffer::split("abcdef");
        let tokens = table(&[(1, ColumnRange::bounded(3, 4))]);
        let view = map_viewport(&Viewport::new(0, 1, 2, 4), &rows, &tokens, 4, DEFAULT);
        assert_eq!(xs_on_row(&view, 0), vec![0, 1]);
        let first = view.colors[&ScreenPoint::new(0, 0)];
        assert_eq!(first.source, Position::new(0, 2));
        assert_eq!(first.color, RED);
    }

    // ==================== Diagnostic Tests ====================

    #[test]
    fn test_cell_diagnostics_first_write_wins() {
        let rows = LineBuffer::split("abc");
        let mut output = ParseOutput::new();
        output.push_diagnostic(TextPos::new(1, 1), TextPos::new(1, 3), "outer");
        output.push_diagnostic(TextPos::new(1, 2), TextPos::new(1, 4), "inner");
        let table = LineTable::build(&output, &Red);

        let view = map_viewport(&Viewport::sized(10, 1), &rows, &table, 4, DEFAULT);
        assert_eq!(view.cell_diagnostics.len(), 3);
        assert_eq!(view.cell_diagnostics[&Position::new(0, 1)], "outer");
        assert_eq!(view.cell_diagnostics[&Position::new(0, 2)], "inner");
        assert!(view.colors.values().all(|c| c.diagnostic));
    }
}
