// Chunk: docs/chunks/diagnostic_index - Point map and list table of diagnostics

//! Diagnostic index built once per reparse.
//!
//! Providers may report the same problem more than once, and one diagnostic
//! spanning several lines arrives as several spans. The index keys every
//! span by the origin of its source diagnostic and keeps the first message
//! seen, so each problem is one entry in both the point map and the table.

use std::collections::BTreeMap;

use psedit_buffer::TextPos;
use psedit_syntax::DiagnosticSpan;

/// One row of the diagnostics list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRow {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticIndex {
    points: BTreeMap<TextPos, String>,
}

impl DiagnosticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes the full diagnostic list. First occurrence of each origin wins.
    pub fn build(spans: &[DiagnosticSpan]) -> Self {
        let mut points = BTreeMap::new();
        for span in spans {
            points
                .entry(span.origin)
                .or_insert_with(|| span.message.clone());
        }
        Self { points }
    }

    pub fn points(&self) -> &BTreeMap<TextPos, String> {
        &self.points
    }

    pub fn get(&self, pos: TextPos) -> Option<&str> {
        self.points.get(&pos).map(String::as_str)
    }

    /// Rows sorted by line, then column.
    pub fn table(&self) -> Vec<DiagnosticRow> {
        self.points
            .iter()
            .map(|(pos, message)| DiagnosticRow {
                line: pos.line,
                column: pos.column,
                message: message.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psedit_syntax::ParseOutput;

    fn output_with(diagnostics: &[((usize, usize), (usize, usize), &str)]) -> ParseOutput {
        let mut output = ParseOutput::new();
        for &((sl, sc), (el, ec), message) in diagnostics {
            output.push_diagnostic(TextPos::new(sl, sc), TextPos::new(el, ec), message);
        }
        output
    }

    #[test]
    fn test_multiline_diagnostic_is_one_row() {
        let output = output_with(&[((2, 1), (4, 2), "missing brace")]);
        assert_eq!(output.diagnostics.len(), 3);

        let index = DiagnosticIndex::build(&output.diagnostics);
        assert_eq!(
            index.table(),
            vec![DiagnosticRow {
                line: 2,
                column: 1,
                message: "missing brace".to_string()
            }]
        );
    }

    #[test]
    fn test_first_message_wins() {
        let output = output_with(&[((1, 3), (1, 4), "first"), ((1, 3), (1, 9), "second")]);
        let index = DiagnosticIndex::build(&output.diagnostics);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(TextPos::new(1, 3)), Some("first"));
    }

    #[test]
    fn test_table_sorted_by_line_then_column() {
        let output = output_with(&[
            ((5, 1), (5, 2), "c"),
            ((1, 8), (1, 9), "b"),
            ((1, 2), (1, 3), "a"),
        ]);
        let table = DiagnosticIndex::build(&output.diagnostics).table();
        let messages: Vec<&str> = table.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty() {
        let index = DiagnosticIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.table().is_empty());
    }
}
