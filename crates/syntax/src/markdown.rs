// Chunk: docs/chunks/markdown_provider - Line-pattern Markdown highlighting

//! Markdown highlighting from an ordered list of line patterns.
//!
//! # Overview
//!
//! Lines are processed top to bottom. A fence line (```` ``` ````) toggles
//! code-block state, and every line inside a block, fences included, is a
//! single [`TokenKind::Code`] token. Outside blocks, whole-line constructs
//! (headings, horizontal rules) end processing of the line; the rest are
//! inline and may stack:
//!
//! 1. block quote marker
//! 2. list marker
//! 3. bold, italic
//! 4. inline code
//! 5. link text and target
//!
//! Markdown never produces diagnostics. If the pattern set cannot be built
//! the provider highlights nothing rather than something partial.

use regex::Regex;
use tracing::warn;

use crate::token::{ColumnRange, ParseOutput, Token, TokenKind};

#[derive(Debug, Clone)]
struct Patterns {
    fence: Regex,
    heading: Regex,
    quote: Regex,
    rule: Regex,
    list: Regex,
    bold_star: Regex,
    bold_underscore: Regex,
    italic: Regex,
    code: Regex,
    link: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            fence: Regex::new(r"^\s*```")?,
            heading: Regex::new(r"^#{1,6}\s+")?,
            quote: Regex::new(r"^>\s*")?,
            rule: Regex::new(r"^(\*{3,}|-{3,}|_{3,})$")?,
            list: Regex::new(r"^\s*([*\-+]|\d+\.)\s+")?,
            bold_star: Regex::new(r"\*\*(.+?)\*\*")?,
            bold_underscore: Regex::new(r"__(.+?)__")?,
            italic: Regex::new(r"\*([^*]+)\*|_([^_]+)_")?,
            code: Regex::new(r"`([^`]+)`")?,
            link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)")?,
        })
    }
}

/// Token provider for Markdown documents.
#[derive(Debug, Clone)]
pub struct MarkdownProvider {
    patterns: Option<Patterns>,
}

impl MarkdownProvider {
    pub fn new() -> Self {
        let patterns = match Patterns::compile() {
            Ok(patterns) => Some(patterns),
            Err(err) => {
                warn!(%err, "markdown patterns failed to compile; highlighting disabled");
                None
            }
        };
        Self { patterns }
    }

    pub fn tokenize(&self, text: &str) -> ParseOutput {
        let mut output = ParseOutput::new();
        let Some(patterns) = &self.patterns else {
            return output;
        };

        let mut in_code_block = false;
        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let number = idx + 1;
            let mut cells = LineTokens::new(number, line);

            if patterns.fence.is_match(line) {
                in_code_block = !in_code_block;
                cells.whole(TokenKind::Code);
            } else if in_code_block {
                cells.whole(TokenKind::Code);
            } else {
                highlight_line(patterns, &mut cells);
            }
            output.tokens.extend(cells.tokens);
        }
        output
    }
}

impl Default for MarkdownProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn highlight_line(patterns: &Patterns, cells: &mut LineTokens<'_>) {
    let line = cells.line;
    if patterns.heading.is_match(line) {
        cells.whole(TokenKind::Heading);
        return;
    }
    if let Some(m) = patterns.quote.find(line) {
        cells.bytes(m.start(), m.end(), TokenKind::Quote);
    }
    if patterns.rule.is_match(line.trim()) {
        cells.whole(TokenKind::Rule);
        return;
    }
    if let Some(m) = patterns.list.find(line) {
        cells.bytes(m.start(), m.end(), TokenKind::ListMarker);
    }

    let mut bold: Vec<(usize, usize)> = patterns
        .bold_star
        .find_iter(line)
        .chain(patterns.bold_underscore.find_iter(line))
        .map(|m| (m.start(), m.end()))
        .collect();
    bold.sort_unstable();
    for (start, end) in bold {
        cells.bytes(start, end, TokenKind::Emphasis);
    }

    for m in patterns.italic.find_iter(line) {
        if is_single_marker(line, m.start(), m.end()) {
            cells.bytes(m.start(), m.end(), TokenKind::Emphasis);
        }
    }

    for m in patterns.code.find_iter(line) {
        cells.bytes(m.start(), m.end(), TokenKind::Code);
    }

    for caps in patterns.link.captures_iter(line) {
        let (Some(whole), Some(label), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        // `[label]` then `(url)`
        cells.bytes(whole.start(), label.end() + 1, TokenKind::Link);
        cells.bytes(url.start() - 1, whole.end(), TokenKind::Url);
    }
}

/// True when the italic match at `start..end` is not part of a doubled
/// marker such as `**bold**`.
fn is_single_marker(line: &str, start: usize, end: usize) -> bool {
    let bytes = line.as_bytes();
    let marker = bytes[start];
    let before = start.checked_sub(1).map(|i| bytes[i]);
    let after = bytes.get(end).copied();
    before != Some(marker) && after != Some(marker)
}

/// Tokens for one line, with byte offsets converted to 1-based char columns.
struct LineTokens<'a> {
    number: usize,
    line: &'a str,
    tokens: Vec<Token>,
}

impl<'a> LineTokens<'a> {
    fn new(number: usize, line: &'a str) -> Self {
        Self {
            number,
            line,
            tokens: Vec::new(),
        }
    }

    fn column(&self, byte: usize) -> usize {
        self.line.get(..byte).map_or(0, |prefix| prefix.chars().count()) + 1
    }

    fn whole(&mut self, kind: TokenKind) {
        let end = self.line.chars().count() + 1;
        self.tokens
            .push(Token::new(self.number, ColumnRange::bounded(1, end), kind));
    }

    fn bytes(&mut self, start: usize, end: usize, kind: TokenKind) {
        if end <= start {
            return;
        }
        let range = ColumnRange::bounded(self.column(start), self.column(end));
        self.tokens.push(Token::new(self.number, range, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<(usize, ColumnRange, TokenKind)> {
        MarkdownProvider::new()
            .tokenize(text)
            .tokens
            .into_iter()
            .map(|t| (t.line, t.range, t.kind))
            .collect()
    }

    // ==================== Block Tests ====================

    #[test]
    fn test_heading_covers_whole_line() {
        assert_eq!(
            tokenize("## Title *x*"),
            vec![(1, ColumnRange::bounded(1, 13), TokenKind::Heading)]
        );
    }

    #[test]
    fn test_hash_without_space_is_not_heading() {
        assert!(tokenize("#tag").is_empty());
    }

    #[test]
    fn test_code_fence_state_carries_across_lines() {
        let tokens = tokenize("```\n# not a heading\n```\n# heading");
        assert_eq!(
            tokens,
            vec![
                (1, ColumnRange::bounded(1, 4), TokenKind::Code),
                (2, ColumnRange::bounded(1, 16), TokenKind::Code),
                (3, ColumnRange::bounded(1, 4), TokenKind::Code),
                (4, ColumnRange::bounded(1, 10), TokenKind::Heading),
            ]
        );
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(tokenize("***"), vec![(1, ColumnRange::bounded(1, 4), TokenKind::Rule)]);
        assert_eq!(tokenize(" ___ "), vec![(1, ColumnRange::bounded(1, 6), TokenKind::Rule)]);
    }

    #[test]
    fn test_blockquote_marker_then_inline() {
        let tokens = tokenize("> see `code`");
        assert_eq!(
            tokens,
            vec![
                (1, ColumnRange::bounded(1, 3), TokenKind::Quote),
                (1, ColumnRange::bounded(7, 13), TokenKind::Code),
            ]
        );
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(
            tokenize("  - item"),
            vec![(1, ColumnRange::bounded(1, 5), TokenKind::ListMarker)]
        );
        assert_eq!(
            tokenize("12. item"),
            vec![(1, ColumnRange::bounded(1, 5), TokenKind::ListMarker)]
        );
    }

    // ==================== Inline Tests ====================

    #[test]
    fn test_bold_is_not_also_italic() {
        assert_eq!(
            tokenize("a **b** c"),
            vec![(1, ColumnRange::bounded(3, 8), TokenKind::Emphasis)]
        );
    }

    #[test]
    fn test_italic_both_markers() {
        assert_eq!(
            tokenize("*a* and _b_"),
            vec![
                (1, ColumnRange::bounded(1, 4), TokenKind::Emphasis),
                (1, ColumnRange::bounded(9, 12), TokenKind::Emphasis),
            ]
        );
    }

    #[test]
    fn test_link_text_and_url() {
        assert_eq!(
            tokenize("go [here](http://x)"),
            vec![
                (1, ColumnRange::bounded(4, 10), TokenKind::Link),
                (1, ColumnRange::bounded(10, 20), TokenKind::Url),
            ]
        );
    }

    #[test]
    fn test_columns_count_chars_not_bytes() {
        assert_eq!(
            tokenize("é `x`"),
            vec![(1, ColumnRange::bounded(3, 6), TokenKind::Code)]
        );
    }

    #[test]
    fn test_crlf_is_not_content() {
        assert_eq!(
            tokenize("# a\r\n"),
            vec![(1, ColumnRange::bounded(1, 4), TokenKind::Heading)]
        );
    }

    #[test]
    fn test_never_produces_diagnostics() {
        let output = MarkdownProvider::new().tokenize("```\nunclosed [link(\n**");
        assert!(output.diagnostics.is_empty());
    }
}
