// Chunk: docs/chunks/token_model - Tokens, diagnostic spans and column ranges

//! Token and diagnostic span types produced by every provider.
//!
//! All bounds are 1-based logical character columns and half-open:
//! a range `[start, end)` covers `start <= col < end`. A missing bound is
//! open towards the start or end of the line. Extents that cross lines are
//! broken into one range per line by [`split_extent`].

use psedit_buffer::{LineIndex, TextPos};

// =============================================================================
// Column Ranges
// =============================================================================

/// A half-open column range on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ColumnRange {
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// `[start, end)` on one line.
    pub fn bounded(start: usize, end: usize) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// The whole line.
    pub fn full() -> Self {
        Self::new(None, None)
    }

    /// Returns true if the 1-based column lies inside the range.
    ///
    /// - open/open matches everything
    /// - open start matches `col < end`
    /// - open end matches `col >= start`
    /// - bounded matches `start <= col < end`
    pub fn contains(&self, col: usize) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (None, Some(end)) => col < end,
            (Some(start), None) => col >= start,
            (Some(start), Some(end)) => start <= col && col < end,
        }
    }
}

/// Breaks a source extent into per-line column ranges.
///
/// A single-line extent keeps both bounds. A multi-line extent produces one
/// range per covered line: the first line keeps only its start bound, the
/// last line keeps only its end bound, and interior lines are fully open.
/// An extent ending at column 1 covers nothing on its last line, so that
/// line gets no range.
pub fn split_extent(start: TextPos, end: TextPos) -> Vec<(usize, ColumnRange)> {
    if end.line <= start.line {
        let end_col = if end.line == start.line {
            end.column.max(start.column)
        } else {
            start.column
        };
        return vec![(start.line, ColumnRange::bounded(start.column, end_col))];
    }

    let mut ranges = Vec::with_capacity(end.line - start.line + 1);
    ranges.push((start.line, ColumnRange::new(Some(start.column), None)));
    for line in start.line + 1..end.line {
        ranges.push((line, ColumnRange::full()));
    }
    if end.column > 1 {
        ranges.push((end.line, ColumnRange::new(None, Some(end.column))));
    }
    ranges
}

// =============================================================================
// Token Kinds
// =============================================================================

/// Semantic category of a token.
///
/// Each kind resolves to a dotted theme key. Lookups fall back from the most
/// specific key to its first segment, so a theme only needs the base keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Braces, brackets and tag delimiters.
    Bracket,
    /// JSON property names and YAML keys.
    Property,
    String,
    Number,
    /// true/false/null.
    Literal,
    Comment,
    Keyword,
    Variable,
    /// Scripting `-Name` parameters.
    Parameter,
    /// A command invocation name.
    Command,
    /// A function declaration name.
    Function,
    Operator,
    /// A `[type]` literal.
    Type,
    /// Scripting words that are none of the above.
    Generic,
    /// XML element names.
    Tag,
    /// XML attribute names.
    Attribute,
    /// XML character data and CDATA.
    Text,
    /// XML declarations, processing instructions and doctypes.
    Declaration,
    /// YAML document, sequence and alias structure.
    Structure,
    /// YAML mapping structure.
    Mapping,
    Heading,
    Emphasis,
    /// Fenced code blocks and inline code.
    Code,
    Quote,
    ListMarker,
    Rule,
    /// Link text.
    Link,
    /// Link target.
    Url,
}

impl TokenKind {
    /// Returns the theme key used to color this kind.
    pub fn theme_key(self) -> &'static str {
        match self {
            TokenKind::Bracket => "Accent.Bracket",
            TokenKind::Property => "Info.Property",
            TokenKind::String => "String",
            TokenKind::Number => "Number",
            TokenKind::Literal => "Number.Literal",
            TokenKind::Comment => "Comment",
            TokenKind::Keyword => "Keyword",
            TokenKind::Variable => "Variable",
            TokenKind::Parameter => "Foreground.Parameter",
            TokenKind::Command => "Warning.Command",
            TokenKind::Function => "Info.Function",
            TokenKind::Operator => "Foreground.Operator",
            TokenKind::Type => "Accent.Type",
            TokenKind::Generic => "Foreground",
            TokenKind::Tag => "Accent.Tag",
            TokenKind::Attribute => "Info.Attribute",
            TokenKind::Text => "String.Text",
            TokenKind::Declaration => "Warning.Declaration",
            TokenKind::Structure => "Warning.Structure",
            TokenKind::Mapping => "Accent.Mapping",
            TokenKind::Heading => "Accent.Heading",
            TokenKind::Emphasis => "Info.Emphasis",
            TokenKind::Code => "Accent.Code",
            TokenKind::Quote => "Warning.Quote",
            TokenKind::ListMarker => "Warning.List",
            TokenKind::Rule => "Accent.Rule",
            TokenKind::Link => "Info.Link",
            TokenKind::Url => "Accent.Url",
        }
    }
}

// =============================================================================
// Tokens and Diagnostics
// =============================================================================

/// A colored lexical span on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// 1-based line number.
    pub line: usize,
    pub range: ColumnRange,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(line: usize, range: ColumnRange, kind: TokenKind) -> Self {
        Self { line, range, kind }
    }

    /// Returns true if the token covers `(line, col)`.
    pub fn covers(&self, line: usize, col: usize) -> bool {
        self.line == line && self.range.contains(col)
    }
}

/// A parse or validation error, restricted to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticSpan {
    /// 1-based line number.
    pub line: usize,
    pub range: ColumnRange,
    pub message: String,
    /// Where the source diagnostic starts. Shared by every span the
    /// diagnostic was split into.
    pub origin: TextPos,
}

impl DiagnosticSpan {
    pub fn covers(&self, line: usize, col: usize) -> bool {
        self.line == line && self.range.contains(col)
    }
}

// =============================================================================
// Parse Output
// =============================================================================

/// Everything one tokenize call produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<DiagnosticSpan>,
}

impl ParseOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one token per line covered by `start..end`.
    pub fn push_extent(&mut self, start: TextPos, end: TextPos, kind: TokenKind) {
        self.tokens.extend(
            split_extent(start, end)
                .into_iter()
                .map(|(line, range)| Token::new(line, range, kind)),
        );
    }

    /// Adds a token for the byte range `start..end` of the indexed text.
    pub fn push_bytes(&mut self, index: &LineIndex<'_>, start: usize, end: usize, kind: TokenKind) {
        if end > start {
            self.push_extent(index.position(start), index.position(end), kind);
        }
    }

    /// Adds one diagnostic span per line covered by `start..end`.
    pub fn push_diagnostic(&mut self, start: TextPos, end: TextPos, message: impl Into<String>) {
        self.push_diagnostic_at(start, end, start, message);
    }

    /// Like [`push_diagnostic`](Self::push_diagnostic), for a diagnostic
    /// whose source position `origin` lies elsewhere than its span start.
    pub fn push_diagnostic_at(
        &mut self,
        start: TextPos,
        end: TextPos,
        origin: TextPos,
        message: impl Into<String>,
    ) {
        let message = message.into();
        self.diagnostics
            .extend(split_extent(start, end).into_iter().map(|(line, range)| DiagnosticSpan {
                line,
                range,
                message: message.clone(),
                origin,
            }));
    }
}
