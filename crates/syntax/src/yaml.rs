// Chunk: docs/chunks/yaml_provider - YAML token provider and formatter

//! YAML highlighting and formatting.
//!
//! # Overview
//!
//! The `yaml-rust2` event parser reports a start marker for each event but
//! no end. [`YamlReader`] wraps it as a [`PullReader`] and recovers each
//! scalar's extent by re-scanning the source from the marker according to
//! the scalar style. Keys and values are told apart with a small stack of
//! open collections.
//!
//! The parser discards comments, so comments are found with a separate line
//! scan that skips anything already covered by a scalar.
//!
//! After a scan error the parser keeps returning the same error, which the
//! reader loop turns into a single diagnostic and a clean stop.

use std::str::Chars;

use psedit_buffer::{LineIndex, TextPos};
use yaml_rust2::parser::{Event, Parser};
use yaml_rust2::scanner::TScalarStyle;
use yaml_rust2::{YamlEmitter, YamlLoader};

use crate::format::{FormatError, Formatter};
use crate::stream::{Positioned, PullReader, ReaderError, ReaderLoop};
use crate::token::{ParseOutput, TokenKind};

/// A highlighted YAML event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YamlEvent {
    Key,
    Value,
    Alias,
    /// A flow collection delimiter: `{ } [ ]`.
    FlowDelimiter,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Mapping { expect_key: bool },
    Sequence,
}

/// Pull reader over YAML parser events.
pub struct YamlReader<'a> {
    parser: Parser<Chars<'a>>,
    index: LineIndex<'a>,
    stack: Vec<Frame>,
}

impl<'a> YamlReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            parser: Parser::new(text.chars()),
            index: LineIndex::new(text),
            stack: Vec::new(),
        }
    }

    /// Returns true if the next node in the current mapping is a key, and
    /// flips the mapping's key/value expectation.
    fn take_node_role(&mut self) -> bool {
        match self.stack.last_mut() {
            Some(Frame::Mapping { expect_key }) => {
                let is_key = *expect_key;
                *expect_key = !is_key;
                is_key
            }
            _ => false,
        }
    }

    /// Byte offset of a parser marker (1-based line, 0-based column).
    fn marker_offset(&self, line: usize, col: usize) -> usize {
        self.index.offset(TextPos::new(line, col + 1))
    }

    fn flow_delimiter(&self, start: usize) -> Option<Positioned<YamlEvent>> {
        let ch = self.index.text()[start..].chars().next()?;
        if !matches!(ch, '{' | '}' | '[' | ']') {
            return None;
        }
        Some(Positioned {
            event: YamlEvent::FlowDelimiter,
            start: self.index.position(start),
            end: self.index.position(start + 1),
        })
    }

    /// Source extent of a scalar whose marker is at `start`.
    fn scalar_extent(&self, start: usize, value: &str, style: TScalarStyle) -> (usize, usize) {
        let text = self.index.text();
        match style {
            TScalarStyle::SingleQuoted => (start, quoted_end(text, start, '\'')),
            TScalarStyle::DoubleQuoted => (start, quoted_end(text, start, '"')),
            TScalarStyle::Literal | TScalarStyle::Folded => {
                let indicator = block_indicator(text, start);
                (indicator, block_scalar_end(&self.index, indicator))
            }
            _ => (start, plain_end(text, start, value)),
        }
    }
}

impl PullReader for YamlReader<'_> {
    type Event = YamlEvent;

    fn next_event(&mut self) -> Result<Option<Positioned<YamlEvent>>, ReaderError> {
        loop {
            let (event, marker) = self.parser.next_token().map_err(|err| {
                let mark = err.marker();
                ReaderError::new(TextPos::new(mark.line(), mark.col() + 1), err.info())
            })?;
            let start = self.marker_offset(marker.line(), marker.col());

            match event {
                Event::StreamEnd => return Ok(None),
                Event::Scalar(value, style, ..) => {
                    let is_key = self.take_node_role();
                    let (start, end) = self.scalar_extent(start, &value, style);
                    if end > start {
                        return Ok(Some(Positioned {
                            event: if is_key { YamlEvent::Key } else { YamlEvent::Value },
                            start: self.index.position(start),
                            end: self.index.position(end),
                        }));
                    }
                }
                Event::Alias(..) => {
                    self.take_node_role();
                    let end = plain_end(self.index.text(), start, "");
                    if end > start {
                        return Ok(Some(Positioned {
                            event: YamlEvent::Alias,
                            start: self.index.position(start),
                            end: self.index.position(end),
                        }));
                    }
                }
                Event::MappingStart(..) => {
                    self.take_node_role();
                    self.stack.push(Frame::Mapping { expect_key: true });
                    if let Some(delimiter) = self.flow_delimiter(start) {
                        return Ok(Some(delimiter));
                    }
                }
                Event::SequenceStart(..) => {
                    self.take_node_role();
                    self.stack.push(Frame::Sequence);
                    if let Some(delimiter) = self.flow_delimiter(start) {
                        return Ok(Some(delimiter));
                    }
                }
                Event::MappingEnd | Event::SequenceEnd => {
                    self.stack.pop();
                    if let Some(delimiter) = self.flow_delimiter(start) {
                        return Ok(Some(delimiter));
                    }
                }
                _ => {}
            }
        }
    }
}

// =============================================================================
// Extent Scanning
// =============================================================================

/// End offset of a quoted scalar whose opening quote is at `start`.
fn quoted_end(text: &str, start: usize, quote: char) -> usize {
    let mut chars = text[start..].char_indices().skip(1).peekable();
    while let Some((i, ch)) = chars.next() {
        if quote == '"' && ch == '\\' {
            chars.next();
            continue;
        }
        if ch == quote {
            // '' is an escaped quote inside single-quoted scalars
            if quote == '\'' && matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                continue;
            }
            return start + i + ch.len_utf8();
        }
    }
    text.len()
}

/// End offset of a plain scalar or alias starting at `start`.
///
/// Single-line scalars whose source matches the value end exactly after the
/// value. Otherwise the extent runs to the end of the line, stopping at an
/// inline comment, a `: ` indicator or a flow delimiter.
fn plain_end(text: &str, start: usize, value: &str) -> usize {
    let rest = &text[start..];
    if !value.is_empty() && rest.starts_with(value) {
        return start + value.len();
    }

    let line = rest.split('\n').next().unwrap_or("");
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut end = line.len();
    let mut prev_space = false;
    for (i, ch) in line.char_indices() {
        let next = line[i + ch.len_utf8()..].chars().next();
        let stop = (ch == '#' && prev_space)
            || (ch == ':' && matches!(next, None | Some(' ') | Some('\t')))
            || matches!(ch, ',' | ']' | '}');
        if stop && i > 0 {
            end = i;
            break;
        }
        prev_space = ch == ' ' || ch == '\t';
    }
    start + line[..end].trim_end().len()
}

/// Offset of the `|` or `>` introducing a block scalar.
///
/// The parser marks a block scalar at its first content line, so the
/// indicator is the last one before the marker.
fn block_indicator(text: &str, marker: usize) -> usize {
    if text[marker..].starts_with(['|', '>']) {
        return marker;
    }
    text[..marker].rfind(['|', '>']).unwrap_or(marker)
}

/// End offset of a literal or folded block scalar whose indicator is at
/// `start`: the last following line indented deeper than the indicator's
/// line.
fn block_scalar_end(index: &LineIndex<'_>, start: usize) -> usize {
    let indicator_line = index.line_at_offset(start);
    let indent_of = |line: &str| line.len() - line.trim_start_matches(' ').len();
    let base = index.line_text(indicator_line).map(indent_of).unwrap_or(0);

    let line_end = |line: usize| {
        let begin = index.line_start(line).unwrap_or(0);
        begin + index.line_text(line).map(str::len).unwrap_or(0)
    };

    let mut end = line_end(indicator_line);
    for line in indicator_line + 1..index.line_count() {
        let Some(content) = index.line_text(line) else {
            break;
        };
        if content.trim().is_empty() {
            continue;
        }
        if indent_of(content) <= base {
            break;
        }
        end = line_end(line);
    }
    end
}

/// Finds `#` comments that are not inside an already tokenized span.
fn scan_comments(index: &LineIndex<'_>, output: &mut ParseOutput) {
    let mut comments = Vec::new();
    for line in 0..index.line_count() {
        let Some(content) = index.line_text(line) else {
            continue;
        };
        let mut prev = None;
        for (col, ch) in content.chars().enumerate() {
            if ch == '#' && matches!(prev, None | Some(' ') | Some('\t')) {
                let column = col + 1;
                let covered = output.tokens.iter().any(|t| t.covers(line + 1, column));
                if !covered {
                    let len = content.chars().count();
                    comments.push((TextPos::new(line + 1, column), TextPos::new(line + 1, len + 1)));
                    break;
                }
            }
            prev = Some(ch);
        }
    }
    for (start, end) in comments {
        output.push_extent(start, end, TokenKind::Comment);
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Token provider for YAML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlProvider;

impl YamlProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &str) -> ParseOutput {
        let mut reader = YamlReader::new(text);
        let mut output = ReaderLoop::new().run(&mut reader, |event, output| {
            let kind = match event.event {
                YamlEvent::Key => TokenKind::Property,
                YamlEvent::Value => TokenKind::String,
                YamlEvent::Alias => TokenKind::Structure,
                YamlEvent::FlowDelimiter => TokenKind::Mapping,
            };
            output.push_extent(event.start, event.end, kind);
        });
        scan_comments(&LineIndex::new(text), &mut output);
        output
    }
}

impl Formatter for YamlProvider {
    /// Loads every document and emits it again in canonical block style.
    fn try_format(&self, text: &str) -> Result<String, FormatError> {
        let docs = YamlLoader::load_from_str(text)?;
        if docs.is_empty() {
            return Err(FormatError::Empty);
        }

        let mut rendered = Vec::with_capacity(docs.len());
        for doc in &docs {
            let mut out = String::new();
            YamlEmitter::new(&mut out)
                .dump(doc)
                .map_err(|e| FormatError::YamlEmit(e.to_string()))?;
            rendered.push(out);
        }

        let mut formatted = if rendered.len() == 1 {
            let only = &rendered[0];
            only.strip_prefix("---\n")
                .or_else(|| only.strip_prefix("--- "))
                .unwrap_or(only)
                .to_string()
        } else {
            rendered.join("\n")
        };
        if !formatted.ends_with('\n') {
            formatted.push('\n');
        }
        Ok(formatted)
    }
}
