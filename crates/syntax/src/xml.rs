// Chunk: docs/chunks/xml_provider - XML token provider and formatter

//! XML highlighting and formatting.
//!
//! # Overview
//!
//! `quick-xml` reports events and the byte position after each one, but not
//! where the delimiters inside a tag sit. Each markup event is therefore
//! located by re-scanning the source: the tag starts at the first `<` after
//! the previous markup, names follow `<` or `</`, and attribute delimiters
//! (`=`, quotes) are searched for after each attribute name. Closing
//! delimiters are `/>` for empty elements and `>` otherwise.
//!
//! Character data is taken from the gaps between markup rather than from
//! text events, so its extent never depends on the reader's position
//! bookkeeping for text.
//!
//! Tokenizing stops at the first well-formedness error. Elements still open
//! at end of input each get a diagnostic at their start tag.

use psedit_buffer::LineIndex;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::format::{FormatError, Formatter};
use crate::token::{ParseOutput, TokenKind};

/// Token provider for XML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlProvider;

impl XmlProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &str) -> ParseOutput {
        let mut scanner = TagScanner {
            index: LineIndex::new(text),
            output: ParseOutput::new(),
            open: Vec::new(),
        };
        scanner.run();
        scanner.output
    }
}

struct TagScanner<'a> {
    index: LineIndex<'a>,
    output: ParseOutput,
    /// Open elements: (name, byte offset of the start tag).
    open: Vec<(String, usize)>,
}

impl<'a> TagScanner<'a> {
    fn text(&self) -> &'a str {
        self.index.text()
    }

    fn run(&mut self) {
        let text = self.text();
        let mut reader = Reader::from_str(text);
        let mut cursor = 0usize;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let at = (reader.error_position() as usize).min(text.len());
                    self.error(cursor, at, &err.to_string());
                    return;
                }
            };
            let end = (reader.buffer_position() as usize).min(text.len());

            let markup = matches!(
                event,
                Event::Start(_)
                    | Event::Empty(_)
                    | Event::End(_)
                    | Event::Comment(_)
                    | Event::CData(_)
                    | Event::Decl(_)
                    | Event::PI(_)
                    | Event::DocType(_)
            );
            if !markup {
                if let Event::Eof = event {
                    self.char_data(cursor, text.len());
                    self.unclosed();
                    return;
                }
                continue;
            }

            let start = match text[cursor..end].find('<') {
                Some(rel) => cursor + rel,
                None => continue,
            };
            self.char_data(cursor, start);

            match &event {
                Event::Start(e) => {
                    self.start_tag(e, start, end, false);
                    self.open.push((String::from_utf8_lossy(e.name().as_ref()).into_owned(), start));
                }
                Event::Empty(e) => self.start_tag(e, start, end, true),
                Event::End(e) => {
                    let name_len = e.name().as_ref().len();
                    self.push(start, start + 2, TokenKind::Bracket);
                    self.push(start + 2, start + 2 + name_len, TokenKind::Tag);
                    self.push(end - 1, end, TokenKind::Bracket);
                    self.open.pop();
                }
                Event::Comment(_) => self.push(start, end, TokenKind::Comment),
                Event::CData(_) => self.push(start, end, TokenKind::Text),
                _ => self.push(start, end, TokenKind::Declaration),
            }
            cursor = end;
        }
    }

    fn push(&mut self, start: usize, end: usize, kind: TokenKind) {
        let end = end.min(self.text().len());
        self.output.push_bytes(&self.index, start, end, kind);
    }

    /// Highlights non-whitespace character data in `start..end`.
    fn char_data(&mut self, start: usize, end: usize) {
        let segment = &self.text()[start..end];
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            return;
        }
        let lead = segment.len() - segment.trim_start().len();
        self.push(start + lead, start + lead + trimmed.len(), TokenKind::Text);
    }

    /// Tokens for `<name attr="value" ...>` or the empty-element form.
    fn start_tag(&mut self, e: &BytesStart<'_>, start: usize, end: usize, empty: bool) {
        let text = self.text();
        let name_end = start + 1 + e.name().as_ref().len();
        self.push(start, start + 1, TokenKind::Bracket);
        self.push(start + 1, name_end, TokenKind::Tag);

        let mut pos = name_end;
        for attr in e.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => {
                    self.output.push_diagnostic(
                        self.index.position(start),
                        self.index.position(end),
                        err.to_string(),
                    );
                    break;
                }
            };
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let Some(key_start) = find_from(text, pos, end, &key) else {
                break;
            };
            let key_end = key_start + key.len();
            self.push(key_start, key_end, TokenKind::Attribute);
            pos = key_end;

            let Some(eq) = find_from(text, pos, end, "=") else {
                continue;
            };
            self.push(eq, eq + 1, TokenKind::Bracket);
            pos = eq + 1;

            let Some(open) = text[pos..end].find(['"', '\'']).map(|rel| pos + rel) else {
                continue;
            };
            let quote = &text[open..open + 1];
            self.push(open, open + 1, TokenKind::Bracket);
            let Some(close) = find_from(text, open + 1, end, quote) else {
                pos = open + 1;
                continue;
            };
            self.push(open + 1, close, TokenKind::String);
            self.push(close, close + 1, TokenKind::Bracket);
            pos = close + 1;
        }

        if empty {
            self.push(end.saturating_sub(2).max(pos), end, TokenKind::Bracket);
        } else {
            self.push(end.saturating_sub(1).max(pos), end, TokenKind::Bracket);
        }
    }

    fn error(&mut self, cursor: usize, at: usize, message: &str) {
        let error_pos = self.index.position(at);
        let resume = self.index.position(cursor);

        let start = if resume.line == error_pos.line && resume.column < error_pos.column {
            resume
        } else {
            psedit_buffer::TextPos::new(error_pos.line, 1)
        };
        let line_len = self
            .index
            .line_text(error_pos.line - 1)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        let end_col = (error_pos.column + 1).min(line_len + 1).max(start.column + 1);
        self.output.push_diagnostic(
            start,
            psedit_buffer::TextPos::new(error_pos.line, end_col),
            message,
        );
    }

    fn unclosed(&mut self) {
        let open = std::mem::take(&mut self.open);
        for (name, offset) in open {
            let start = self.index.position(offset);
            let end = self.index.position(offset + 1 + name.len());
            self.output.push_diagnostic(
                start,
                end,
                format!("Unexpected end of file. Element '{}' is not closed.", name),
            );
        }
    }
}

/// Byte offset of `needle` in `text[from..limit]`.
fn find_from(text: &str, from: usize, limit: usize, needle: &str) -> Option<usize> {
    let limit = limit.min(text.len());
    if from >= limit {
        return None;
    }
    text[from..limit].find(needle).map(|rel| from + rel)
}

impl Formatter for XmlProvider {
    /// Re-emits the document with two-space indentation. Whitespace-only
    /// text between elements is dropped; a declaration is kept only if the
    /// input had one.
    fn try_format(&self, text: &str) -> Result<String, FormatError> {
        let trimmed = text.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            return Err(FormatError::Empty);
        }

        let mut reader = Reader::from_str(trimmed);
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let mut depth = 0usize;
        loop {
            let event = reader.read_event()?;
            match event {
                Event::Eof => break,
                Event::Text(ref t) if t.iter().all(u8::is_ascii_whitespace) => continue,
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            writer
                .write_event(event)
                .map_err(|e| FormatError::XmlWrite(e.to_string()))?;
        }
        if depth != 0 {
            return Err(FormatError::XmlWrite("unclosed element".to_string()));
        }

        let mut formatted = String::from_utf8(writer.into_inner())?;
        formatted.push('\n');
        Ok(formatted)
    }
}
