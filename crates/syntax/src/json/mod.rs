// Chunk: docs/chunks/json_provider - JSON token provider and formatter

//! JSON highlighting and formatting.
//!
//! Tokenizing streams the text through [`JsonReader`] under the shared
//! [`ReaderLoop`], so malformed documents still get partial highlighting
//! plus one diagnostic per distinct error position.

mod reader;

pub use reader::{JsonEvent, JsonReader};

use crate::format::{FormatError, Formatter};
use crate::stream::ReaderLoop;
use crate::token::{ParseOutput, TokenKind};

/// Token provider for JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProvider;

impl JsonProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &str) -> ParseOutput {
        let mut reader = JsonReader::new(text);
        ReaderLoop::new().run(&mut reader, |event, output| {
            output.push_extent(event.start, event.end, kind_of(event.event));
        })
    }
}

fn kind_of(event: JsonEvent) -> TokenKind {
    match event {
        JsonEvent::StartObject
        | JsonEvent::EndObject
        | JsonEvent::StartArray
        | JsonEvent::EndArray => TokenKind::Bracket,
        JsonEvent::PropertyName => TokenKind::Property,
        JsonEvent::String => TokenKind::String,
        JsonEvent::Number => TokenKind::Number,
        JsonEvent::Boolean | JsonEvent::Null => TokenKind::Literal,
        JsonEvent::Comment => TokenKind::Comment,
    }
}

impl Formatter for JsonProvider {
    /// Re-serializes the document with two-space indentation, keeping key
    /// order.
    fn try_format(&self, text: &str) -> Result<String, FormatError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
