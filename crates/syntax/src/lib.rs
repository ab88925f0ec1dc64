// Chunk: docs/chunks/token_providers - Per-language token providers

//! psedit-syntax: token providers, formatters and theme lookup for psedit.
//!
//! Every provider consumes a whole document and returns a [`ParseOutput`]:
//! line-based [`Token`]s plus [`DiagnosticSpan`]s for malformed input.
//! Providers never fail. Formatters may fail internally but are always
//! called through [`format_or_original`], which falls back to the input.
//!
//! # Overview
//!
//! - [`LanguageProvider`]: one of the five language backends bound to a
//!   [`Theme`]; implements [`Tokenizer`], the seam the editor consumes.
//! - [`Theme`]: theme key to [`psedit_buffer::Color`] lookup with dotted-key
//!   and built-in palette fallback.
//! - [`LanguageRegistry`]: file extension to [`Language`].
//! - [`ReaderLoop`]: the error-deduplicating driver shared by the streaming
//!   providers (JSON, YAML).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use psedit_syntax::{Language, LanguageProvider, Theme, TokenKind, Tokenizer};
//!
//! let provider = LanguageProvider::new(Language::Json, Rc::new(Theme::default()));
//! let output = provider.tokenize("{\"a\":1}");
//! assert_eq!(output.tokens[1].kind, TokenKind::Property);
//! assert!(output.diagnostics.is_empty());
//! ```

mod format;
mod json;
mod markdown;
mod provider;
mod registry;
mod script;
mod stream;
mod theme;
mod token;
mod xml;
mod yaml;

pub use format::{format_or_original, FormatError, Formatter};
pub use json::{JsonEvent, JsonProvider, JsonReader};
pub use markdown::MarkdownProvider;
pub use provider::{LanguageBackend, LanguageProvider, Tokenizer};
pub use registry::{Capabilities, Language, LanguageRegistry};
pub use script::{
    lex, Delimiter, ScriptParse, ScriptParseError, ScriptParser, ScriptProvider, ScriptToken,
    ScriptTokenKind, StructureParser,
};
pub use stream::{Positioned, PullReader, ReadCursor, ReaderError, ReaderLoop, Step};
pub use theme::{Palette, Theme, ThemeError};
pub use token::{split_extent, ColumnRange, DiagnosticSpan, ParseOutput, Token, TokenKind};
pub use xml::XmlProvider;
pub use yaml::{YamlEvent, YamlProvider, YamlReader};
