// Chunk: docs/chunks/token_providers - Closed set of language providers

//! The language provider seam.
//!
//! # Overview
//!
//! [`Tokenizer`] is what the highlight engine consumes: text in, tokens and
//! diagnostics out, plus a color for each token kind. [`LanguageProvider`]
//! is the production implementation. It pairs one of the five language
//! backends with the theme handle the colors are resolved through.
//!
//! The set of languages is closed, so dispatch is a plain `match` over
//! [`LanguageBackend`] rather than a trait object.

use std::rc::Rc;

use psedit_buffer::Color;

use crate::format::format_or_original;
use crate::json::JsonProvider;
use crate::markdown::MarkdownProvider;
use crate::registry::{Capabilities, Language};
use crate::script::ScriptProvider;
use crate::theme::Theme;
use crate::token::{ParseOutput, TokenKind};
use crate::xml::XmlProvider;
use crate::yaml::YamlProvider;

/// Tokenizes whole documents and colors token kinds.
///
/// Implementations never fail: malformed input produces diagnostics.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> ParseOutput;

    fn color_of(&self, kind: TokenKind) -> Color;

    /// Reformats a whole document. Without a formatter the text comes back
    /// unchanged.
    fn format(&self, text: &str) -> String {
        text.to_string()
    }
}

/// One provider per supported language.
#[derive(Debug, Clone)]
pub enum LanguageBackend {
    PowerShell(ScriptProvider),
    Json(JsonProvider),
    Yaml(YamlProvider),
    Xml(XmlProvider),
    Markdown(MarkdownProvider),
}

impl LanguageBackend {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::PowerShell => LanguageBackend::PowerShell(ScriptProvider::new()),
            Language::Json => LanguageBackend::Json(JsonProvider::new()),
            Language::Yaml => LanguageBackend::Yaml(YamlProvider::new()),
            Language::Xml => LanguageBackend::Xml(XmlProvider::new()),
            Language::Markdown => LanguageBackend::Markdown(MarkdownProvider::new()),
        }
    }

    pub fn language(&self) -> Language {
        match self {
            LanguageBackend::PowerShell(_) => Language::PowerShell,
            LanguageBackend::Json(_) => Language::Json,
            LanguageBackend::Yaml(_) => Language::Yaml,
            LanguageBackend::Xml(_) => Language::Xml,
            LanguageBackend::Markdown(_) => Language::Markdown,
        }
    }

    pub fn tokenize(&self, text: &str) -> ParseOutput {
        match self {
            LanguageBackend::PowerShell(p) => p.tokenize(text),
            LanguageBackend::Json(p) => p.tokenize(text),
            LanguageBackend::Yaml(p) => p.tokenize(text),
            LanguageBackend::Xml(p) => p.tokenize(text),
            LanguageBackend::Markdown(p) => p.tokenize(text),
        }
    }

    /// Formats `text`, or returns it unchanged when the language has no
    /// formatter or formatting fails.
    pub fn format(&self, text: &str) -> String {
        match self {
            LanguageBackend::Json(p) => format_or_original(p, text),
            LanguageBackend::Yaml(p) => format_or_original(p, text),
            LanguageBackend::Xml(p) => format_or_original(p, text),
            LanguageBackend::PowerShell(_) | LanguageBackend::Markdown(_) => text.to_string(),
        }
    }
}

/// A language backend bound to a theme.
#[derive(Debug, Clone)]
pub struct LanguageProvider {
    theme: Rc<Theme>,
    backend: LanguageBackend,
}

impl LanguageProvider {
    pub fn new(language: Language, theme: Rc<Theme>) -> Self {
        Self::with_backend(LanguageBackend::for_language(language), theme)
    }

    pub fn with_backend(backend: LanguageBackend, theme: Rc<Theme>) -> Self {
        Self { theme, backend }
    }

    pub fn language(&self) -> Language {
        self.backend.language()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.language().capabilities()
    }

    pub fn theme(&self) -> &Rc<Theme> {
        &self.theme
    }
}

impl Tokenizer for LanguageProvider {
    fn tokenize(&self, text: &str) -> ParseOutput {
        self.backend.tokenize(text)
    }

    fn color_of(&self, kind: TokenKind) -> Color {
        self.theme.color(kind.theme_key())
    }

    fn format(&self, text: &str) -> String {
        self.backend.format(text)
    }
}
