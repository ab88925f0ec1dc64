// Chunk: docs/chunks/language_registry - Extension to language mapping

//! Language registry mapping file extensions to supported languages.
//!
//! The language is chosen once per document load. Every later decision
//! (which provider tokenizes, whether formatting is offered) flows from the
//! [`Language`] value picked here.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The languages the editor highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    PowerShell,
    Json,
    Yaml,
    Xml,
    Markdown,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::PowerShell,
        Language::Json,
        Language::Yaml,
        Language::Xml,
        Language::Markdown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::PowerShell => "PowerShell",
            Language::Json => "JSON",
            Language::Yaml => "YAML",
            Language::Xml => "XML",
            Language::Markdown => "Markdown",
        }
    }

    /// What the editor offers for documents in this language.
    pub fn capabilities(self) -> Capabilities {
        match self {
            Language::PowerShell => Capabilities {
                can_format: false,
                can_run: true,
                can_highlight: true,
                can_autocomplete: true,
            },
            Language::Json | Language::Yaml | Language::Xml => Capabilities {
                can_format: true,
                can_run: false,
                can_highlight: true,
                can_autocomplete: false,
            },
            Language::Markdown => Capabilities {
                can_format: false,
                can_run: false,
                can_highlight: true,
                can_autocomplete: false,
            },
        }
    }
}

/// Editor features available for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_format: bool,
    pub can_run: bool,
    pub can_highlight: bool,
    pub can_autocomplete: bool,
}

/// Registry mapping file extensions to languages.
pub struct LanguageRegistry {
    /// Map from lowercase extension (without leading dot) to language
    languages: HashMap<&'static str, Language>,
}

impl LanguageRegistry {
    /// Creates a registry with every supported extension.
    pub fn new() -> Self {
        let mut languages = HashMap::new();

        for ext in ["ps1", "psm1", "psd1"] {
            languages.insert(ext, Language::PowerShell);
        }
        languages.insert("json", Language::Json);
        for ext in ["yml", "yaml"] {
            languages.insert(ext, Language::Yaml);
        }
        for ext in ["xml", "csproj", "props", "targets", "config", "xaml", "svg"] {
            languages.insert(ext, Language::Xml);
        }
        for ext in ["md", "markdown"] {
            languages.insert(ext, Language::Markdown);
        }

        Self { languages }
    }

    /// Returns the language for an extension (without leading dot).
    pub fn language_for_extension(&self, ext: &str) -> Option<Language> {
        self.languages.get(ext.to_ascii_lowercase().as_str()).copied()
    }

    /// Returns the language for a path based on its extension.
    pub fn language_for_path(&self, path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?;
        self.language_for_extension(ext)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
