// Chunk: docs/chunks/formatters - Formatters with original-text fallback

//! Formatter contract shared by the languages that support formatting.
//!
//! A [`Formatter`] may fail; callers go through [`format_or_original`],
//! which never fails and never loses text. On an error, or on empty output
//! for non-empty input, it returns the input unchanged.

use thiserror::Error;
use tracing::warn;

/// Why a formatter could not produce output.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] yaml_rust2::ScanError),
    #[error("failed to emit YAML: {0}")]
    YamlEmit(String),
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to write XML: {0}")]
    XmlWrite(String),
    #[error("formatter produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("document is empty")]
    Empty,
}

/// Reformats a whole document.
pub trait Formatter {
    fn try_format(&self, text: &str) -> Result<String, FormatError>;
}

/// Formats `text`, falling back to the original text on any failure.
pub fn format_or_original(formatter: &dyn Formatter, text: &str) -> String {
    match formatter.try_format(text) {
        Ok(formatted) if !formatted.trim().is_empty() || text.trim().is_empty() => formatted,
        Ok(_) => {
            warn!("formatter returned empty output; keeping original text");
            text.to_string()
        }
        Err(err) => {
            warn!(%err, "format failed; keeping original text");
            text.to_string()
        }
    }
}
