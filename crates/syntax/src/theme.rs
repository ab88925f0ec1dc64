// Chunk: docs/chunks/theme_lookup - Theme key to color lookup with fallback chain

//! Theme lookup mapping semantic theme keys to colors.
//!
//! A [`Theme`] holds the active [`Palette`] and the built-in default palette.
//! Looking up a key such as `"Accent.Bracket"` tries the exact key, then
//! progressively shorter dot-separated prefixes (`"Accent"`), first in the
//! active palette and then in the default palette. If neither palette knows
//! the key the result is white.
//!
//! One `Theme` is built per editor session and handed to providers through an
//! `Rc`. Nothing in the crate reads a theme from global state.
//!
//! # File format
//!
//! Theme files are JSON and may either nest the palette under a `"Theme"`
//! key or contain it directly:
//!
//! ```json
//! { "Theme": { "Colors": { "Accent": "Cyan", "String": "#a6e3a1" } } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use psedit_buffer::{Color, NamedColor};
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while loading a theme file.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("theme key '{key}': {source}")]
    Color {
        key: String,
        source: psedit_buffer::ParseColorError,
    },
}

/// A mapping from theme keys to colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: HashMap<String, Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in palette.
    pub fn builtin() -> Self {
        use NamedColor::*;
        let mut palette = Palette::new();
        for (key, color) in [
            ("Background", Black),
            ("Foreground", White),
            ("Accent", Cyan),
            ("Error", Red),
            ("Warning", BrightYellow),
            ("Info", BrightBlue),
            ("String", Yellow),
            ("Comment", Green),
            ("Number", Cyan),
            ("Keyword", BrightMagenta),
            ("Variable", Cyan),
            ("Selection", Blue),
        ] {
            palette.set(key, Color::Named(color));
        }
        palette
    }

    pub fn set(&mut self, key: impl Into<String>, color: Color) {
        self.colors.insert(key.into(), color);
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<Color> {
        self.colors.get(key).copied()
    }

    /// Looks up `key`, then progressively shorter prefixes.
    pub fn resolve(&self, key: &str) -> Option<Color> {
        if let Some(color) = self.get(key) {
            return Some(color);
        }

        let mut prefix = key;
        while let Some(dot_pos) = prefix.rfind('.') {
            prefix = &prefix[..dot_pos];
            if let Some(color) = self.get(prefix) {
                return Some(color);
            }
        }

        None
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Deserialize)]
struct PaletteFile {
    #[serde(rename = "Colors", default)]
    colors: HashMap<String, String>,
}

/// The theme handle shared by providers and the mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    active: Palette,
    fallback: Palette,
}

impl Theme {
    /// Builds a theme whose active palette overrides the built-in one.
    pub fn new(active: Palette) -> Self {
        Self {
            active,
            fallback: Palette::builtin(),
        }
    }

    /// Parses a theme from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ThemeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let palette_value = match value.get("Theme") {
            Some(nested) => nested.clone(),
            None => value,
        };
        let file: PaletteFile = serde_json::from_value(palette_value)?;

        let mut active = Palette::new();
        for (key, name) in file.colors {
            let color = name
                .parse::<Color>()
                .map_err(|source| ThemeError::Color {
                    key: key.clone(),
                    source,
                })?;
            active.set(key, color);
        }
        Ok(Self::new(active))
    }

    /// Loads a theme file from disk.
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Resolves a theme key: active palette, then built-in palette, then white.
    pub fn color(&self, key: &str) -> Color {
        self.active
            .resolve(key)
            .or_else(|| self.fallback.resolve(key))
            .unwrap_or(Color::WHITE)
    }

    pub fn active(&self) -> &Palette {
        &self.active
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(Palette::new())
    }
}
