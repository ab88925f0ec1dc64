// Chunk: docs/chunks/editor_config - Config file
//!
//! Editor configuration.
//!
//! Stored as JSON at `<config_dir>/psedit/config.json`:
//!
//! ```json
//! { "tab_width": 4, "theme": "/path/to/theme.json", "language": "yaml" }
//! ```
//!
//! Every field is optional. A missing file is not an error; it yields the
//! defaults.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use psedit_syntax::{Language, Theme, ThemeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Theme(#[from] ThemeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_width: usize,
    /// Theme file to load instead of the built-in palette.
    pub theme: Option<PathBuf>,
    /// Language for every document, overriding extension detection.
    pub language: Option<Language>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            theme: None,
            language: None,
        }
    }
}

impl EditorConfig {
    /// `<config_dir>/psedit/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("psedit").join("config.json"))
    }

    /// Loads the config at the default location, or defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let mut config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if config.tab_width == 0 {
            config.tab_width = DEFAULT_TAB_WIDTH;
        }
        Ok(config)
    }

    /// The configured theme, or the built-in one.
    pub fn theme(&self) -> Result<Rc<Theme>, ConfigError> {
        let theme = match &self.theme {
            Some(path) => Theme::load(path)?,
            None => Theme::default(),
        };
        Ok(Rc::new(theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psedit_buffer::{Color, NamedColor};
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = EditorConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{ "language": "yaml" }"#);
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.tab_width, 4);
        assert_eq!(config.language, Some(Language::Yaml));
    }

    #[test]
    fn test_zero_tab_width_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{ "tab_width": 0 }"#);
        assert_eq!(EditorConfig::load(&path).unwrap().tab_width, 4);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", "{ tab_width: ");
        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_theme_from_file() {
        let dir = TempDir::new().unwrap();
        let theme_path = write(
            &dir,
            "theme.json",
            r#"{ "Theme": { "Colors": { "Accent": "Magenta" } } }"#,
        );
        let config = EditorConfig {
            theme: Some(theme_path),
            ..EditorConfig::default()
        };
        let theme = config.theme().unwrap();
        assert_eq!(theme.color("Accent"), Color::Named(NamedColor::Magenta));
        assert_eq!(theme.color("Error"), Color::Named(NamedColor::Red));
    }

    #[test]
    fn test_missing_theme_file_is_error() {
        let config = EditorConfig {
            theme: Some(PathBuf::from("/definitely/not/here.json")),
            ..EditorConfig::default()
        };
        assert!(config.theme().is_err());
    }
}
