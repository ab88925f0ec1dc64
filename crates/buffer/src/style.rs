// Chunk: docs/chunks/cell_styles - Colors and cell styles shared by the engine
//!
//! Color and style types for painted cells.
//!
//! # Overview
//!
//! - [`Color`]: Named (16 ANSI), indexed (256), and RGB
//! - [`Style`]: Foreground/background plus the diagnostic underline
//!
//! Colors can be parsed from theme files. The accepted names are the 16 ANSI
//! names plus the console aliases `Brown`, `Gray` and `DarkGray`, and
//! `#rrggbb` hex triples.

use std::str::FromStr;

use thiserror::Error;

// =============================================================================
// Color Types
// =============================================================================

/// The 16 standard ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl NamedColor {
    /// Returns the ANSI palette index (0-15).
    pub fn ansi_index(self) -> u8 {
        match self {
            NamedColor::Black => 0,
            NamedColor::Red => 1,
            NamedColor::Green => 2,
            NamedColor::Yellow => 3,
            NamedColor::Blue => 4,
            NamedColor::Magenta => 5,
            NamedColor::Cyan => 6,
            NamedColor::White => 7,
            NamedColor::BrightBlack => 8,
            NamedColor::BrightRed => 9,
            NamedColor::BrightGreen => 10,
            NamedColor::BrightYellow => 11,
            NamedColor::BrightBlue => 12,
            NamedColor::BrightMagenta => 13,
            NamedColor::BrightCyan => 14,
            NamedColor::BrightWhite => 15,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => NamedColor::Black,
            "red" => NamedColor::Red,
            "green" => NamedColor::Green,
            "yellow" | "brown" => NamedColor::Yellow,
            "blue" => NamedColor::Blue,
            "magenta" => NamedColor::Magenta,
            "cyan" => NamedColor::Cyan,
            "white" | "gray" | "grey" => NamedColor::White,
            "brightblack" | "darkgray" | "darkgrey" => NamedColor::BrightBlack,
            "brightred" => NamedColor::BrightRed,
            "brightgreen" => NamedColor::BrightGreen,
            "brightyellow" => NamedColor::BrightYellow,
            "brightblue" => NamedColor::BrightBlue,
            "brightmagenta" => NamedColor::BrightMagenta,
            "brightcyan" => NamedColor::BrightCyan,
            "brightwhite" => NamedColor::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Terminal color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Default foreground/background (terminal decides).
    #[default]
    Default,
    /// Named ANSI colors (0-15).
    Named(NamedColor),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// The hard fallback used when no theme defines a key.
    pub const WHITE: Color = Color::Named(NamedColor::White);

    pub const fn named(color: NamedColor) -> Self {
        Color::Named(color)
    }
}

/// Error returned when a color name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color '{input}'")]
pub struct ParseColorError {
    pub input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseColorError {
            input: s.to_string(),
        };

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Color::Rgb {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
            });
        }

        if trimmed.eq_ignore_ascii_case("default") {
            return Ok(Color::Default);
        }

        NamedColor::from_name(trimmed)
            .map(Color::Named)
            .ok_or_else(err)
    }
}

// =============================================================================
// Underline Types
// =============================================================================

/// Underline rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineStyle {
    /// No underline.
    #[default]
    None,
    /// Curly/wavy underline, drawn under diagnostic cells.
    Curly,
}

// =============================================================================
// Style
// =============================================================================

/// Attributes for one painted cell.
///
/// # Example
///
/// ```
/// use psedit_buffer::{Style, Color, NamedColor, UnderlineStyle};
///
/// let style = Style {
///     fg: Color::Named(NamedColor::Red),
///     underline: UnderlineStyle::Curly,
///     ..Style::default()
/// };
/// assert_eq!(style.bg, Color::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Underline style.
    pub underline: UnderlineStyle,
}

impl Style {
    pub fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            ..Style::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Color Tests ====================

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default(), Color::Default);
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!("Cyan".parse::<Color>(), Ok(Color::Named(NamedColor::Cyan)));
        assert_eq!(
            "brightyellow".parse::<Color>(),
            Ok(Color::Named(NamedColor::BrightYellow))
        );
    }

    #[test]
    fn test_parse_console_aliases() {
        assert_eq!("Brown".parse::<Color>(), Ok(Color::Named(NamedColor::Yellow)));
        assert_eq!("Gray".parse::<Color>(), Ok(Color::Named(NamedColor::White)));
        assert_eq!(
            "DarkGray".parse::<Color>(),
            Ok(Color::Named(NamedColor::BrightBlack))
        );
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            "#89b4fa".parse::<Color>(),
            Ok(Color::Rgb {
                r: 0x89,
                g: 0xb4,
                b: 0xfa
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("Chartreuse".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_error_names_input() {
        let err = " Chartreuse".parse::<Color>().unwrap_err();
        assert_eq!(err.input, " Chartreuse");
        assert_eq!(err.to_string(), "unknown color ' Chartreuse'");
    }

    #[test]
    fn test_ansi_index() {
        assert_eq!(NamedColor::Black.ansi_index(), 0);
        assert_eq!(NamedColor::BrightWhite.ansi_index(), 15);
    }

    // ==================== Style Tests ====================

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert_eq!(style.underline, UnderlineStyle::None);
    }

    #[test]
    fn test_style_new() {
        let style = Style::new(Color::WHITE, Color::Named(NamedColor::Blue));
        assert_eq!(style.fg, Color::WHITE);
        assert_eq!(style.bg, Color::Named(NamedColor::Blue));
    }
}
