// Chunk: docs/chunks/line_buffer - Rows of display units for the highlighting engine
// Chunk: docs/chunks/cell_styles - Colors and cell styles shared by the engine

//! psedit-buffer: document rows and shared value types for psedit.
//!
//! # Overview
//!
//! - [`LineBuffer`]: text split into [`Row`]s of [`DisplayUnit`]s. The first
//!   stage of the highlighting pipeline; rebuilt wholesale on every edit.
//! - [`LineIndex`]: byte offset to 1-based [`TextPos`] conversion used by the
//!   token providers.
//! - [`Position`]: 0-based logical (line, char) position.
//! - [`Color`], [`NamedColor`], [`Style`]: what the renderer paints with.
//!
//! # Example
//!
//! ```
//! use psedit_buffer::{LineBuffer, LineIndex, TextPos};
//!
//! let text = "key: value\n\tnext";
//! let rows = LineBuffer::split(text);
//! assert_eq!(rows.row_count(), 2);
//! assert_eq!(rows.row(1).display_width(4), 8);
//!
//! let index = LineIndex::new(text);
//! assert_eq!(index.position(11), TextPos::new(2, 1));
//! ```

mod line_buffer;
mod line_index;
mod style;
mod types;

pub use line_buffer::{DisplayUnit, LineBuffer, Row, UnitWidth};
pub use line_index::LineIndex;
pub use style::{Color, NamedColor, ParseColorError, Style, UnderlineStyle};
pub use types::{Position, TextPos};
