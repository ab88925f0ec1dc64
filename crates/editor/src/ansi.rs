// Chunk: docs/chunks/ansi_output - SGR rendering of mapped cells
//!
//! Turns a mapped viewport into text with SGR escape sequences, for printing
//! to a terminal.
//!
//! Only cells the mapper produced are painted. A row ends at the last mapped
//! cell; nothing is padded out to the viewport width. A style escape is
//! written only when the style changes, and every row ends with a reset.

use psedit_buffer::{Color, LineBuffer, Style, UnderlineStyle, UnitWidth};
use psedit_syntax::Tokenizer;

use crate::context::EditorContext;
use crate::mapper::ScreenPoint;
use crate::selection::Selection;
use crate::viewport::Viewport;

const RESET: &str = "\x1b[0m";

/// The SGR escape selecting `style`, starting from a reset.
pub fn sgr(style: Style) -> String {
    let mut params = vec!["0".to_string()];
    if style.underline == UnderlineStyle::Curly {
        params.push("4:3".to_string());
    }
    params.push(color_param(style.fg, false));
    params.push(color_param(style.bg, true));
    format!("\x1b[{}m", params.join(";"))
}

fn color_param(color: Color, background: bool) -> String {
    let base = if background { 40 } else { 30 };
    match color {
        Color::Default => (base + 9).to_string(),
        Color::Named(named) => {
            let index = named.ansi_index();
            if index < 8 {
                (base + u16::from(index)).to_string()
            } else {
                (base + 60 + u16::from(index - 8)).to_string()
            }
        }
        Color::Indexed(index) => format!("{};5;{}", base + 8, index),
        Color::Rgb { r, g, b } => format!("{};2;{};{};{}", base + 8, r, g, b),
    }
}

/// Paints the cells of the last [`EditorContext::parse_text`] call.
///
/// `viewport` and `rows` must be the ones that call was given.
pub fn render_view<T: Tokenizer>(
    ctx: &EditorContext<T>,
    viewport: &Viewport,
    rows: &LineBuffer,
    selection: Option<&Selection>,
) -> String {
    let mut out = String::new();
    let screen_rows = viewport.visible_rows(rows.row_count()).len();

    for y in 0..screen_rows {
        let mut current: Option<Style> = None;
        let mut last_wide = None;

        for x in 0..viewport.width() {
            let point = ScreenPoint::new(x, y);
            let Some(cell) = ctx.cell(point) else {
                break;
            };
            let Some(unit) = rows
                .get(cell.source.line)
                .and_then(|row| row.units().get(cell.source.col))
            else {
                break;
            };

            // The trailing cell of a wide glyph was painted with its head
            if unit.width == UnitWidth::Wide && last_wide == Some(cell.source) {
                continue;
            }
            last_wide = (unit.width == UnitWidth::Wide).then_some(cell.source);

            let style = ctx.cell_style(point, selection);
            if current != Some(style) {
                out.push_str(&sgr(style));
                current = Some(style);
            }
            let ch = if unit.width == UnitWidth::Tab { ' ' } else { unit.ch };
            out.push(ch);
        }

        if current.is_some() {
            out.push_str(RESET);
        }
        out.push('\n');
    }
    out
}
