// Chunk: docs/chunks/highlight_engine - Per-document highlighting session
//!
//! Editor context: the highlighting state for one open document.
//!
//! The renderer calls [`EditorContext::parse_text`] on every redraw with the
//! current text, its rows and the viewport, then queries cells with
//! [`EditorContext::color_at`] or [`EditorContext::cell_style`]. Everything
//! runs synchronously on that call; the [`HighlightCache`] decides how much
//! of the pipeline has to run.
//!
//! The context is the single writer of its cache and maps, so it needs no
//! locking. It is not `Send` (the theme handle is an `Rc`), which keeps it on
//! the thread that draws.

use std::collections::BTreeMap;
use std::rc::Rc;

use psedit_buffer::{Color, LineBuffer, Position, Style, TextPos, UnderlineStyle};
use psedit_syntax::{Language, LanguageProvider, Theme, Tokenizer};
use tracing::debug;

use crate::cache::{Decision, HighlightCache};
use crate::diagnostics::DiagnosticRow;
use crate::mapper::{map_viewport, CellDiagnostics, ColorMap, LineTable, MappedCell, ScreenPoint};
use crate::selection::Selection;
use crate::viewport::Viewport;

pub struct EditorContext<T: Tokenizer = LanguageProvider> {
    tokenizer: T,
    theme: Rc<Theme>,
    tab_width: usize,
    cache: HighlightCache,
    /// Color map of the last mapping pass
    colors: ColorMap,
    /// Accumulated across remaps; cleared on reparse
    cell_diagnostics: CellDiagnostics,
}

impl EditorContext<LanguageProvider> {
    /// A context highlighting `language` with the given theme.
    pub fn for_language(language: Language, theme: Rc<Theme>, tab_width: usize) -> Self {
        let provider = LanguageProvider::new(language, Rc::clone(&theme));
        Self::new(provider, theme, tab_width)
    }

    pub fn language(&self) -> Language {
        self.tokenizer.language()
    }
}

impl<T: Tokenizer> EditorContext<T> {
    pub fn new(tokenizer: T, theme: Rc<Theme>, tab_width: usize) -> Self {
        Self {
            tokenizer,
            theme,
            tab_width: tab_width.max(1),
            cache: HighlightCache::new(),
            colors: ColorMap::new(),
            cell_diagnostics: CellDiagnostics::new(),
        }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Brings the color and diagnostic maps up to date for `text` seen
    /// through `viewport`. `rows` must be the line buffer of `text`.
    ///
    /// Returns what had to be done.
    pub fn parse_text(&mut self, viewport: Viewport, text: &str, rows: &LineBuffer) -> Decision {
        let decision = self.cache.decide(text, &viewport);
        match decision {
            Decision::Reuse => return decision,
            Decision::Reparse => {
                let output = self.tokenizer.tokenize(text);
                debug!(
                    tokens = output.tokens.len(),
                    diagnostics = output.diagnostics.len(),
                    "reparsed document"
                );
                let table = LineTable::build(&output, &self.tokenizer);
                self.cache.store_parse(text, output, table);
                self.cell_diagnostics.clear();
            }
            Decision::Remap => {
                debug!(?viewport, "remapping viewport");
            }
        }

        let view = map_viewport(
            &viewport,
            rows,
            self.cache.table(),
            self.tab_width,
            self.foreground(),
        );
        self.colors = view.colors;
        for (pos, message) in view.cell_diagnostics {
            self.cell_diagnostics.entry(pos).or_insert(message);
        }
        self.cache.store_viewport(viewport);
        decision
    }

    /// Reformats `text` through the language's formatter.
    pub fn format(&self, text: &str) -> String {
        self.tokenizer.format(text)
    }

    /// Color of a screen cell; the default foreground outside mapped cells.
    pub fn color_at(&self, point: ScreenPoint) -> Color {
        self.colors
            .get(&point)
            .map_or_else(|| self.foreground(), |cell| cell.color)
    }

    pub fn cell(&self, point: ScreenPoint) -> Option<&MappedCell> {
        self.colors.get(&point)
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.colors
    }

    /// Style for a screen cell: selection over diagnostic over plain.
    ///
    /// Diagnostic cells keep a curly underline even when selected.
    pub fn cell_style(&self, point: ScreenPoint, selection: Option<&Selection>) -> Style {
        let cell = self.colors.get(&point);
        let fg = cell.map_or_else(|| self.foreground(), |c| c.color);
        let selected = match (cell, selection) {
            (Some(cell), Some(selection)) => selection.contains(cell.source),
            _ => false,
        };

        let diagnostic = cell.is_some_and(|c| c.diagnostic);
        let bg_key = if selected {
            "Selection"
        } else if diagnostic {
            "Error"
        } else {
            "Background"
        };
        Style {
            underline: if diagnostic {
                UnderlineStyle::Curly
            } else {
                UnderlineStyle::None
            },
            ..Style::new(fg, self.theme.color(bg_key))
        }
    }

    /// Diagnostic messages keyed by the position each one was reported at.
    pub fn errors(&self) -> &BTreeMap<TextPos, String> {
        self.cache.diagnostics().points()
    }

    /// Rows for a diagnostics list, sorted by line then column.
    pub fn diagnostic_table(&self) -> Vec<DiagnosticRow> {
        self.cache.diagnostics().table()
    }

    /// Diagnostic covering a logical cell that has been on screen.
    pub fn cell_diagnostic(&self, pos: Position) -> Option<&str> {
        self.cell_diagnostics.get(&pos).map(String::as_str)
    }

    pub fn cell_diagnostics(&self) -> &CellDiagnostics {
        &self.cell_diagnostics
    }

    /// Forces the next `parse_text` to tokenize again.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    fn foreground(&self) -> Color {
        self.theme.color("Foreground")
    }
}
