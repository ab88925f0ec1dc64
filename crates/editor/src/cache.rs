// Chunk: docs/chunks/highlight_cache - Reparse gate and highlight cache
//!
//! Reparse gate and highlight cache.
//!
//! Highlighting has two costs with very different sizes. Tokenizing reads the
//! whole document and runs a language parser; mapping walks only the visible
//! cells. The cache keeps the result of the last tokenize together with the
//! text it was computed from, and the viewport of the last mapping pass, so
//! each redraw does the least work that is still correct:
//!
//! - text changed (by value): [`Decision::Reparse`], then remap
//! - text same, viewport changed: [`Decision::Remap`]
//! - both same: [`Decision::Reuse`], nothing runs
//!
//! There is no incremental diffing. A reparse replaces tokens, the line
//! table and the diagnostic index together.

use psedit_syntax::ParseOutput;
use tracing::trace;

use crate::diagnostics::DiagnosticIndex;
use crate::mapper::LineTable;
use crate::viewport::Viewport;

/// Whether `new_text` must be tokenized again.
///
/// True iff no text has been cached or the cached text differs by value.
pub fn should_reparse(new_text: &str, cached_text: Option<&str>) -> bool {
    cached_text != Some(new_text)
}

/// What a redraw has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing changed; the current color map is still valid.
    Reuse,
    /// Same text, different viewport: map again from cached tokens.
    Remap,
    /// Text changed: tokenize, rebuild diagnostics, then map.
    Reparse,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightCache {
    /// Text the cached tokens were computed from
    snapshot: Option<String>,
    /// Viewport of the last mapping pass
    viewport: Option<Viewport>,
    output: ParseOutput,
    table: LineTable,
    diagnostics: DiagnosticIndex,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&self, text: &str, viewport: &Viewport) -> Decision {
        let decision = if should_reparse(text, self.snapshot.as_deref()) {
            Decision::Reparse
        } else if self.viewport.as_ref() != Some(viewport) {
            Decision::Remap
        } else {
            Decision::Reuse
        };
        trace!(?decision, ?viewport, "highlight cache decision");
        decision
    }

    /// Replaces everything derived from the text.
    ///
    /// The viewport is forgotten, so the next decision for the same text is
    /// at least a remap.
    pub fn store_parse(&mut self, text: &str, output: ParseOutput, table: LineTable) {
        self.diagnostics = DiagnosticIndex::build(&output.diagnostics);
        self.snapshot = Some(text.to_string());
        self.viewport = None;
        self.output = output;
        self.table = table;
    }

    pub fn store_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Forgets everything; the next decision is a reparse.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn output(&self) -> &ParseOutput {
        &self.output
    }

    pub fn table(&self) -> &LineTable {
        &self.table
    }

    pub fn diagnostics(&self) -> &DiagnosticIndex {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psedit_buffer::TextPos;

    // ==================== Reparse Gate Tests ====================

    #[test]
    fn test_should_reparse_when_nothing_cached() {
        assert!(should_reparse("", None));
        assert!(should_reparse("x", None));
    }

    #[test]
    fn test_should_reparse_compares_by_value() {
        let cached = String::from("{\"a\":1}");
        let same = "{\"a\":1}".to_string();
        assert!(!should_reparse(&same, Some(cached.as_str())));
        assert!(should_reparse("{\"a\":2}", Some(cached.as_str())));
    }

    // ==================== Decision Tests ====================

    #[test]
    fn test_fresh_cache_reparses() {
        let cache = HighlightCache::new();
        assert_eq!(cache.decide("", &Viewport::sized(80, 24)), Decision::Reparse);
    }

    #[test]
    fn test_decisions_after_store() {
        let viewport = Viewport::sized(80, 24);
        let mut cache = HighlightCache::new();
        cache.store_parse("text", ParseOutput::new(), LineTable::default());

        assert_eq!(cache.decide("text", &viewport), Decision::Remap);
        cache.store_viewport(viewport);
        assert_eq!(cache.decide("text", &viewport), Decision::Reuse);
        assert_eq!(cache.decide("text", &viewport.scrolled_to(1)), Decision::Remap);
        assert_eq!(cache.decide("text", &viewport.panned_to(3)), Decision::Remap);
        assert_eq!(cache.decide("text!", &viewport), Decision::Reparse);
    }

    #[test]
    fn test_store_parse_rebuilds_diagnostic_index() {
        let mut output = ParseOutput::new();
        output.push_diagnostic(TextPos::new(1, 1), TextPos::new(1, 2), "bad");
        let mut cache = HighlightCache::new();
        cache.store_parse("x", output, LineTable::default());
        assert_eq!(cache.diagnostics().len(), 1);

        cache.store_parse("y", ParseOutput::new(), LineTable::default());
        assert!(cache.diagnostics().is_empty());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = HighlightCache::new();
        cache.store_parse("x", ParseOutput::new(), LineTable::default());
        cache.invalidate();
        assert_eq!(cache.snapshot(), None);
        assert_eq!(cache.decide("x", &Viewport::default()), Decision::Reparse);
    }
}
