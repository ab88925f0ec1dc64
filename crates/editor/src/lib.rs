// Chunk: docs/chunks/highlight_engine - Reparse gate, coordinate mapper, diagnostic index
//!
//! psedit: the highlighting engine of a terminal editor for PowerShell, JSON,
//! XML, YAML and Markdown.
//!
//! # Overview
//!
//! One [`EditorContext`] per open document. On every redraw the renderer
//! hands it the text, the [`LineBuffer`](psedit_buffer::LineBuffer) rows and
//! the [`Viewport`]; the context decides through its [`HighlightCache`]
//! whether to retokenize, remap, or reuse, and then answers per-cell color,
//! style and diagnostic queries.
//!
//! ```text
//! text ──► LineBuffer ─────────────────────────┐
//!   │                                           ▼
//!   └──► Tokenizer ──► ParseOutput ──► LineTable ──► map_viewport ──► ColorMap
//!                          │
//!                          └──► DiagnosticIndex ──► diagnostic table
//! ```
//!
//! Around the engine sit the collaborators a full editor needs: [`config`],
//! [`logging`], the script [`runner`], [`completion`] insertion, and
//! [`ansi`] output for the command line.

pub mod ansi;
pub mod cache;
pub mod completion;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod logging;
pub mod mapper;
pub mod runner;
pub mod selection;
pub mod viewport;

pub use cache::{should_reparse, Decision, HighlightCache};
pub use config::{ConfigError, EditorConfig};
pub use context::EditorContext;
pub use diagnostics::{DiagnosticIndex, DiagnosticRow};
pub use mapper::{map_viewport, CellDiagnostics, ColorMap, LineTable, MappedCell, MappedView, ScreenPoint};
pub use runner::{ProcessRunner, RunTarget, Runner};
pub use selection::Selection;
pub use viewport::Viewport;
