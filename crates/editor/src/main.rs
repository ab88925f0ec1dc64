// Chunk: docs/chunks/cli - psedit command line
//!
//! `psedit`: drives the highlighting engine from the command line.
//!
//! ```text
//! psedit check  <file>             list diagnostics, exit 1 if any
//! psedit format <file> [--write]   print or rewrite the formatted text
//! psedit show   <file> [--top N] [--height H] [--left L] [--width W]
//! psedit run    <file>             run a script through the interpreter
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use psedit::ansi::render_view;
use psedit::logging::{self, LogConfig};
use psedit::{EditorConfig, EditorContext, ProcessRunner, RunTarget, Runner, Viewport};
use psedit_buffer::LineBuffer;
use psedit_syntax::{Language, LanguageRegistry};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Parser)]
#[command(name = "psedit", version, about = "Multi-language highlighting engine")]
struct Cli {
    /// Config file (default: <config_dir>/psedit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Theme file, overriding the config
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Tab width, overriding the config
    #[arg(long, global = true)]
    tab_width: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the diagnostics table
    Check { file: PathBuf },
    /// Format a JSON, YAML or XML document
    Format {
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },
    /// Render a viewport of the document with ANSI colors
    Show {
        file: PathBuf,
        #[arg(long, default_value_t = 0)]
        top: usize,
        #[arg(long, default_value_t = 24)]
        height: usize,
        #[arg(long, default_value_t = 0)]
        left: usize,
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
    /// Run a script
    Run { file: PathBuf },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] psedit::ConfigError),
    #[error(transparent)]
    Log(#[from] logging::LogError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported file type: {0}")]
    UnknownLanguage(PathBuf),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode, CliError> {
    let _log_guard = logging::init(LogConfig {
        log_file: cli.log_file.clone(),
    })?;

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::load_default()?,
    };
    if let Some(theme) = cli.theme {
        config.theme = Some(theme);
    }
    if let Some(tab_width) = cli.tab_width.filter(|w| *w > 0) {
        config.tab_width = tab_width;
    }
    debug!(?config, "loaded config");

    match cli.command {
        Command::Check { file } => check(&config, &file),
        Command::Format { file, write } => format(&config, &file, write),
        Command::Show {
            file,
            top,
            height,
            left,
            width,
        } => show(&config, &file, Viewport::new(top, height, left, left + width)),
        Command::Run { file } => run(&file),
    }
}

fn language_of(config: &EditorConfig, path: &Path) -> Result<Language, CliError> {
    config
        .language
        .or_else(|| LanguageRegistry::new().language_for_path(path))
        .ok_or_else(|| CliError::UnknownLanguage(path.to_path_buf()))
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn context_for(config: &EditorConfig, path: &Path) -> Result<EditorContext, CliError> {
    let language = language_of(config, path)?;
    Ok(EditorContext::for_language(
        language,
        config.theme()?,
        config.tab_width,
    ))
}

fn check(config: &EditorConfig, path: &Path) -> Result<ExitCode, CliError> {
    let text = read(path)?;
    let rows = LineBuffer::split(&text);
    let mut ctx = context_for(config, path)?;
    ctx.parse_text(Viewport::sized(0, 0), &text, &rows);

    let table = ctx.diagnostic_table();
    for row in &table {
        println!("{}:{}:{}: {}", path.display(), row.line, row.column, row.message);
    }
    println!("{} diagnostic(s)", table.len());

    Ok(if table.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn format(config: &EditorConfig, path: &Path, write: bool) -> Result<ExitCode, CliError> {
    let text = read(path)?;
    let ctx = context_for(config, path)?;
    if !ctx.language().capabilities().can_format {
        warn!(language = ctx.language().name(), "no formatter; text left unchanged");
    }
    let formatted = ctx.format(&text);

    if write {
        std::fs::write(path, &formatted).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    } else {
        print!("{formatted}");
    }
    Ok(ExitCode::SUCCESS)
}

fn show(config: &EditorConfig, path: &Path, viewport: Viewport) -> Result<ExitCode, CliError> {
    let text = read(path)?;
    let rows = LineBuffer::split(&text);
    let mut ctx = context_for(config, path)?;
    ctx.parse_text(viewport, &text, &rows);
    print!("{}", render_view(&ctx, &viewport, &rows, None));
    Ok(ExitCode::SUCCESS)
}

fn run(path: &Path) -> Result<ExitCode, CliError> {
    let output = ProcessRunner::default().run(&RunTarget::File(path.to_path_buf()));
    print!("{output}");
    Ok(ExitCode::SUCCESS)
}
