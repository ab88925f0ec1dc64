// Chunk: docs/chunks/script_runner - Run collaborator for scripts
//!
//! Runs scripts through an external interpreter.
//!
//! [`Runner::run`] never fails. Whatever happens (the interpreter is missing,
//! the script exits non-zero, output is not UTF-8) the caller gets text it
//! can show in an output pane.

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    /// A script file on disk.
    File(PathBuf),
    /// Script text, passed inline.
    Inline(String),
}

pub trait Runner {
    /// Runs `target` and returns its combined output.
    fn run(&self, target: &RunTarget) -> String;
}

/// Spawns an interpreter process per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRunner {
    pub program: String,
    /// Arguments placed before `-File`/`-Command`.
    pub args: Vec<String>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            program: "pwsh".to_string(),
            args: vec!["-NoProfile".to_string()],
        }
    }
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, target: &RunTarget) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        match target {
            RunTarget::File(path) => command.arg("-File").arg(path),
            RunTarget::Inline(text) => command.arg("-Command").arg(text),
        };
        command
    }
}

impl Runner for ProcessRunner {
    fn run(&self, target: &RunTarget) -> String {
        debug!(program = %self.program, ?target, "running script");
        match self.command(target).output() {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.is_empty() {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&stderr);
                }
                strip_ansi(&text)
            }
            Err(err) => {
                warn!(%err, program = %self.program, "failed to start interpreter");
                format!("Failed to run {}: {}", self.program, err)
            }
        }
    }
}

/// Removes ANSI escape sequences (CSI and OSC) from interpreter output.
pub fn strip_ansi(text: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    let ansi = ANSI.get_or_init(|| {
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(\x07|\x1b\\)").ok()
    });
    match ansi {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m plain"), "red plain");
        assert_eq!(strip_ansi("\x1b]0;title\x07text"), "text");
        assert_eq!(strip_ansi("no escapes"), "no escapes");
    }

    #[test]
    fn test_missing_interpreter_is_reported_as_text() {
        let runner = ProcessRunner::new("psedit-no-such-interpreter", Vec::new());
        let output = runner.run(&RunTarget::Inline("1".to_string()));
        assert!(output.starts_with("Failed to run psedit-no-such-interpreter"));
    }

    #[test]
    fn test_default_runner_is_pwsh() {
        let runner = ProcessRunner::default();
        assert_eq!(runner.program, "pwsh");
        assert_eq!(runner.args, vec!["-NoProfile".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let runner = ProcessRunner::new("echo", vec!["\x1b[1m".to_string()]);
        let output = runner.run(&RunTarget::Inline("hi".to_string()));
        assert_eq!(output, " -Command hi\n");
    }
}
