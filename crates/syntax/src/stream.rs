// Chunk: docs/chunks/reader_loop - Pull-reader loop with error position dedupe

//! Driver loop shared by the streaming providers (JSON, YAML).
//!
//! # Overview
//!
//! A [`PullReader`] yields positioned events one at a time. When it fails,
//! the loop records the error as a diagnostic and keeps pulling, so one bad
//! token does not hide the highlighting of the rest of the document.
//!
//! Some readers cannot advance past a malformed position and will report the
//! same error forever. The loop remembers every position it has already
//! recorded an error for; a repeat means the reader is stuck and the loop
//! stops. This is the only thing bounding a pathological parse.
//!
//! The resume state lives in an explicit [`ReadCursor`] rather than in loop
//! locals so the recovery rule can be tested one step at a time.

use std::collections::HashSet;

use psedit_buffer::TextPos;
use thiserror::Error;
use tracing::warn;

use crate::token::ParseOutput;

/// A failure reported by a pull reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({}:{})", position.line, position.column)]
pub struct ReaderError {
    /// 1-based position of the offending character.
    pub position: TextPos,
    pub message: String,
}

impl ReaderError {
    pub fn new(position: TextPos, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// An event with its half-open source extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positioned<E> {
    pub event: E,
    pub start: TextPos,
    pub end: TextPos,
}

/// A source of positioned events.
pub trait PullReader {
    type Event;

    /// Returns the next event, `Ok(None)` at end of input, or an error.
    fn next_event(&mut self) -> Result<Option<Positioned<Self::Event>>, ReaderError>;
}

// =============================================================================
// Read Cursor
// =============================================================================

/// The last known good position of a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCursor {
    position: TextPos,
}

impl ReadCursor {
    pub fn new() -> Self {
        Self {
            position: TextPos::new(1, 1),
        }
    }

    pub fn position(&self) -> TextPos {
        self.position
    }

    /// Moves past a successfully read event.
    pub fn advance(&mut self, end: TextPos) {
        self.position = end;
    }

    /// Computes the diagnostic extent for an error and resumes at it.
    ///
    /// The extent runs from the last good position up to and including the
    /// offending character. When the error is on a later line than the
    /// cursor, the extent starts at column 1 of the error line.
    pub fn recover(&mut self, error: TextPos) -> (TextPos, TextPos) {
        let start_col = if self.position.line == error.line {
            self.position.column.min(error.column)
        } else {
            1
        };
        let start = TextPos::new(error.line, start_col);
        let end = TextPos::new(error.line, error.column + 1);
        self.position = error;
        (start, end)
    }
}

impl Default for ReadCursor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Loop
// =============================================================================

/// Outcome of one pull.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<E> {
    Event(Positioned<E>),
    /// An error was recorded; reading continues.
    Recovered {
        error: ReaderError,
        start: TextPos,
        end: TextPos,
    },
    /// The reader reached the end of input.
    Finished,
    /// The reader failed again at a position already recorded.
    Stuck(ReaderError),
}

/// Pull loop state: the cursor plus every error position seen so far.
#[derive(Debug, Default)]
pub struct ReaderLoop {
    cursor: ReadCursor,
    recorded: HashSet<TextPos>,
}

impl ReaderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> ReadCursor {
        self.cursor
    }

    /// Pulls one event and applies the recovery rule.
    pub fn step<R: PullReader>(&mut self, reader: &mut R) -> Step<R::Event> {
        match reader.next_event() {
            Ok(Some(event)) => {
                self.cursor.advance(event.end);
                Step::Event(event)
            }
            Ok(None) => Step::Finished,
            Err(error) => {
                if !self.recorded.insert(error.position) {
                    return Step::Stuck(error);
                }
                let (start, end) = self.cursor.recover(error.position);
                Step::Recovered { error, start, end }
            }
        }
    }

    /// Drives `reader` to completion, handing each event to `on_event`.
    pub fn run<R, F>(mut self, reader: &mut R, mut on_event: F) -> ParseOutput
    where
        R: PullReader,
        F: FnMut(&Positioned<R::Event>, &mut ParseOutput),
    {
        let mut output = ParseOutput::new();
        loop {
            match self.step(reader) {
                Step::Event(event) => on_event(&event, &mut output),
                Step::Recovered { error, start, end } => {
                    output.push_diagnostic_at(start, end, error.position, error.message);
                }
                Step::Finished => break,
                Step::Stuck(error) => {
                    warn!(
                        line = error.position.line,
                        column = error.position.column,
                        "reader repeated an error position; stopping"
                    );
                    break;
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ColumnRange;
    use std::collections::VecDeque;

    /// Replays a scripted sequence of results, then repeats the last one.
    struct ScriptedReader {
        results: VecDeque<Result<Option<Positioned<&'static str>>, ReaderError>>,
        last: Option<Result<Option<Positioned<&'static str>>, ReaderError>>,
        pulls: usize,
    }

    impl ScriptedReader {
        fn new(results: Vec<Result<Option<Positioned<&'static str>>, ReaderError>>) -> Self {
            Self {
                results: results.into(),
                last: None,
                pulls: 0,
            }
        }
    }

    impl PullReader for ScriptedReader {
        type Event = &'static str;

        fn next_event(&mut self) -> Result<Option<Positioned<&'static str>>, ReaderError> {
            self.pulls += 1;
            if let Some(next) = self.results.pop_front() {
                self.last = Some(next.clone());
                return next;
            }
            self.last.clone().unwrap_or(Ok(None))
        }
    }

    fn event(name: &'static str, line: usize, start: usize, end: usize) -> Positioned<&'static str> {
        Positioned {
            event: name,
            start: TextPos::new(line, start),
            end: TextPos::new(line, end),
        }
    }

    fn error(line: usize, column: usize) -> ReaderError {
        ReaderError::new(TextPos::new(line, column), "bad token")
    }

    // ==================== Cursor Tests ====================

    #[test]
    fn test_recover_on_same_line_starts_at_cursor() {
        let mut cursor = ReadCursor::new();
        cursor.advance(TextPos::new(1, 4));
        let (start, end) = cursor.recover(TextPos::new(1, 7));
        assert_eq!(start, TextPos::new(1, 4));
        assert_eq!(end, TextPos::new(1, 8));
        assert_eq!(cursor.position(), TextPos::new(1, 7));
    }

    #[test]
    fn test_recover_on_later_line_starts_at_column_one() {
        let mut cursor = ReadCursor::new();
        cursor.advance(TextPos::new(1, 9));
        let (start, end) = cursor.recover(TextPos::new(3, 5));
        assert_eq!(start, TextPos::new(3, 1));
        assert_eq!(end, TextPos::new(3, 6));
    }

    #[test]
    fn test_recover_before_cursor_still_covers_offending_char() {
        let mut cursor = ReadCursor::new();
        cursor.advance(TextPos::new(2, 10));
        let (start, end) = cursor.recover(TextPos::new(2, 3));
        assert_eq!(start, TextPos::new(2, 3));
        assert_eq!(end, TextPos::new(2, 4));
    }

    // ==================== Loop Tests ====================

    #[test]
    fn test_loop_stops_on_repeated_position() {
        // The reader reports the same error forever
        let mut reader = ScriptedReader::new(vec![Err(error(1, 1))]);
        let output = ReaderLoop::new().run(&mut reader, |_, _| {});
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(reader.pulls, 2);
    }

    #[test]
    fn test_loop_continues_after_distinct_errors() {
        let mut reader = ScriptedReader::new(vec![
            Ok(Some(event("open", 1, 1, 2))),
            Err(error(1, 3)),
            Ok(Some(event("value", 1, 4, 6))),
            Err(error(2, 1)),
            Ok(None),
        ]);
        let mut seen = Vec::new();
        let output = ReaderLoop::new().run(&mut reader, |e, _| seen.push(e.event));
        assert_eq!(seen, vec!["open", "value"]);
        assert_eq!(output.diagnostics.len(), 2);
        assert_eq!(output.diagnostics[0].range, ColumnRange::bounded(2, 4));
        assert_eq!(output.diagnostics[0].origin, TextPos::new(1, 3));
        assert_eq!(output.diagnostics[1].line, 2);
        assert_eq!(output.diagnostics[1].range, ColumnRange::bounded(1, 2));
    }

    #[test]
    fn test_non_adjacent_repeat_also_stops() {
        let mut reader = ScriptedReader::new(vec![
            Err(error(1, 2)),
            Err(error(1, 5)),
            Err(error(1, 2)),
            Ok(Some(event("never", 2, 1, 2))),
        ]);
        let mut events = 0;
        let output = ReaderLoop::new().run(&mut reader, |_, _| events += 1);
        assert_eq!(events, 0);
        assert_eq!(output.diagnostics.len(), 2);
    }

    #[test]
    fn test_step_reports_stuck() {
        let mut reader = ScriptedReader::new(vec![Err(error(4, 2))]);
        let mut driver = ReaderLoop::new();
        assert!(matches!(driver.step(&mut reader), Step::Recovered { .. }));
        assert!(matches!(driver.step(&mut reader), Step::Stuck(e) if e.position == TextPos::new(4, 2)));
    }

    #[test]
    fn test_step_finished() {
        let mut reader = ScriptedReader::new(vec![Ok(None)]);
        assert_eq!(ReaderLoop::new().step(&mut reader), Step::Finished);
    }
}
