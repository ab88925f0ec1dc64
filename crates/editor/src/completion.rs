// Chunk: docs/chunks/autocomplete - Word extraction and completion insertion
//!
//! Autocomplete insertion contract.
//!
//! A completion source (outside this crate) supplies candidates; this module
//! finds the word being typed, filters candidates against it, and splices an
//! accepted suggestion into the text. Words are alphanumerics plus `$`, `-`,
//! `:` and `_`, so `$env:PATH` and `Get-Child` are single words.

use psedit_buffer::Position;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '$' | '-' | ':' | '_')
}

/// The word ending at char index `col` of `line`.
pub fn current_word(line: &str, col: usize) -> &str {
    let end = byte_of_char(line, col);
    let start = line[..end]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map_or(end, |(i, _)| i);
    &line[start..end]
}

/// Candidates starting with `word`, ignoring ASCII case, in input order.
pub fn filter_suggestions<'a>(word: &str, candidates: &'a [String]) -> Vec<&'a str> {
    let word = word.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&word))
        .map(String::as_str)
        .collect()
}

/// Replaces the word before `cursor` with `accepted`.
///
/// Returns the new text and the cursor placed after the inserted word.
/// A cursor past the end of its line is clamped to the line end.
pub fn apply_completion(text: &str, cursor: Position, accepted: &str) -> (String, Position) {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let Some(line) = lines.get(cursor.line).copied() else {
        return (text.to_string(), cursor);
    };

    let col = cursor.col.min(line.chars().count());
    let end = byte_of_char(line, col);
    let word = current_word(line, col);
    let start = end - word.len();

    let replaced = format!("{}{}{}", &line[..start], accepted, &line[end..]);
    let new_col = line[..start].chars().count() + accepted.chars().count();
    lines[cursor.line] = &replaced;

    (lines.join("\n"), Position::new(cursor.line, new_col))
}

fn byte_of_char(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}
