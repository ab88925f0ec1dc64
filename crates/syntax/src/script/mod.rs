// Chunk: docs/chunks/script_provider - Scripting-language token provider

//! PowerShell highlighting.
//!
//! # Overview
//!
//! The provider runs a [`ScriptParser`] once and converts both of its
//! outputs to line-based spans. Tokens and errors are independent: an error
//! never suppresses tokens, and multi-line tokens and errors are split one
//! span per covered line.
//!
//! Scripts have no formatter.

mod lexer;
mod parser;

pub use lexer::{lex, Delimiter, ScriptToken, ScriptTokenKind};
pub use parser::{ScriptParse, ScriptParseError, ScriptParser, StructureParser};

use psedit_buffer::LineIndex;

use crate::token::{ParseOutput, TokenKind};

/// Token provider for PowerShell scripts, generic over the parser.
#[derive(Debug, Clone, Default)]
pub struct ScriptProvider<P = StructureParser> {
    parser: P,
}

impl ScriptProvider<StructureParser> {
    pub fn new() -> Self {
        Self::with_parser(StructureParser)
    }
}

impl<P: ScriptParser> ScriptProvider<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    pub fn tokenize(&self, text: &str) -> ParseOutput {
        let parsed = self.parser.parse_input(text);
        let index = LineIndex::new(text);
        let mut output = ParseOutput::new();

        for token in &parsed.tokens {
            if let Some(kind) = kind_of(token.kind) {
                output.push_bytes(&index, token.start, token.end, kind);
            }
        }
        for error in &parsed.errors {
            output.push_diagnostic(
                index.position(error.start),
                index.position(error.end),
                error.message.as_str(),
            );
        }
        output
    }
}

fn kind_of(kind: ScriptTokenKind) -> Option<TokenKind> {
    let mapped = match kind {
        ScriptTokenKind::NewLine => return None,
        ScriptTokenKind::Comment => TokenKind::Comment,
        ScriptTokenKind::String | ScriptTokenKind::HereString => TokenKind::String,
        ScriptTokenKind::Variable => TokenKind::Variable,
        ScriptTokenKind::Parameter => TokenKind::Parameter,
        ScriptTokenKind::Operator => TokenKind::Operator,
        ScriptTokenKind::Number => TokenKind::Number,
        ScriptTokenKind::Keyword => TokenKind::Keyword,
        ScriptTokenKind::Command => TokenKind::Command,
        ScriptTokenKind::Function => TokenKind::Function,
        ScriptTokenKind::Type => TokenKind::Type,
        ScriptTokenKind::Open(_) | ScriptTokenKind::Close(_) => TokenKind::Bracket,
        ScriptTokenKind::Generic => TokenKind::Generic,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ColumnRange, Token};

    /// Reports a fixed error and no tokens, whatever the input.
    struct FixedParser(ScriptParseError);

    impl ScriptParser for FixedParser {
        fn parse_input(&self, _text: &str) -> ScriptParse {
            ScriptParse {
                tokens: Vec::new(),
                errors: vec![self.0.clone()],
            }
        }
    }

    // ==================== Diagnostic Split Tests ====================

    #[test]
    fn test_error_spanning_three_lines_gives_three_spans() {
        let output = ScriptProvider::new().tokenize("a\n{\nb\nc");
        let spans: Vec<(usize, ColumnRange)> =
            output.diagnostics.iter().map(|d| (d.line, d.range)).collect();
        assert_eq!(
            spans,
            vec![
                (2, ColumnRange::new(Some(1), None)),
                (3, ColumnRange::new(None, None)),
                (4, ColumnRange::new(None, Some(2))),
            ]
        );
        assert!(output.diagnostics.iter().all(|d| d.origin.line == 2));
    }

    #[test]
    fn test_injected_parser_errors_are_split() {
        let parser = FixedParser(ScriptParseError {
            start: 1,
            end: 5,
            message: "bad".to_string(),
        });
        let output = ScriptProvider::with_parser(parser).tokenize("x\nyy\nz");
        assert!(output.tokens.is_empty());
        // The error ends before `z`, so line 3 is not marked
        assert_eq!(output.diagnostics.len(), 2);
        assert_eq!(output.diagnostics[0].line, 1);
        assert_eq!(output.diagnostics[0].range, ColumnRange::new(Some(2), None));
        assert_eq!(output.diagnostics[1].line, 2);
        assert_eq!(output.diagnostics[1].range, ColumnRange::full());
    }

    // ==================== Token Tests ====================

    #[test]
    fn test_tokens_survive_errors() {
        let output = ScriptProvider::new().tokenize("Get-Item {");
        assert_eq!(
            output.tokens,
            vec![
                Token::new(1, ColumnRange::bounded(1, 9), TokenKind::Command),
                Token::new(1, ColumnRange::bounded(10, 11), TokenKind::Bracket),
            ]
        );
        assert_eq!(output.diagnostics.len(), 1);
    }

    #[test]
    fn test_here_string_is_split_per_line() {
        let output = ScriptProvider::new().tokenize("@'\nx\n'@");
        let lines: Vec<(usize, ColumnRange)> =
            output.tokens.iter().map(|t| (t.line, t.range)).collect();
        assert_eq!(
            lines,
            vec![
                (1, ColumnRange::new(Some(1), None)),
                (2, ColumnRange::new(None, None)),
                (3, ColumnRange::new(None, Some(3))),
            ]
        );
    }

    #[test]
    fn test_newlines_produce_no_tokens() {
        let output = ScriptProvider::new().tokenize("\n\n");
        assert!(output.tokens.is_empty());
    }
}
