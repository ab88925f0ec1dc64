// Chunk: docs/chunks/script_provider - Structural parser for scripts

//! Parser seam for the scripting language.
//!
//! A [`ScriptParser`] turns source text into tokens and parse errors, both
//! expressed in byte offsets. [`StructureParser`] is the built-in
//! implementation: the lexer's tokens plus bracket matching. A full grammar
//! can be substituted by implementing the trait.

use super::lexer::{lex, Delimiter, ScriptToken, ScriptTokenKind};

/// A parse error over the byte range `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParseError {
    pub start: usize,
    pub end: usize,
    pub message: String,
}

/// Tokens and errors from one parse. Independent outputs: a document with
/// errors still has a full token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptParse {
    pub tokens: Vec<ScriptToken>,
    pub errors: Vec<ScriptParseError>,
}

pub trait ScriptParser {
    fn parse_input(&self, text: &str) -> ScriptParse;
}

/// Lexer output checked for balanced brackets.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureParser;

impl ScriptParser for StructureParser {
    fn parse_input(&self, text: &str) -> ScriptParse {
        let (tokens, mut errors) = lex(text);
        let mut open: Vec<(Delimiter, usize)> = Vec::new();

        for token in &tokens {
            match token.kind {
                ScriptTokenKind::Open(delimiter) => open.push((delimiter, token.start)),
                ScriptTokenKind::Close(delimiter) => {
                    if !open.iter().any(|(d, _)| *d == delimiter) {
                        errors.push(ScriptParseError {
                            start: token.start,
                            end: token.end,
                            message: format!(
                                "Unexpected token '{}' in expression or statement.",
                                delimiter.closer()
                            ),
                        });
                        continue;
                    }
                    // Inner openers left unclosed end at this closer
                    while let Some((inner, start)) = open.pop() {
                        if inner == delimiter {
                            break;
                        }
                        errors.push(missing_closer(inner, start, token.start));
                    }
                }
                _ => {}
            }
        }

        for (delimiter, start) in open {
            errors.push(missing_closer(delimiter, start, text.len()));
        }
        errors.sort_by_key(|e| (e.start, e.end));

        ScriptParse { tokens, errors }
    }
}

fn missing_closer(delimiter: Delimiter, start: usize, end: usize) -> ScriptParseError {
    let message = match delimiter {
        Delimiter::Curly => "Missing closing '}' in statement block or type definition.",
        Delimiter::Paren => "Missing closing ')' in expression.",
        Delimiter::Square => "Missing closing ']'.",
    };
    ScriptParseError {
        start,
        end,
        message: message.to_string(),
    }
}
