// Chunk: docs/chunks/script_provider - Scripting-language lexer

//! Single-pass lexer for PowerShell-style scripts.
//!
//! Tokens carry byte offsets into the source. The lexer tracks whether it is
//! at the start of a statement ("command position"), which is what separates
//! a command name such as `Get-Item` from a bare argument.
//!
//! Unterminated strings and block comments run to end of input and are
//! reported as errors alongside the tokens.

use super::parser::ScriptParseError;

/// A bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Paren,
    Curly,
    Square,
}

impl Delimiter {
    pub fn closer(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Curly => '}',
            Delimiter::Square => ']',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptTokenKind {
    Comment,
    String,
    HereString,
    Variable,
    /// `-Name` or `-Name:`
    Parameter,
    Operator,
    Number,
    Keyword,
    Command,
    /// The name following `function`, `filter` or `workflow`.
    Function,
    /// `[TypeName]`
    Type,
    /// `(`, `{`, `[`, and the `$(`, `@(` and `@{` forms.
    Open(Delimiter),
    Close(Delimiter),
    /// Arguments and member names.
    Generic,
    NewLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptToken {
    pub kind: ScriptTokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character.
    pub end: usize,
}

const KEYWORDS: &[&str] = &[
    "begin",
    "break",
    "catch",
    "class",
    "continue",
    "data",
    "do",
    "dynamicparam",
    "else",
    "elseif",
    "end",
    "enum",
    "exit",
    "filter",
    "finally",
    "for",
    "foreach",
    "function",
    "if",
    "in",
    "param",
    "process",
    "return",
    "switch",
    "throw",
    "trap",
    "try",
    "until",
    "using",
    "while",
    "workflow",
];

const OPERATORS: &[&str] = &[
    "eq", "ne", "gt", "ge", "lt", "le", "like", "notlike", "match", "notmatch", "contains",
    "notcontains", "in", "notin", "replace", "and", "or", "xor", "not", "band", "bor", "bxor",
    "bnot", "is", "isnot", "as", "split", "join", "f", "shl", "shr",
];

/// Tokenizes `text`. Never fails; problems come back as errors.
pub fn lex(text: &str) -> (Vec<ScriptToken>, Vec<ScriptParseError>) {
    let mut lexer = Lexer {
        text,
        pos: 0,
        tokens: Vec::new(),
        errors: Vec::new(),
        command_position: true,
        expect_function_name: false,
    };
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    tokens: Vec<ScriptToken>,
    errors: Vec<ScriptParseError>,
    command_position: bool,
    expect_function_name: bool,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn emit(&mut self, kind: ScriptTokenKind, start: usize) {
        self.emit_range(kind, start, self.pos);
    }

    fn emit_range(&mut self, kind: ScriptTokenKind, start: usize, end: usize) {
        self.tokens.push(ScriptToken { kind, start, end });
    }

    fn error(&mut self, start: usize, end: usize, message: String) {
        self.errors.push(ScriptParseError { start, end, message });
    }

    /// Kind of the token ending exactly at `start`, if any.
    fn adjacent(&self, start: usize) -> Option<ScriptTokenKind> {
        self.tokens.last().filter(|t| t.end == start).map(|t| t.kind)
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                '\n' => {
                    self.bump();
                    self.emit(ScriptTokenKind::NewLine, start);
                    self.command_position = true;
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' => self.line_comment(start),
                '<' if self.peek_at(1) == Some('#') => self.block_comment(start),
                '"' | '\'' => self.quoted(start, c),
                '@' => self.at_sign(start),
                '$' => self.variable(start),
                '[' => self.open_square(start),
                '(' | '{' => {
                    self.bump();
                    let delimiter = if c == '(' { Delimiter::Paren } else { Delimiter::Curly };
                    self.emit(ScriptTokenKind::Open(delimiter), start);
                    self.command_position = true;
                }
                ')' | ']' => {
                    self.bump();
                    let delimiter = if c == ')' { Delimiter::Paren } else { Delimiter::Square };
                    self.emit(ScriptTokenKind::Close(delimiter), start);
                    self.command_position = false;
                }
                '}' => {
                    self.bump();
                    self.emit(ScriptTokenKind::Close(Delimiter::Curly), start);
                    // `} else {`, `} catch {`
                    self.command_position = true;
                }
                ';' | '|' | '&' => {
                    self.bump();
                    if c != ';' && self.peek() == Some(c) {
                        self.bump();
                    }
                    self.emit(ScriptTokenKind::Operator, start);
                    self.command_position = true;
                }
                ',' => {
                    self.bump();
                    self.emit(ScriptTokenKind::Operator, start);
                    self.command_position = false;
                }
                '=' => {
                    self.bump();
                    self.emit(ScriptTokenKind::Operator, start);
                    self.command_position = true;
                }
                '+' | '*' | '/' | '%' | '!' | '<' | '>' => self.operator(start, c),
                '-' => self.dash(start),
                '.' => self.dot(start),
                ':' if self.peek_at(1) == Some(':') => {
                    self.pos += 2;
                    self.emit(ScriptTokenKind::Operator, start);
                    self.command_position = false;
                }
                _ => self.word(start),
            }
        }
    }

    fn line_comment(&mut self, start: usize) {
        let rest = &self.text[start..];
        let len = rest.find('\n').unwrap_or(rest.len());
        self.pos = start + len;
        let end = if rest[..len].ends_with('\r') { self.pos - 1 } else { self.pos };
        self.emit_range(ScriptTokenKind::Comment, start, end);
    }

    fn block_comment(&mut self, start: usize) {
        match self.text[start + 2..].find("#>") {
            Some(rel) => self.pos = start + 2 + rel + 2,
            None => {
                self.pos = self.text.len();
                self.error(start, self.pos, "Missing closing '#>' for comment.".to_string());
            }
        }
        self.emit(ScriptTokenKind::Comment, start);
    }

    fn quoted(&mut self, start: usize, quote: char) {
        self.bump();
        loop {
            match self.bump() {
                None => {
                    self.error(
                        start,
                        self.pos,
                        format!("The string is missing the terminator: {}.", quote),
                    );
                    break;
                }
                Some('`') if quote == '"' => {
                    self.bump();
                }
                Some(c) if c == quote => {
                    // Doubled quote is an escaped quote
                    if self.peek() == Some(quote) {
                        self.bump();
                    } else {
                        break;
                    }
                }
                Some(_) => {}
            }
        }
        self.emit(ScriptTokenKind::String, start);
        self.command_position = false;
    }

    fn at_sign(&mut self, start: usize) {
        match self.peek_at(1) {
            Some(quote @ ('"' | '\'')) => self.here_string(start, quote),
            Some(open @ ('(' | '{')) => {
                self.pos += 2;
                let delimiter = if open == '(' { Delimiter::Paren } else { Delimiter::Curly };
                self.emit(ScriptTokenKind::Open(delimiter), start);
                self.command_position = true;
            }
            Some(c) if c.is_alphanumeric() || c == '_' => {
                // Splatting: @params
                self.bump();
                self.take_while(|c| c.is_alphanumeric() || c == '_');
                self.emit(ScriptTokenKind::Variable, start);
                self.command_position = false;
            }
            _ => {
                self.bump();
                self.emit(ScriptTokenKind::Operator, start);
            }
        }
    }

    fn here_string(&mut self, start: usize, quote: char) {
        let terminator = format!("\n{}@", quote);
        match self.text[start + 2..].find(&terminator) {
            Some(rel) => self.pos = start + 2 + rel + terminator.len(),
            None => {
                self.pos = self.text.len();
                self.error(
                    start,
                    self.pos,
                    format!("The string is missing the terminator: {}@.", quote),
                );
            }
        }
        self.emit(ScriptTokenKind::HereString, start);
        self.command_position = false;
    }

    fn variable(&mut self, start: usize) {
        self.bump();
        match self.peek() {
            Some('{') => {
                let rest = &self.text[self.pos..];
                self.pos += rest.find('}').map_or(rest.len(), |i| i + 1);
            }
            Some('(') => {
                self.bump();
                self.emit(ScriptTokenKind::Open(Delimiter::Paren), start);
                self.command_position = true;
                return;
            }
            Some('$' | '?' | '^') => {
                self.bump();
            }
            _ => {
                let taken = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == ':');
                if taken == 0 {
                    self.emit(ScriptTokenKind::Generic, start);
                    self.command_position = false;
                    return;
                }
            }
        }
        self.emit(ScriptTokenKind::Variable, start);
        self.command_position = false;
    }

    fn open_square(&mut self, start: usize) {
        let indexing = matches!(
            self.adjacent(start),
            Some(
                ScriptTokenKind::Variable
                    | ScriptTokenKind::Close(_)
                    | ScriptTokenKind::Generic
                    | ScriptTokenKind::String
            )
        );
        if !indexing {
            if let Some(len) = type_literal_len(&self.text[start..]) {
                self.pos = start + len;
                self.emit(ScriptTokenKind::Type, start);
                return;
            }
        }
        self.bump();
        self.emit(ScriptTokenKind::Open(Delimiter::Square), start);
        self.command_position = false;
    }

    fn operator(&mut self, start: usize, c: char) {
        self.bump();
        let next = self.peek();
        if next == Some('=') && c != '!' {
            self.bump();
            self.emit(ScriptTokenKind::Operator, start);
            self.command_position = true;
            return;
        }
        if (c == '+' && next == Some('+')) || (c == '>' && next == Some('>')) {
            self.bump();
        }
        self.emit(ScriptTokenKind::Operator, start);
        self.command_position = false;
    }

    fn dash(&mut self, start: usize) {
        match self.peek_at(1) {
            Some(c) if c.is_alphabetic() => {
                self.bump();
                let name_start = self.pos;
                self.take_while(|c| c.is_alphanumeric() || c == '_');
                let name = self.text[name_start..self.pos].to_ascii_lowercase();
                if is_operator(&name) {
                    self.emit(ScriptTokenKind::Operator, start);
                } else {
                    if self.peek() == Some(':') {
                        self.bump();
                    }
                    self.emit(ScriptTokenKind::Parameter, start);
                }
                self.command_position = false;
            }
            Some('-') => {
                self.pos += 2;
                self.emit(ScriptTokenKind::Operator, start);
            }
            Some('=') => {
                self.pos += 2;
                self.emit(ScriptTokenKind::Operator, start);
                self.command_position = true;
            }
            _ => {
                self.bump();
                self.emit(ScriptTokenKind::Operator, start);
                self.command_position = false;
            }
        }
    }

    fn dot(&mut self, start: usize) {
        match self.peek_at(1) {
            Some(c) if c.is_ascii_digit() => self.word(start),
            None => {
                self.bump();
                self.emit(ScriptTokenKind::Operator, start);
            }
            Some(c) if c.is_whitespace() => {
                // Dot-sourcing: `. ./script.ps1`
                self.bump();
                self.emit(ScriptTokenKind::Operator, start);
                self.command_position = true;
            }
            Some('.') => {
                self.pos += 2;
                self.emit(ScriptTokenKind::Operator, start);
                self.command_position = false;
            }
            Some(_) if self.adjacent(start).is_some() => {
                // Member access
                self.bump();
                self.emit(ScriptTokenKind::Operator, start);
                self.command_position = false;
            }
            Some(_) => self.word(start),
        }
    }

    fn word(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || "(){}[];,|&\"'=<>".contains(c) {
                break;
            }
            self.bump();
            if c == '`' {
                self.bump();
            }
        }
        if self.pos == start {
            self.bump();
        }

        let word = &self.text[start..self.pos];
        let lower = word.to_ascii_lowercase();
        let kind = if is_number(word) {
            ScriptTokenKind::Number
        } else if self.expect_function_name {
            ScriptTokenKind::Function
        } else if self.command_position && KEYWORDS.contains(&lower.as_str()) {
            ScriptTokenKind::Keyword
        } else if lower == "in" && self.adjacent_variable() {
            ScriptTokenKind::Keyword
        } else if self.command_position {
            ScriptTokenKind::Command
        } else {
            ScriptTokenKind::Generic
        };
        self.emit(kind, start);

        let keyword = kind == ScriptTokenKind::Keyword;
        self.expect_function_name =
            keyword && matches!(lower.as_str(), "function" | "filter" | "workflow");
        self.command_position = keyword
            && matches!(
                lower.as_str(),
                "return" | "throw" | "else" | "try" | "finally" | "do" | "begin" | "process" | "end"
            );
    }

    /// `foreach ($item in $items)`: the previous token is a variable.
    fn adjacent_variable(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|t| t.kind == ScriptTokenKind::Variable)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        self.pos - start
    }
}

fn is_operator(name: &str) -> bool {
    if OPERATORS.contains(&name) {
        return true;
    }
    // Case-sensitive and case-insensitive forms: -ceq, -ilike
    name.strip_prefix(['c', 'i'])
        .is_some_and(|rest| OPERATORS.contains(&rest))
}

/// Numeric literals: decimal, exponent, hex, and the `kb`..`pb`, `l` and `d`
/// suffixes.
fn is_number(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    let mut body = lower.as_str();
    for suffix in ["kb", "mb", "gb", "tb", "pb", "l", "d"] {
        if let Some(rest) = body.strip_suffix(suffix) {
            body = rest;
            break;
        }
    }
    if let Some(hex) = body.strip_prefix("0x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.') && body.parse::<f64>().is_ok()
}

/// Length in bytes of a `[TypeName]` literal at the start of `rest`.
fn type_literal_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    chars.next().filter(|&(_, c)| c == '[')?;
    let (_, first) = chars.next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    let mut depth = 1usize;
    for (idx, c) in chars {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            c if c.is_alphanumeric() || matches!(c, '.' | '_' | ',' | '`') => {}
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<ScriptTokenKind> {
        lex(text)
            .0
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != ScriptTokenKind::NewLine)
            .collect()
    }

    fn spans(text: &str) -> Vec<(ScriptTokenKind, &str)> {
        lex(text)
            .0
            .into_iter()
            .map(|t| (t.kind, &text[t.start..t.end]))
            .collect()
    }

    // ==================== Command Tests ====================

    #[test]
    fn test_command_with_parameter_variable_and_comment() {
        assert_eq!(
            spans("Get-Item -Path $env:HOME # home"),
            vec![
                (ScriptTokenKind::Command, "Get-Item"),
                (ScriptTokenKind::Parameter, "-Path"),
                (ScriptTokenKind::Variable, "$env:HOME"),
                (ScriptTokenKind::Comment, "# home"),
            ]
        );
    }

    #[test]
    fn test_arguments_are_generic() {
        assert_eq!(
            kinds("Write-Output hello world"),
            vec![
                ScriptTokenKind::Command,
                ScriptTokenKind::Generic,
                ScriptTokenKind::Generic,
            ]
        );
    }

    #[test]
    fn test_pipeline_restarts_command_position() {
        assert_eq!(
            kinds("Get-Process | Sort-Object"),
            vec![
                ScriptTokenKind::Command,
                ScriptTokenKind::Operator,
                ScriptTokenKind::Command,
            ]
        );
    }

    #[test]
    fn test_assignment_then_command() {
        assert_eq!(
            kinds("$x = Get-Date"),
            vec![
                ScriptTokenKind::Variable,
                ScriptTokenKind::Operator,
                ScriptTokenKind::Command,
            ]
        );
    }

    // ==================== Keyword Tests ====================

    #[test]
    fn test_if_else_with_strings() {
        assert_eq!(
            kinds("if ($a -eq 1) { 'x' } else { \"y`\"\" }"),
            vec![
                ScriptTokenKind::Keyword,
                ScriptTokenKind::Open(Delimiter::Paren),
                ScriptTokenKind::Variable,
                ScriptTokenKind::Operator,
                ScriptTokenKind::Number,
                ScriptTokenKind::Close(Delimiter::Paren),
                ScriptTokenKind::Open(Delimiter::Curly),
                ScriptTokenKind::String,
                ScriptTokenKind::Close(Delimiter::Curly),
                ScriptTokenKind::Keyword,
                ScriptTokenKind::Open(Delimiter::Curly),
                ScriptTokenKind::String,
                ScriptTokenKind::Close(Delimiter::Curly),
            ]
        );
    }

    #[test]
    fn test_function_declaration_and_type_literal() {
        assert_eq!(
            spans("function Get-Thing { param([string[]]$Name) }"),
            vec![
                (ScriptTokenKind::Keyword, "function"),
                (ScriptTokenKind::Function, "Get-Thing"),
                (ScriptTokenKind::Open(Delimiter::Curly), "{"),
                (ScriptTokenKind::Keyword, "param"),
                (ScriptTokenKind::Open(Delimiter::Paren), "("),
                (ScriptTokenKind::Type, "[string[]]"),
                (ScriptTokenKind::Variable, "$Name"),
                (ScriptTokenKind::Close(Delimiter::Paren), ")"),
                (ScriptTokenKind::Close(Delimiter::Curly), "}"),
            ]
        );
    }

    #[test]
    fn test_foreach_in() {
        assert_eq!(
            kinds("foreach ($i in $list) {}"),
            vec![
                ScriptTokenKind::Keyword,
                ScriptTokenKind::Open(Delimiter::Paren),
                ScriptTokenKind::Variable,
                ScriptTokenKind::Keyword,
                ScriptTokenKind::Variable,
                ScriptTokenKind::Close(Delimiter::Paren),
                ScriptTokenKind::Open(Delimiter::Curly),
                ScriptTokenKind::Close(Delimiter::Curly),
            ]
        );
    }

    // ==================== Literal Tests ====================

    #[test]
    fn test_index_is_not_type_literal() {
        assert_eq!(
            kinds("$a[0]"),
            vec![
                ScriptTokenKind::Variable,
                ScriptTokenKind::Open(Delimiter::Square),
                ScriptTokenKind::Number,
                ScriptTokenKind::Close(Delimiter::Square),
            ]
        );
    }

    #[test]
    fn test_here_string_spans_lines() {
        let text = "@\"\nhi\n\"@\n";
        let (tokens, errors) = lex(text);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, ScriptTokenKind::HereString);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 8));
    }

    #[test]
    fn test_block_comment() {
        let (tokens, _) = lex("<# a\nb #> x");
        assert_eq!(tokens[0].kind, ScriptTokenKind::Comment);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 9));
    }

    #[test]
    fn test_subexpression_and_hashtable_open() {
        assert_eq!(
            spans("$(1) @{}"),
            vec![
                (ScriptTokenKind::Open(Delimiter::Paren), "$("),
                (ScriptTokenKind::Number, "1"),
                (ScriptTokenKind::Close(Delimiter::Paren), ")"),
                (ScriptTokenKind::Open(Delimiter::Curly), "@{"),
                (ScriptTokenKind::Close(Delimiter::Curly), "}"),
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert!(is_number("42"));
        assert!(is_number("3.5"));
        assert!(is_number("1e3"));
        assert!(is_number("0x1F"));
        assert!(is_number("10kb"));
        assert!(!is_number("abc"));
        assert!(!is_number("d"));
        assert!(!is_number("0x"));
    }

    #[test]
    fn test_operator_prefixes() {
        assert!(is_operator("eq"));
        assert!(is_operator("ceq"));
        assert!(is_operator("ilike"));
        assert!(is_operator("contains"));
        assert!(!is_operator("path"));
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let (tokens, errors) = lex("'abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 4));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "The string is missing the terminator: '.");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (_, errors) = lex("<# never closed");
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].start, errors[0].end), (0, 15));
    }
}
