// Chunk: docs/chunks/json_provider - Lenient JSON pull reader

//! A pull reader over JSON text that reports every token with its extent.
//!
//! The reader is deliberately forgiving: on an unexpected character it
//! reports an error and steps over that character, so later tokens still
//! get highlighted. At end of input with containers still open it keeps
//! reporting the same error at the same position, which the reader loop
//! treats as the signal to stop.
//!
//! `//` and `/* */` comments are accepted anywhere whitespace is.

use psedit_buffer::TextPos;

use crate::stream::{Positioned, PullReader, ReaderError};

/// A lexical JSON event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonEvent {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    String,
    Number,
    Boolean,
    Null,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    /// Just after `{`.
    KeyOrEnd,
    /// After `,`.
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Just after `[`.
    ValueOrEnd,
    /// After `,`.
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object(ObjectState),
    Array(ArrayState),
}

/// Pull reader over JSON source text.
pub struct JsonReader<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    stack: Vec<Container>,
    /// A complete top-level value has been read.
    finished_root: bool,
}

impl<'a> JsonReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
            column: 1,
            stack: Vec::new(),
            finished_root: false,
        }
    }

    // ==================== Character Access ====================

    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.text[self.offset..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn here(&self) -> TextPos {
        TextPos::new(self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() || c == '\u{feff}') {
            self.bump();
        }
    }

    fn positioned(&self, event: JsonEvent, start: TextPos) -> Positioned<JsonEvent> {
        Positioned {
            event,
            start,
            end: self.here(),
        }
    }

    /// Reports `message` at the current character and steps over it.
    fn unexpected(&mut self, message: String) -> ReaderError {
        let position = self.here();
        self.bump();
        ReaderError::new(position, message)
    }

    // ==================== State Transitions ====================

    /// Records that a value has been fully read in the current container.
    fn complete_value(&mut self) {
        match self.stack.last_mut() {
            Some(Container::Object(state)) => *state = ObjectState::CommaOrEnd,
            Some(Container::Array(state)) => *state = ArrayState::CommaOrEnd,
            None => self.finished_root = true,
        }
    }

    fn expects_value(&self) -> bool {
        match self.stack.last() {
            Some(Container::Object(state)) => *state == ObjectState::Value,
            Some(Container::Array(state)) => *state != ArrayState::CommaOrEnd,
            None => !self.finished_root,
        }
    }

    fn close(&mut self, event: JsonEvent, start: TextPos) -> Positioned<JsonEvent> {
        self.bump();
        self.stack.pop();
        self.complete_value();
        self.positioned(event, start)
    }

    // ==================== Token Readers ====================

    fn read_comment(&mut self, start: TextPos) -> Result<Positioned<JsonEvent>, ReaderError> {
        match self.peek_second() {
            Some('/') => {
                while matches!(self.peek(), Some(c) if c != '\n' && c != '\r') {
                    self.bump();
                }
                Ok(self.positioned(JsonEvent::Comment, start))
            }
            Some('*') => {
                self.bump();
                self.bump();
                loop {
                    match self.bump() {
                        Some('*') if self.peek() == Some('/') => {
                            self.bump();
                            return Ok(self.positioned(JsonEvent::Comment, start));
                        }
                        Some(_) => {}
                        None => {
                            return Err(ReaderError::new(
                                self.here(),
                                "Unexpected end while parsing comment.",
                            ))
                        }
                    }
                }
            }
            _ => Err(self.unexpected("Unexpected character encountered while parsing value: /.".into())),
        }
    }

    /// Reads a quoted string. The opening quote is the current character.
    fn read_string(&mut self) -> Result<(), ReaderError> {
        self.bump();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Ok(());
                }
                Some('\\') => {
                    self.bump();
                    if matches!(self.peek(), Some(c) if c != '\n') {
                        self.bump();
                    }
                }
                Some('\n') | Some('\r') | None => {
                    return Err(ReaderError::new(
                        self.here(),
                        "Unterminated string. Expected delimiter: \".",
                    ));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn read_number(&mut self, start: TextPos) -> Result<Positioned<JsonEvent>, ReaderError> {
        let begin = self.offset;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            self.bump();
        }
        self.complete_value();
        let literal = &self.text[begin..self.offset];
        if is_json_number(literal) {
            Ok(self.positioned(JsonEvent::Number, start))
        } else {
            Err(ReaderError::new(
                start,
                format!("Input string '{}' is not a valid number.", literal),
            ))
        }
    }

    fn read_word(&mut self, start: TextPos) -> Result<Positioned<JsonEvent>, ReaderError> {
        let begin = self.offset;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        self.complete_value();
        match &self.text[begin..self.offset] {
            "true" | "false" => Ok(self.positioned(JsonEvent::Boolean, start)),
            "null" => Ok(self.positioned(JsonEvent::Null, start)),
            word => Err(ReaderError::new(
                start,
                format!("Unexpected character encountered while parsing value: {}.", first_char(word)),
            )),
        }
    }

    fn read_value(&mut self, ch: char, start: TextPos) -> Result<Positioned<JsonEvent>, ReaderError> {
        match ch {
            '{' => {
                self.bump();
                self.stack.push(Container::Object(ObjectState::KeyOrEnd));
                Ok(self.positioned(JsonEvent::StartObject, start))
            }
            '[' => {
                self.bump();
                self.stack.push(Container::Array(ArrayState::ValueOrEnd));
                Ok(self.positioned(JsonEvent::StartArray, start))
            }
            '"' => {
                let result = self.read_string();
                self.complete_value();
                result.map(|()| self.positioned(JsonEvent::String, start))
            }
            '-' | '0'..='9' => self.read_number(start),
            c if c.is_alphabetic() => self.read_word(start),
            c => Err(self.unexpected(format!(
                "Unexpected character encountered while parsing value: {}.",
                c
            ))),
        }
    }

    fn read_property_name(&mut self, start: TextPos) -> Result<Positioned<JsonEvent>, ReaderError> {
        let result = self.read_string();
        if let Some(Container::Object(state)) = self.stack.last_mut() {
            *state = ObjectState::Colon;
        }
        result.map(|()| self.positioned(JsonEvent::PropertyName, start))
    }

    fn end_of_input(&self) -> Result<Option<Positioned<JsonEvent>>, ReaderError> {
        if self.stack.is_empty() {
            return Ok(None);
        }
        Err(ReaderError::new(
            self.here(),
            "Unexpected end of content while loading JSON.",
        ))
    }
}

impl PullReader for JsonReader<'_> {
    type Event = JsonEvent;

    fn next_event(&mut self) -> Result<Option<Positioned<JsonEvent>>, ReaderError> {
        loop {
            self.skip_whitespace();
            let start = self.here();
            let Some(ch) = self.peek() else {
                return self.end_of_input();
            };

            if ch == '/' {
                return self.read_comment(start).map(Some);
            }

            if self.expects_value() {
                if ch == ']' && self.stack.last() == Some(&Container::Array(ArrayState::ValueOrEnd)) {
                    return Ok(Some(self.close(JsonEvent::EndArray, start)));
                }
                return self.read_value(ch, start).map(Some);
            }

            match self.stack.last().copied() {
                None => {
                    return Err(self.unexpected(format!(
                        "Additional text encountered after finished reading JSON content: {}.",
                        ch
                    )))
                }
                Some(Container::Object(state)) => match (state, ch) {
                    (ObjectState::KeyOrEnd, '}') | (ObjectState::CommaOrEnd, '}') => {
                        return Ok(Some(self.close(JsonEvent::EndObject, start)));
                    }
                    (ObjectState::KeyOrEnd, '"') | (ObjectState::Key, '"') => {
                        return self.read_property_name(start).map(Some);
                    }
                    (ObjectState::KeyOrEnd, c) | (ObjectState::Key, c) => {
                        return Err(self.unexpected(format!(
                            "Invalid property identifier character: {}.",
                            c
                        )));
                    }
                    (ObjectState::Colon, ':') => {
                        self.bump();
                        self.set_object_state(ObjectState::Value);
                    }
                    (ObjectState::Colon, c) => {
                        return Err(self.unexpected(format!(
                            "Invalid character after parsing property name. Expected ':' but got: {}.",
                            c
                        )));
                    }
                    (ObjectState::CommaOrEnd, ',') => {
                        self.bump();
                        self.set_object_state(ObjectState::Key);
                    }
                    (ObjectState::CommaOrEnd, c) => {
                        return Err(self.unexpected(format!(
                            "After parsing a value an unexpected character was encountered: {}.",
                            c
                        )));
                    }
                    // Value states are handled by expects_value
                    (ObjectState::Value, c) => {
                        return self.read_value(c, start).map(Some);
                    }
                },
                Some(Container::Array(_)) => match ch {
                    ']' => return Ok(Some(self.close(JsonEvent::EndArray, start))),
                    ',' => {
                        self.bump();
                        if let Some(Container::Array(state)) = self.stack.last_mut() {
                            *state = ArrayState::Value;
                        }
                    }
                    c => {
                        return Err(self.unexpected(format!(
                            "After parsing a value an unexpected character was encountered: {}.",
                            c
                        )));
                    }
                },
            }
        }
    }
}

impl JsonReader<'_> {
    fn set_object_state(&mut self, next: ObjectState) {
        if let Some(Container::Object(state)) = self.stack.last_mut() {
            *state = next;
        }
    }
}

fn first_char(word: &str) -> char {
    word.chars().next().unwrap_or(' ')
}

/// Strict JSON number grammar: `-? int frac? exp?`.
fn is_json_number(literal: &str) -> bool {
    let bytes = literal.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_len = i - int_start;
    if int_len == 0 || (int_len > 1 && bytes[int_start] == b'0') {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}
