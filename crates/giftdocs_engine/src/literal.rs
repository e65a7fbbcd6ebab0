/* 📖 # Why a hand-written literal reader?

Request payloads in the code samples are written as JSON (curl), object literals
(JavaScript), dict literals (Python) and short arrays (PHP). They are read here as
data with a small recursive-descent parser, one grammar switch per dialect.
Nothing is ever evaluated.

The reader only understands literal syntax: strings, numbers, keywords, lists
and maps. Anything else in a sample (variables, function calls, arithmetic) is a
parse error. That is enough for payloads that stay close to the shipped samples.

The reader stops right after the literal and reports how far it got. This is how
the extractor finds the end of a nested payload without counting brackets by
hand.
*/

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Number, Value};

const MAX_DEPTH: usize = 64;

/// Literal syntax of one code sample representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Json,
    JavaScript,
    Python,
    Php,
}

/// A literal could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Byte offset into the parsed input.
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for LiteralError {}

/// Reads one literal from the start of `input`, skipping leading whitespace and comments.
///
/// Returns the value and the byte offset just past the literal.
pub fn parse_literal(input: &str, dialect: Dialect) -> Result<(Value, usize), LiteralError> {
    let mut reader = Reader {
        src: input,
        pos: 0,
        dialect,
    };
    let value = reader.value(0)?;
    Ok((value, reader.pos))
}

/// Reads `input` as exactly one literal with nothing but whitespace or comments around it.
pub fn parse_complete(input: &str, dialect: Dialect) -> Result<Value, LiteralError> {
    let mut reader = Reader {
        src: input,
        pos: 0,
        dialect,
    };
    let value = reader.value(0)?;
    reader.skip_trivia();
    if reader.pos < input.len() {
        return Err(reader.error("unexpected trailing content"));
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    dialect: Dialect,
}

impl Reader<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}' but found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}' but reached end of input", expected))),
        }
    }

    fn allows_trailing_comma(&self) -> bool {
        self.dialect != Dialect::Json
    }

    fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(idx) => self.pos += idx + 1,
            None => self.pos = self.src.len(),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }
            let rest = self.rest();
            let line_slashes = matches!(self.dialect, Dialect::JavaScript | Dialect::Php);
            let line_hash = matches!(self.dialect, Dialect::Python | Dialect::Php);
            if line_slashes && rest.starts_with("//") || line_hash && rest.starts_with('#') {
                self.skip_line();
            } else if line_slashes && rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(idx) => self.pos += idx + 4,
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal is nested too deeply"));
        }
        self.skip_trivia();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') if self.dialect != Dialect::Php => self.object(depth),
            Some('[') if self.dialect == Dialect::Php => {
                self.bump();
                self.php_array(']', depth)
            }
            Some('[') => self.list(depth),
            Some('"') => self.string('"').map(Value::String),
            Some('\'') if self.dialect != Dialect::Json => self.string('\'').map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number().map(Value::Number),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(depth),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    fn list(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(']') {
                if !items.is_empty() && !self.allows_trailing_comma() {
                    return Err(self.error("trailing comma is not allowed"));
                }
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
            self.skip_trivia();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                _ => return Err(self.error("expected ',' or ']' in list")),
            }
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                if !map.is_empty() && !self.allows_trailing_comma() {
                    return Err(self.error("trailing comma is not allowed"));
                }
                self.bump();
                return Ok(Value::Object(map));
            }
            let key = self.key()?;
            self.skip_trivia();
            self.expect(':')?;
            let value = self.value(depth + 1)?;
            map.insert(key, value);
            self.skip_trivia();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected ',' or '}' in object")),
            }
        }
    }

    fn key(&mut self) -> Result<String, LiteralError> {
        match (self.peek(), self.dialect) {
            (Some('"'), _) => self.string('"'),
            (Some('\''), Dialect::JavaScript | Dialect::Python) => self.string('\''),
            (Some(c), Dialect::JavaScript | Dialect::Python) if c == '-' || c.is_ascii_digit() => {
                self.number().map(|n| n.to_string())
            }
            (Some(c), Dialect::JavaScript) if c.is_alphabetic() || c == '_' || c == '$' => {
                Ok(self.identifier().to_string())
            }
            _ => Err(self.error("expected object key")),
        }
    }

    /// PHP `[...]` or `array(...)` after the opening delimiter.
    ///
    /// Entries with `=>` keys make an object. Unkeyed entries in a keyed array get
    /// the next integer index, as PHP does.
    fn php_array(&mut self, close: char, depth: usize) -> Result<Value, LiteralError> {
        let mut entries: Vec<(Option<String>, Value)> = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }
            let first = self.value(depth + 1)?;
            self.skip_trivia();
            if self.rest().starts_with("=>") {
                self.pos += 2;
                let key = match first {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    _ => return Err(self.error("array keys must be strings or integers")),
                };
                let value = self.value(depth + 1)?;
                entries.push((Some(key), value));
                self.skip_trivia();
            } else {
                entries.push((None, first));
            }
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => break,
                _ => return Err(self.error(format!("expected ',' or '{}' in array", close))),
            }
        }

        if entries.iter().all(|(key, _)| key.is_none()) {
            return Ok(Value::Array(entries.into_iter().map(|(_, v)| v).collect()));
        }
        let mut map = Map::new();
        let mut next_index: i64 = 0;
        for (key, value) in entries {
            let key = match key {
                Some(key) => {
                    if let Ok(index) = key.parse::<i64>() {
                        next_index = next_index.max(index + 1);
                    }
                    key
                }
                None => {
                    next_index += 1;
                    (next_index - 1).to_string()
                }
            };
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn identifier(&mut self) -> &str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn keyword(&mut self, depth: usize) -> Result<Value, LiteralError> {
        let start = self.pos;
        let word = self.identifier().to_string();
        let value = match (self.dialect, word.as_str()) {
            (Dialect::Json | Dialect::JavaScript, "true") => Some(Value::Bool(true)),
            (Dialect::Json | Dialect::JavaScript, "false") => Some(Value::Bool(false)),
            (Dialect::Json | Dialect::JavaScript, "null") => Some(Value::Null),
            (Dialect::JavaScript, "undefined") => Some(Value::Null),
            (Dialect::Python, "True" | "true") => Some(Value::Bool(true)),
            (Dialect::Python, "False" | "false") => Some(Value::Bool(false)),
            (Dialect::Python, "None" | "null") => Some(Value::Null),
            (Dialect::Php, w) if w.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            (Dialect::Php, w) if w.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            (Dialect::Php, w) if w.eq_ignore_ascii_case("null") => Some(Value::Null),
            (Dialect::Php, w) if w.eq_ignore_ascii_case("array") => {
                self.skip_trivia();
                self.expect('(')?;
                return self.php_array(')', depth);
            }
            _ => None,
        };
        value.ok_or_else(|| LiteralError {
            offset: start,
            message: format!("unknown identifier '{}'", word),
        })
    }

    fn number(&mut self) -> Result<Number, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        Number::from_str(text).map_err(|_| LiteralError {
            offset: start,
            message: format!("invalid number '{}'", text),
        })
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.expect(quote)?;
        let php_single = self.dialect == Dialect::Php && quote == '\'';
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or_else(|| self.error("unterminated string"))?;
            match c {
                c if c == quote => return Ok(out),
                '\n' if self.dialect != Dialect::Php => {
                    return Err(self.error("unescaped newline in string"));
                }
                c if c < ' ' && self.dialect == Dialect::Json => {
                    return Err(self.error("unescaped control character in string"));
                }
                '\\' if php_single => match self.peek() {
                    Some(next @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(next);
                    }
                    _ => out.push('\\'),
                },
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let c = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            '"' | '\\' | '/' => out.push(c),
            '\'' if self.dialect != Dialect::Json => out.push('\''),
            '$' if self.dialect == Dialect::Php => out.push('$'),
            'u' => {
                let ch = self.unicode_escape()?;
                out.push(ch);
            }
            _ if self.dialect == Dialect::Json => {
                return Err(self.error(format!("invalid escape '\\{}'", c)));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex4(&mut self) -> Result<u32, LiteralError> {
        let digits = self.rest().get(..4).unwrap_or("");
        let code = u32::from_str_radix(digits, 16)
            .ok()
            .filter(|_| digits.len() == 4 && digits.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid \\u escape"))?;
        self.pos += 4;
        Ok(code)
    }

    fn unicode_escape(&mut self) -> Result<char, LiteralError> {
        let high = self.hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error("invalid \\u escape"));
        }
        if !self.rest().starts_with("\\u") {
            return Err(self.error("unpaired surrogate in \\u escape"));
        }
        self.pos += 2;
        let low = self.hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error("unpaired surrogate in \\u escape"));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))
    }
}

/// Renders `value` as an indented literal in the given dialect.
///
/// Indentation matches `JSON.stringify(value, null, 2)`. Reading the output back
/// with [`parse_complete`] gives the same value. The one exception is an empty
/// PHP object, which renders as `[]` and reads back as an empty list.
pub fn render_literal(value: &Value, dialect: Dialect) -> String {
    let mut out = String::new();
    write_value(&mut out, value, dialect, 0);
    out
}

fn write_value(out: &mut String, value: &Value, dialect: Dialect, level: usize) {
    match value {
        Value::Null => out.push_str(match dialect {
            Dialect::Python => "None",
            _ => "null",
        }),
        Value::Bool(b) => out.push_str(match (dialect, b) {
            (Dialect::Python, true) => "True",
            (Dialect::Python, false) => "False",
            (_, true) => "true",
            (_, false) => "false",
        }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s, dialect),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                out.push_str(if i == 0 { "\n" } else { ",\n" });
                indent(out, level + 1);
                write_value(out, item, dialect, level + 1);
            }
            out.push('\n');
            indent(out, level);
            out.push(']');
        }
        Value::Object(map) => {
            let (open, close, separator) = match dialect {
                Dialect::Php => ('[', ']', " => "),
                _ => ('{', '}', ": "),
            };
            if map.is_empty() {
                out.push(open);
                out.push(close);
                return;
            }
            out.push(open);
            for (i, (key, item)) in map.iter().enumerate() {
                out.push_str(if i == 0 { "\n" } else { ",\n" });
                indent(out, level + 1);
                if dialect == Dialect::JavaScript && is_identifier(key) {
                    out.push_str(key);
                } else {
                    write_string(out, key, dialect);
                }
                out.push_str(separator);
                write_value(out, item, dialect, level + 1);
            }
            out.push('\n');
            indent(out, level);
            out.push(close);
        }
    }
}

fn write_string(out: &mut String, s: &str, dialect: Dialect) {
    if dialect == Dialect::Php {
        out.push('\'');
        for c in s.chars() {
            if c == '\'' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('\'');
    } else {
        // JSON string syntax is also valid JavaScript and Python.
        out.push_str(&Value::String(s.to_string()).to_string());
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
