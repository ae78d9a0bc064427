//! Decoder for the legacy JavaScript shard format.
//!
//! Older documentation generators persist each shard as a JavaScript
//! fragment meant to be loaded directly by a browser-side widget:
//!
//! ```text
//! var searchData=
//! [
//!   ['isopened',['isOpened',['../a.html#x1',1,'CoreAudioFile::isOpened()']]],
//!   ['to_5fstring',['to_string',['../n.html#a8f',1,'ceammc::to_string(const Atom &amp;a)'],
//!                                ['../n.html#a48',1,'ceammc::to_string(const AtomList &amp;a)']]]
//! ];
//! ```
//!
//! Each record is `[escaped-key, [display-label, target...]]` where a
//! target is `[url, flag, qualifier]`. The escaped key (a normalized form
//! of the label with non-alphanumerics hex-escaped) and the numeric flag
//! carry no information this model needs; both are parsed and discarded.
//! Strings are single-quoted with backslash escapes and HTML entities.
//!
//! The decoder is a recursive-descent parser over the array literal. It
//! never evaluates JavaScript.

use crate::error::{Result, ShardError};
use crate::types::{Entry, Shard, Target};

/// Whether shard text is in the legacy JavaScript format.
pub fn is_legacy(text: &str) -> bool {
    text.trim_start().starts_with("var searchData")
}

/// Decodes a legacy JavaScript shard into a [`Shard`].
pub fn decode(key: &str, text: &str) -> Result<Shard> {
    let mut parser = Parser::new(key, text);
    parser.expect_prelude()?;
    let root = parser.parse_value()?;
    parser.expect_end()?;

    let JsValue::Array(records) = root else {
        return Err(ShardError::malformed(key, "searchData is not an array"));
    };

    let mut entries = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        entries.push(record_to_entry(key, i, record)?);
    }

    Ok(Shard::new(key, entries))
}

/// Converts one `[escaped-key, [display, target...]]` record.
fn record_to_entry(key: &str, index: usize, record: JsValue) -> Result<Entry> {
    let malformed = |reason: String| ShardError::malformed(key, reason);

    let JsValue::Array(fields) = record else {
        return Err(malformed(format!("record {index} is not an array")));
    };

    let mut fields = fields.into_iter();
    let (Some(JsValue::String(_escaped)), Some(JsValue::Array(body)), None) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(format!(
            "record {index} must be [key, [label, targets...]]"
        )));
    };

    let mut body = body.into_iter();
    let Some(JsValue::String(label)) = body.next() else {
        return Err(malformed(format!("record {index} has no display label")));
    };

    let mut targets = Vec::new();
    for value in body {
        targets.push(value_to_target(value).ok_or_else(|| {
            malformed(format!("record {index} ('{label}') has an invalid target"))
        })?);
    }
    if targets.is_empty() {
        return Err(malformed(format!("record {index} ('{label}') has no targets")));
    }

    Ok(Entry::new(label, targets))
}

/// Converts one `[url, flag, qualifier]` target array.
///
/// The string fields are positional (url first, qualifier last); numeric
/// flags between them are skipped.
fn value_to_target(value: JsValue) -> Option<Target> {
    let JsValue::Array(fields) = value else {
        return None;
    };

    let mut strings = Vec::with_capacity(2);
    for field in fields {
        match field {
            JsValue::String(s) => strings.push(s),
            JsValue::Number => {}
            JsValue::Array(_) => return None,
        }
    }

    let mut strings = strings.into_iter();
    let (Some(url), Some(qualifier), None) = (strings.next(), strings.next(), strings.next())
    else {
        return None;
    };
    Some(Target::new(url, qualifier))
}

/// A parsed JavaScript literal. Numbers carry no payload; only their
/// presence matters for skipping target flags.
#[derive(Debug)]
enum JsValue {
    String(String),
    Number,
    Array(Vec<JsValue>),
}

struct Parser<'a> {
    key: &'a str,
    text: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(key: &'a str, text: &'a str) -> Self {
        Self { key, text, pos: 0 }
    }

    fn error(&self, reason: &str) -> ShardError {
        ShardError::malformed(self.key, format!("{reason} at byte {}", self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consumes the `var searchData=` prelude.
    fn expect_prelude(&mut self) -> Result<()> {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        let Some(after) = rest.strip_prefix("var searchData") else {
            return Err(self.error("missing 'var searchData' prelude"));
        };
        self.pos += rest.len() - after.len();
        self.skip_whitespace();
        if self.bump() != Some('=') {
            return Err(self.error("expected '=' after searchData"));
        }
        Ok(())
    }

    /// After the root value only whitespace and an optional `;` remain.
    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(';') {
            self.bump();
            self.skip_whitespace();
        }
        if self.peek().is_some() {
            return Err(self.error("trailing data after searchData array"));
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<JsValue> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.parse_array(),
            Some('\'') => self.parse_string().map(JsValue::String),
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
            Some(c) => Err(self.error(&format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_array(&mut self) -> Result<JsValue> {
        self.bump(); // consume '['
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(JsValue::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some(']') => return Ok(JsValue::Array(items)),
                _ => return Err(self.error("expected ',' or ']' in array")),
            }
        }
    }

    /// Parses a single-quoted string, resolving backslash escapes and
    /// HTML entities.
    fn parse_string(&mut self) -> Result<String> {
        self.bump(); // consume opening quote
        let mut out = String::new();

        loop {
            match self.bump() {
                Some('\'') => break,
                Some('\\') => match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error("unterminated escape in string")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }

        Ok(decode_entities(&out))
    }

    /// Consumes an integer literal. The value is discarded.
    fn parse_number(&mut self) -> Result<JsValue> {
        if self.peek() == Some('-') {
            self.bump();
        }
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(self.error("malformed number"));
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        Ok(JsValue::Number)
    }
}

/// Resolves the HTML entities the legacy generator embeds in qualifiers
/// (`const Atom &amp;a` and friends). `&amp;` is resolved last so it never
/// re-forms another entity.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
