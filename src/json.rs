//! Adapter over the external JSON tokenizer.
//!
//! The parser consumes a stream of `(path, token)` events rather than a
//! document tree. [`walk`] produces that stream from `serde_json`:
//! children first, then an end event for every object and array, with the
//! root object last under the empty path.
//!
//! ```text
//! {"a": {"b": 1}, "c": [true]}
//!
//! .a.b    Number "1"
//! .a      ObjectEnd
//! .c[0]   True
//! .c      ArrayEnd
//! ""      ObjectEnd
//! ```
//!
//! Number text keeps the digits of the document (`arbitrary_precision`),
//! so no float rounding happens before the field's own conversion. The
//! exponent comes back normalized: `1e3` reads as `1e+3`.

use std::borrow::Cow;
use std::fmt::Write;

use serde_json::Value;

/// Token kind as reported by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    True,
    False,
    Null,
    ObjectEnd,
    ArrayEnd,
}

/// A token and its text: the number's digits (exponent normalized), the
/// unescaped content for strings, empty for containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Tokenize `json` and feed every event to `on_event`.
///
/// Syntax errors are reported before any event is delivered.
pub fn walk<F>(json: &str, mut on_event: F) -> Result<(), serde_json::Error>
where
    F: FnMut(&str, &Token<'_>),
{
    let value: Value = serde_json::from_str(json)?;
    let mut path = String::new();
    visit(&value, &mut path, &mut on_event);
    Ok(())
}

fn visit<F>(value: &Value, path: &mut String, on_event: &mut F)
where
    F: FnMut(&str, &Token<'_>),
{
    let token = match value {
        Value::Object(map) => {
            for (key, child) in map {
                let len = path.len();
                path.push('.');
                path.push_str(key);
                visit(child, path, on_event);
                path.truncate(len);
            }
            Token::new(TokenKind::ObjectEnd, "")
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let len = path.len();
                let _ = write!(path, "[{}]", i);
                visit(item, path, on_event);
                path.truncate(len);
            }
            Token::new(TokenKind::ArrayEnd, "")
        }
        Value::Number(n) => Token::new(TokenKind::Number, n.to_string()),
        Value::String(s) => Token::new(TokenKind::String, s.as_str()),
        Value::Bool(true) => Token::new(TokenKind::True, "true"),
        Value::Bool(false) => Token::new(TokenKind::False, "false"),
        Value::Null => Token::new(TokenKind::Null, "null"),
    };
    on_event(path, &token);
}

/// Append `s` as a quoted, escaped JSON string.
pub fn push_json_str(out: &mut String, s: &str) {
    out.push_str(&Value::from(s).to_string());
}
