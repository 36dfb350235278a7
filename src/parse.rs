//! Schema-guided JSON parser.
//!
//! Walks the tokenizer's event stream and writes each recognised field into
//! the record in place. Unknown and access-denied keys are logged and
//! skipped; type mismatches and malformed values fail the call. Once a
//! failure is recorded the remaining events are drained without effect.
//!
//! Records are addressed relative to the head of the schema passed in, so
//! the same call parses the whole configuration (root schema, root record)
//! or a standalone sub-record (subtree schema, sub-record).

use std::str::FromStr;

use log::{debug, error, info};

use crate::access::AccessList;
use crate::error::ConfigError;
use crate::json::{self, Token, TokenKind};
use crate::record::{Record, SlotMut};
use crate::schema::{ConfType, Schema};

/// Apply `json` to `record`, allowing only the keys `acl` permits.
pub fn parse<R>(json: &str, acl: &str, schema: Schema<'_>, record: &mut R) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    let acl = AccessList::parse(acl);
    parse_at(json, &acl, schema, record, schema.root().offset)
}

/// Trusted parse into a standalone sub-record: every key is allowed.
pub fn parse_sub<R>(json: &str, sub_schema: Schema<'_>, sub_record: &mut R) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    parse_at(
        json,
        &AccessList::allow_all(),
        sub_schema,
        sub_record,
        sub_schema.root().offset,
    )
}

/// Parse with an explicit base: record slot = entry offset - `base`.
pub(crate) fn parse_at<R>(
    json: &str,
    acl: &AccessList<'_>,
    schema: Schema<'_>,
    record: &mut R,
    base: usize,
) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    let mut result = Ok(());
    json::walk(json, |path, tok| {
        if result.is_err() {
            return;
        }
        if let Err(e) = apply_event(path, tok, acl, schema, record, base) {
            error!("{}", e);
            result = Err(e);
        }
    })?;
    result
}

fn apply_event<R>(
    path: &str,
    tok: &Token<'_>,
    acl: &AccessList<'_>,
    schema: Schema<'_>,
    record: &mut R,
    base: usize,
) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    let key = match path.strip_prefix('.') {
        Some(key) => key,
        // The whole document; only an object is acceptable there.
        None if path.is_empty() && tok.kind == TokenKind::ObjectEnd => return Ok(()),
        None => return Err(ConfigError::NotAnObject),
    };

    let Some(entry) = schema.find(key) else {
        info!("ignoring unknown key [{}]", key);
        return Ok(());
    };
    let entry = entry.root();

    // Children of an object arrive as their own events.
    if entry.conf_type == ConfType::Object {
        return Ok(());
    }
    if !acl.allows(key) {
        error!("not allowed to set [{}]", key);
        return Ok(());
    }

    let slot = entry
        .offset
        .checked_sub(base)
        .and_then(|offset| record.slot_mut(offset))
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    match slot {
        SlotMut::Int(v) => *v = number(key, tok, entry.conf_type)?,
        SlotMut::UnsignedInt(v) => *v = number(key, tok, entry.conf_type)?,
        SlotMut::Double(v) => *v = number(key, tok, entry.conf_type)?,
        SlotMut::Bool(v) => {
            *v = match tok.kind {
                TokenKind::True => true,
                TokenKind::False => false,
                _ => return Err(mismatch(key, ConfType::Bool)),
            }
        }
        SlotMut::Str(s) => {
            if tok.kind != TokenKind::String {
                return Err(mismatch(key, ConfType::String));
            }
            s.set(&tok.text).map_err(|_| ConfigError::Alloc {
                path: key.to_string(),
            })?;
        }
    }

    debug!("set [{}] = [{}]", key, tok.text);
    Ok(())
}

/// Strict conversion: the token must be a number and convert completely.
fn number<T: FromStr>(key: &str, tok: &Token<'_>, expected: ConfType) -> Result<T, ConfigError> {
    if tok.kind != TokenKind::Number {
        return Err(mismatch(key, expected));
    }
    tok.text.parse().map_err(|_| ConfigError::InvalidValue {
        path: key.to_string(),
        text: tok.text.to_string(),
    })
}

fn mismatch(key: &str, expected: ConfType) -> ConfigError {
    ConfigError::TypeMismatch {
        path: key.to_string(),
        expected,
    }
}
