//! JSON emitter.
//!
//! Walks the schema (not the record) in table order and renders live
//! values. With a baseline record, fields equal to the baseline are left
//! out, which turns the output into a minimal overlay.
//!
//! Output goes to a caller-owned buffer; the sink runs after every emitted
//! field and once at the end, and may drain the buffer to stream the
//! document out in bounded memory.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::error;

use crate::error::ConfigError;
use crate::json::push_json_str;
use crate::record::{Record, Slot};
use crate::schema::{ConfType, Schema};

/// Indentation step in pretty mode.
const INDENT: usize = 2;

/// Render `record` as JSON, omitting fields equal to `base`.
pub fn emit<R>(record: &R, base: Option<&R>, schema: Schema<'_>, pretty: bool) -> String
where
    R: Record + ?Sized,
{
    let mut out = String::new();
    emit_with(record, base, schema, pretty, &mut out, |_| {});
    out
}

/// Render into `out`, calling `sink` after each field and at the end.
pub fn emit_with<R, F>(
    record: &R,
    base: Option<&R>,
    schema: Schema<'_>,
    pretty: bool,
    out: &mut String,
    sink: F,
) where
    R: Record + ?Sized,
    F: FnMut(&mut String),
{
    emit_at(record, base, schema, pretty, schema.root().offset, out, sink);
}

/// Render a standalone sub-record against its own subtree schema.
pub fn emit_sub<R>(sub_record: &R, sub_base: Option<&R>, sub_schema: Schema<'_>, pretty: bool) -> String
where
    R: Record + ?Sized,
{
    emit(sub_record, sub_base, sub_schema, pretty)
}

pub(crate) fn emit_at<R, F>(
    record: &R,
    base: Option<&R>,
    schema: Schema<'_>,
    pretty: bool,
    offset_base: usize,
    out: &mut String,
    sink: F,
) where
    R: Record + ?Sized,
    F: FnMut(&mut String),
{
    let mut ctx = EmitCtx {
        record,
        base,
        pretty,
        offset_base,
        out,
        sink,
    };
    ctx.entry(schema, 0);
    (ctx.sink)(&mut *ctx.out);
}

/// Whether every primitive under `schema` equals its baseline value.
pub fn value_eq<R>(record: &R, base: Option<&R>, schema: Schema<'_>) -> bool
where
    R: Record + ?Sized,
{
    value_eq_at(record, base, schema, schema.root().offset)
}

fn value_eq_at<R>(record: &R, base: Option<&R>, schema: Schema<'_>, offset_base: usize) -> bool
where
    R: Record + ?Sized,
{
    let Some(base) = base else {
        return false;
    };
    let slot_eq = |offset: usize| {
        let Some(rel) = offset.checked_sub(offset_base) else {
            return false;
        };
        match (record.slot(rel), base.slot(rel)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    };
    match schema.root().conf_type {
        ConfType::Object => schema
            .descendants()
            .iter()
            .filter(|e| e.conf_type != ConfType::Object)
            .all(|e| slot_eq(e.offset)),
        _ => slot_eq(schema.root().offset),
    }
}

/// Append one value. Strings are JSON-quoted when `quote` is set,
/// otherwise appended raw; absent strings render empty.
pub(crate) fn format_slot(out: &mut String, slot: Slot<'_>, quote: bool) {
    match slot {
        Slot::Int(v) => {
            let _ = write!(out, "{}", v);
        }
        Slot::UnsignedInt(v) => {
            let _ = write!(out, "{}", v);
        }
        Slot::Double(v) => {
            let _ = write!(out, "{}", v);
        }
        Slot::Bool(v) => out.push_str(if v { "true" } else { "false" }),
        Slot::Str(s) if quote => push_json_str(out, s.as_str_or_empty()),
        Slot::Str(s) => out.push_str(s.as_str_or_empty()),
    }
}

struct EmitCtx<'a, R: ?Sized, F> {
    record: &'a R,
    base: Option<&'a R>,
    pretty: bool,
    offset_base: usize,
    out: &'a mut String,
    sink: F,
}

impl<R, F> EmitCtx<'_, R, F>
where
    R: Record + ?Sized,
    F: FnMut(&mut String),
{
    fn entry(&mut self, schema: Schema<'_>, indent: usize) {
        let e = schema.root();
        if e.conf_type == ConfType::Object {
            self.object(schema, indent + INDENT);
            return;
        }
        let record = self.record;
        let slot = e
            .offset
            .checked_sub(self.offset_base)
            .and_then(|rel| record.slot(rel));
        match slot {
            Some(slot) => format_slot(&mut *self.out, slot, true),
            None => self.out.push_str("null"),
        }
    }

    fn object(&mut self, schema: Schema<'_>, indent: usize) {
        self.out.push('{');
        let mut first = true;
        for child in schema.children() {
            if value_eq_at(self.record, self.base, child, self.offset_base) {
                continue;
            }
            if !first {
                self.out.push(',');
            }
            first = false;
            if self.pretty {
                push_indent(self.out, indent);
            }
            push_json_str(self.out, child.root().key);
            self.out.push_str(if self.pretty { ": " } else { ":" });
            self.entry(child, indent);
            (self.sink)(&mut *self.out);
        }
        if self.pretty {
            push_indent(self.out, indent - INDENT);
        }
        self.out.push('}');
    }
}

fn push_indent(out: &mut String, n: usize) {
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(n));
}

/// `<path>.tmp`
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write the rendering of `record` to `path` atomically.
///
/// Output streams into `<path>.tmp`, which is synced and then renamed over
/// `path`. On any failure `path` keeps its previous contents; the temp file
/// may be left behind.
pub fn emit_file<R>(
    record: &R,
    base: Option<&R>,
    schema: Schema<'_>,
    pretty: bool,
    path: impl AsRef<Path>,
) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    let path = path.as_ref();
    let tmp = tmp_path(path);

    let file = File::create(&tmp).map_err(|e| {
        error!("error opening {} for writing: {}", tmp.display(), e);
        ConfigError::io(&tmp, e)
    })?;
    let mut writer = BufWriter::new(file);
    let mut write_err: Option<io::Error> = None;

    let mut buf = String::new();
    emit_with(record, base, schema, pretty, &mut buf, |chunk: &mut String| {
        if write_err.is_none() {
            if let Err(e) = writer.write_all(chunk.as_bytes()) {
                write_err = Some(e);
            }
        }
        chunk.clear();
    });

    if let Some(e) = write_err {
        error!("error writing {}: {}", tmp.display(), e);
        return Err(ConfigError::io(&tmp, e));
    }
    let file = writer
        .into_inner()
        .map_err(|e| ConfigError::io(&tmp, e.into_error()))?;
    file.sync_all().map_err(|e| ConfigError::io(&tmp, e))?;
    drop(file);

    fs::rename(&tmp, path).map_err(|e| {
        error!("error renaming {} to {}: {}", tmp.display(), path.display(), e);
        ConfigError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigHttp};
    use crate::lifecycle::instantiate;
    use crate::record::SchemaRecord;

    #[test]
    fn test_compact_sub_record() {
        let http: ConfigHttp = instantiate().unwrap();
        assert_eq!(
            emit(&http, None, ConfigHttp::schema(), false),
            r#"{"enable":true,"port":80}"#
        );
    }

    #[test]
    fn test_pretty_sub_record() {
        let http: ConfigHttp = instantiate().unwrap();
        assert_eq!(
            emit(&http, None, ConfigHttp::schema(), true),
            "{\n  \"enable\": true,\n  \"port\": 80\n}"
        );
    }

    #[test]
    fn test_pretty_nested_indent() {
        let mut cfg: Config = instantiate().unwrap();
        let base: Config = instantiate().unwrap();
        cfg.wifi.sta.enable = true;
        assert_eq!(
            emit(&cfg, Some(&base), Config::schema(), true),
            "{\n  \"wifi\": {\n    \"sta\": {\n      \"enable\": true\n    }\n  }\n}"
        );
    }

    #[test]
    fn test_double_is_fixed_point() {
        let mut cfg: Config = instantiate().unwrap();
        let out = emit(&cfg, None, Config::schema(), false);
        assert!(out.contains(r#""factor":0.5,"#));
        assert!(out.contains(r#""event_mask":4294967295"#));

        cfg.debug.factor = 1e-7;
        let out = emit(&cfg, None, Config::schema(), false);
        assert!(out.contains(r#""factor":0.0000001,"#));
    }

    #[test]
    fn test_absent_string_renders_empty() {
        let cfg: Config = instantiate().unwrap();
        let out = emit(&cfg, None, Config::schema(), false);
        assert!(out.contains(r#""password":"""#));
    }

    #[test]
    fn test_sink_runs_per_field_and_at_end() {
        let http: ConfigHttp = instantiate().unwrap();
        let mut chunks = Vec::new();
        let mut out = String::new();
        emit_with(&http, None, ConfigHttp::schema(), false, &mut out, |buf: &mut String| {
            chunks.push(std::mem::take(buf));
        });
        assert_eq!(chunks, [r#"{"enable":true"#, r#","port":80"#, "}"]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_value_eq_object_compares_descendants() {
        let mut cfg: Config = instantiate().unwrap();
        let base: Config = instantiate().unwrap();
        let wifi = Config::schema().find("wifi").unwrap();
        assert!(value_eq(&cfg, Some(&base), Config::schema()));
        cfg.wifi.ap.channel = 11;
        assert!(!value_eq(&cfg, Some(&base), Config::schema()));
        assert!(!value_eq_at(&cfg, Some(&base), wifi, 0));
        assert!(value_eq_at(&cfg, Some(&base), Config::schema().find("http").unwrap(), 0));
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(tmp_path(Path::new("/a/conf9.json")), PathBuf::from("/a/conf9.json.tmp"));
    }
}
