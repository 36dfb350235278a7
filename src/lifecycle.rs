//! Record copy and release.
//!
//! Both walk every descendant of the schema head in a flat loop, so nested
//! objects are covered without recursion. Records are addressed relative to
//! the head, which makes the same calls work for sub-records.

use log::error;

use crate::error::ConfigError;
use crate::record::{Record, SchemaRecord, Slot, SlotMut};
use crate::schema::{ConfType, Schema};

/// Copy every field of `src` into `dst`.
///
/// Owned strings are duplicated, default aliases shared. A failed
/// duplication leaves that field absent and is reported after the
/// remaining fields have been copied.
pub fn copy<R>(schema: Schema<'_>, src: &R, dst: &mut R) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    let head = schema.root();
    if head.conf_type != ConfType::Object {
        return Err(ConfigError::NotAnObject);
    }

    let mut result = Ok(());
    for e in schema.descendants() {
        let rel = e.offset - head.offset;
        let (Some(from), Some(to)) = (src.slot(rel), dst.slot_mut(rel)) else {
            continue;
        };
        match (from, to) {
            (Slot::Int(v), SlotMut::Int(d)) => *d = v,
            (Slot::UnsignedInt(v), SlotMut::UnsignedInt(d)) => *d = v,
            (Slot::Double(v), SlotMut::Double(d)) => *d = v,
            (Slot::Bool(v), SlotMut::Bool(d)) => *d = v,
            (Slot::Str(v), SlotMut::Str(d)) => {
                if d.copy_from(v).is_err() {
                    error!("[{}] out of memory", e.key);
                    d.free();
                    if result.is_ok() {
                        result = Err(ConfigError::Alloc {
                            path: e.key.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    result
}

/// Release every string of `record`: owned text is dropped, default
/// aliases are detached. All string fields end up absent.
pub fn free<R>(schema: Schema<'_>, record: &mut R)
where
    R: Record + ?Sized,
{
    let head = schema.root();
    if head.conf_type != ConfType::Object {
        return;
    }
    for e in schema.descendants() {
        if e.conf_type != ConfType::String {
            continue;
        }
        if let Some(SlotMut::Str(s)) = record.slot_mut(e.offset - head.offset) {
            s.free();
        }
    }
}

/// A fresh record initialised from the compiled-in defaults.
pub fn instantiate<R: SchemaRecord>() -> Result<R, ConfigError> {
    duplicate(R::defaults())
}

/// Deep copy of `src` through its schema.
pub fn duplicate<R: SchemaRecord>(src: &R) -> Result<R, ConfigError> {
    let mut dst = R::default();
    copy(R::schema(), src, &mut dst)?;
    Ok(dst)
}
