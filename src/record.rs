//! Configuration record model.
//!
//! Records are plain generated structs. The engine never touches their
//! fields by name; it goes through [`Record`], which maps a schema offset
//! (relative to the record's own object entry) to a typed slot.

use std::collections::TryReserveError;

use crate::schema::Schema;

/// String field storage.
///
/// `Default` aliases compiled-in text and is never freed or mutated through
/// the record; `Owned` belongs to the record.
#[derive(Debug, Clone, Default)]
pub enum ConfStr {
    #[default]
    Absent,
    Default(&'static str),
    Owned(String),
}

impl ConfStr {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfStr::Absent => None,
            ConfStr::Default(s) => Some(*s),
            ConfStr::Owned(s) => Some(s.as_str()),
        }
    }

    /// Text, or `""` when absent.
    pub fn as_str_or_empty(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// Absent or zero-length.
    pub fn is_empty(&self) -> bool {
        self.as_str_or_empty().is_empty()
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfStr::Default(_))
    }

    /// Replace with an owned copy of `s`; empty text is stored as absent.
    pub fn set(&mut self, s: &str) -> Result<(), TryReserveError> {
        *self = if s.is_empty() {
            ConfStr::Absent
        } else {
            ConfStr::Owned(dup(s)?)
        };
        Ok(())
    }

    /// Take the value of `src`: owned text is duplicated, default aliases
    /// are shared.
    pub fn copy_from(&mut self, src: &ConfStr) -> Result<(), TryReserveError> {
        *self = match src {
            ConfStr::Absent => ConfStr::Absent,
            ConfStr::Default(s) => ConfStr::Default(*s),
            ConfStr::Owned(s) => ConfStr::Owned(dup(s)?),
        };
        Ok(())
    }

    /// Release owned text and leave the field absent.
    pub fn free(&mut self) {
        *self = ConfStr::Absent;
    }
}

/// Values compare by text; absent equals empty.
impl PartialEq for ConfStr {
    fn eq(&self, other: &Self) -> bool {
        self.as_str_or_empty() == other.as_str_or_empty()
    }
}

impl From<&'static str> for ConfStr {
    fn from(s: &'static str) -> Self {
        if s.is_empty() {
            ConfStr::Absent
        } else {
            ConfStr::Default(s)
        }
    }
}

fn dup(s: &str) -> Result<String, TryReserveError> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

/// Read view of one primitive field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Int(i32),
    UnsignedInt(u32),
    Double(f64),
    Bool(bool),
    Str(&'a ConfStr),
}

/// Write view of one primitive field.
#[derive(Debug)]
pub enum SlotMut<'a> {
    Int(&'a mut i32),
    UnsignedInt(&'a mut u32),
    Double(&'a mut f64),
    Bool(&'a mut bool),
    Str(&'a mut ConfStr),
}

/// Typed field access by schema offset.
///
/// Offsets are relative to the record's own object entry; offset 0 (the
/// record itself) and nested object entries have no slot.
pub trait Record {
    fn slot(&self, offset: usize) -> Option<Slot<'_>>;
    fn slot_mut(&mut self, offset: usize) -> Option<SlotMut<'_>>;
}

/// A record type generated for one object of the schema.
pub trait SchemaRecord: Record + Default + 'static {
    /// Subtree describing this record; its head is the record's own entry.
    fn schema() -> Schema<'static>;
    /// Compiled-in default instance.
    fn defaults() -> &'static Self;
}

/// Marker for the record at the schema root (offset 0).
pub trait RootRecord: SchemaRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_absent() {
        let mut s = ConfStr::Default("x");
        s.set("").unwrap();
        assert!(matches!(s, ConfStr::Absent));
    }

    #[test]
    fn test_copy_shares_default_alias() {
        let mut s = ConfStr::Absent;
        s.copy_from(&ConfStr::Default("uart0")).unwrap();
        assert!(s.is_default());
        assert_eq!(s.as_str(), Some("uart0"));
    }

    #[test]
    fn test_copy_duplicates_owned() {
        let src = ConfStr::Owned("abc".to_string());
        let mut dst = ConfStr::Absent;
        dst.copy_from(&src).unwrap();
        match (&src, &dst) {
            (ConfStr::Owned(a), ConfStr::Owned(b)) => assert_ne!(a.as_ptr(), b.as_ptr()),
            _ => panic!("expected owned copies"),
        }
    }

    #[test]
    fn test_absent_equals_empty() {
        assert_eq!(ConfStr::Absent, ConfStr::Owned(String::new()));
        assert_eq!(ConfStr::Default("a"), ConfStr::Owned("a".to_string()));
        assert_ne!(ConfStr::Absent, ConfStr::Default("a"));
    }
}
