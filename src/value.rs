//! Typed and textual access to single configuration values.
//!
//! [`get`] and [`set`] work on dotted paths with the same formatting and
//! strict conversion rules as the emitter and parser. [`Field`] is a path
//! resolved once against a schema, with typed getters and setters.

use log::debug;

use crate::access::AccessList;
use crate::emit::{emit_at, format_slot};
use crate::error::ConfigError;
use crate::parse::parse_at;
use crate::record::{Record, Slot, SlotMut};
use crate::schema::{ConfEntry, ConfType, Schema};

/// Render the value at `path` as text. Objects render as compact JSON,
/// strings raw (absent as empty).
pub fn get<R>(record: &R, path: &str, schema: Schema<'_>) -> Option<String>
where
    R: Record + ?Sized,
{
    Field::resolve(schema, path).and_then(|f| f.get(record))
}

/// Convert `text` according to the field type and store it.
pub fn set<R>(record: &mut R, path: &str, text: &str, schema: Schema<'_>) -> Result<(), ConfigError>
where
    R: Record + ?Sized,
{
    Field::resolve(schema, path)
        .ok_or_else(|| ConfigError::UnknownKey(path.to_string()))?
        .set(record, text)
}

/// A schema entry resolved against the base of the schema it was found in.
#[derive(Clone, Copy, Debug)]
pub struct Field<'s> {
    path: &'s str,
    subtree: Schema<'s>,
    base: usize,
}

impl<'s> Field<'s> {
    pub fn resolve(schema: Schema<'s>, path: &'s str) -> Option<Self> {
        let subtree = schema.find(path)?;
        Some(Self {
            path,
            subtree,
            base: schema.root().offset,
        })
    }

    pub fn entry(&self) -> &'s ConfEntry {
        self.subtree.root()
    }

    pub fn value_type(&self) -> ConfType {
        self.entry().conf_type
    }

    fn slot<'r, R: Record + ?Sized>(&self, record: &'r R) -> Option<Slot<'r>> {
        let rel = self.entry().offset.checked_sub(self.base)?;
        record.slot(rel)
    }

    fn slot_mut<'r, R: Record + ?Sized>(&self, record: &'r mut R) -> Result<SlotMut<'r>, ConfigError> {
        self.entry()
            .offset
            .checked_sub(self.base)
            .and_then(|rel| record.slot_mut(rel))
            .ok_or_else(|| ConfigError::UnknownKey(self.path.to_string()))
    }

    fn mismatch(&self) -> ConfigError {
        ConfigError::TypeMismatch {
            path: self.path.to_string(),
            expected: self.value_type(),
        }
    }

    fn invalid(&self, text: &str) -> ConfigError {
        ConfigError::InvalidValue {
            path: self.path.to_string(),
            text: text.to_string(),
        }
    }

    pub fn int<R: Record + ?Sized>(&self, record: &R) -> Option<i32> {
        match self.slot(record)? {
            Slot::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn unsigned<R: Record + ?Sized>(&self, record: &R) -> Option<u32> {
        match self.slot(record)? {
            Slot::UnsignedInt(v) => Some(v),
            _ => None,
        }
    }

    pub fn double<R: Record + ?Sized>(&self, record: &R) -> Option<f64> {
        match self.slot(record)? {
            Slot::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn bool<R: Record + ?Sized>(&self, record: &R) -> Option<bool> {
        match self.slot(record)? {
            Slot::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// String value; `None` when absent or not a string field.
    pub fn str<'r, R: Record + ?Sized>(&self, record: &'r R) -> Option<&'r str> {
        match self.slot(record)? {
            Slot::Str(s) => s.as_str(),
            _ => None,
        }
    }

    pub fn set_int<R: Record + ?Sized>(&self, record: &mut R, v: i32) -> Result<(), ConfigError> {
        match self.slot_mut(record)? {
            SlotMut::Int(slot) => *slot = v,
            _ => return Err(self.mismatch()),
        }
        Ok(())
    }

    pub fn set_unsigned<R: Record + ?Sized>(&self, record: &mut R, v: u32) -> Result<(), ConfigError> {
        match self.slot_mut(record)? {
            SlotMut::UnsignedInt(slot) => *slot = v,
            _ => return Err(self.mismatch()),
        }
        Ok(())
    }

    pub fn set_double<R: Record + ?Sized>(&self, record: &mut R, v: f64) -> Result<(), ConfigError> {
        match self.slot_mut(record)? {
            SlotMut::Double(slot) => *slot = v,
            _ => return Err(self.mismatch()),
        }
        Ok(())
    }

    pub fn set_bool<R: Record + ?Sized>(&self, record: &mut R, v: bool) -> Result<(), ConfigError> {
        match self.slot_mut(record)? {
            SlotMut::Bool(slot) => *slot = v,
            _ => return Err(self.mismatch()),
        }
        Ok(())
    }

    /// Store an owned copy of `v`; `None` or `""` leaves the field absent.
    pub fn set_str<R: Record + ?Sized>(&self, record: &mut R, v: Option<&str>) -> Result<(), ConfigError> {
        match self.slot_mut(record)? {
            SlotMut::Str(slot) => slot.set(v.unwrap_or("")).map_err(|_| ConfigError::Alloc {
                path: self.path.to_string(),
            }),
            _ => Err(self.mismatch()),
        }
    }

    /// Text rendering, as [`get`].
    pub fn get<R: Record + ?Sized>(&self, record: &R) -> Option<String> {
        let mut out = String::new();
        if self.value_type() == ConfType::Object {
            emit_at(record, None, self.subtree, false, self.base, &mut out, |_| {});
        } else {
            format_slot(&mut out, self.slot(record)?, false);
        }
        Some(out)
    }

    /// Parse `text` by field type, as [`set`]. On failure the field keeps
    /// its previous value (objects may be partially applied).
    pub fn set<R: Record + ?Sized>(&self, record: &mut R, text: &str) -> Result<(), ConfigError> {
        match self.value_type() {
            ConfType::Int => {
                let v = text.parse().map_err(|_| self.invalid(text))?;
                self.set_int(record, v)?;
            }
            ConfType::UnsignedInt => {
                let v = text.parse().map_err(|_| self.invalid(text))?;
                self.set_unsigned(record, v)?;
            }
            ConfType::Double => {
                let v = text.parse().map_err(|_| self.invalid(text))?;
                self.set_double(record, v)?;
            }
            ConfType::Bool => {
                let v = match text {
                    "true" => true,
                    "false" => false,
                    _ => return Err(self.invalid(text)),
                };
                self.set_bool(record, v)?;
            }
            ConfType::String => self.set_str(record, Some(text))?,
            ConfType::Object => {
                parse_at(text, &AccessList::allow_all(), self.subtree, record, self.base)?;
            }
        }
        debug!("set [{}] = [{}]", self.path, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lifecycle::instantiate;
    use crate::record::SchemaRecord;

    #[test]
    fn test_typed_getters() {
        let cfg: Config = instantiate().unwrap();
        let schema = Config::schema();
        assert_eq!(Field::resolve(schema, "wifi.ap.channel").unwrap().int(&cfg), Some(6));
        assert_eq!(
            Field::resolve(schema, "debug.event_mask").unwrap().unsigned(&cfg),
            Some(u32::MAX)
        );
        assert_eq!(Field::resolve(schema, "debug.factor").unwrap().double(&cfg), Some(0.5));
        assert_eq!(Field::resolve(schema, "http.enable").unwrap().bool(&cfg), Some(true));
        assert_eq!(Field::resolve(schema, "debug.dest").unwrap().str(&cfg), Some("uart0"));
        assert_eq!(Field::resolve(schema, "wifi.sta.ssid").unwrap().str(&cfg), None);
    }

    #[test]
    fn test_typed_getter_wrong_type() {
        let cfg: Config = instantiate().unwrap();
        let f = Field::resolve(Config::schema(), "http.port").unwrap();
        assert_eq!(f.bool(&cfg), None);
        assert_eq!(f.value_type(), ConfType::Int);
    }

    #[test]
    fn test_typed_setter_wrong_type() {
        let mut cfg: Config = instantiate().unwrap();
        let f = Field::resolve(Config::schema(), "http.port").unwrap();
        assert!(matches!(f.set_bool(&mut cfg, true), Err(ConfigError::TypeMismatch { .. })));
        f.set_int(&mut cfg, 8080).unwrap();
        assert_eq!(cfg.http.port, 8080);
    }

    #[test]
    fn test_failed_set_keeps_value() {
        let mut cfg: Config = instantiate().unwrap();
        assert!(set(&mut cfg, "http.port", "80x", Config::schema()).is_err());
        assert_eq!(cfg.http.port, 80);
    }
}
