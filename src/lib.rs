//! # fwconf
//!
//! Schema-driven runtime configuration for device firmware.
//!
//! ## Architecture
//!
//! A build-time generated, flat pre-order [`schema`] table describes every
//! field of a generated record (see [`config`]). The engine walks the table
//! and reaches fields through [`record::Record`] slots:
//! - [`parse`]: apply a JSON overlay, filtered by an access list
//! - [`emit`]: render JSON, optionally only fields differing from a base
//! - [`value`]: typed and textual access to single fields by path
//! - [`lifecycle`]: instantiate, copy, duplicate, free
//!
//! [`store::ConfigStore`] owns the live record and layers `confN.json`
//! files over the defaults. [`console`] drives it line by line.

pub mod access;
pub mod config;
pub mod console;
pub mod emit;
pub mod error;
pub mod json;
pub mod lifecycle;
pub mod logging;
pub mod parse;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use access::{check_access, AccessList};
pub use config::{Config, SysConfig};
pub use emit::{emit, emit_file, emit_sub, emit_with, value_eq};
pub use error::ConfigError;
pub use lifecycle::{copy, duplicate, free, instantiate};
pub use parse::{parse, parse_sub};
pub use record::{ConfStr, Record, RootRecord, SchemaRecord, Slot, SlotMut};
pub use schema::{ConfEntry, ConfType, Schema, SchemaError};
pub use store::ConfigStore;
