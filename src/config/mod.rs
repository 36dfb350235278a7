//! Module: config
//!
//! Purpose: The device configuration generated from config_schema.json.
//!
//! Architecture:
//! - config_schema.json: Single source of truth for all config
//! - build.rs: Code generation at build time into OUT_DIR/config.rs
//! - Generated code: schema table, record structs, compiled-in defaults
//! - Engine modules (parse, emit, value, lifecycle) work on any generated
//!   record through `Record`
//!
//! Safety: not internally synchronised. Share through [`SysConfig`].

use crate::record::{ConfStr, Record, RootRecord, SchemaRecord, Slot, SlotMut};
use crate::schema::{ConfEntry, ConfType, Schema};
use crate::store::ConfigStore;

include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// The device's shared configuration context.
pub type SysConfig = ConfigStore<Config>;

/// Root schema of the device configuration.
pub fn schema() -> Schema<'static> {
    Config::schema()
}
