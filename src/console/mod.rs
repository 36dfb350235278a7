//! Line console for inspecting and editing the live configuration
//!
//! One command per line; handlers share the [`SysConfig`](crate::config::SysConfig)
//! passed in by the caller.

pub mod commands;
pub mod error;
pub mod parser;

pub use commands::{command_names, execute, COMMANDS};
pub use error::ConsoleError;
pub use parser::{parse_line, ParsedCommand};
