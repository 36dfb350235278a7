//! Console error types

use crate::error::ConfigError;

/// Console error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Unknown configuration key
    UnknownKey,
    /// E03: Invalid value format
    InvalidValue,
    /// E04: Missing required argument
    MissingArg,
    /// E05: Dangerous command requires 'confirm'
    RequiresConfirm,
    /// E06: Config file could not be read or written
    StorageError,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::UnknownKey => "E02",
            Self::InvalidValue => "E03",
            Self::MissingArg => "E04",
            Self::RequiresConfirm => "E05",
            Self::StorageError => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::UnknownKey => "unknown key",
            Self::InvalidValue => "invalid value",
            Self::MissingArg => "missing argument",
            Self::RequiresConfirm => "requires 'confirm'",
            Self::StorageError => "storage error",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::UnknownKey(_) => Self::UnknownKey,
            ConfigError::Io { .. } => Self::StorageError,
            _ => Self::InvalidValue,
        }
    }
}
