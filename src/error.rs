//! Engine error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ConfType;

/// Errors from parsing, conversion, copying and persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tokenizer rejected the input text.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not an object, or a schema head is not one.
    #[error("not an object")]
    NotAnObject,

    /// Key path not present in the schema.
    #[error("unknown key [{0}]")]
    UnknownKey(String),

    /// Token kind disagrees with the field type.
    #[error("[{path}] is not a {expected}")]
    TypeMismatch { path: String, expected: ConfType },

    /// Text did not convert completely.
    #[error("[{path}] failed to parse [{text}]")]
    InvalidValue { path: String, text: String },

    /// String duplication could not allocate.
    #[error("[{path}] out of memory")]
    Alloc { path: String },

    /// Filesystem failure while loading or saving.
    #[error("{}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
