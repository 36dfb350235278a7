//! Shared, lock-guarded device configuration.
//!
//! The live configuration is owned by a [`ConfigStore`] and reached through
//! it; there is no global instance. Persisted state is layered:
//!
//! ```text
//! defaults  (compiled in)
//! conf0.json  factory overlay, trusted
//! conf1.json .. conf8.json  vendor / app overlays
//! conf9.json  user level, written by save()
//! ```
//!
//! Levels above 0 are filtered through the `conf_acl` value of the
//! configuration loaded so far.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, info};

use crate::emit::{emit, emit_file};
use crate::error::ConfigError;
use crate::lifecycle::instantiate;
use crate::parse::parse;
use crate::record::RootRecord;
use crate::schema::ConfType;
use crate::value;

/// Number of persisted levels.
pub const LEVEL_COUNT: usize = 10;

/// Level written by [`ConfigStore::save`].
pub const USER_LEVEL: usize = LEVEL_COUNT - 1;

/// Field holding the ACL applied to levels above 0.
pub const ACL_KEY: &str = "conf_acl";

/// `confN.json` inside `dir`.
pub fn level_path(dir: &Path, level: usize) -> PathBuf {
    dir.join(format!("conf{}.json", level))
}

/// Owner of the live configuration record.
pub struct ConfigStore<R: RootRecord> {
    dir: PathBuf,
    current: Mutex<R>,
}

impl<R: RootRecord> ConfigStore<R> {
    /// Load defaults and every level present in `dir`.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        let current = load_levels::<R>(&dir, USER_LEVEL)?;
        Ok(Self {
            dir,
            current: Mutex::new(current),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Exclusive access for the duration of the guard.
    pub fn lock(&self) -> MutexGuard<'_, R> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        value::get(&*self.lock(), key, R::schema())
    }

    pub fn set(&self, key: &str, text: &str) -> Result<(), ConfigError> {
        value::set(&mut *self.lock(), key, text, R::schema())
    }

    /// Apply a JSON overlay restricted by `acl`.
    pub fn apply_json(&self, json: &str, acl: &str) -> Result<(), ConfigError> {
        parse(json, acl, R::schema(), &mut *self.lock())
    }

    /// Render the live configuration; with `diff`, only fields that differ
    /// from the compiled-in defaults.
    pub fn dump(&self, pretty: bool, diff: bool) -> Result<String, ConfigError> {
        let cfg = self.lock();
        if diff {
            let defaults = instantiate::<R>()?;
            Ok(emit(&*cfg, Some(&defaults), R::schema(), pretty))
        } else {
            Ok(emit(&*cfg, None, R::schema(), pretty))
        }
    }

    /// Persist the user level: the difference between the live record and
    /// everything below it, written atomically.
    pub fn save(&self) -> Result<(), ConfigError> {
        let baseline = load_levels::<R>(&self.dir, USER_LEVEL - 1)?;
        let path = level_path(&self.dir, USER_LEVEL);
        let cfg = self.lock();
        emit_file(&*cfg, Some(&baseline), R::schema(), true, &path)?;
        info!("saved {}", path.display());
        Ok(())
    }

    /// Drop the user level and reload.
    pub fn reset(&self) -> Result<(), ConfigError> {
        let path = level_path(&self.dir, USER_LEVEL);
        match fs::remove_file(&path) {
            Ok(()) => info!("removed {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ConfigError::io(path, e)),
        }
        let fresh = load_levels::<R>(&self.dir, USER_LEVEL)?;
        *self.lock() = fresh;
        Ok(())
    }
}

/// Defaults with levels `0..=upto` applied.
fn load_levels<R: RootRecord>(dir: &Path, upto: usize) -> Result<R, ConfigError> {
    let mut cfg = instantiate::<R>()?;
    for level in 0..=upto {
        let path = level_path(dir, level);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} not present", path.display());
                continue;
            }
            Err(e) => return Err(ConfigError::io(path, e)),
        };
        let acl = if level == 0 {
            "*".to_string()
        } else {
            level_acl(&cfg)
        };
        if let Err(e) = parse(&text, &acl, R::schema(), &mut cfg) {
            error!("failed to apply {}: {}", path.display(), e);
            return Err(e);
        }
        info!("applied {}", path.display());
    }
    Ok(cfg)
}

fn level_acl<R: RootRecord>(cfg: &R) -> String {
    match R::schema().find(ACL_KEY) {
        Some(e) if e.root().conf_type == ConfType::String => {
            value::get(cfg, ACL_KEY, R::schema()).unwrap_or_default()
        }
        _ => "*".to_string(),
    }
}
