//! Console backend for the `log` facade.
//!
//! On ESP-IDF targets the entry point installs `EspLogger` instead; both
//! honour the same verbosity, driven by the `debug.level` config field:
//!
//! ```text
//! debug.level  -1    0      1     2     3      4
//! filter       Off   Error  Warn  Info  Debug  Trace
//! ```

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Verbosity applied before configuration is loaded.
pub const DEFAULT_FILTER: LevelFilter = LevelFilter::Info;

/// Writes `[   12.345] LEVEL target: message` lines to stderr.
pub struct ConsoleLogger {
    start: OnceLock<Instant>,
}

static LOGGER: ConsoleLogger = ConsoleLogger {
    start: OnceLock::new(),
};

/// Install the console logger as the global `log` backend.
pub fn init() -> Result<(), SetLoggerError> {
    LOGGER.start.get_or_init(Instant::now);
    log::set_logger(&LOGGER)?;
    log::set_max_level(DEFAULT_FILTER);
    Ok(())
}

/// Map a `debug.level` value to a filter.
pub fn filter_for_debug_level(level: i32) -> LevelFilter {
    match level {
        i32::MIN..=-1 => LevelFilter::Off,
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Apply a `debug.level` value to the global filter.
pub fn apply_debug_level(level: i32) {
    log::set_max_level(filter_for_debug_level(level));
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.start.get_or_init(Instant::now).elapsed();
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "[{:>5}.{:03}] {:<5} {}: {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
