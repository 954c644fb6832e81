use std::{
    io::{self, Write},
    sync::OnceLock,
};

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::{PROGRAM_LOG_LEVEL, PROGRAM_NAME};

/// Stderr logger; stdout is reserved for the final import summary.
pub struct Logger {
    level: Level,
}

impl Logger {
    fn format(&self, record: &Record<'_>) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format(record);
        // A closed stderr must not abort an import halfway through.
        let _ = writeln!(io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Level requested through `TRACKSINK_LOG_LEVEL`, `warn` when unset or invalid.
pub fn level_from_env() -> Level {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

pub fn init() -> Result<(), SetLoggerError> {
    init_with(level_from_env())
}

/// Install the logger at `level`.
///
/// Only the first call installs anything; later calls are no-ops so tests
/// and the binary can both call this freely.
pub fn init_with(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    let first_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger { level });

    if first_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
        log::debug!(target: PROGRAM_NAME, "logger installed at {}", logger.level);
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
