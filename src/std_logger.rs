use std::env;

use chrono::Local;
use log::{max_level, LevelFilter, Metadata, Record, SetLoggerError};

pub struct StdLogger;

static LOGGER: StdLogger = StdLogger;

impl log::Log for StdLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let time_str = Local::now().format("%Y-%m-%dT%H:%M:%S");
            println!("{0} {1:<8}: {2}", time_str, record.level(), record.args())
        }
    }

    fn flush(&self) {}
}

/// Installs the logger with the level named by `LOG_LEVEL` (default `info`).
pub fn init() -> Result<(), SetLoggerError> {
    let level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
