use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use macroquad::prelude::{debug, error, info, warn};

/// Routes `log` records from the puzzle library through macroquad's own log
/// output so both end up in the same place.
pub struct MacroquadLogger {
    level: Level,
}

impl MacroquadLogger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Log for MacroquadLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => error!("[{}] {}", record.target(), record.args()),
            Level::Warn => warn!("[{}] {}", record.target(), record.args()),
            Level::Info => info!("[{}] {}", record.target(), record.args()),
            Level::Debug | Level::Trace => debug!("[{}] {}", record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

pub fn init_with_level(level: Level) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(MacroquadLogger::new(level)))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}

pub fn disable() {
    log::set_max_level(LevelFilter::Off);
}
