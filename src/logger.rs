//! Console logger for the demo binaries.
//!
//! The library only emits through the [`log`] facade; binaries call
//! [`init`] once at startup to see the output.
//!
//! ```text
//! INFO [   0.002s] gyro_leveler::ship::fleet - attach vessel 1 (Nose-down)
//! ```

use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Writes `LEVEL [elapsed] target - message` lines to stderr.
pub struct ConsoleLogger {
    start: Instant,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { start: Instant::now(), level }
    }

    fn format(&self, record: &Record) -> String {
        format!(
            "{:<5} [{:>9.3}s] {} - {}",
            record.level(),
            self.start.elapsed().as_secs_f64(),
            record.target(),
            record.args()
        )
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = self.format(record);
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the console logger. Fails if a logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
