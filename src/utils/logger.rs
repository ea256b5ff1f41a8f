//! Logger utility for application-wide logging
//!
//! A `log::Log` implementation that writes every record to the console and,
//! when a log file is given, to that file as well. Only the binary installs it.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Console plus optional file logger
pub struct Logger {
    /// File handle for log output
    pub(crate) file: Mutex<Option<File>>,
    level: LevelFilter,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Optional path of a log file, truncated on creation
    /// * `level` - Most verbose level that gets written
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: Option<&Path>, level: LevelFilter) -> io::Result<Self> {
        let file = match log_file {
            Some(path) => Some(File::create(path)?),
            None => None,
        };
        Ok(Logger {
            file: Mutex::new(file),
            level,
        })
    }

    /// Writes a line to the log file, if there is one
    pub fn write_line(&self, message: &str) -> io::Result<()> {
        // A poisoned lock still guards a usable file
        let mut guard = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Installs a logger as the global `log` backend
    pub fn init_global_logger(log_file: Option<&Path>, level: LevelFilter) -> io::Result<()> {
        let global_logger = Logger::new(log_file, level)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.write_line(&message);

            // stdout carries command output
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {}
}
