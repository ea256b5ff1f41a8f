//! Tests for the file and console logger

extern crate std;

use std::panic::{self, AssertUnwindSafe};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::utils::logger::Logger;

#[test]
fn writes_enabled_records_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.log");
    let logger = Logger::new(Some(&path), LevelFilter::Info).unwrap();

    logger.log(&Record::builder().level(Level::Info).args(format_args!("kept")).build());
    logger.log(&Record::builder().level(Level::Debug).args(format_args!("dropped")).build());

    let content = std::fs::read_to_string(&path).unwrap();
    std::assert_eq!(content, "[INFO] kept\n");
}

#[test]
fn console_only_logger_accepts_lines() {
    let logger = Logger::new(None, LevelFilter::Warn).unwrap();
    std::assert!(logger.write_line("nothing to write to").is_ok());
    std::assert!(!logger.enabled(&Metadata::builder().level(Level::Info).build()));
}

#[test]
fn poisoned_lock_still_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.log");
    let logger = Logger::new(Some(&path), LevelFilter::Info).unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = logger.file.lock().unwrap();
        std::panic!("writer died holding the log file");
    }));
    std::assert!(result.is_err());
    std::assert!(logger.file.is_poisoned());

    logger.write_line("still here").unwrap();
    logger.log(&Record::builder().level(Level::Warn).args(format_args!("and here")).build());

    let content = std::fs::read_to_string(&path).unwrap();
    std::assert_eq!(content, "still here\n[WARN] and here\n");
}
