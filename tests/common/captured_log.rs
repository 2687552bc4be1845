//! Records log output so tests can assert on what the engine reported.
//!
//! The logger is global to the test binary and tests run in parallel, so
//! assertions should filter by something unique to the test, such as a mesh name.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct CapturedLog;

static LOGGER: CapturedLog = CapturedLog;

impl Log for CapturedLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Installs the capturing logger. Safe to call from every test.
pub fn install() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Every captured message at `level` that mentions `needle`.
pub fn messages(level: Level, needle: &str) -> Vec<String> {
    RECORDS
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(l, message)| *l == level && message.contains(needle))
                .map(|(_, message)| message.clone())
                .collect()
        })
        .unwrap_or_default()
}
