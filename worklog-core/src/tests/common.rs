use crate::Config;
use crate::config::LogLevel;
use crate::records::{Entry, Person};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use log::{Log, Metadata, Record};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Test helper to create a default `Config` for testing purposes.
///
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config(tmp_dir: PathBuf, reference_date: Option<NaiveDate>) -> Config {
    Config {
        storage_path: tmp_dir,
        log_level: LogLevel::Debug,
        reference_date: reference_date.unwrap_or(Local::now().date_naive()),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("valid timestamp")
}

pub fn entry_at(message: &str, rfc3339: &str) -> Entry {
    Entry::new(message, at(rfc3339)).expect("valid entry")
}

pub fn person(handle: &str, name: &str) -> Person {
    Person::new(handle, name).expect("valid person")
}

/// Records every line as `LEVEL message`.
#[derive(Default)]
pub struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl CapturingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lines").clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .expect("log lines")
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}
