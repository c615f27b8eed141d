//! Explicit logger handle handed to every store.
//!
//! Stores never call the `log` macros directly. They log through a [`Logger`] they were
//! constructed with, which defaults to the process-wide `log` backend but can be pointed
//! at any [`log::Log`] sink (tests use a capturing one).
use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

const TARGET: &str = "worklog";

#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Log>,
}

/// Forwards to whatever backend was installed with `log::set_logger`.
struct GlobalSink;

impl Log for GlobalSink {
    fn enabled(&self, metadata: &Metadata) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record);
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

impl Logger {
    pub fn new(sink: Arc<dyn Log>) -> Self {
        Self { sink }
    }

    pub fn global() -> Self {
        Self::new(Arc::new(GlobalSink))
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        if !self.sink.enabled(&metadata) {
            return;
        }
        self.sink.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
