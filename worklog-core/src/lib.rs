pub mod config;
pub mod date_parser;
pub mod dates;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod paths;
pub mod records;
pub mod statistics;
pub mod storage;
pub mod worklog;

#[cfg(test)]
mod tests;

pub use config::{Config, LogLevel};
pub use date_parser::{DateExpressionParser, DateRange, RangeQuery};
pub use error::{
    DateExpressionError, DocumentError, RangeError, RecordError, StoreError, StoreResult,
    ValidationError,
};
pub use logging::Logger;
pub use records::{Day, Entry, Person, Project, Repository};
pub use statistics::Statistics;
pub use storage::{LogStore, PeopleStore, ProjectStore, RecordSet};
pub use worklog::{Mentions, NewEntry, Worklog};
