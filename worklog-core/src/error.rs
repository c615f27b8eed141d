//! Error types surfaced at the storage boundary.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the day, people and project stores.
///
/// A missing file is always reported as [`StoreError::LogNotFound`] or
/// [`StoreError::FileNotFound`], never as a raw I/O error, so callers can match on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no work log found at {}", path.display())]
    LogNotFound { path: PathBuf },
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("malformed YAML in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("duplicate {kind} key `{key}`")]
    DuplicateKey { kind: &'static str, key: String },
    #[error("project `{key}` does not exist")]
    ProjectNotFound { key: String },
    #[error("no entries to remove in {}", path.display())]
    EmptyDay { path: PathBuf },
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// True for the two "nothing stored there" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LogNotFound { .. } | Self::FileNotFound { .. })
    }
}

/// A record that cannot be constructed because it breaks one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{record} {field} is required")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("an entry with key `{key}` already exists on this day")]
    DuplicateEntryKey { key: String },
    #[error("hash length must be between 1 and 64, got {length}")]
    InvalidHashLength { length: usize },
}

/// A day document whose content does not make a valid [`Day`](crate::records::Day).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("entry {index} has an unrecognised time `{raw}`")]
    InvalidTime { index: usize, raw: String },
    #[error("entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        source: ValidationError,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One record of a people or projects file that was skipped on load.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record {index} has the wrong shape: {source}")]
    Shape {
        index: usize,
        source: serde_yaml::Error,
    },
    #[error("record {index} is invalid: {source}")]
    Invalid {
        index: usize,
        source: ValidationError,
    },
}

/// Raised by the strict date parser when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse date expression \"{input}\"")]
pub struct DateExpressionError {
    pub input: String,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A date range request that cannot be turned into concrete dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error(transparent)]
    Expression(#[from] DateExpressionError),
    #[error("number of days cannot be negative, got {days}")]
    NegativeDays { days: i64 },
    #[error("{days} days back from today is outside the supported calendar")]
    OutOfRange { days: i64 },
    #[error("no date range specified, use days, from/to or a date")]
    Unspecified,
}
