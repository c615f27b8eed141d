//! A YAML file holding a sequence of keyed records, shared by people and projects.
use super::document::{Keyed, Persist};
use super::files::{is_blank_document, read_migrated, write_file};
use crate::error::{RecordError, StoreError, StoreResult, ValidationError};
use crate::logging::Logger;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Records loaded from a file, plus the ones that had to be skipped.
#[derive(Debug)]
pub struct RecordSet<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RecordError>,
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T: Keyed> RecordSet<T> {
    /// Records indexed by key. A later record wins over an earlier one with the same key.
    pub fn into_map(self) -> BTreeMap<String, T> {
        self.records
            .into_iter()
            .map(|r| (r.record_key().to_string(), r))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordFile {
    pub path: PathBuf,
    template: &'static str,
    logger: Logger,
}

impl RecordFile {
    pub fn new(path: PathBuf, template: &'static str, logger: Logger) -> Self {
        Self {
            path,
            template,
            logger,
        }
    }

    /// Like [`load_strict`](Self::load_strict), but a missing file is replaced by the template.
    pub fn load<T>(&self) -> StoreResult<RecordSet<T>>
    where
        T: Persist<Error = ValidationError>,
    {
        match self.load_strict() {
            Err(StoreError::FileNotFound { .. }) => {
                self.create_default_file()?;
                Ok(RecordSet::default())
            }
            other => other,
        }
    }

    pub fn load_strict<T>(&self) -> StoreResult<RecordSet<T>>
    where
        T: Persist<Error = ValidationError>,
    {
        let text = read_migrated(&self.path, &self.logger, || StoreError::FileNotFound {
            path: self.path.clone(),
        })?;
        let set = parse_records::<T>(&self.path, &text, &self.logger)?;
        for rejected in &set.rejected {
            self.logger.warn(format_args!(
                "skipping {} in {}",
                rejected,
                self.path.display()
            ));
        }
        Ok(set)
    }

    /// Replaces the file with `records`. Nothing is written if two records share a key.
    pub fn write<T>(&self, records: &[T]) -> StoreResult<()>
    where
        T: Persist + Keyed,
    {
        let mut seen = HashSet::new();
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.record_key())) {
            return Err(StoreError::DuplicateKey {
                kind: T::KIND,
                key: dup.record_key().to_string(),
            });
        }
        let documents: Vec<T::Document> = records.iter().map(|r| r.to_document()).collect();
        let yaml = serde_yaml::to_string(&documents).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        write_file(&self.path, &yaml)?;
        self.logger.debug(format_args!(
            "wrote {} {} records to {}",
            records.len(),
            T::KIND,
            self.path.display()
        ));
        Ok(())
    }

    /// Writes the commented template unless the file already exists.
    ///
    /// Returns whether a file was created.
    pub fn create_default_file(&self) -> StoreResult<bool> {
        if self.path.exists() {
            self.logger.info(format_args!(
                "{} already exists, leaving it untouched",
                self.path.display()
            ));
            return Ok(false);
        }
        write_file(&self.path, self.template)?;
        self.logger.info(format_args!("created {}", self.path.display()));
        Ok(true)
    }
}

/// Parses a sequence of records, collecting the ones that fail instead of stopping.
pub(crate) fn parse_records<T>(
    path: &Path,
    text: &str,
    logger: &Logger,
) -> StoreResult<RecordSet<T>>
where
    T: Persist<Error = ValidationError>,
{
    if is_blank_document(text) {
        return Ok(RecordSet::default());
    }
    let value: Value = serde_yaml::from_str(text).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    let items = match value {
        Value::Null => return Ok(RecordSet::default()),
        Value::Sequence(items) => items,
        other => {
            return Err(StoreError::invalid(
                path,
                format!("expected a list of records, found {}", value_kind(&other)),
            ));
        }
    };
    let mut set = RecordSet::default();
    for (index, item) in items.into_iter().enumerate() {
        let record = serde_yaml::from_value::<T::Document>(item)
            .map_err(|source| RecordError::Shape { index, source })
            .and_then(|doc| {
                for warning in T::load_warnings(&doc) {
                    logger.warn(format_args!("{warning}"));
                }
                T::from_document(doc).map_err(|source| RecordError::Invalid { index, source })
            });
        match record {
            Ok(record) => set.records.push(record),
            Err(e) => set.rejected.push(e),
        }
    }
    Ok(set)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
