//! One YAML file per calendar day.
//!
//! Writes are read-modify-write without locking. Concurrent writers to the same day must
//! be serialised by the caller.
use super::document::{DayDocument, Persist};
use super::files::{read_migrated, write_file};
use crate::dates::dates_in_range;
use crate::error::{StoreError, StoreResult};
use crate::logging::Logger;
use crate::paths::{day_path, is_day_file};
use crate::records::{Day, Entry};
use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LogStore {
    storage_path: PathBuf,
    logger: Logger,
    /// Stands in for today when a range has no end.
    reference_date: Option<NaiveDate>,
}

impl LogStore {
    pub fn new(storage_path: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            storage_path: storage_path.into(),
            logger,
            reference_date: None,
        }
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn folder_exists(&self) -> bool {
        self.storage_path.is_dir()
    }

    pub fn filepath(&self, date: NaiveDate) -> PathBuf {
        day_path(&self.storage_path, date)
    }

    /// Writes an empty day for `date` unless a file is already there.
    pub fn create_file_skeleton(&self, date: NaiveDate) -> StoreResult<()> {
        let path = self.filepath(date);
        if path.exists() {
            return Ok(());
        }
        self.write(&path, &Day::new(date))
    }

    /// Loads a day file, logging and returning `None` when it does not exist.
    pub fn load(&self, path: &Path) -> StoreResult<Option<Day>> {
        match self.load_strict(path) {
            Ok(day) => Ok(Some(day)),
            Err(StoreError::LogNotFound { path }) => {
                self.logger
                    .error(format_args!("no work log found at {}", path.display()));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_strict(&self, path: &Path) -> StoreResult<Day> {
        let text = read_migrated(path, &self.logger, || StoreError::LogNotFound {
            path: path.to_path_buf(),
        })?;
        let document: DayDocument =
            serde_yaml::from_str(&text).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        for warning in Day::load_warnings(&document) {
            self.logger
                .warn(format_args!("{warning} in {}", path.display()));
        }
        let day = Day::from_document(document)
            .map_err(|e| StoreError::invalid(path, e.to_string()))?;
        self.logger.debug(format_args!(
            "loaded {} entries from {}",
            day.len(),
            path.display()
        ));
        Ok(day)
    }

    /// Replaces the file at `path` with `day`, entries sorted by time.
    ///
    /// Refuses to write a day in which two entries share a key.
    pub fn write(&self, path: &Path, day: &Day) -> StoreResult<()> {
        if let Some(key) = day.duplicate_key() {
            return Err(StoreError::invalid(
                path,
                format!("entry key `{key}` is used more than once"),
            ));
        }
        let yaml = serde_yaml::to_string(&day.to_document()).map_err(|source| {
            StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        write_file(path, &yaml)?;
        self.logger.debug(format_args!(
            "wrote {} entries to {}",
            day.len(),
            path.display()
        ));
        Ok(())
    }

    /// Every day file under the storage directory, oldest first.
    ///
    /// People and project files are not day files and are skipped.
    pub fn all_days(&self) -> StoreResult<Vec<Day>> {
        if !self.folder_exists() {
            return Ok(Vec::new());
        }
        let dir = fs::read_dir(&self.storage_path)
            .map_err(|e| StoreError::io(&self.storage_path, e))?;
        let mut paths = Vec::new();
        for item in dir {
            let path = item.map_err(|e| StoreError::io(&self.storage_path, e))?.path();
            if path.is_file() && is_day_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        let mut days = paths
            .iter()
            .map(|p| self.load_strict(p))
            .collect::<StoreResult<Vec<_>>>()?;
        days.sort_by_key(|d| d.date);
        Ok(days)
    }

    /// Every tag used anywhere in the log.
    pub fn tags(&self) -> StoreResult<BTreeSet<String>> {
        Ok(self
            .all_days()?
            .iter()
            .flat_map(Day::tags)
            .collect())
    }

    /// Days from `start` through `end` (today when `None`) that still have entries
    /// after filtering, in date order.
    ///
    /// `epics_only` keeps epic entries only. A non-empty `tags` keeps entries carrying
    /// at least one of them. Dates without a file are skipped silently.
    pub fn days_between(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
        epics_only: bool,
        tags: &[String],
    ) -> StoreResult<Vec<Day>> {
        if !self.folder_exists() {
            return Ok(Vec::new());
        }
        let end = end.unwrap_or_else(|| self.today());
        let mut days = Vec::new();
        for date in dates_in_range(start, end) {
            let path = self.filepath(date);
            if !path.exists() {
                continue;
            }
            let mut day = self.load_strict(&path)?;
            if epics_only {
                day.retain(|e| e.epic);
            }
            if !tags.is_empty() {
                day.retain(|e| e.has_any_tag(tags));
            }
            if !day.is_empty() {
                days.push(day);
            }
        }
        Ok(days)
    }

    /// Adds `entry` to the day for `date`, creating the file if needed.
    ///
    /// Nothing is written when the entry is rejected.
    pub fn append_entry(&self, date: NaiveDate, entry: Entry) -> StoreResult<Day> {
        let path = self.filepath(date);
        let mut day = if path.exists() {
            self.load_strict(&path)?
        } else {
            Day::new(date)
        };
        day.push(entry)?;
        self.write(&path, &day)?;
        self.logger.info(format_args!("added entry to {}", path.display()));
        Ok(day)
    }

    /// Removes the latest entry of `date` and returns it.
    pub fn remove_last_entry(&self, date: NaiveDate) -> StoreResult<Entry> {
        let path = self.filepath(date);
        let mut day = self.load_strict(&path)?;
        let entry = day
            .remove_last()
            .ok_or_else(|| StoreError::EmptyDay { path: path.clone() })?;
        self.write(&path, &day)?;
        self.logger
            .info(format_args!("removed last entry from {}", path.display()));
        Ok(entry)
    }

    /// Looks an entry up by key across the whole log.
    pub fn find_entry(&self, key: &str) -> StoreResult<Option<(NaiveDate, Entry)>> {
        for day in self.all_days()? {
            let date = day.date;
            if let Some(entry) = day
                .into_entries()
                .into_iter()
                .find(|e| e.key.as_deref() == Some(key))
            {
                return Ok(Some((date, entry)));
            }
        }
        Ok(None)
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }
}
