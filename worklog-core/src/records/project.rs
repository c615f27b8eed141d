use super::{Day, Entry, Repository};
use crate::error::ValidationError;
use chrono::{Local, NaiveDate};

/// A longer running initiative that entries can be attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub key: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Free form, e.g. `active`, `completed`, `archived`.
    pub status: Option<String>,
    pub repositories: Vec<Repository>,
    /// Entries referencing this project. Filled by [`collect_activity`](Self::collect_activity), never persisted.
    pub entries: Vec<Entry>,
    /// Date of the most recent entry. Computed like `entries`.
    pub last_activity: Option<NaiveDate>,
}

impl Project {
    pub fn new(key: &str) -> Result<Self, ValidationError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::MissingField {
                record: "project",
                field: "key",
            });
        }
        Ok(Self {
            key: key.to_string(),
            name: None,
            description: None,
            start_date: None,
            end_date: None,
            status: None,
            repositories: Vec::new(),
            entries: Vec::new(),
            last_activity: None,
        })
    }

    /// True when there is no start date or it is on or before `today`.
    pub fn is_started_on(&self, today: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| start <= today)
    }

    /// True when an end date is set and lies before `today`.
    pub fn is_ended_on(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < today)
    }

    pub fn is_started(&self) -> bool {
        self.is_started_on(Local::now().date_naive())
    }

    pub fn is_ended(&self) -> bool {
        self.is_ended_on(Local::now().date_naive())
    }

    /// Replaces `entries` and `last_activity` with what `days` say about this project.
    pub fn collect_activity(&mut self, days: &[Day]) {
        self.entries = days
            .iter()
            .flat_map(Day::entries)
            .filter(|e| e.project.as_deref() == Some(self.key.as_str()))
            .cloned()
            .collect();
        self.last_activity = self.entries.iter().filter_map(Entry::day).max();
    }
}
