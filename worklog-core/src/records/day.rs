use super::Entry;
use crate::error::ValidationError;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// All activity logged on one calendar date.
///
/// Non-empty entry keys are unique within a day. Entries are kept in insertion
/// order in memory and sorted by time whenever the day is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    pub date: NaiveDate,
    entries: Vec<Entry>,
}

impl Day {
    /// An empty day, as written by a skeleton file.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(date: NaiveDate, entries: Vec<Entry>) -> Result<Self, ValidationError> {
        let mut day = Self::new(date);
        for entry in entries {
            day.push(entry)?;
        }
        Ok(day)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends `entry`, rejecting a non-empty key that is already used on this day.
    pub fn push(&mut self, mut entry: Entry) -> Result<(), ValidationError> {
        if let Some(key) = entry.key.as_deref().filter(|k| !k.is_empty()) {
            if self.entries.iter().any(|e| e.key.as_deref() == Some(key)) {
                return Err(ValidationError::DuplicateEntryKey {
                    key: key.to_string(),
                });
            }
        }
        entry.attach_to(self.date);
        self.entries.push(entry);
        Ok(())
    }

    /// Removes and returns the temporally latest entry.
    pub fn remove_last(&mut self) -> Option<Entry> {
        self.sort_entries();
        self.entries.pop()
    }

    /// Stable sort by time; entries logged at the same instant keep their order.
    pub fn sort_entries(&mut self) {
        self.entries.sort_by_key(|e| e.time);
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Entry) -> bool,
    {
        self.entries.retain(f);
    }

    /// First non-empty key used by more than one entry, if any.
    pub fn duplicate_key(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|e| e.key.as_deref())
            .filter(|k| !k.is_empty())
            .find(|k| !seen.insert(*k))
    }

    /// Tags used on this day, sorted and deduplicated.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .entries
            .iter()
            .flat_map(|e| e.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// How often each handle is mentioned across the day's entries.
    pub fn people(&self) -> BTreeMap<String, usize> {
        let mut mentions = BTreeMap::new();
        for handle in self.entries.iter().flat_map(Entry::people) {
            *mentions.entry(handle).or_insert(0) += 1;
        }
        mentions
    }

    pub fn has_people(&self) -> bool {
        self.entries.iter().any(Entry::has_people)
    }
}
