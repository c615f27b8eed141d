use crate::error::ValidationError;
use crate::hasher::{ENTRY_KEY_LENGTH, sha256_prefix};
use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Source of entries typed in by the user, as opposed to ingested ones.
pub const MANUAL_SOURCE: &str = "manual";

/// `@handle` or `~handle` at the start of the message or after whitespace.
static PERSON_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s|^)[~@](\w+)").expect("valid regex"));

/// One logged unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Short content fingerprint. Entries written before keys existed have none.
    pub key: Option<String>,
    pub source: String,
    pub time: DateTime<FixedOffset>,
    pub tags: BTreeSet<String>,
    pub ticket: Option<String>,
    pub url: String,
    pub epic: bool,
    pub message: String,
    /// Key of the project this entry belongs to.
    pub project: Option<String>,
    day: Option<NaiveDate>,
}

impl Entry {
    /// Creates a manual entry keyed by the hash of its trimmed message.
    pub fn new(message: &str, time: DateTime<FixedOffset>) -> Result<Self, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let key = sha256_prefix(message, ENTRY_KEY_LENGTH)?;
        Ok(Self {
            key: Some(key),
            source: MANUAL_SOURCE.to_string(),
            time,
            tags: BTreeSet::new(),
            ticket: None,
            url: String::new(),
            epic: false,
            message: message.to_string(),
            project: None,
            day: None,
        })
    }

    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ticket(mut self, ticket: Option<String>) -> Self {
        self.ticket = ticket;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_epic(mut self, epic: bool) -> Self {
        self.epic = epic;
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project.filter(|p| !p.is_empty());
        self
    }

    /// Date of the [`Day`](super::Day) holding this entry, once it has been added to one.
    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub(crate) fn attach_to(&mut self, date: NaiveDate) {
        self.day = Some(date);
    }

    /// Handles mentioned in the message with `@` or `~`, sorted and deduplicated.
    ///
    /// ```
    /// # use chrono::DateTime;
    /// # use worklog_core::Entry;
    /// let time = DateTime::parse_from_rfc3339("2024-03-01T10:00:00+00:00").unwrap();
    /// let entry = Entry::new("Paired with @alex and ~bo, thanks @alex!", time).unwrap();
    /// let people: Vec<_> = entry.people().into_iter().collect();
    /// assert_eq!(people, ["alex", "bo"]);
    /// ```
    pub fn people(&self) -> BTreeSet<String> {
        PERSON_MENTION
            .captures_iter(&self.message)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    pub fn has_people(&self) -> bool {
        PERSON_MENTION.is_match(&self.message)
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}
