//! Upgrade-on-read rules for files written by earlier versions.
//!
//! Two things changed over time: documents used to carry language-specific type tags
//! (`--- !ruby/object:DailyLog`, `- !ruby/object:Person`), and entry times used to be
//! stored in a handful of looser formats. Both are repaired here, before the schema
//! sees the data.
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// A document or sequence marker followed only by a YAML tag.
static LEGACY_TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*(?:---|-))[ \t]+![^\s]*[ \t]*$").expect("valid regex")
});

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f %z"];
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const NAIVE_TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Drops type tags from marker lines, leaving the marker and its indentation.
///
/// Returns `Cow::Borrowed` when there is nothing to strip, so callers can tell whether
/// the file needs rewriting. Applying it to its own output is a no-op.
pub fn strip_legacy_tags(text: &str) -> Cow<'_, str> {
    LEGACY_TAG_LINE.replace_all(text, "${1}")
}

/// Parses an entry time in any format this store has ever written.
///
/// Times without an offset are taken as local time; bare clock times fall on `date`.
pub fn parse_entry_time(raw: &str, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time);
    }
    for format in OFFSET_FORMATS {
        if let Ok(time) = DateTime::parse_from_str(raw, format) {
            return Some(time);
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local(naive);
        }
    }
    for format in NAIVE_TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return local(date.and_time(time));
        }
    }
    None
}

/// Canonical persisted form of an entry time.
pub fn format_entry_time(time: &DateTime<FixedOffset>) -> String {
    time.to_rfc3339()
}

fn local(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|time| time.fixed_offset())
}
