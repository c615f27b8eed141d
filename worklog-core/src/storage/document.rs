//! The persisted shapes of days, people and projects.
//!
//! Domain records never derive serde themselves. Each one converts to and from an
//! explicit document struct, and the document is what gets written as YAML.
use super::migration::{format_entry_time, parse_entry_time};
use crate::error::{DocumentError, ValidationError};
use crate::records::{Day, Entry, MANUAL_SOURCE, Person, Project, Repository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashSet;

/// Conversion between a record and its on-disk document.
pub trait Persist: Sized {
    type Document: Serialize + DeserializeOwned;
    type Error;

    fn to_document(&self) -> Self::Document;
    fn from_document(document: Self::Document) -> Result<Self, Self::Error>;

    /// Parts of `document` that [`from_document`](Self::from_document) will silently drop.
    fn load_warnings(_document: &Self::Document) -> Vec<String> {
        Vec::new()
    }
}

/// A record stored in a keyed file, where the key must be unique.
pub trait Keyed {
    /// What the key identifies, for error messages (`person`, `project`).
    const KIND: &'static str;

    fn record_key(&self) -> &str;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayDocument {
    pub date: NaiveDate,
    #[serde(default)]
    pub entries: Option<Vec<EntryDocument>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Kept as text so older time formats can be repaired on load.
    pub time: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub epic: Option<bool>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Persist for Day {
    type Document = DayDocument;
    type Error = DocumentError;

    /// Entries are emitted in ascending time order regardless of in-memory order.
    fn to_document(&self) -> DayDocument {
        let mut entries: Vec<&Entry> = self.entries().iter().collect();
        entries.sort_by_key(|e| e.time);
        DayDocument {
            date: self.date,
            entries: Some(entries.into_iter().map(entry_document).collect()),
        }
    }

    /// Older files may repeat a key when the same message was logged twice on one day.
    /// Every repeat after the first loses its key and the entry is kept.
    fn from_document(document: DayDocument) -> Result<Self, DocumentError> {
        let date = document.date;
        let mut day = Day::new(date);
        let mut seen = HashSet::new();
        for (index, doc) in document.entries.unwrap_or_default().into_iter().enumerate() {
            let mut entry = entry_from_document(doc, date, index)?;
            if let Some(key) = entry.key.clone().filter(|k| !k.is_empty()) {
                if !seen.insert(key) {
                    entry = entry.with_key(None);
                }
            }
            day.push(entry)?;
        }
        Ok(day)
    }

    fn load_warnings(document: &DayDocument) -> Vec<String> {
        let mut seen = HashSet::new();
        document
            .entries
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(index, doc)| {
                let key = doc.key.as_deref().filter(|k| !k.is_empty())?;
                (!seen.insert(key))
                    .then(|| format!("clearing repeated key `{key}` of entry {index}"))
            })
            .collect()
    }
}

fn entry_document(entry: &Entry) -> EntryDocument {
    EntryDocument {
        key: entry.key.clone(),
        source: Some(entry.source.clone()),
        time: format_entry_time(&entry.time),
        tags: Some(entry.tags.iter().cloned().collect()),
        ticket: entry.ticket.clone(),
        url: Some(entry.url.clone()),
        epic: Some(entry.epic),
        message: entry.message.clone(),
        project: entry.project.clone(),
    }
}

fn entry_from_document(
    doc: EntryDocument,
    date: NaiveDate,
    index: usize,
) -> Result<Entry, DocumentError> {
    let time = parse_entry_time(&doc.time, date).ok_or_else(|| DocumentError::InvalidTime {
        index,
        raw: doc.time.clone(),
    })?;
    let entry = Entry::new(&doc.message, time)
        .map_err(|source| DocumentError::InvalidEntry { index, source })?;
    Ok(entry
        .with_key(doc.key)
        .with_source(doc.source.unwrap_or_else(|| MANUAL_SOURCE.to_string()))
        .with_tags(doc.tags.unwrap_or_default())
        .with_ticket(doc.ticket)
        .with_url(doc.url.unwrap_or_default())
        .with_epic(doc.epic.unwrap_or(false))
        .with_project(doc.project))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersonDocument {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "title", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default)]
    pub inactive: Option<bool>,
}

impl Persist for Person {
    type Document = PersonDocument;
    type Error = ValidationError;

    fn to_document(&self) -> PersonDocument {
        PersonDocument {
            handle: Some(self.handle.clone()),
            github_username: self.github_username.clone(),
            name: Some(self.name.clone()),
            team: self.team.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            inactive: Some(self.inactive),
        }
    }

    fn from_document(document: PersonDocument) -> Result<Self, ValidationError> {
        let mut person = Person::new(
            document.handle.as_deref().unwrap_or_default(),
            document.name.as_deref().unwrap_or_default(),
        )?;
        person.github_username = document.github_username.filter(|u| !u.is_empty());
        person.email = document.email;
        person.team = document.team;
        person.role = document.role;
        person.notes = document.notes.unwrap_or_default();
        person.inactive = document.inactive.unwrap_or(false);
        Ok(person)
    }
}

impl Keyed for Person {
    const KIND: &'static str = "person";

    fn record_key(&self) -> &str {
        &self.handle
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<String>>,
}

impl ProjectDocument {
    /// Repository strings that do not parse and will be dropped on conversion.
    pub fn unparsable_repositories(&self) -> Vec<&str> {
        self.repositories
            .iter()
            .flatten()
            .filter(|r| Repository::from_url(r).is_none())
            .map(String::as_str)
            .collect()
    }
}

impl Persist for Project {
    type Document = ProjectDocument;
    type Error = ValidationError;

    fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            key: Some(self.key.clone()),
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.clone(),
            repositories: (!self.repositories.is_empty())
                .then(|| self.repositories.iter().map(ToString::to_string).collect()),
        }
    }

    fn load_warnings(document: &ProjectDocument) -> Vec<String> {
        let key = document.key.as_deref().unwrap_or_default();
        document
            .unparsable_repositories()
            .into_iter()
            .map(|r| format!("dropping unparsable repository `{r}` of project {key}"))
            .collect()
    }

    /// Repository references that cannot be parsed are dropped individually.
    fn from_document(document: ProjectDocument) -> Result<Self, ValidationError> {
        let mut project = Project::new(document.key.as_deref().unwrap_or_default())?;
        project.name = document.name;
        project.description = document.description;
        project.start_date = document.start_date;
        project.end_date = document.end_date;
        project.status = document.status;
        for repository in document.repositories.iter().flatten().filter_map(|r| Repository::from_url(r)) {
            if !project.repositories.contains(&repository) {
                project.repositories.push(repository);
            }
        }
        Ok(project)
    }
}

impl Keyed for Project {
    const KIND: &'static str = "project";

    fn record_key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::{date, entry_at};

    #[test]
    fn day_document_is_sorted_by_time() {
        let day = Day::with_entries(
            date(2024, 3, 1),
            vec![
                entry_at("Late", "2024-03-01T17:00:00+00:00"),
                entry_at("Early", "2024-03-01T08:00:00+00:00"),
            ],
        )
        .unwrap();
        let doc = day.to_document();
        let messages: Vec<&str> = doc
            .entries
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages, vec!["Early", "Late"]);
    }

    #[test]
    fn legacy_entry_defaults_are_filled_in() {
        let doc: DayDocument = serde_yaml::from_str(
            "date: 2020-01-01\nentries:\n- time: '10:00'\n  tags:\n  epic:\n  message: Old entry\n",
        )
        .unwrap();
        let day = Day::from_document(doc).unwrap();
        let entry = &day.entries()[0];
        assert_eq!(entry.key, None);
        assert_eq!(entry.source, MANUAL_SOURCE);
        assert!(entry.tags.is_empty());
        assert_eq!(entry.url, "");
        assert!(!entry.epic);
        assert_eq!(entry.day(), Some(date(2020, 1, 1)));
    }

    #[test]
    fn unparsable_time_is_reported_with_its_index() {
        let doc: DayDocument = serde_yaml::from_str(
            "date: 2020-01-01\nentries:\n- time: '2020-01-01T10:00:00Z'\n  message: ok\n- time: soon\n  message: bad\n",
        )
        .unwrap();
        match Day::from_document(doc) {
            Err(DocumentError::InvalidTime { index, raw }) => {
                assert_eq!(index, 1);
                assert_eq!(raw, "soon");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_message_is_invalid() {
        let doc: DayDocument = serde_yaml::from_str(
            "date: 2020-01-01\nentries:\n- time: '2020-01-01T10:00:00Z'\n  message: '  '\n",
        )
        .unwrap();
        assert!(matches!(
            Day::from_document(doc),
            Err(DocumentError::InvalidEntry {
                index: 0,
                source: ValidationError::EmptyMessage
            })
        ));
    }

    #[test]
    fn person_accepts_title_as_role() {
        let doc: PersonDocument =
            serde_yaml::from_str("handle: alex\nname: Alex Test\ntitle: Developer\n").unwrap();
        let person = Person::from_document(doc).unwrap();
        assert_eq!(person.role.as_deref(), Some("Developer"));
        assert!(person.is_active());
    }

    #[test]
    fn person_without_name_fails_validation() {
        let doc: PersonDocument = serde_yaml::from_str("handle: alex\n").unwrap();
        assert_eq!(
            Person::from_document(doc),
            Err(ValidationError::MissingField {
                record: "person",
                field: "name"
            })
        );
    }

    #[test]
    fn project_drops_unparsable_repositories() {
        let doc: ProjectDocument = serde_yaml::from_str(
            "key: P001\nrepositories:\n- https://github.com/acme/api\n- not a repo\n- acme/web\n",
        )
        .unwrap();
        assert_eq!(doc.unparsable_repositories(), vec!["not a repo"]);
        assert_eq!(
            Project::load_warnings(&doc),
            vec!["dropping unparsable repository `not a repo` of project P001"]
        );
        let project = Project::from_document(doc).unwrap();
        let repos: Vec<String> = project.repositories.iter().map(ToString::to_string).collect();
        assert_eq!(repos, vec!["acme/api", "acme/web"]);
    }

    #[test]
    fn project_without_key_fails_validation() {
        let doc: ProjectDocument = serde_yaml::from_str("name: Nameless\n").unwrap();
        assert!(Project::from_document(doc).is_err());
    }
}
