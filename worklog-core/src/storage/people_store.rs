//! The `people.yaml` file.
use super::record_file::{RecordFile, RecordSet};
use crate::error::StoreResult;
use crate::logging::Logger;
use crate::paths::people_path;
use crate::records::Person;
use once_cell::unsync::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const PEOPLE_TEMPLATE: &str = "\
---
# Each person is defined by the following attributes:
# - handle: <unique_handle>
#     Unique handle used to reference this person in entries (e.g. ~jdoe or @jdoe)
#   github_username: <github_username>
#     Used to link GitHub events to this person. Can be omitted, and can differ
#     from the handle.
#   name: <full_name>
#   team: <team_name>
#   email: <email_address>
#   role: <role_or_title>
#   notes:
#   - <free form note>
#   inactive: <true_or_false>
#   --- Define your people below this line ---
";

/// Reads and writes the people file.
///
/// `find_by_handle` and `find_by_github_username` answer from a cache filled on first use.
/// [`write`](Self::write) refreshes it, but a write made through another instance or by
/// another process is not seen until [`invalidate_cache`](Self::invalidate_cache) is called.
#[derive(Debug, Clone)]
pub struct PeopleStore {
    file: RecordFile,
    cache: OnceCell<Vec<Person>>,
}

impl PeopleStore {
    pub fn new(storage_path: &Path, logger: Logger) -> Self {
        Self {
            file: RecordFile::new(people_path(storage_path), PEOPLE_TEMPLATE, logger),
            cache: OnceCell::new(),
        }
    }

    pub fn people_filepath(&self) -> PathBuf {
        self.file.path.clone()
    }

    /// All people, creating the file from its template when it is missing.
    pub fn load(&self) -> StoreResult<RecordSet<Person>> {
        self.file.load()
    }

    /// All people; a missing file is [`StoreError::FileNotFound`](crate::StoreError::FileNotFound).
    pub fn load_strict(&self) -> StoreResult<RecordSet<Person>> {
        self.file.load_strict()
    }

    /// People keyed by handle.
    pub fn load_map(&self) -> StoreResult<BTreeMap<String, Person>> {
        Ok(self.load()?.into_map())
    }

    /// Replaces the file with `people`. Fails without writing if two share a handle.
    pub fn write(&mut self, people: &[Person]) -> StoreResult<()> {
        self.file.write(people)?;
        self.cache = OnceCell::from(people.to_vec());
        Ok(())
    }

    pub fn create_default_file(&self) -> StoreResult<bool> {
        self.file.create_default_file()
    }

    pub fn find_by_handle(&self, handle: &str) -> StoreResult<Option<&Person>> {
        Ok(self.cached()?.iter().find(|p| p.handle == handle))
    }

    pub fn find_by_github_username(&self, username: &str) -> StoreResult<Option<&Person>> {
        Ok(self
            .cached()?
            .iter()
            .find(|p| p.github_username.as_deref() == Some(username)))
    }

    pub fn invalidate_cache(&mut self) {
        self.cache = OnceCell::new();
    }

    fn cached(&self) -> StoreResult<&Vec<Person>> {
        self.cache.get_or_try_init(|| self.load().map(|set| set.records))
    }
}
