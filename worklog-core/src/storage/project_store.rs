//! The `projects.yaml` file.
use super::record_file::{RecordFile, RecordSet};
use crate::error::{StoreError, StoreResult};
use crate::logging::Logger;
use crate::paths::projects_path;
use crate::records::Project;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const PROJECTS_TEMPLATE: &str = "\
# Each project is defined by the following attributes:
# - key: <project_key>
#   name: <project_name>
#   description: <project_description>
#   start_date: <YYYY-MM-DD>
#   end_date: <YYYY-MM-DD>
#   status: <status>
#   repositories:
#   - <https://github.com/owner/name or owner/name>
#   --- Define your projects below this line ---
";

/// Reads and writes the projects file. Every call goes back to disk.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    file: RecordFile,
}

impl ProjectStore {
    pub fn new(storage_path: &Path, logger: Logger) -> Self {
        Self {
            file: RecordFile::new(projects_path(storage_path), PROJECTS_TEMPLATE, logger),
        }
    }

    pub fn projects_filepath(&self) -> PathBuf {
        self.file.path.clone()
    }

    /// All projects, creating the file from its template when it is missing.
    pub fn load(&self) -> StoreResult<RecordSet<Project>> {
        self.file.load()
    }

    pub fn load_strict(&self) -> StoreResult<RecordSet<Project>> {
        self.file.load_strict()
    }

    /// Projects keyed by project key.
    pub fn load_map(&self) -> StoreResult<BTreeMap<String, Project>> {
        Ok(self.load()?.into_map())
    }

    /// Replaces the file with `projects`. Fails without writing if two share a key.
    pub fn write(&self, projects: &[Project]) -> StoreResult<()> {
        self.file.write(projects)
    }

    pub fn create_default_file(&self) -> StoreResult<bool> {
        self.file.create_default_file()
    }

    pub fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.load()?.records.iter().any(|p| p.key == key))
    }

    pub fn ensure_exists(&self, key: &str) -> StoreResult<()> {
        if self.exists(key)? {
            Ok(())
        } else {
            Err(StoreError::ProjectNotFound {
                key: key.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Repository;
    use crate::tests::common::{CapturingLogger, date};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gets_template_and_no_projects() {
        let tmp = tempdir().unwrap();
        let store = ProjectStore::new(tmp.path(), Logger::default());

        assert!(!store.exists("P001").unwrap());
        assert_eq!(
            fs::read_to_string(store.projects_filepath()).unwrap(),
            PROJECTS_TEMPLATE
        );
        assert!(matches!(
            store.ensure_exists("P001"),
            Err(StoreError::ProjectNotFound { ref key }) if key == "P001"
        ));
    }

    #[test]
    fn exists_rereads_the_file() {
        let tmp = tempdir().unwrap();
        let store = ProjectStore::new(tmp.path(), Logger::default());
        assert!(!store.exists("P001").unwrap());

        fs::write(store.projects_filepath(), "- key: P001\n  name: Onboarding\n").unwrap();
        assert!(store.exists("P001").unwrap());
        store.ensure_exists("P001").unwrap();
    }

    #[test]
    fn write_then_load_round_trips() {
        let tmp = tempdir().unwrap();
        let store = ProjectStore::new(tmp.path(), Logger::default());
        let mut project = Project::new("P001").unwrap();
        project.name = Some("Onboarding".to_string());
        project.start_date = Some(date(2024, 1, 15));
        project.end_date = Some(date(2024, 6, 30));
        project.status = Some("active".to_string());
        project.repositories = vec![Repository::from_url("acme/api").unwrap()];

        store.write(std::slice::from_ref(&project)).unwrap();
        let loaded = store.load_strict().unwrap();
        assert_eq!(loaded.records, vec![project]);
    }

    #[test]
    fn duplicate_keys_are_refused() {
        let tmp = tempdir().unwrap();
        let store = ProjectStore::new(tmp.path(), Logger::default());
        let p = Project::new("P001").unwrap();
        assert!(matches!(
            store.write(&[p.clone(), p]),
            Err(StoreError::DuplicateKey { kind: "project", .. })
        ));
    }

    #[test]
    fn bad_repositories_are_dropped_with_a_warning() {
        let tmp = tempdir().unwrap();
        let sink = CapturingLogger::new();
        let store = ProjectStore::new(tmp.path(), Logger::new(sink.clone()));
        fs::write(
            store.projects_filepath(),
            "- key: P001\n  repositories:\n  - git@github.com:acme/api.git\n  - not a repo\n- name: keyless\n",
        )
        .unwrap();

        let set = store.load().unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].repositories.len(), 1);
        assert_eq!(set.rejected.len(), 1);
        assert!(sink.contains("WARN dropping unparsable repository `not a repo` of project P001"));
        assert!(sink.contains("WARN skipping record 1 is invalid: project key is required"));
    }

    #[test]
    fn top_level_mapping_is_rejected() {
        let tmp = tempdir().unwrap();
        let store = ProjectStore::new(tmp.path(), Logger::default());
        fs::write(store.projects_filepath(), "key: P001\n").unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::InvalidDocument { .. })
        ));
    }
}
