use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const FILE_SUFFIX: &str = ".yaml";
pub const PEOPLE_FILE: &str = "people.yaml";
pub const PROJECTS_FILE: &str = "projects.yaml";

/// Day files only. Keeps `people.yaml` and `projects.yaml` out of directory scans.
static DAY_FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\.yaml$").expect("valid regex"));

pub fn day_file_name(date: NaiveDate) -> String {
    format!("{}{FILE_SUFFIX}", date.format("%Y-%m-%d"))
}

pub fn day_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(day_file_name(date))
}

pub fn people_path(root: &Path) -> PathBuf {
    root.join(PEOPLE_FILE)
}

pub fn projects_path(root: &Path) -> PathBuf {
    root.join(PROJECTS_FILE)
}

pub fn is_day_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| DAY_FILE_NAME.is_match(name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_path_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            day_path(Path::new("/tmp/wl"), date),
            Path::new("/tmp/wl/2024-03-01.yaml")
        );
    }

    #[test]
    fn only_day_files_match_the_pattern() {
        assert!(is_day_file(Path::new("/tmp/wl/2024-03-01.yaml")));
        assert!(!is_day_file(Path::new("/tmp/wl/people.yaml")));
        assert!(!is_day_file(Path::new("/tmp/wl/projects.yaml")));
        assert!(!is_day_file(Path::new("/tmp/wl/2024-3-1.yaml")));
        assert!(!is_day_file(Path::new("/tmp/wl/2024-03-01.yaml.bak")));
        assert!(!is_day_file(Path::new("/tmp/wl/2024-03-01.yml")));
    }
}
