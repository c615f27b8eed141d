use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use directories::BaseDirs;
use serde::Deserialize;
use std::{fs, path::PathBuf, str::FromStr};
use strum_macros::{AsRefStr, EnumIter, EnumString};

const APP_DIR: &str = "worklog";
const DEFAULT_STORAGE_DIR: &str = ".worklog";

/// Verbosity the host should install its `log` backend with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the day files, `people.yaml` and `projects.yaml`.
    pub storage_path: PathBuf,
    /// Not applied by this crate; the host passes it to its `log` backend on install.
    pub log_level: LogLevel,
    /// The date treated as "today" for open-ended ranges and bare quarters.
    pub reference_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    storage_path: Option<PathBuf>,
    log_level: Option<String>,
}

impl Config {
    /// Load config from disk (first XDG path, then native) and apply defaults.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config()?;
        Ok(Self::from_file_config(file_config))
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        let storage_path = file_config
            .storage_path
            .unwrap_or_else(Self::default_storage_path);

        let log_level = file_config
            .log_level
            .as_deref()
            .and_then(|level| LogLevel::from_str(level.trim()).ok())
            .unwrap_or_default();

        Self {
            storage_path,
            log_level,
            reference_date: Local::now().date_naive(),
        }
    }

    /// Default storage root: `~/.worklog`, or `./.worklog` when no home directory is known.
    pub fn default_storage_path() -> PathBuf {
        match BaseDirs::new() {
            Some(base) => base.home_dir().join(DEFAULT_STORAGE_DIR),
            None => PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }

    pub fn storage_path_exists(&self) -> bool {
        self.storage_path.exists()
    }

    pub fn is_default_storage_path(&self) -> bool {
        self.storage_path == Self::default_storage_path()
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b.home_dir().join(".config").join(APP_DIR).join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join(APP_DIR).join("config.toml");
            v.push(native);
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use strum::IntoEnumIterator;

    #[test]
    fn candidates_prioritize_xdg_then_native() {
        if let Some(b) = BaseDirs::new() {
            let expected_xdg = b.home_dir().join(".config").join("worklog").join("config.toml");
            let expected_native = b.config_dir().join("worklog").join("config.toml");
            let c = Config::config_file_paths();
            assert_eq!(c.first(), Some(&expected_xdg));
            assert_eq!(c.get(1), Some(&expected_native));
        }
    }

    #[test]
    fn parse_file_accepts_storage_path_and_level() {
        let toml = r#"
            storage_path = "/tmp/my-worklog"
            log_level = "DEBUG"
        "#;
        let config = Config::from_file_config(Config::parse_file(toml).unwrap());
        assert_eq!(config.storage_path, Path::new("/tmp/my-worklog"));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config = Config::from_file_config(Config::parse_file("").unwrap());
        assert!(config.is_default_storage_path());
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.reference_date, Local::now().date_naive());
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let config = Config::from_file_config(Config::parse_file(r#"log_level = "loud""#).unwrap());
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn every_level_maps_to_a_filter() {
        let filters: Vec<log::LevelFilter> = LogLevel::iter().map(Into::into).collect();
        assert_eq!(
            filters,
            vec![
                log::LevelFilter::Debug,
                log::LevelFilter::Info,
                log::LevelFilter::Warn,
                log::LevelFilter::Error,
            ]
        );
        assert_eq!(LogLevel::Warn.as_ref(), "warn");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::parse_file("storage_path = [").is_err());
    }
}
