//! The `Worklog` facade, tying configuration and the three stores together.
use crate::config::Config;
use crate::date_parser::{DateExpressionParser, DateRange, RangeQuery};
use crate::logging::Logger;
use crate::records::{Day, Entry, Person, Project};
use crate::statistics::Statistics;
use crate::storage::{LogStore, PeopleStore, ProjectStore};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

/// Everything needed to log one entry.
///
/// `date` defaults to the configured reference date and `time` to the current time of day.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub message: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub tags: Vec<String>,
    pub ticket: Option<String>,
    pub url: Option<String>,
    pub epic: bool,
    pub project: Option<String>,
}

/// How often a handle is mentioned across the log, with the matching person if known.
#[derive(Debug, Clone, PartialEq)]
pub struct Mentions {
    pub handle: String,
    pub count: usize,
    pub person: Option<Person>,
}

#[derive(Debug)]
pub struct Worklog {
    pub config: Config,
    logger: Logger,
    log: LogStore,
    people: PeopleStore,
    projects: ProjectStore,
}

impl Worklog {
    /// Loads configuration from the standard paths and logs through the global `log` backend.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config, Logger::global())
    }

    /// Creates the storage directory if needed and wires the stores to it.
    pub fn with_config(config: Config, logger: Logger) -> Result<Self> {
        fs::create_dir_all(&config.storage_path)
            .with_context(|| format!("creating storage dir {}", config.storage_path.display()))?;
        let log = LogStore::new(&config.storage_path, logger.clone())
            .with_reference_date(config.reference_date);
        let people = PeopleStore::new(&config.storage_path, logger.clone());
        let projects = ProjectStore::new(&config.storage_path, logger.clone());
        Ok(Self {
            config,
            logger,
            log,
            people,
            projects,
        })
    }

    pub fn log_store(&self) -> &LogStore {
        &self.log
    }

    pub fn people_store(&self) -> &PeopleStore {
        &self.people
    }

    pub fn people_store_mut(&mut self) -> &mut PeopleStore {
        &mut self.people
    }

    pub fn project_store(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn parser(&self) -> DateExpressionParser {
        DateExpressionParser::new(self.config.reference_date)
    }

    /// Validates and appends a new entry, returning it as stored.
    ///
    /// A referenced project must exist. Mentioned handles missing from `people.yaml`
    /// only produce a warning.
    pub fn add(&self, new: NewEntry) -> Result<Entry> {
        let date = new.date.unwrap_or(self.config.reference_date);
        let time = new.time.unwrap_or_else(|| Local::now().time());
        let time = Local
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .ok_or_else(|| anyhow!("{date} {time} does not exist in the local time zone"))?
            .fixed_offset();

        let entry = Entry::new(&new.message, time)
            .context("invalid entry")?
            .with_tags(new.tags)
            .with_ticket(new.ticket.filter(|t| !t.is_empty()))
            .with_url(new.url.unwrap_or_default())
            .with_epic(new.epic)
            .with_project(new.project);

        if let Some(project) = &entry.project {
            self.projects
                .ensure_exists(project)
                .with_context(|| format!("adding entry for {date}"))?;
        }

        let day = self
            .log
            .append_entry(date, entry.clone())
            .with_context(|| format!("adding entry for {date}"))?;

        self.warn_unknown_handles(&entry);

        day.entries()
            .iter()
            .find(|e| e.key == entry.key && e.time == entry.time)
            .cloned()
            .ok_or_else(|| anyhow!("entry for {date} missing after write"))
    }

    /// Warns about mentioned handles missing from `people.yaml`.
    ///
    /// The entry is already stored, so an unreadable people file is only logged.
    fn warn_unknown_handles(&self, entry: &Entry) {
        let mentioned = entry.people();
        if mentioned.is_empty() {
            return;
        }
        let known = match self.people.load_strict() {
            Ok(set) => set.into_map(),
            Err(e) if e.is_not_found() => BTreeMap::new(),
            Err(e) => {
                self.logger
                    .warn(format_args!("not checking mentioned handles: {e}"));
                return;
            }
        };
        for handle in mentioned {
            if !known.contains_key(&handle) {
                self.logger.warn(format_args!(
                    "unknown handle {handle}, consider adding them to people.yaml"
                ));
            }
        }
    }

    /// Removes the temporally latest entry of `date`.
    pub fn remove_last(&self, date: NaiveDate) -> Result<Entry> {
        self.log
            .remove_last_entry(date)
            .with_context(|| format!("removing last entry of {date}"))
    }

    /// Days matching `query`, in date order.
    pub fn show(&self, query: &RangeQuery<'_>) -> Result<Vec<Day>> {
        let range = DateRange::resolve(&self.parser(), query)?;
        let tags = query.tags.unwrap_or_default();
        self.log
            .days_between(range.start, range.end, query.epics_only, tags)
            .context("reading work log")
    }

    pub fn tags(&self) -> Result<BTreeSet<String>> {
        self.log.tags().context("reading tags")
    }

    /// How many entries carry each tag, over `range` or the whole log.
    pub fn tag_counts(&self, range: Option<&RangeQuery<'_>>) -> Result<BTreeMap<String, usize>> {
        let days = match range {
            Some(query) => self.show(query)?,
            None => self.log.all_days().context("reading work log")?,
        };
        let mut counts = BTreeMap::new();
        for tag in days.iter().flat_map(Day::entries).flat_map(|e| e.tags.iter()) {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Every mentioned handle, sorted by handle.
    pub fn people_mentions(&self) -> Result<Vec<Mentions>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for day in self.log.all_days().context("reading work log")? {
            for (handle, count) in day.people() {
                *counts.entry(handle).or_insert(0) += count;
            }
        }
        let mut people = self.people.load_map().context("loading people")?;
        Ok(counts
            .into_iter()
            .map(|(handle, count)| Mentions {
                person: people.remove(&handle),
                handle,
                count,
            })
            .collect())
    }

    /// All projects with their entries and last activity filled in.
    pub fn projects_with_activity(&self) -> Result<Vec<Project>> {
        let mut projects = self.projects.load_map().context("loading projects")?;
        let days = self.log.all_days().context("reading work log")?;
        for key in days
            .iter()
            .flat_map(Day::entries)
            .filter_map(|e| e.project.as_deref())
            .filter(|key| !projects.contains_key(*key))
            .collect::<BTreeSet<_>>()
        {
            self.logger
                .debug(format_args!("entries reference unknown project {key}"));
        }
        for project in projects.values_mut() {
            project.collect_activity(&days);
        }
        Ok(projects.into_values().collect())
    }

    pub fn stats(&self) -> Result<Statistics> {
        let days = self.log.all_days().context("reading work log")?;
        Ok(Statistics::calculate(&days, self.config.reference_date))
    }
}
