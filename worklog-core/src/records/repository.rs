use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static HOSTED_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com[:/](?P<owner>[^/\s]+)/(?P<repo>[^/\s]+?)(?:\.git)?/?$")
        .expect("valid regex")
});
static OWNER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<owner>[^/\s:]+)/(?P<repo>[^/\s]+)$").expect("valid regex"));

/// An `owner/name` repository reference attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Parses `https://github.com/owner/name`, `git@github.com:owner/name.git` or `owner/name`.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let caps = HOSTED_URL
            .captures(url)
            .or_else(|| OWNER_NAME.captures(url))?;
        Some(Self {
            owner: caps["owner"].to_string(),
            name: caps["repo"].to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
