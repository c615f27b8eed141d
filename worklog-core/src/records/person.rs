use crate::error::ValidationError;
use std::fmt;

/// A contact referenced in entries by `@handle` or `~handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub handle: String,
    pub name: String,
    /// Secondary lookup key used to match ingested events.
    pub github_username: Option<String>,
    pub email: Option<String>,
    pub team: Option<String>,
    pub role: Option<String>,
    pub notes: Vec<String>,
    pub inactive: bool,
}

impl Person {
    /// Builds an active person; both `handle` and `name` are required.
    pub fn new(handle: &str, name: &str) -> Result<Self, ValidationError> {
        let handle = handle.trim();
        let name = name.trim();
        if handle.is_empty() {
            return Err(ValidationError::MissingField {
                record: "person",
                field: "handle",
            });
        }
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                record: "person",
                field: "name",
            });
        }
        Ok(Self {
            handle: handle.to_string(),
            name: name.to_string(),
            github_username: None,
            email: None,
            team: None,
            role: None,
            notes: Vec::new(),
            inactive: false,
        })
    }

    pub fn is_active(&self) -> bool {
        !self.inactive
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} (~{}) <{}>", self.name, self.handle, email),
            None => write!(f, "{} (~{})", self.name, self.handle),
        }
    }
}
