mod document;
mod files;
mod log_store;
pub mod migration;
mod people_store;
mod project_store;
mod record_file;

pub use document::{
    DayDocument, EntryDocument, Keyed, Persist, PersonDocument, ProjectDocument,
};
pub use log_store::LogStore;
pub use people_store::PeopleStore;
pub use project_store::ProjectStore;
pub use record_file::RecordSet;
