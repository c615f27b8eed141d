mod day;
mod entry;
mod person;
mod project;
mod repository;

pub use day::Day;
pub use entry::{Entry, MANUAL_SOURCE};
pub use person::Person;
pub use project::Project;
pub use repository::Repository;
