//! Filesystem helpers shared by the three stores.
use super::migration::strip_legacy_tags;
use crate::error::{StoreError, StoreResult};
use crate::logging::Logger;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

/// Reads `path`, upgrading it in place first if it still carries legacy type tags.
///
/// A missing file maps to whatever `not_found` builds.
pub(crate) fn read_migrated(
    path: &Path,
    logger: &Logger,
    not_found: impl FnOnce() -> StoreError,
) -> StoreResult<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let cleaned = match strip_legacy_tags(&text) {
        Cow::Borrowed(_) => None,
        Cow::Owned(cleaned) => Some(cleaned),
    };
    match cleaned {
        None => Ok(text),
        Some(cleaned) => {
            logger.debug(format_args!(
                "removing legacy type tags from {}",
                path.display()
            ));
            fs::write(path, &cleaned).map_err(|e| StoreError::io(path, e))?;
            Ok(cleaned)
        }
    }
}

/// Overwrites `path` wholesale, creating its parent directory if needed.
pub(crate) fn write_file(path: &Path, contents: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| StoreError::io(path, e))
}

pub(crate) fn ensure_dir(dir: &Path) -> StoreResult<()> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
}

/// True when the text holds no YAML content, only blank lines, comments and markers.
pub(crate) fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
