//! Journal path checks.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Problems with a journal path supplied on the command line.
#[derive(Error, Debug)]
pub enum PathError {
    /// Empty argument.
    #[error("path is empty")]
    Empty,
    /// Path does not exist.
    #[error("{0} does not exist")]
    NotFound(String),
    /// Path exists but is not a regular file.
    #[error("{0} is not a regular file")]
    NotAFile(String),
    /// Parent directory of an output path does not exist.
    #[error("directory of {0} does not exist")]
    MissingParent(String),
}

/// Checks a journal path. Paths to read must name an existing file; paths to
/// write must have an existing parent directory and must not name a directory.
pub fn validate_journal_path(raw: &str, for_write: bool) -> Result<PathBuf, PathError> {
    if raw.trim().is_empty() {
        return Err(PathError::Empty);
    }
    let path = PathBuf::from(raw);

    if path.is_dir() {
        return Err(PathError::NotAFile(sanitize_path_for_error(&path)));
    }
    if for_write {
        let parent_missing = path
            .parent()
            .map(|p| !p.as_os_str().is_empty() && !p.is_dir())
            .unwrap_or(false);
        if parent_missing {
            return Err(PathError::MissingParent(sanitize_path_for_error(&path)));
        }
    } else if !path.exists() {
        return Err(PathError::NotFound(sanitize_path_for_error(&path)));
    }

    Ok(path)
}

/// File name only, so error messages do not leak directory layout.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}
