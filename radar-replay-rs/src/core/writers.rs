//! Output file handling for generated viewer pages.
//!
//! Pages are staged in a temporary file next to the target and renamed into
//! place, so a browser never loads a half-written page.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Failure writing an output file.
#[derive(Error, Debug)]
#[error("failed to write '{}': {source}", .path.display())]
pub struct WriteError {
    /// Path that could not be created or written.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

fn at(path: &Path) -> impl FnOnce(io::Error) -> WriteError + '_ {
    move |source| WriteError {
        path: path.to_path_buf(),
        source,
    }
}

/// Write a text document, replacing any existing file.
///
/// Missing parent directories are created.
///
/// # Example
///
/// ```no_run
/// use radar_replay::core::writers::write_text;
/// use std::path::Path;
///
/// write_text(Path::new("out/replay.html"), "<html></html>").unwrap();
/// ```
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(at(dir))?;

    let mut staged = NamedTempFile::new_in(dir).map_err(at(dir))?;
    staged.write_all(contents.as_bytes()).map_err(at(path))?;
    staged.persist(path).map_err(|e| at(path)(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.html");

        write_text(&path, "<p>frame</p>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>frame</p>");
    }

    #[test]
    fn test_write_text_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages").join("2024").join("page.html");

        write_text(&path, "x").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_text_replaces_and_leaves_no_staging_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.html");

        write_text(&path, "first version").unwrap();
        write_text(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_text_reports_blocking_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_text(&blocker.join("page.html"), "x").unwrap_err();
        assert_eq!(err.path, blocker);
        assert!(err.to_string().contains("blocker"));
    }
}
