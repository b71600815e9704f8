// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExportError {
    /// The time log does not exist yet; nothing was ever recorded.
    NoTrackedTime(PathBuf),

    /// Copying the log to the destination failed; the source is untouched.
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoTrackedTime(_) => write!(f, "No tracked time found"),
            ExportError::Copy { from, to, source } => write!(
                f,
                "failed to copy {} to {}: {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::NoTrackedTime(_) => None,
            ExportError::Copy { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub destination: PathBuf,
    pub bytes: u64,
    /// Set when the copy succeeded but the original could not be removed.
    pub cleanup_error: Option<io::Error>,
}

impl ExportOutcome {
    pub fn summary(&self) -> String {
        match &self.cleanup_error {
            None => format!("Saved tracked time to {}", self.destination.display()),
            Some(e) => format!(
                "Saved tracked time to {} (warning: original log not removed: {e})",
                self.destination.display()
            ),
        }
    }
}

/// Copies the time log to `dest` and removes the original.
///
/// Missing parent directories of `dest` are created. A failed removal does
/// not undo the copy.
pub fn export_log(log_path: &Path, dest: &Path) -> Result<ExportOutcome, ExportError> {
    if !log_path.is_file() {
        return Err(ExportError::NoTrackedTime(log_path.to_path_buf()));
    }

    let copy_err = |source: io::Error| ExportError::Copy {
        from: log_path.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(copy_err)?;
        }
    }

    let bytes = fs::copy(log_path, dest).map_err(copy_err)?;
    let cleanup_error = fs::remove_file(log_path).err();

    Ok(ExportOutcome {
        destination: dest.to_path_buf(),
        bytes,
        cleanup_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_log_reports_no_tracked_time() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("time_data.tsv");

        let err = export_log(&log, &dir.path().join("out.tsv")).unwrap_err();
        assert!(matches!(err, ExportError::NoTrackedTime(_)));
        assert_eq!(err.to_string(), "No tracked time found");
    }

    #[test]
    fn copies_then_removes_original() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("time_data.tsv");
        fs::write(&log, "Workspace\tFolder\n").unwrap();
        let dest = dir.path().join("exports").join("mine.tsv");

        let out = export_log(&log, &dest).unwrap();

        assert!(out.cleanup_error.is_none());
        assert_eq!(out.bytes, 17);
        assert!(!log.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "Workspace\tFolder\n");
        assert!(out.summary().contains("mine.tsv"));
    }

    #[test]
    fn failed_copy_keeps_the_original() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("time_data.tsv");
        fs::write(&log, "x\n").unwrap();
        // Destination is an existing directory, so the copy fails.
        let dest = dir.path().join("taken");
        fs::create_dir(&dest).unwrap();

        let err = export_log(&log, &dest).unwrap_err();
        assert!(matches!(err, ExportError::Copy { .. }));
        assert!(log.exists());
    }
}
