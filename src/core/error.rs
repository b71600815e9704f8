// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// Appending a record to the time log failed.
    ///
    /// Examples:
    /// - parent directory cannot be created (permissions)
    /// - disk full while writing
    Storage { path: PathBuf, source: io::Error },
}

impl Error {
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage { path, source } => {
                write!(f, "failed to write time log {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage { source, .. } => Some(source),
        }
    }
}
