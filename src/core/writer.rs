// Author: Dustin Pilgrim
// License: MIT

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use crate::core::error::Error;
use crate::core::record::{HEADER, LogRecord};

/// Destination for completed records.
pub trait RecordSink {
    fn append(&mut self, record: &LogRecord) -> Result<(), Error>;
}

/// Appends records to the tab-separated time log on disk.
#[derive(Debug, Clone)]
pub struct LogWriter {
    path: PathBuf,
}

impl LogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one record, preceded by the header when the file is new or
    /// empty.
    ///
    /// The file is opened create+append and held under an exclusive `flock`
    /// while its length is inspected, so two writers cannot both decide the
    /// file is new. Header and record go out in a single write.
    pub fn write_record(&self, record: &LogRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Held until the data is synced; the length check and the write
        // must happen under the same lock.
        let _guard = FileLock::exclusive(&file)?;

        let line = record.to_line();
        let is_new = file.metadata()?.len() == 0;

        let mut buf = String::with_capacity(HEADER.len() + line.len());
        if is_new {
            buf.push_str(HEADER);
        }
        buf.push_str(&line);

        (&file).write_all(buf.as_bytes())?;
        (&file).flush()?;
        file.sync_data()?;
        Ok(())
    }
}

impl RecordSink for LogWriter {
    fn append(&mut self, record: &LogRecord) -> Result<(), Error> {
        self.write_record(record)
            .map_err(|e| Error::storage(&self.path, e))
    }
}

/// Advisory lock held for the lifetime of the guard.
struct FileLock<'a> {
    file: &'a File,
}

impl<'a> FileLock<'a> {
    fn exclusive(file: &'a File) -> io::Result<Self> {
        loop {
            // SAFETY: the descriptor belongs to `file`, which outlives the guard.
            let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
            if rc == 0 {
                return Ok(Self { file });
            }

            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

impl Drop for FileLock<'_> {
    fn drop(&mut self) {
        // SAFETY: see `exclusive`.
        unsafe {
            libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
        }
    }
}
