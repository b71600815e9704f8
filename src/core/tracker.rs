// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::error::Error;
use crate::core::record::{LogRecord, RecordFormat};
use crate::core::session::Session;
use crate::core::writer::RecordSink;

/// Owns the session table and hands closed sessions to a sink.
///
/// Timestamps are supplied by the caller so the daemon loop and tests
/// drive the same code.
#[derive(Debug)]
pub struct Tracker<S: RecordSink> {
    sessions: HashMap<PathBuf, Session>,
    sink: S,
    format: RecordFormat,
}

impl<S: RecordSink> Tracker<S> {
    pub fn new(sink: S, format: RecordFormat) -> Self {
        Self {
            sessions: HashMap::new(),
            sink,
            format,
        }
    }

    /// Starts timing `path`. An empty path is ignored. A path that is
    /// already in flight is restarted and the earlier start is dropped;
    /// the replaced session is returned.
    pub fn start_timer(
        &mut self,
        workspace_label: Option<&str>,
        path: &Path,
        now_ms: u64,
    ) -> Option<Session> {
        if path.as_os_str().is_empty() {
            return None;
        }

        let label = workspace_label
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        self.sessions
            .insert(path.to_path_buf(), Session::start(path.to_path_buf(), label, now_ms))
    }

    /// Closes the session for `path` and writes its record.
    ///
    /// `Ok(None)` when nothing is tracked for `path`. When the sink fails
    /// the session is left in the table, still open, and the error is
    /// returned.
    pub fn stop_timer(&mut self, path: &Path, now_ms: u64) -> Result<Option<LogRecord>, Error> {
        let Some(session) = self.sessions.get(path) else {
            return Ok(None);
        };

        let mut closed = session.clone();
        closed.close(now_ms);

        let Some(record) = LogRecord::from_session(&closed, &self.format) else {
            return Ok(None);
        };

        self.sink.append(&record)?;
        self.sessions.remove(path);
        Ok(Some(record))
    }

    /// Stops every in-flight session. Sink failures do not stop the sweep;
    /// the records written so far and the failures are both returned.
    pub fn stop_all_timers(&mut self, now_ms: u64) -> StopAll {
        let mut paths: Vec<PathBuf> = self.sessions.keys().cloned().collect();
        paths.sort();

        let mut out = StopAll::default();
        for path in paths {
            match self.stop_timer(&path, now_ms) {
                Ok(Some(record)) => out.written.push(record),
                Ok(None) => {}
                Err(e) => out.failed.push((path, e)),
            }
        }
        out
    }

    #[cfg(test)]
    pub fn is_tracking(&self, path: &Path) -> bool {
        self.sessions.contains_key(path)
    }

    #[cfg(test)]
    pub fn session(&self, path: &Path) -> Option<&Session> {
        self.sessions.get(path)
    }

    /// In-flight sessions ordered by start time, then path.
    pub fn sessions(&self) -> Vec<&Session> {
        let mut v: Vec<&Session> = self.sessions.values().collect();
        v.sort_by(|a, b| {
            a.start_ms()
                .cmp(&b.start_ms())
                .then_with(|| a.tracked_path().cmp(b.tracked_path()))
        });
        v
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn format(&self) -> &RecordFormat {
        &self.format
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Outcome of [`Tracker::stop_all_timers`].
#[derive(Debug, Default)]
pub struct StopAll {
    pub written: Vec<LogRecord>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl StopAll {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}
