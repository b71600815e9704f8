// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

/// One measured interval for a tracked path.
///
/// A session is in flight while `end_ms` is `None`. The tracker closes it
/// exactly once, right before the record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tracked_path: PathBuf,
    workspace_label: Option<String>,
    start_ms: u64,
    end_ms: Option<u64>,
}

impl Session {
    pub fn start(tracked_path: PathBuf, workspace_label: Option<String>, now_ms: u64) -> Self {
        Self {
            tracked_path,
            workspace_label,
            start_ms: now_ms,
            end_ms: None,
        }
    }

    /// Sets the end timestamp. A clock that stepped backwards yields a
    /// zero-length session instead of an underflow.
    pub fn close(&mut self, now_ms: u64) {
        self.end_ms = Some(now_ms.max(self.start_ms));
    }

    pub fn tracked_path(&self) -> &Path {
        &self.tracked_path
    }

    pub fn workspace_label(&self) -> Option<&str> {
        self.workspace_label.as_deref()
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> Option<u64> {
        self.end_ms
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.end_ms.is_some()
    }

    /// `end - start` for closed sessions, `None` while in flight.
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.end_ms.map(|end| end.saturating_sub(self.start_ms))
    }

    /// Time the session has been running at `now_ms`, closed or not.
    pub fn running_ms(&self, now_ms: u64) -> u64 {
        self.end_ms.unwrap_or(now_ms).saturating_sub(self.start_ms)
    }
}
