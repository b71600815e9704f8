// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

/// Notifications from whatever is watching the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A document or folder became active.
    Opened {
        path: PathBuf,
        now_ms: u64,
    },

    /// A document was closed.
    Closed {
        path: PathBuf,
        now_ms: u64,
    },

    /// A workspace root folder was removed from the editor.
    RootRemoved {
        path: PathBuf,
        now_ms: u64,
    },

    /// Close every in-flight session without stopping the daemon.
    FlushAll {
        now_ms: u64,
    },
}

impl Event {
    pub fn now_ms(&self) -> u64 {
        match self {
            Event::Opened { now_ms, .. }
            | Event::Closed { now_ms, .. }
            | Event::RootRemoved { now_ms, .. }
            | Event::FlushAll { now_ms } => *now_ms,
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Event::Opened { path, .. }
            | Event::Closed { path, .. }
            | Event::RootRemoved { path, .. } => Some(path),
            Event::FlushAll { .. } => None,
        }
    }
}
