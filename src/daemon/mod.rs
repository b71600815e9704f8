// Author: Dustin Pilgrim
// License: MIT

mod run;

use std::path::{Path, PathBuf};

use crate::config::DwellConfig;
use crate::core::{
    events::Event,
    export::{ExportError, export_log},
    info::InfoSnapshot,
    tracker::{StopAll, Tracker},
    writer::LogWriter,
};
use crate::{ddebug, derror, dinfo, dwarn};

pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub struct Daemon {
    tracker: Tracker<LogWriter>,
    workspace: Option<String>,
    roots: Vec<PathBuf>,
}

impl Daemon {
    pub fn new(cfg: DwellConfig) -> Self {
        ddebug!(
            "Daemon",
            "log_path={}, workspace={:?}, roots={}, time_format={:?}, legacy_hour_wrap={}",
            cfg.log_path.display(),
            cfg.workspace,
            cfg.roots.len(),
            cfg.time_format,
            cfg.legacy_hour_wrap,
        );

        let format = cfg.record_format();

        Self {
            tracker: Tracker::new(LogWriter::new(cfg.log_path), format),
            workspace: cfg.workspace,
            roots: cfg.roots,
        }
    }

    pub fn log_path(&self) -> &Path {
        self.tracker.sink().path()
    }

    /// Starts a session for every configured root folder.
    pub(crate) fn start_initial_roots(&mut self, now_ms: u64) {
        for root in &self.roots {
            self.tracker
                .start_timer(self.workspace.as_deref(), root, now_ms);
            dinfo!("Tracker", "tracking root {}", root.display());
        }
    }

    pub(crate) fn handle_event(&mut self, event: Event) -> Result<String, String> {
        let now_ms = event.now_ms();

        match event {
            Event::Opened { path, .. } => {
                let replaced = self
                    .tracker
                    .start_timer(self.workspace.as_deref(), &path, now_ms);

                if let Some(old) = replaced {
                    ddebug!(
                        "Tracker",
                        "restarted {} (dropped start at {})",
                        path.display(),
                        old.start_ms()
                    );
                } else {
                    ddebug!("Tracker", "started {}", path.display());
                }
                Ok(format!("Tracking {}", path.display()))
            }

            Event::Closed { path, .. } | Event::RootRemoved { path, .. } => {
                self.stop_one(&path, now_ms)
            }

            Event::FlushAll { .. } => {
                let out = self.tracker.stop_all_timers(now_ms);
                report_stop_all(&out)
            }
        }
    }

    fn stop_one(&mut self, path: &Path, now_ms: u64) -> Result<String, String> {
        match self.tracker.stop_timer(path, now_ms) {
            Ok(Some(record)) => {
                dinfo!("Tracker", "recorded {} for {}", record.elapsed, path.display());
                Ok(format!("Recorded {} for {}", record.elapsed, path.display()))
            }
            Ok(None) => {
                ddebug!("Tracker", "not tracking {}", path.display());
                Ok(format!("Not tracking {}", path.display()))
            }
            Err(e) => {
                derror!("Tracker", "{}", e);
                Err(e.to_string())
            }
        }
    }

    pub(crate) fn set_workspace(&mut self, label: Option<String>) -> Result<String, String> {
        self.workspace = label
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match &self.workspace {
            Some(l) => {
                dinfo!("Daemon", "workspace set: {}", l);
                Ok(format!("Workspace set: {l}"))
            }
            None => {
                dinfo!("Daemon", "workspace cleared");
                Ok("Workspace cleared".to_string())
            }
        }
    }

    pub(crate) fn snapshot(&self, now_ms: u64) -> InfoSnapshot {
        InfoSnapshot::build(
            self.workspace.as_deref(),
            &self.log_path().display().to_string(),
            self.tracker.sessions(),
            self.tracker.format(),
            now_ms,
        )
    }

    pub(crate) fn export(&mut self, dest: &Path) -> Result<String, String> {
        match export_log(self.log_path(), dest) {
            Ok(outcome) => {
                if let Some(e) = &outcome.cleanup_error {
                    dwarn!(
                        "Export",
                        "copied to {} but could not delete {}: {}",
                        dest.display(),
                        self.log_path().display(),
                        e
                    );
                } else {
                    dinfo!("Export", "exported {} bytes to {}", outcome.bytes, dest.display());
                }
                Ok(outcome.summary())
            }
            Err(ExportError::NoTrackedTime(path)) => {
                dinfo!("Export", "nothing to export: {} does not exist", path.display());
                Err(ExportError::NoTrackedTime(path).to_string())
            }
            Err(e) => {
                dwarn!("Export", "{}", e);
                Err(e.to_string())
            }
        }
    }

    /// Records every in-flight session. Called once on the way out.
    pub(crate) fn shutdown(&mut self, now_ms: u64) -> Result<String, String> {
        if self.tracker.is_empty() {
            return Ok("No open sessions".to_string());
        }

        dinfo!("Daemon", "recording {} open session(s)", self.tracker.len());
        let out = self.tracker.stop_all_timers(now_ms);
        report_stop_all(&out)
    }
}

fn report_stop_all(out: &StopAll) -> Result<String, String> {
    for (path, e) in &out.failed {
        derror!("Tracker", "could not record {}: {}", path.display(), e);
    }

    if out.is_ok() {
        Ok(format!("Recorded {} session(s)", out.written.len()))
    } else {
        Err(format!(
            "recorded {} session(s), {} failed (see the diagnostic log)",
            out.written.len(),
            out.failed.len()
        ))
    }
}
