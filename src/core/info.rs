// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::record::RecordFormat;
use crate::core::session::Session;
use crate::core::utils::{format_elapsed, format_local};

/// Snapshot returned from the daemon for `dwell info`.
///
/// - serialized fields are the stable JSON contract
/// - `pretty_text` is CLI-facing output
#[derive(Debug, Clone, Serialize)]
pub struct InfoSnapshot {
    pub workspace: Option<String>,
    pub log_path: String,
    pub sessions: Vec<SessionInfo>,

    #[serde(skip_serializing)]
    pub pretty_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub path: String,
    pub workspace: Option<String>,
    pub start_ms: u64,
    pub started: String,
    pub running: String,
}

impl InfoSnapshot {
    pub fn build<'a>(
        workspace: Option<&str>,
        log_path: &str,
        sessions: impl IntoIterator<Item = &'a Session>,
        format: &RecordFormat,
        now_ms: u64,
    ) -> Self {
        let sessions: Vec<SessionInfo> = sessions
            .into_iter()
            .map(|s| SessionInfo {
                path: s.tracked_path().display().to_string(),
                workspace: s.workspace_label().map(str::to_string),
                start_ms: s.start_ms(),
                started: format_local(s.start_ms(), &format.time_format),
                running: format_elapsed(s.running_ms(now_ms), format.wrap_hours),
            })
            .collect();

        let pretty_text = pretty_print(workspace, log_path, &sessions);

        Self {
            workspace: workspace.map(str::to_string),
            log_path: log_path.to_string(),
            sessions,
            pretty_text,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
    }
}

fn pretty_print(workspace: Option<&str>, log_path: &str, sessions: &[SessionInfo]) -> String {
    let labels = ["Workspace", "Time Log", "Tracking"];
    let width = labels.iter().map(|s| s.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "  {:<width$}    │ {}\n",
        "Workspace",
        workspace.unwrap_or("(none)")
    ));
    out.push_str(&format!("  {:<width$}    │ {}\n", "Time Log", log_path));
    out.push_str(&format!("  {:<width$}    │ {}\n", "Tracking", sessions.len()));

    if !sessions.is_empty() {
        out.push('\n');
        for s in sessions {
            out.push_str(&format!("  {}  {}  {}\n", s.running, s.started, s.path));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_lists_sessions_and_serializes() {
        let a = Session::start("/p/a.rs".into(), Some("p".into()), 0);
        let b = Session::start("/p/b.rs".into(), None, 30_000);

        let snap = InfoSnapshot::build(
            Some("p"),
            "/tmp/log.tsv",
            [&a, &b],
            &RecordFormat::default(),
            90_000,
        );

        assert_eq!(snap.sessions.len(), 2);
        assert_eq!(snap.sessions[0].running, "00:01:30");
        assert_eq!(snap.sessions[1].running, "00:01:00");
        assert!(snap.pretty_text.contains("/p/b.rs"));

        let json: serde_json::Value = serde_json::from_str(&snap.to_json()).unwrap();
        assert_eq!(json["workspace"], "p");
        assert_eq!(json["sessions"][1]["path"], "/p/b.rs");
        assert!(json.get("pretty_text").is_none());
    }

    #[test]
    fn empty_snapshot_omits_session_list() {
        let snap = InfoSnapshot::build(None, "/x", Vec::<&Session>::new(), &RecordFormat::default(), 0);
        assert!(snap.pretty_text.contains("(none)"));
        assert!(snap.pretty_text.trim_end().ends_with('0'));
    }
}
