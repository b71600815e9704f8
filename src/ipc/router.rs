// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::mpsc;

use super::handlers::{events, export, history, info, stop, workspace};
use crate::core::daemon_msg::DaemonMsg;
use crate::dwarn;

/// Routes one request line to its handler and returns the reply text.
pub async fn route_command(cmd: &str, tx: &mpsc::Sender<DaemonMsg>) -> String {
    let (verb, rest) = split_verb(cmd);

    match verb {
        // Event source
        "open" => events::handle_open(tx, rest).await,
        "close" => events::handle_close(tx, rest).await,
        "remove-root" => events::handle_remove_root(tx, rest).await,
        "stop-all" if rest.is_empty() => events::handle_stop_all(tx).await,

        // Session state
        "workspace" => workspace::handle_workspace(tx, rest).await,
        "info" => info::handle_info(tx, rest).await,

        // Time log
        "export" => export::handle_export(tx, rest).await,
        "log-path" if rest.is_empty() => export::handle_log_path(tx).await,
        "history" => history::handle_history(tx, rest).await,

        // Control
        "stop" if rest.is_empty() => stop::handle_stop(tx).await,

        _ => {
            dwarn!("Router", "unknown IPC command: {}", cmd);
            format!("ERROR: Unknown command '{}'", cmd)
        }
    }
}

/// Splits `"open /a b/c"` into `("open", "/a b/c")`. The argument keeps
/// inner whitespace so paths with spaces survive.
fn split_verb(cmd: &str) -> (&str, &str) {
    let cmd = cmd.trim();
    match cmd.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (cmd, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::Event;
    use std::path::PathBuf;

    #[test]
    fn verb_and_argument_are_split_once() {
        assert_eq!(split_verb("open /a b/c.rs"), ("open", "/a b/c.rs"));
        assert_eq!(split_verb("  stop  "), ("stop", ""));
        assert_eq!(split_verb("info --json"), ("info", "--json"));
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let (tx, _rx) = mpsc::channel(1);
        let out = route_command("frobnicate", &tx).await;
        assert_eq!(out, "ERROR: Unknown command 'frobnicate'");
    }

    #[tokio::test]
    async fn open_forwards_an_event_and_returns_reply() {
        let (tx, mut rx) = mpsc::channel(1);

        let daemon = tokio::spawn(async move {
            match rx.recv().await {
                Some(DaemonMsg::Event { event, reply }) => {
                    let path = event.path().map(|p| p.to_path_buf());
                    if let Some(reply) = reply {
                        let _ = reply.send(Ok("Tracking".to_string()));
                    }
                    (matches!(event, Event::Opened { .. }), path)
                }
                _ => (false, None),
            }
        });

        let out = route_command("open /tmp/some dir/file.rs", &tx).await;
        let (was_open, path) = daemon.await.unwrap();

        assert_eq!(out, "Tracking");
        assert!(was_open);
        assert_eq!(path, Some(PathBuf::from("/tmp/some dir/file.rs")));
    }

    #[tokio::test]
    async fn open_without_path_is_a_usage_error() {
        let (tx, _rx) = mpsc::channel(1);
        let out = route_command("open", &tx).await;
        assert!(out.starts_with("ERROR:"), "{out}");
    }

    #[tokio::test]
    async fn closed_daemon_channel_is_reported() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let out = route_command("close /a", &tx).await;
        assert_eq!(out, "ERROR: daemon not running");
    }

    #[tokio::test]
    async fn daemon_errors_are_prefixed() {
        let (tx, mut rx) = mpsc::channel(1);

        tokio::spawn(async move {
            if let Some(DaemonMsg::Export { reply, .. }) = rx.recv().await {
                let _ = reply.send(Err("No tracked time found".to_string()));
            }
        });

        let out = route_command("export /tmp/out.tsv", &tx).await;
        assert_eq!(out, "ERROR: No tracked time found");
    }
}
