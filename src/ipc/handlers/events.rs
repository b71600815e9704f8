// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::request;
use crate::core::{daemon_msg::DaemonMsg, events::Event, utils::now_ms};

/// `open <path>`: a document or folder became active.
pub async fn handle_open(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    let path = match parse_path("open", args) {
        Ok(p) => p,
        Err(e) => return e,
    };
    send_event(tx, Event::Opened { path, now_ms: now_ms() }).await
}

/// `close <path>`: a document was closed.
pub async fn handle_close(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    let path = match parse_path("close", args) {
        Ok(p) => p,
        Err(e) => return e,
    };
    send_event(tx, Event::Closed { path, now_ms: now_ms() }).await
}

/// `remove-root <path>`: a workspace folder was removed.
pub async fn handle_remove_root(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    let path = match parse_path("remove-root", args) {
        Ok(p) => p,
        Err(e) => return e,
    };
    send_event(tx, Event::RootRemoved { path, now_ms: now_ms() }).await
}

/// `stop-all`: record every in-flight session and keep running.
pub async fn handle_stop_all(tx: &mpsc::Sender<DaemonMsg>) -> String {
    send_event(tx, Event::FlushAll { now_ms: now_ms() }).await
}

async fn send_event(tx: &mpsc::Sender<DaemonMsg>, event: Event) -> String {
    request(tx, |reply| DaemonMsg::Event {
        event,
        reply: Some(reply),
    })
    .await
}

fn parse_path(verb: &str, args: &str) -> Result<PathBuf, String> {
    if args.is_empty() {
        return Err(format!("ERROR: usage: dwell {verb} <path>"));
    }

    let path = Path::new(args);
    if !path.is_absolute() {
        return Err(format!("ERROR: path must be absolute: {args}"));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_rejected() {
        assert!(parse_path("open", "src/main.rs").unwrap_err().contains("absolute"));
        assert!(parse_path("open", "").unwrap_err().contains("usage"));
        assert_eq!(parse_path("open", "/a/b").unwrap(), PathBuf::from("/a/b"));
    }
}
