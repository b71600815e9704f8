// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use super::request;
use crate::core::daemon_msg::DaemonMsg;

/// `export <dest>`: copy the time log to `dest` and delete the original.
pub async fn handle_export(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    if args.is_empty() {
        return "ERROR: usage: dwell export <dest>".to_string();
    }

    let dest = PathBuf::from(args);
    if !dest.is_absolute() {
        return format!("ERROR: destination must be absolute: {args}");
    }

    request(tx, |reply| DaemonMsg::Export { dest, reply }).await
}

/// `log-path`: where the time log lives.
pub async fn handle_log_path(tx: &mpsc::Sender<DaemonMsg>) -> String {
    match log_path(tx).await {
        Ok(path) => path.display().to_string(),
        Err(e) => format!("ERROR: {e}"),
    }
}

/// Asks the daemon loop for the current time log path.
pub(super) async fn log_path(tx: &mpsc::Sender<DaemonMsg>) -> Result<PathBuf, String> {
    let (reply_tx, reply_rx) = oneshot::channel();
    if tx.send(DaemonMsg::LogPath { reply: reply_tx }).await.is_err() {
        return Err("daemon not running".to_string());
    }

    reply_rx
        .await
        .map_err(|_| "No response from daemon".to_string())
}
