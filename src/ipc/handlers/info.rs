// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::daemon_msg::DaemonMsg;

/// `info [--json]`: list in-flight sessions.
pub async fn handle_info(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    let as_json = args.split_whitespace().any(|a| a == "--json");

    let (reply_tx, reply_rx) = oneshot::channel();
    if tx.send(DaemonMsg::GetInfo { reply: reply_tx }).await.is_err() {
        return "ERROR: daemon not running".to_string();
    }

    match reply_rx.await {
        Ok(snap) if as_json => snap.to_json(),
        Ok(snap) => snap.pretty_text,
        Err(_) => "ERROR: No response from daemon".to_string(),
    }
}
