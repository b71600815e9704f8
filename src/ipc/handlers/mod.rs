// Author: Dustin Pilgrim
// License: MIT

pub mod events;
pub mod export;
pub mod history;
pub mod info;
pub mod stop;
pub mod workspace;

use tokio::sync::{mpsc, oneshot};

use crate::core::daemon_msg::{DaemonMsg, Reply};

/// Sends one request to the daemon loop and renders its reply.
///
/// - `Ok(msg)` is returned as-is
/// - `Err(msg)` becomes `ERROR: msg`
pub async fn request<F>(tx: &mpsc::Sender<DaemonMsg>, build: F) -> String
where
    F: FnOnce(Reply) -> DaemonMsg,
{
    let (reply_tx, reply_rx) = oneshot::channel();

    if tx.send(build(reply_tx)).await.is_err() {
        return "ERROR: daemon not running".to_string();
    }

    match reply_rx.await {
        Ok(Ok(msg)) => msg.trim_end().to_string(),
        Ok(Err(e)) => {
            let out = e.trim_end();
            if out.is_empty() {
                "ERROR: request failed".to_string()
            } else {
                format!("ERROR: {out}")
            }
        }
        Err(_) => "ERROR: No response from daemon".to_string(),
    }
}
