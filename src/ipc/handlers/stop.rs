// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::mpsc;

use super::request;
use crate::core::daemon_msg::DaemonMsg;

/// Handle `dwell stop` (no args).
///
/// Semantics:
/// - Ask the daemon to record every open session and exit.
/// - Reply once the sessions have been written.
pub async fn handle_stop(tx: &mpsc::Sender<DaemonMsg>) -> String {
    let out = request(tx, |reply| DaemonMsg::StopDaemon { reply }).await;
    if out.is_empty() {
        "Stopping dwell daemon".to_string()
    } else {
        out
    }
}
