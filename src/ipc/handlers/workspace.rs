// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::mpsc;

use super::request;
use crate::core::daemon_msg::DaemonMsg;

/// `workspace [label]`: set the label stamped on sessions started from now
/// on. No argument clears it.
pub async fn handle_workspace(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    let label = match args.trim() {
        "" => None,
        s => Some(s.to_string()),
    };

    request(tx, |reply| DaemonMsg::SetWorkspace { label, reply }).await
}
