// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::core::{events::Event, info::InfoSnapshot};

pub type Reply = oneshot::Sender<Result<String, String>>;

#[derive(Debug)]
pub enum DaemonMsg {
    Event {
        event: Event,
        reply: Option<Reply>,
    },

    SetWorkspace {
        label: Option<String>,
        reply: Reply,
    },

    GetInfo {
        reply: oneshot::Sender<InfoSnapshot>,
    },

    Export {
        dest: PathBuf,
        reply: Reply,
    },

    LogPath {
        reply: oneshot::Sender<PathBuf>,
    },

    StopDaemon {
        reply: Reply,
    },
}
