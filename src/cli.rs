// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dwell",
    version = env!("CARGO_PKG_VERSION"),
    about = "Records how long files and folders stay open in your editor"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    /// Workspace label stamped on new sessions (overrides the config file)
    #[arg(short, long, value_name = "LABEL")]
    pub workspace: Option<String>,

    /// Folder to start tracking immediately (repeatable)
    #[arg(short, long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Start timing a file or folder")]
    Open { path: PathBuf },

    #[command(about = "Stop timing a file and record the session")]
    Close { path: PathBuf },

    #[command(about = "Stop timing a workspace folder that was removed")]
    RemoveRoot { path: PathBuf },

    #[command(about = "Set the workspace label for new sessions (omit to clear)")]
    Workspace { label: Option<String> },

    #[command(about = "Record every open session without stopping the daemon")]
    StopAll,

    #[command(about = "Show sessions currently being timed")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Copy the time log to DEST and delete the original")]
    Export { dest: PathBuf },

    #[command(about = "Print the path of the time log")]
    LogPath,

    #[command(about = "Show the most recently recorded sessions")]
    History {
        /// Number of sessions to show
        #[arg(default_value_t = 20)]
        count: usize,
    },

    #[command(about = "Record open sessions and stop the daemon")]
    Stop,
}
