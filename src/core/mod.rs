// Author: Dustin Pilgrim
// License: MIT

pub mod daemon_msg;
pub mod error;
pub mod events;
pub mod export;
pub mod info;
pub mod record;
pub mod session;
pub mod tracker;
pub mod utils;
pub mod writer;
