// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;

// ---------------- single-instance lock ----------------

fn lock_path() -> Result<PathBuf, String> {
    Ok(crate::ipc::runtime_dir()?.join("dwell").join("dwell.lock"))
}

pub fn acquire_single_instance_lock() -> Result<UnixListener, String> {
    let path = lock_path()?;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match UnixListener::bind(&path) {
        Ok(l) => Ok(l),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => match UnixStream::connect(&path) {
            Ok(_) => Err(format!(
                "dwell is already running (another instance holds {})",
                path.display()
            )),
            Err(_) => {
                let _ = std::fs::remove_file(&path);
                UnixListener::bind(&path)
                    .map_err(|e| format!("failed to bind instance lock {}: {e}", path.display()))
            }
        },
        Err(e) => Err(format!("failed to bind instance lock {}: {e}", path.display())),
    }
}

/// Sets up the diagnostic log file and writes the run header.
pub fn init_file_logging() {
    let path = crate::log::default_log_path();

    let needs_blank = crate::log::prepare_log_file(&path, crate::log::LogPolicy::default())
        .unwrap_or(false);

    if needs_blank {
        let _ = crate::log::write_raw_line(&path, "");
    }
    if let Err(e) = crate::log::write_raw_line(&path, &crate::log::run_header()) {
        eprintln!("dwell: failed to enable file logging: {e}");
        return;
    }

    crate::log::enable_file_output(&path);
    crate::ddebug!("Log", "file logging enabled: {}", path.display());
}
