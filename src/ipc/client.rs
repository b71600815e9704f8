// Author: Dustin Pilgrim
// License: MIT

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    time::{Duration, timeout},
};

pub async fn send_raw(cmd: &str) -> Result<String, String> {
    let path = crate::ipc::socket_path()?;

    if !path.exists() {
        return Err("daemon not running".to_string());
    }

    let mut stream = match timeout(Duration::from_secs(2), UnixStream::connect(&path)).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => return Err(format!("failed to connect to {}: {e}", path.display())),
        Err(_) => return Err("timeout connecting to daemon".to_string()),
    };

    timeout(Duration::from_secs(2), stream.write_all(cmd.as_bytes()))
        .await
        .map_err(|_| "timeout writing to daemon".to_string())?
        .map_err(|e| format!("write failed: {e}"))?;

    timeout(Duration::from_secs(2), stream.shutdown())
        .await
        .map_err(|_| "timeout finalizing request".to_string())?
        .map_err(|e| format!("shutdown failed: {e}"))?;

    let mut resp = Vec::new();
    timeout(read_timeout(cmd), stream.read_to_end(&mut resp))
        .await
        .map_err(|_| "timeout reading response".to_string())?
        .map_err(|e| format!("read failed: {e}"))?;

    // Every handler answers with at least one byte.
    if resp.is_empty() {
        return Err("daemon closed the connection without replying".to_string());
    }

    Ok(String::from_utf8_lossy(&resp).to_string())
}

/// Requests that write to disk (flushing sessions, copying the log, reading
/// it back) get longer than a table lookup.
fn read_timeout(cmd: &str) -> Duration {
    let verb = cmd.split_whitespace().next().unwrap_or_default();
    match verb {
        "stop" | "stop-all" | "close" | "remove-root" | "export" | "history" => {
            Duration::from_secs(10)
        }
        _ => Duration::from_secs(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_bound_requests_wait_longer() {
        assert_eq!(read_timeout("stop"), Duration::from_secs(10));
        assert_eq!(read_timeout("close /a/b.rs"), Duration::from_secs(10));
        assert_eq!(read_timeout("export /tmp/x.tsv"), Duration::from_secs(10));
        assert_eq!(read_timeout("info --json"), Duration::from_secs(2));
        assert_eq!(read_timeout(""), Duration::from_secs(2));
    }
}
