// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::{mpsc, watch},
    task::{JoinHandle, JoinSet},
    time::{Duration, timeout},
};

use super::router::route_command;
use crate::core::daemon_msg::DaemonMsg;
use crate::{ddebug, derror};

/// Requests longer than this are rejected.
const MAX_REQUEST_BYTES: u64 = 64 * 1024;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// How long in-flight replies may take once shutdown is requested. Covers
/// the final flush that answers `stop`.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Binds the daemon socket and spawns the accept loop. The returned handle
/// completes once shutdown is signalled and open connections have replied.
pub async fn spawn_ipc_server(
    tx: mpsc::Sender<DaemonMsg>,
    shutdown: watch::Receiver<bool>,
) -> Result<JoinHandle<()>, String> {
    let path = super::socket_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    // The instance lock is already held, so anything here is stale.
    remove_stale_socket(&path);

    let listener = UnixListener::bind(&path)
        .map_err(|e| format!("failed to bind {}: {e}", path.display()))?;

    ddebug!("IPC", "listening on {}", path.display());
    Ok(spawn_ipc_socket_with_listener(tx, listener, shutdown))
}

pub fn spawn_ipc_socket_with_listener(
    tx: mpsc::Sender<DaemonMsg>,
    listener: UnixListener,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut conns = JoinSet::new();

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }

                Some(_) = conns.join_next(), if !conns.is_empty() => {}

                accepted = listener.accept() => match accepted {
                    Ok((stream, _addr)) => {
                        conns.spawn(serve(stream, tx.clone()));
                    }
                    Err(e) => derror!("IPC", "failed to accept IPC connection: {}", e),
                },
            }
        }

        drop(listener);

        if !conns.is_empty() {
            ddebug!("IPC", "waiting for {} open connection(s)", conns.len());
            let drained = timeout(DRAIN_TIMEOUT, async {
                while conns.join_next().await.is_some() {}
            })
            .await;

            if drained.is_err() {
                derror!("IPC", "dropping {} connection(s) at shutdown", conns.len());
                conns.abort_all();
            }
        }
    })
}

async fn serve(mut stream: UnixStream, tx: mpsc::Sender<DaemonMsg>) {
    let result = timeout(CONNECTION_TIMEOUT, async {
        if let Err(e) = handle_connection(&mut stream, &tx).await {
            derror!("IPC", "error handling IPC connection: {}", e);
        }
    })
    .await;

    if result.is_err() {
        derror!("IPC", "IPC connection timed out after {:?}", CONNECTION_TIMEOUT);
    }

    let _ = stream.shutdown().await;
}

async fn handle_connection(
    stream: &mut UnixStream,
    tx: &mpsc::Sender<DaemonMsg>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let n = (&mut *stream)
        .take(MAX_REQUEST_BYTES + 1)
        .read_to_end(&mut buf)
        .await?;

    if n == 0 {
        return Ok(());
    }

    let response = if n as u64 > MAX_REQUEST_BYTES {
        "ERROR: request too large".to_string()
    } else {
        let cmd = String::from_utf8_lossy(&buf).trim().to_string();
        ddebug!("IPC", "received IPC command: {}", cmd);
        route_command(&cmd, tx).await
    };

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}

fn remove_stale_socket(path: &Path) {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
}

pub fn cleanup_socket() {
    if let Ok(path) = super::socket_path() {
        remove_stale_socket(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reply_sent_during_shutdown_reaches_the_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dwell.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server = spawn_ipc_socket_with_listener(tx, listener, shutdown_rx);

        // Stands in for the daemon loop: signal shutdown first, answer later.
        let daemon = tokio::spawn(async move {
            if let Some(DaemonMsg::StopDaemon { reply }) = rx.recv().await {
                let _ = shutdown_tx.send(true);
                tokio::time::sleep(Duration::from_millis(100)).await;
                let _ = reply.send(Ok("Recorded 1 session(s); stopping dwell daemon".into()));
            }
        });

        let mut client = UnixStream::connect(&path).await.unwrap();
        client.write_all(b"stop").await.unwrap();
        client.shutdown().await.unwrap();

        let mut resp = String::new();
        client.read_to_string(&mut resp).await.unwrap();

        daemon.await.unwrap();
        timeout(Duration::from_secs(2), server).await.unwrap().unwrap();

        assert_eq!(resp, "Recorded 1 session(s); stopping dwell daemon");
    }
}
