// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, watch};

use super::{AnyError, Daemon};
use crate::core::{daemon_msg::DaemonMsg, utils::now_ms};
use crate::{derror, dinfo, dwarn};

impl Daemon {
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        dinfo!("Daemon", "daemon starting");

        let (tx, mut rx) = mpsc::channel::<DaemonMsg>(256);

        let server = crate::ipc::server::spawn_ipc_server(tx.clone(), shutdown.clone()).await;
        let server = match server {
            Ok(handle) => Some(handle),
            Err(e) => {
                dwarn!("IPC", "failed to start: {}", e);
                None
            }
        };

        self.start_initial_roots(now_ms());

        // Held so `recv` never sees a closed channel while the server lives.
        let _tx = tx;

        let mut stop_reply = None;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        dinfo!("Daemon", "daemon stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        dinfo!("Daemon", "daemon stopping (message channel closed)");
                        break;
                    };

                    match msg {
                        DaemonMsg::Event { event, reply } => {
                            let out = self.handle_event(event);
                            if let Some(reply) = reply {
                                let _ = reply.send(out);
                            }
                        }

                        DaemonMsg::SetWorkspace { label, reply } => {
                            let _ = reply.send(self.set_workspace(label));
                        }

                        DaemonMsg::GetInfo { reply } => {
                            let _ = reply.send(self.snapshot(now_ms()));
                        }

                        DaemonMsg::Export { dest, reply } => {
                            let _ = reply.send(self.export(&dest));
                        }

                        DaemonMsg::LogPath { reply } => {
                            let _ = reply.send(self.log_path().to_path_buf());
                        }

                        DaemonMsg::StopDaemon { reply } => {
                            dinfo!("Daemon", "daemon stopping (stop requested via IPC)");
                            stop_reply = Some(reply);
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                    }
                }
            }
        }

        let flushed = self.shutdown(now_ms());
        if let Err(e) = &flushed {
            derror!("Daemon", "{}", e);
        }

        if let Some(reply) = stop_reply {
            let _ = reply.send(flushed.map(|msg| format!("{msg}; stopping dwell daemon")));
        }

        // The server may still be writing replies; the runtime must outlive them.
        let _ = shutdown_tx.send(true);
        if let Some(server) = server {
            if let Err(e) = server.await {
                derror!("IPC", "server task failed: {}", e);
            }
        }

        crate::ipc::server::cleanup_socket();
        dinfo!("Daemon", "daemon stopped");
        Ok(())
    }
}
