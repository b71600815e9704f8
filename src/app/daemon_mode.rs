// Author: Dustin Pilgrim
// License: MIT

use std::io;

use tokio::signal::unix::{SignalKind, signal};

use crate::cli::Args;
use crate::config::DwellConfig;
use crate::daemon::Daemon;
use crate::{derror, dinfo};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("dwell: {e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    crate::log::set_verbose(args.verbose);
    crate::app::platform::init_file_logging();

    dinfo!("Daemon", "dwell starting");

    let loaded = crate::config::load(args.config.as_deref()).map_err(|e| {
        derror!("Config", "{:#}", e);
        io::Error::new(io::ErrorKind::InvalidData, format!("{e:#}"))
    })?;

    if let Some(path) = &loaded.path {
        dinfo!("Config", "using {}", path.display());
    }

    let cfg = apply_overrides(loaded.cfg, &args);
    dinfo!("Daemon", "time log: {}", cfg.log_path.display());

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut daemon = Daemon::new(cfg);

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(shutdown_rx, shutdown_tx).await }
    });

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        res = &mut daemon_task => {
            return match res {
                Ok(r) => r,
                Err(join_err) => Err(Box::new(join_err) as AnyError),
            };
        }

        _ = tokio::signal::ctrl_c() => {
            dinfo!("Daemon", "received Ctrl+C, shutting down");
        }

        _ = sigterm.recv() => {
            dinfo!("Daemon", "received SIGTERM, shutting down");
        }
    }

    let _ = shutdown_tx.send(true);

    match daemon_task.await {
        Ok(r) => r,
        Err(join_err) => Err(Box::new(join_err)),
    }
}

/// CLI flags win over the config file; `--root` adds to the configured roots.
fn apply_overrides(mut cfg: DwellConfig, args: &Args) -> DwellConfig {
    if let Some(label) = args.workspace.as_deref().map(str::trim) {
        cfg.workspace = (!label.is_empty()).then(|| label.to_string());
    }

    for root in &args.roots {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.clone());
        if !cfg.roots.contains(&root) {
            cfg.roots.push(root);
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn cli_overrides_config() {
        let cfg = DwellConfig {
            workspace: Some("from-file".into()),
            roots: vec![PathBuf::from("/a")],
            ..DwellConfig::default()
        };
        let args = Args::parse_from(["dwell", "-w", "from-cli", "--root", "/a", "--root", "/b"]);

        let cfg = apply_overrides(cfg, &args);
        assert_eq!(cfg.workspace.as_deref(), Some("from-cli"));
        assert_eq!(cfg.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn no_flags_keep_config() {
        let cfg = DwellConfig {
            workspace: Some("ws".into()),
            ..DwellConfig::default()
        };
        let args = Args::parse_from(["dwell"]);

        assert_eq!(apply_overrides(cfg.clone(), &args), cfg);
    }
}
