// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use crate::cli::{Args, Command};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // command mode: args.command is Some
    let Some(cmd) = args.command.as_ref() else {
        return Ok(());
    };

    let msg = match request_line(cmd) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("dwell: {e}");
            std::process::exit(1);
        }
    };

    match crate::ipc::client::send_raw(&msg).await {
        Ok(resp) => {
            print_response(cmd, &resp);
            Ok(())
        }
        Err(e) => {
            if matches!(cmd, Command::Info { json: true }) {
                // Status bars want valid JSON even when the daemon is down.
                println!(r#"{{"workspace":null,"log_path":null,"sessions":[],"running":false}}"#);
                return Ok(());
            }
            eprintln!("dwell: {e}");
            std::process::exit(1);
        }
    }
}

/// Builds the IPC request for a subcommand. Paths are made absolute against
/// the current directory so the daemon sees the same key the editor does.
fn request_line(cmd: &Command) -> Result<String, String> {
    let line = match cmd {
        Command::Open { path } => format!("open {}", absolute(path)?),
        Command::Close { path } => format!("close {}", absolute(path)?),
        Command::RemoveRoot { path } => format!("remove-root {}", absolute(path)?),
        Command::Workspace { label: Some(l) } => format!("workspace {l}"),
        Command::Workspace { label: None } => "workspace".to_string(),
        Command::StopAll => "stop-all".to_string(),
        Command::Info { json: true } => "info --json".to_string(),
        Command::Info { json: false } => "info".to_string(),
        Command::Export { dest } => format!("export {}", absolute(dest)?),
        Command::LogPath => "log-path".to_string(),
        Command::History { count } => format!("history {count}"),
        Command::Stop => "stop".to_string(),
    };
    Ok(line)
}

fn absolute(path: &Path) -> Result<String, String> {
    std::path::absolute(path)
        .map(|p| p.display().to_string())
        .map_err(|e| format!("cannot resolve {}: {e}", path.display()))
}

fn print_response(cmd: &Command, resp: &str) {
    if let Some(err) = resp.strip_prefix("ERROR:") {
        eprintln!("{}", err.trim());
        std::process::exit(1);
    }

    match cmd {
        // Multi-line output is printed verbatim.
        Command::History { .. } | Command::Info { json: false } => {
            if !resp.is_empty() {
                print!("{resp}");
            }
        }
        _ => {
            let out = resp.trim_end();
            if !out.is_empty() {
                println!("{out}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn absolute_paths_pass_through() {
        let line = request_line(&Command::Open { path: PathBuf::from("/a/b c.rs") }).unwrap();
        assert_eq!(line, "open /a/b c.rs");
    }

    #[test]
    fn relative_paths_are_resolved() {
        let line = request_line(&Command::Close { path: PathBuf::from("src/main.rs") }).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(line, format!("close {}", cwd.join("src/main.rs").display()));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(request_line(&Command::StopAll).unwrap(), "stop-all");
        assert_eq!(request_line(&Command::Info { json: true }).unwrap(), "info --json");
        assert_eq!(
            request_line(&Command::Workspace { label: Some("site".into()) }).unwrap(),
            "workspace site"
        );
        assert_eq!(
            request_line(&Command::History { count: 5 }).unwrap(),
            "history 5"
        );
    }
}
