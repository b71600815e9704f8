// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use tokio::sync::mpsc;

use super::export::log_path;
use crate::core::daemon_msg::DaemonMsg;
use crate::core::record::{HEADER, LogRecord};

const DEFAULT_COUNT: usize = 20;
const MAX_COUNT: usize = 1000;

/// `history [N]`: the last N recorded sessions, oldest first.
pub async fn handle_history(tx: &mpsc::Sender<DaemonMsg>, args: &str) -> String {
    let count = match parse_count(args) {
        Ok(n) => n,
        Err(e) => return e,
    };

    let path = match log_path(tx).await {
        Ok(p) => p,
        Err(e) => return format!("ERROR: {e}"),
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(data) => render(&data, count),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => "No tracked time found".to_string(),
        Err(e) => format!("ERROR: failed to read {}: {e}", path.display()),
    }
}

fn parse_count(args: &str) -> Result<usize, String> {
    if args.is_empty() {
        return Ok(DEFAULT_COUNT);
    }

    match args.parse::<usize>() {
        Ok(0) | Err(_) => Err("ERROR: usage: dwell history [N] (N >= 1)".to_string()),
        Ok(n) => Ok(n.min(MAX_COUNT)),
    }
}

fn render(data: &str, count: usize) -> String {
    let header = HEADER.trim_end();
    let records: Vec<LogRecord> = data
        .lines()
        .filter(|l| *l != header)
        .filter_map(LogRecord::parse_line)
        .collect();

    if records.is_empty() {
        return "No tracked time found".to_string();
    }

    let skip = records.len().saturating_sub(count);
    let mut out = String::new();
    for rec in &records[skip..] {
        let label = if rec.workspace.is_empty() { "-" } else { rec.workspace.as_str() };
        let target = Path::new(&rec.path).join(&rec.file);
        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            rec.start,
            rec.elapsed,
            label,
            target.display()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "Workspace\tFolder\tFile\tStart Time\tEnd Time\tTime Spent\tPath\n\
        site\tsrc\tmain.rs\t2024-03-01 09:00:00\t2024-03-01 10:01:01\t01:01:01\t/w/site/src\n\
        \tdocs\tREADME.md\t2024-03-01 11:00:00\t2024-03-01 11:00:30\t00:00:30\t/w/docs\n\
        site\tsrc\tlib.rs\t2024-03-02 08:00:00\t2024-03-02 08:10:00\t00:10:00\t/w/site/src\n";

    #[test]
    fn count_argument() {
        assert_eq!(parse_count(""), Ok(DEFAULT_COUNT));
        assert_eq!(parse_count("3"), Ok(3));
        assert_eq!(parse_count("50000"), Ok(MAX_COUNT));
        assert!(parse_count("0").is_err());
        assert!(parse_count("x").is_err());
        assert!(parse_count("1 2").is_err());
    }

    #[test]
    fn newest_rows_are_kept_in_file_order() {
        let out = render(LOG, 2);
        assert_eq!(
            out,
            "2024-03-01 11:00:00  00:00:30  -  /w/docs/README.md\n\
             2024-03-02 08:00:00  00:10:00  site  /w/site/src/lib.rs\n"
        );
    }

    #[test]
    fn header_and_malformed_lines_are_skipped() {
        let out = render(&format!("{HEADER}broken\n"), 5);
        assert_eq!(out, "No tracked time found");
        assert_eq!(render(LOG, 10).lines().count(), 3);
    }
}
