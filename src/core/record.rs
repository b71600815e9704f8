// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use crate::core::session::Session;
use crate::core::utils::{format_elapsed, format_local};

pub const DELIMITER: char = '\t';
pub const COLUMNS: usize = 7;
pub const HEADER: &str = "Workspace\tFolder\tFile\tStart Time\tEnd Time\tTime Spent\tPath\n";

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How closed sessions are rendered into log columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormat {
    /// chrono strftime pattern for the start/end columns (local time).
    pub time_format: String,
    /// Take the hour field of `Time Spent` modulo 24.
    pub wrap_hours: bool,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            wrap_hours: false,
        }
    }
}

/// One persisted line of the time log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub workspace: String,
    pub folder: String,
    pub file: String,
    pub start: String,
    pub end: String,
    pub elapsed: String,
    pub path: String,
}

impl LogRecord {
    /// Builds the record for a closed session. Returns `None` while the
    /// session is still in flight.
    pub fn from_session(session: &Session, format: &RecordFormat) -> Option<Self> {
        let end_ms = session.end_ms()?;
        let elapsed_ms = session.elapsed_ms()?;
        let path = session.tracked_path();

        Some(Self {
            workspace: session.workspace_label().unwrap_or_default().to_string(),
            folder: folder_name(path),
            file: file_name(path),
            start: format_local(session.start_ms(), &format.time_format),
            end: format_local(end_ms, &format.time_format),
            elapsed: format_elapsed(elapsed_ms, format.wrap_hours),
            path: parent_dir(path),
        })
    }

    pub fn fields(&self) -> [&str; COLUMNS] {
        [
            self.workspace.as_str(),
            self.folder.as_str(),
            self.file.as_str(),
            self.start.as_str(),
            self.end.as_str(),
            self.elapsed.as_str(),
            self.path.as_str(),
        ]
    }

    /// Tab-joined line with trailing newline. Tabs and line breaks inside a
    /// field become a single space so every line keeps seven columns.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                line.push(DELIMITER);
            }
            line.push_str(&sanitize(field));
        }
        line.push('\n');
        line
    }

    /// Reads back one line of the time log. `None` for malformed lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let cols: Vec<&str> = line.split(DELIMITER).collect();
        if cols.len() != COLUMNS {
            return None;
        }

        Some(Self {
            workspace: cols[0].to_string(),
            folder: cols[1].to_string(),
            file: cols[2].to_string(),
            start: cols[3].to_string(),
            end: cols[4].to_string(),
            elapsed: cols[5].to_string(),
            path: cols[6].to_string(),
        })
    }
}

fn sanitize(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}

/// Final path segment (`"c.rs"` for `/a/b/c.rs`).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Segment above the final one (`"b"` for `/a/b/c.rs`).
pub fn folder_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Full parent directory (`"/a/b"` for `/a/b/c.rs`).
pub fn parent_dir(path: &Path) -> String {
    path.parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(path: &str, label: Option<&str>, start: u64, end: u64) -> Session {
        let mut s = Session::start(path.into(), label.map(str::to_string), start);
        s.close(end);
        s
    }

    #[test]
    fn header_has_seven_columns() {
        assert_eq!(HEADER.trim_end().split(DELIMITER).count(), COLUMNS);
    }

    #[test]
    fn path_segments() {
        let p = Path::new("/home/me/project/src/main.rs");
        assert_eq!(file_name(p), "main.rs");
        assert_eq!(folder_name(p), "src");
        assert_eq!(parent_dir(p), "/home/me/project/src");
    }

    #[test]
    fn file_directly_under_root_has_no_folder() {
        let p = Path::new("/notes.txt");
        assert_eq!(file_name(p), "notes.txt");
        assert_eq!(folder_name(p), "");
        assert_eq!(parent_dir(p), "/");
    }

    #[test]
    fn in_flight_session_has_no_record() {
        let s = Session::start("/a/b".into(), None, 0);
        assert!(LogRecord::from_session(&s, &RecordFormat::default()).is_none());
    }

    #[test]
    fn record_from_closed_session() {
        let s = closed("/work/app/lib.rs", Some("app"), 1_000, 3_662_000);
        let rec = LogRecord::from_session(&s, &RecordFormat::default()).unwrap();

        assert_eq!(rec.workspace, "app");
        assert_eq!(rec.folder, "app");
        assert_eq!(rec.file, "lib.rs");
        assert_eq!(rec.elapsed, "01:01:01");
        assert_eq!(rec.path, "/work/app");
        assert_eq!(rec.start, format_local(1_000, DEFAULT_TIME_FORMAT));
        assert_eq!(rec.end, format_local(3_662_000, DEFAULT_TIME_FORMAT));
    }

    #[test]
    fn missing_label_is_an_empty_column() {
        let s = closed("/a/b.rs", None, 0, 0);
        let rec = LogRecord::from_session(&s, &RecordFormat::default()).unwrap();
        assert!(rec.to_line().starts_with("\ta\tb.rs\t"));
    }

    #[test]
    fn line_splits_back_into_the_same_fields() {
        let s = closed("/srv/site/index.html", Some("site"), 0, 45_000);
        let rec = LogRecord::from_session(&s, &RecordFormat::default()).unwrap();
        let line = rec.to_line();

        assert!(line.ends_with('\n'));
        assert_eq!(line.trim_end_matches('\n').split(DELIMITER).count(), COLUMNS);
        assert_eq!(LogRecord::parse_line(&line), Some(rec));
    }

    #[test]
    fn embedded_tabs_and_newlines_do_not_add_columns() {
        let s = closed("/tmp/we\tird/fi\nle.txt", Some("a\tb"), 0, 1_000);
        let rec = LogRecord::from_session(&s, &RecordFormat::default()).unwrap();
        let line = rec.to_line();

        assert_eq!(line.matches('\n').count(), 1);
        let parsed = LogRecord::parse_line(&line).unwrap();
        assert_eq!(parsed.workspace, "a b");
        assert_eq!(parsed.folder, "we ird");
        assert_eq!(parsed.file, "fi le.txt");
    }

    #[test]
    fn parse_rejects_wrong_column_count() {
        assert!(LogRecord::parse_line("a\tb\tc\n").is_none());
    }
}
