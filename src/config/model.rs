// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use eyre::{Result, bail};
use serde::Deserialize;

use crate::core::record::{DEFAULT_TIME_FORMAT, RecordFormat};
use crate::core::utils::is_valid_time_format;

/// Raw contents of `dwell.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub log_path: Option<String>,
    pub workspace: Option<String>,
    pub roots: Vec<String>,
    pub time_format: Option<String>,
    pub legacy_hour_wrap: bool,
}

/// Effective configuration after defaults and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellConfig {
    pub log_path: PathBuf,
    pub workspace: Option<String>,
    pub roots: Vec<PathBuf>,
    pub time_format: String,
    pub legacy_hour_wrap: bool,
}

impl DwellConfig {
    pub fn from_file(file: FileConfig) -> Self {
        let log_path = file
            .log_path
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(default_time_log_path);

        let workspace = file
            .workspace
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            log_path,
            workspace,
            roots: file.roots.iter().map(|r| absolute_root(r)).collect(),
            time_format: file
                .time_format
                .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string()),
            legacy_hour_wrap: file.legacy_hour_wrap,
        }
    }

    /// Rejects values that would only fail once a record is written.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_time_format(&self.time_format) {
            bail!("invalid time_format {:?}", self.time_format);
        }
        Ok(())
    }

    pub fn record_format(&self) -> RecordFormat {
        RecordFormat {
            time_format: self.time_format.clone(),
            wrap_hours: self.legacy_hour_wrap,
        }
    }
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self::from_file(FileConfig::default())
    }
}

/// `$XDG_DATA_HOME/dwell/time_data.tsv`, falling back to `/tmp/dwell`.
pub fn default_time_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("dwell")
        .join("time_data.tsv")
}

/// Roots key the session table, so relative entries are resolved against
/// the daemon's working directory.
fn absolute_root(raw: &str) -> PathBuf {
    let path = expand_home(raw);
    std::path::absolute(&path).unwrap_or(path)
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    Path::new(raw).to_path_buf()
}
