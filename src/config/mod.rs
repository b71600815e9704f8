// Author: Dustin Pilgrim
// License: MIT

pub mod model;

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

pub use model::DwellConfig;
use model::FileConfig;

pub struct LoadedConfig {
    pub cfg: DwellConfig,
    /// File the config came from; `None` for built-in defaults.
    pub path: Option<PathBuf>,
}

/// `$XDG_CONFIG_HOME/dwell/dwell.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dwell").join("dwell.toml"))
}

pub fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/dwell/dwell.toml")
}

/// Loads an explicit config file, or the first of user/system config that
/// exists, or built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let candidates = user_config_path()
        .into_iter()
        .chain(std::iter::once(system_config_path()));

    for path in candidates {
        if path.exists() {
            return load_from_path(&path);
        }
    }

    crate::ddebug!("Config", "no config file found; using defaults");
    Ok(LoadedConfig {
        cfg: DwellConfig::default(),
        path: None,
    })
}

pub fn load_from_path(path: &Path) -> Result<LoadedConfig> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;

    let file: FileConfig = toml::from_str(&raw)
        .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;

    let cfg = DwellConfig::from_file(file);
    cfg.validate()
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;

    crate::ddebug!("Config", "loaded config from {}", path.display());

    Ok(LoadedConfig {
        cfg,
        path: Some(path.to_path_buf()),
    })
}
