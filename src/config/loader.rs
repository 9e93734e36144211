// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a defaults file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; durations and signal names are
/// checked by [`load_and_validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a defaults file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Defaults file used when `--config` is not given: `TIMEBOUND_CONFIG` if
/// set, otherwise nothing.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("TIMEBOUND_CONFIG")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
