// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, DefaultSection, RawConfigFile, RawDefaultSection};
use crate::errors::{Result, TimeboundError};
use crate::signal::parse_signal;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TimeboundError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let default = validate_default_section(&raw.default)?;
        Ok(ConfigFile::new_unchecked(default))
    }
}

fn validate_default_section(raw: &RawDefaultSection) -> Result<DefaultSection> {
    let kill_after = raw
        .kill_after
        .as_deref()
        .map(parse_duration)
        .transpose()
        .map_err(|e| prefixed("kill_after", e))?;

    let signal = raw
        .signal
        .as_deref()
        .map(parse_signal)
        .transpose()
        .map_err(|e| prefixed("signal", e))?;

    Ok(DefaultSection {
        kill_after,
        signal,
        foreground: raw.foreground,
        preserve_status: raw.preserve_status,
    })
}

fn prefixed(key: &str, err: TimeboundError) -> TimeboundError {
    match err {
        TimeboundError::ConfigError(msg) => {
            TimeboundError::ConfigError(format!("[default].{key}: {msg}"))
        }
        other => other,
    }
}
