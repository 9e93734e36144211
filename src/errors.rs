// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::exit::EXIT_UNKNOWN_ERR;

#[derive(Error, Debug)]
pub enum TimeboundError {
    /// The child process could not be started. `exit_code` is the
    /// conventional code a shell would report for the same failure.
    #[error("exit code: {exit_code}, {source}")]
    Spawn {
        exit_code: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The escalation task went away without reporting an exit status.
    #[error("supervisor stopped before reporting an exit status")]
    SupervisorLost,

    /// Failures outside the supervised run, such as logging setup.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimeboundError {
    /// Exit code the command-line tool should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TimeboundError::Spawn { exit_code, .. } => *exit_code,
            _ => EXIT_UNKNOWN_ERR,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimeboundError>;
