// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod exit;
pub mod logging;
pub mod signal;

use std::path::Path;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::default_config_path;
use crate::config::{load_and_validate, parse_duration, ConfigFile};
use crate::errors::Result;
use crate::signal::parse_signal;

pub use crate::config::TimeoutSpec;
pub use crate::errors::TimeboundError;
pub use crate::exec::{CapturedRun, RunHandle, Supervisor};
pub use crate::exit::{ExitStatus, Phase};

/// A command line resolved against the defaults file.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub spec: TimeoutSpec,
    pub preserve_status: bool,
}

/// High-level entry point used by `main.rs`.
///
/// Loads the defaults file (if any), resolves the command line against it,
/// and runs the command with its output streamed through. Returns the exit
/// code the process should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let defaults = match args.config.clone().or_else(default_config_path) {
        Some(path) => load_defaults(&path)?,
        None => ConfigFile::default(),
    };

    let invocation = resolve_invocation(&args, &defaults)?;
    debug!(?invocation, "resolved invocation");

    let supervisor = Supervisor::new(invocation.spec);
    Ok(supervisor.run_streaming(invocation.preserve_status).await)
}

fn load_defaults(path: &Path) -> Result<ConfigFile> {
    load_and_validate(path).map_err(|e| match e {
        TimeboundError::IoError(io) => {
            TimeboundError::ConfigError(format!("reading {}: {io}", path.display()))
        }
        other => other,
    })
}

/// Merge CLI flags over the defaults file. Flags win; boolean flags can
/// only switch a default on.
pub fn resolve_invocation(args: &CliArgs, defaults: &ConfigFile) -> Result<Invocation> {
    let duration = parse_duration(&args.duration)?;
    if duration.is_zero() {
        return Err(TimeboundError::ConfigError(
            "DURATION must be greater than zero".to_string(),
        ));
    }

    let kill_after = match &args.kill_after {
        Some(s) => Some(parse_duration(s)?),
        None => defaults.default.kill_after,
    };
    let signal = match &args.signal {
        Some(s) => Some(parse_signal(s)?),
        None => defaults.default.signal,
    };

    let (program, rest) = args
        .command
        .split_first()
        .ok_or_else(|| TimeboundError::ConfigError("missing COMMAND".to_string()))?;

    let mut spec = TimeoutSpec::new(program.clone(), rest.iter().cloned(), duration)
        .with_kill_after(kill_after.unwrap_or_default())
        .foreground(args.foreground || defaults.default.foreground.unwrap_or(false));
    if let Some(signal) = signal {
        spec = spec.with_signal(signal);
    }

    Ok(Invocation {
        spec,
        preserve_status: args.preserve_status
            || defaults.default.preserve_status.unwrap_or(false),
    })
}
