// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::exit::EXIT_UNKNOWN_ERR;

/// Command-line arguments for `timebound`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "timebound",
    version,
    about = "Run a command with a time limit, escalating from a signal to a kill.",
    long_about = None
)]
pub struct CliArgs {
    /// Signal to send on timeout (name like TERM/SIGTERM, or a number).
    ///
    /// Default: TERM, or the `[default].signal` value of the config file.
    #[arg(short = 's', long, value_name = "SIGNAL")]
    pub signal: Option<String>,

    /// Also send KILL if the command is still running this long after the
    /// first signal. `0` disables it.
    #[arg(short = 'k', long, value_name = "DURATION")]
    pub kill_after: Option<String>,

    /// Signal the command's whole process group, not just the command.
    #[arg(long)]
    pub foreground: bool,

    /// Exit with the command's own status even when it timed out.
    #[arg(long)]
    pub preserve_status: bool,

    /// TOML file with defaults for the options above.
    ///
    /// Default: `TIMEBOUND_CONFIG` if set, otherwise none.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TIMEBOUND_LOG` or `warn` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Time limit: a number with optional suffix ms, s (default), m, h or d.
    #[arg(value_name = "DURATION")]
    pub duration: String,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments.
///
/// Usage errors exit with 125 like GNU `timeout`, so they can't be mistaken
/// for the command's own status; `--help` and `--version` exit with 0.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_UNKNOWN_ERR } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}
