// src/config/model.rs

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;

use crate::signal::{default_signal, Signal};

/// Everything needed to supervise one command.
///
/// Built by the caller and only read by the supervisor.
///
/// ```
/// use std::time::Duration;
/// use timebound::config::TimeoutSpec;
///
/// let spec = TimeoutSpec::new("sleep", ["10"], Duration::from_secs(1))
///     .with_kill_after(Duration::from_secs(2))
///     .foreground(true);
/// assert!(spec.kill_after_enabled());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutSpec {
    pub program: String,
    pub args: Vec<String>,

    /// Time budget before the first signal.
    pub duration: Duration,

    /// Extra grace period before SIGKILL. Zero disables the forced kill.
    pub kill_after: Duration,

    /// Signal sent on timeout. `None` means [`default_signal`].
    pub signal: Option<Signal>,

    /// Signal the child's whole process group rather than the child alone.
    ///
    /// The child then leads a new process group, which is never the
    /// terminal's foreground group. A child that reads from the tty is
    /// stopped by SIGTTIN; give it `null_stdin` or run it without this flag.
    pub foreground: bool,

    /// Working directory for the child. `None` inherits ours.
    pub current_dir: Option<PathBuf>,

    /// Extra environment variables, applied on top of the inherited
    /// environment.
    pub env: Vec<(String, String)>,

    /// Give the child `/dev/null` as stdin instead of ours.
    pub null_stdin: bool,
}

impl TimeoutSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I, duration: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            duration,
            kill_after: Duration::ZERO,
            signal: None,
            foreground: false,
            current_dir: None,
            env: Vec::new(),
            null_stdin: false,
        }
    }

    pub fn with_kill_after(mut self, kill_after: Duration) -> Self {
        self.kill_after = kill_after;
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn foreground(mut self, foreground: bool) -> Self {
        self.foreground = foreground;
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_null_stdin(mut self) -> Self {
        self.null_stdin = true;
        self
    }

    /// Signal to send on timeout.
    pub fn signal(&self) -> Signal {
        self.signal.unwrap_or(default_signal())
    }

    pub fn kill_after_enabled(&self) -> bool {
        !self.kill_after.is_zero()
    }

    /// Build the command to spawn. Stdio is left to the caller.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        if self.null_stdin {
            cmd.stdin(Stdio::null());
        }

        #[cfg(unix)]
        {
            if self.foreground {
                // Lead a fresh group so group delivery reaches the child's
                // subtree and never this process.
                cmd.process_group(0);
            }
        }

        cmd
    }

    /// Human-readable command line for logs.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Defaults file as read from TOML, before validation.
///
/// ```toml
/// [default]
/// kill_after = "5s"
/// signal = "TERM"
/// foreground = false
/// preserve_status = false
/// ```
///
/// Every key is optional; flags given on the command line win.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub default: RawDefaultSection,
}

/// `[default]` section, values still as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDefaultSection {
    pub kill_after: Option<String>,
    pub signal: Option<String>,
    pub foreground: Option<bool>,
    pub preserve_status: Option<bool>,
}

/// Validated defaults file.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`)
/// or `Default`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub default: DefaultSection,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultSection {
    pub kill_after: Option<Duration>,
    pub signal: Option<Signal>,
    pub foreground: Option<bool>,
    pub preserve_status: Option<bool>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(default: DefaultSection) -> Self {
        Self { default }
    }
}
