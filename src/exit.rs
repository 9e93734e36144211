// src/exit.rs

//! Exit status classification.
//!
//! Codes follow GNU `timeout` so scripts written against it keep working:
//!
//! | condition                               | code             |
//! |-----------------------------------------|------------------|
//! | child exited on its own                 | child's own code |
//! | timed out, child exited after signal    | 124              |
//! | internal / unclassified failure         | 125              |
//! | command found but not executable        | 126              |
//! | command not found                       | 127              |
//! | killed after the kill-after grace period| 137              |

use std::io;

pub const EXIT_NORMAL: i32 = 0;
pub const EXIT_TIMED_OUT: i32 = 124;
pub const EXIT_UNKNOWN_ERR: i32 = 125;
pub const EXIT_CANNOT_INVOKE: i32 = 126;
pub const EXIT_NOT_FOUND: i32 = 127;
pub const EXIT_KILLED: i32 = 137;

/// How far escalation got before the child exited.
///
/// Ordered so that [`Phase::escalate`] never moves a run backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Phase {
    #[default]
    Normal,
    TimedOut,
    Killed,
}

impl Phase {
    /// Move to `to` unless already further along.
    pub fn escalate(self, to: Phase) -> Phase {
        self.max(to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Normal => "normal",
            Phase::TimedOut => "timed_out",
            Phase::Killed => "killed",
        }
    }
}

/// Final result of one supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitStatus {
    /// Raw exit code of the child. `128 + signo` if a signal ended it.
    pub code: i32,
    /// Whether the child itself was terminated by a signal.
    pub signaled: bool,
    phase: Phase,
}

impl ExitStatus {
    pub fn new(code: i32, signaled: bool, phase: Phase) -> Self {
        Self {
            code,
            signaled,
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the timeout fired, whether or not a kill followed.
    pub fn is_timed_out(&self) -> bool {
        matches!(self.phase, Phase::TimedOut | Phase::Killed)
    }

    pub fn is_killed(&self) -> bool {
        self.phase == Phase::Killed
    }

    /// Exit code for command-line use, taking escalation into account.
    pub fn exit_code(&self) -> i32 {
        match self.phase {
            Phase::Killed => EXIT_KILLED,
            Phase::TimedOut => EXIT_TIMED_OUT,
            Phase::Normal => self.code,
        }
    }

    /// Exit code of the child itself, ignoring escalation.
    pub fn child_exit_code(&self) -> i32 {
        self.code
    }
}

/// Turn a platform wait result into `(code, signaled)`.
///
/// Anything that cannot be decoded, including a failed wait, yields
/// `(0, false)` so the run still reports a status.
pub fn classify_wait(result: &io::Result<std::process::ExitStatus>) -> (i32, bool) {
    let status = match result {
        Ok(status) => status,
        Err(_) => return (EXIT_NORMAL, false),
    };

    if let Some(code) = status.code() {
        return (code, false);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signo) = status.signal() {
            return (128 + signo, true);
        }
    }

    (EXIT_NORMAL, false)
}

/// Conventional exit code for a failure to start the command.
pub fn resolve_spawn_error(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => EXIT_NOT_FOUND,
        io::ErrorKind::PermissionDenied => EXIT_CANNOT_INVOKE,
        _ if is_exec_format_error(err) => EXIT_CANNOT_INVOKE,
        _ => EXIT_UNKNOWN_ERR,
    }
}

#[cfg(unix)]
fn is_exec_format_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(nix::errno::Errno::ENOEXEC as i32)
}

#[cfg(not(unix))]
fn is_exec_format_error(_err: &io::Error) -> bool {
    false
}
