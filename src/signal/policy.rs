// src/signal/policy.rs

use std::str::FromStr;

use crate::errors::{Result, TimeboundError};

#[cfg(unix)]
pub use nix::sys::signal::Signal;

/// Stand-in for platforms without POSIX signals. Only the signals the
/// escalation loop can ask for exist here.
#[cfg(not(unix))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    SIGINT,
    SIGKILL,
    SIGTERM,
}

#[cfg(not(unix))]
impl Signal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Signal::SIGINT => "SIGINT",
            Signal::SIGKILL => "SIGKILL",
            Signal::SIGTERM => "SIGTERM",
        }
    }
}

#[cfg(not(unix))]
impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SIGINT" => Ok(Signal::SIGINT),
            "SIGKILL" => Ok(Signal::SIGKILL),
            "SIGTERM" => Ok(Signal::SIGTERM),
            other => Err(format!("unsupported signal {other}")),
        }
    }
}

#[cfg(not(unix))]
impl TryFrom<i32> for Signal {
    type Error = String;

    fn try_from(n: i32) -> std::result::Result<Self, Self::Error> {
        match n {
            2 => Ok(Signal::SIGINT),
            9 => Ok(Signal::SIGKILL),
            15 => Ok(Signal::SIGTERM),
            other => Err(format!("unsupported signal number {other}")),
        }
    }
}

/// Signal sent on timeout when none is configured.
#[cfg(unix)]
pub const fn default_signal() -> Signal {
    Signal::SIGTERM
}

/// Signal sent on timeout when none is configured.
#[cfg(not(unix))]
pub const fn default_signal() -> Signal {
    Signal::SIGINT
}

/// The un-ignorable signal used once the kill-after grace period expires.
pub const KILL_SIGNAL: Signal = Signal::SIGKILL;

/// Parse a signal given as `TERM`, `SIGTERM`, `term` or `15`.
pub fn parse_signal(spec: &str) -> Result<Signal> {
    let s = spec.trim();
    if s.is_empty() {
        return Err(TimeboundError::ConfigError(
            "empty signal specification".to_string(),
        ));
    }

    if let Ok(n) = s.parse::<i32>() {
        return Signal::try_from(n).map_err(|_| {
            TimeboundError::ConfigError(format!("invalid signal number '{n}'"))
        });
    }

    let upper = s.to_ascii_uppercase();
    let name = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };

    Signal::from_str(&name)
        .map_err(|_| TimeboundError::ConfigError(format!("invalid signal '{s}'")))
}
