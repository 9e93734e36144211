use std::time::Duration;

use timebound::signal::Signal;
use timebound::TimeoutSpec;

/// Builder for `TimeoutSpec`s that run a `sh -c` script.
///
/// Defaults: 5s duration, no kill-after, default signal, not foreground.
pub struct ShellSpecBuilder {
    spec: TimeoutSpec,
}

impl ShellSpecBuilder {
    pub fn new(script: &str) -> Self {
        Self {
            spec: TimeoutSpec::new("sh", ["-c", script], Duration::from_secs(5)),
        }
    }

    /// A script that ignores SIGTERM and SIGINT, then runs `rest`.
    pub fn stubborn(rest: &str) -> Self {
        Self::new(&format!("trap '' TERM INT; {rest}"))
    }

    pub fn duration(mut self, d: Duration) -> Self {
        self.spec.duration = d;
        self
    }

    pub fn kill_after(mut self, d: Duration) -> Self {
        self.spec.kill_after = d;
        self
    }

    pub fn signal(mut self, signal: Signal) -> Self {
        self.spec.signal = Some(signal);
        self
    }

    pub fn foreground(mut self, val: bool) -> Self {
        self.spec.foreground = val;
        self
    }

    pub fn build(self) -> TimeoutSpec {
        self.spec
    }
}
