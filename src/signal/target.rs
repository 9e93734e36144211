// src/signal/target.rs

use std::io;

use super::policy::Signal;

#[cfg(unix)]
use tracing::warn;

/// Who receives signals sent by the escalation loop.
///
/// Resolved once at spawn time from the `foreground` flag. A child spawned
/// in foreground mode leads its own process group (pgid == pid), so
/// `Group` reaches it and every descendant that did not move elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTarget {
    Group(u32),
    Process(u32),
    /// No usable pid; every delivery is a no-op error.
    Detached,
}

impl SignalTarget {
    pub fn resolve(pid: Option<u32>, foreground: bool) -> Self {
        match pid {
            // pid 0 would address our own process group.
            None | Some(0) => SignalTarget::Detached,
            Some(pid) if foreground => SignalTarget::Group(pid),
            Some(pid) => SignalTarget::Process(pid),
        }
    }

    pub fn pid(&self) -> Option<u32> {
        match self {
            SignalTarget::Group(pid) | SignalTarget::Process(pid) => Some(*pid),
            SignalTarget::Detached => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, SignalTarget::Group(_))
    }

    /// Send `signal` to the target.
    ///
    /// Group delivery of anything other than KILL or CONT is followed by a
    /// CONT to the group, so stopped members get to act on the signal. A
    /// failed CONT is logged; the result only reflects the signal itself.
    #[cfg(unix)]
    pub fn deliver(&self, signal: Signal) -> io::Result<()> {
        use nix::sys::signal::{kill, killpg};
        use nix::unistd::Pid;

        let (raw, group) = match *self {
            SignalTarget::Group(pid) => (pid, true),
            SignalTarget::Process(pid) => (pid, false),
            SignalTarget::Detached => return Err(detached()),
        };
        let pid = i32::try_from(raw)
            .map(Pid::from_raw)
            .map_err(|_| io::Error::other(format!("pid {raw} out of range")))?;

        if group {
            killpg(pid, signal)?;
            if signal != Signal::SIGKILL && signal != Signal::SIGCONT {
                if let Err(e) = killpg(pid, Signal::SIGCONT) {
                    warn!(pgid = raw, error = %e, "could not continue stopped group members");
                }
            }
        } else {
            kill(pid, signal)?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn deliver(&self, signal: Signal) -> io::Result<()> {
        if self.pid().is_none() {
            return Err(detached());
        }
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot deliver {} on this platform", signal.as_str()),
        ))
    }
}

fn detached() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "child has no pid to signal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreground_resolves_to_group() {
        assert_eq!(SignalTarget::resolve(Some(42), true), SignalTarget::Group(42));
        assert_eq!(
            SignalTarget::resolve(Some(42), false),
            SignalTarget::Process(42)
        );
    }

    #[test]
    fn missing_or_zero_pid_is_detached() {
        assert_eq!(SignalTarget::resolve(None, true), SignalTarget::Detached);
        assert_eq!(SignalTarget::resolve(Some(0), true), SignalTarget::Detached);
        assert!(SignalTarget::Detached.deliver(Signal::SIGTERM).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn delivers_to_a_live_process() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("10")
            .spawn()
            .expect("spawn sleep");

        let target = SignalTarget::resolve(child.id(), false);
        target.deliver(Signal::SIGTERM).expect("deliver SIGTERM");

        let status = child.wait().await.expect("wait");
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(status.signal(), Some(Signal::SIGTERM as i32));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn group_delivery_wakes_a_stopped_leader() {
        use std::os::unix::process::{CommandExt, ExitStatusExt};

        // The shell stops itself; TERM stays pending until the group gets a CONT.
        let mut cmd = std::process::Command::new("sh");
        cmd.args(["-c", "kill -STOP $$; exit 0"]).process_group(0);
        let mut child = tokio::process::Command::from(cmd)
            .spawn()
            .expect("spawn sh");
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let target = SignalTarget::resolve(child.id(), true);
        assert!(target.is_group());
        target.deliver(Signal::SIGTERM).expect("deliver to group");

        let status = tokio::time::timeout(std::time::Duration::from_secs(5), child.wait())
            .await
            .expect("stopped leader was not continued")
            .expect("wait");
        assert_eq!(status.signal(), Some(Signal::SIGTERM as i32));
    }
}
