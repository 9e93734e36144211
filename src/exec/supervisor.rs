// src/exec/supervisor.rs

use std::process::Stdio;

use tokio::process::{ChildStderr, ChildStdout};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::TimeoutSpec;
use crate::errors::{Result, TimeboundError};
use crate::exec::escalation::{run_escalation, EscalationPlan};
use crate::exec::waiter::spawn_waiter;
use crate::exit::{resolve_spawn_error, ExitStatus};
use crate::signal::SignalTarget;

/// Runs one command under a [`TimeoutSpec`].
#[derive(Debug, Clone)]
pub struct Supervisor {
    spec: TimeoutSpec,
}

impl Supervisor {
    pub fn new(spec: TimeoutSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &TimeoutSpec {
        &self.spec
    }

    /// Start the command and its escalation loop.
    ///
    /// Must be called from within a Tokio runtime. On failure nothing is left
    /// running and the error carries the exit code to report.
    pub fn spawn(&self, stdout: Stdio, stderr: Stdio) -> Result<RunHandle> {
        let mut cmd = self.spec.command();
        cmd.stdout(stdout).stderr(stderr);

        let mut child = cmd.spawn().map_err(|source| TimeboundError::Spawn {
            exit_code: resolve_spawn_error(&source),
            source,
        })?;
        let started = Instant::now();

        let pid = child.id();
        let target = SignalTarget::resolve(pid, self.spec.foreground);
        let plan = EscalationPlan::new(started, &self.spec, target);

        info!(
            ?pid,
            cmd = %self.spec.display_command(),
            duration = ?self.spec.duration,
            kill_after = ?self.spec.kill_after,
            signal = plan.signal.as_str(),
            foreground = self.spec.foreground,
            "started supervised process"
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let waiter = spawn_waiter(child);

        let (status_tx, status_rx) = oneshot::channel::<ExitStatus>();
        tokio::spawn(async move {
            let status = run_escalation(plan, waiter).await;
            if status_tx.send(status).is_err() {
                debug!(?pid, "run handle dropped before exit status was read");
            }
        });

        Ok(RunHandle {
            pid,
            stdout,
            stderr,
            status: status_rx,
        })
    }
}

/// Single-use handle to a running command.
///
/// Exactly one [`ExitStatus`] is delivered through [`RunHandle::wait`].
/// Dropping the handle does not stop the child or its escalation.
#[derive(Debug)]
pub struct RunHandle {
    pid: Option<u32>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    status: oneshot::Receiver<ExitStatus>,
}

impl RunHandle {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// The child's stdout, if it was spawned with `Stdio::piped()`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    /// The child's stderr, if it was spawned with `Stdio::piped()`.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    /// Wait for the child to exit and return its status.
    pub async fn wait(self) -> Result<ExitStatus> {
        self.status.await.map_err(|_| TimeboundError::SupervisorLost)
    }
}
