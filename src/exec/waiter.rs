// src/exec/waiter.rs

//! The task that owns the child process handle.
//!
//! Only this task ever calls `wait()` on the child. The escalation loop
//! talks to it through two oneshots: one carrying the wait result out, one
//! carrying a direct-kill request in.

use std::io;

use tokio::process::Child;
use tokio::sync::oneshot;
use tracing::debug;

pub(crate) type WaitResult = io::Result<std::process::ExitStatus>;

pub(crate) struct Waiter {
    /// Fires once with the child's wait result.
    pub exited: oneshot::Receiver<WaitResult>,
    /// Send `()` to kill the child through its handle.
    pub kill: oneshot::Sender<()>,
}

pub(crate) fn spawn_waiter(mut child: Child) -> Waiter {
    let (exit_tx, exit_rx) = oneshot::channel::<WaitResult>();
    let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
    let pid = child.id();

    tokio::spawn(async move {
        let mut kill_armed = true;

        let result = loop {
            tokio::select! {
                res = child.wait() => break res,

                req = &mut kill_rx, if kill_armed => {
                    kill_armed = false;
                    if req.is_err() {
                        // Escalation loop gone; keep waiting anyway.
                        continue;
                    }
                    match child.start_kill() {
                        Ok(()) => debug!(?pid, "direct kill sent to child handle"),
                        Err(e) => debug!(?pid, error = %e, "direct kill failed; child likely gone"),
                    }
                }
            }
        };

        debug!(?pid, ok = result.is_ok(), "child wait completed");
        let _ = exit_tx.send(result);
    });

    Waiter {
        exited: exit_rx,
        kill: kill_tx,
    }
}
