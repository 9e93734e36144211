// src/exec/escalation.rs

//! The escalation state machine.
//!
//! ```text
//! Running ──exit──────────────────────────────▶ Finished(Normal)
//!    │
//!    └─timeout─▶ TimedOut ──exit──────────────▶ Finished(TimedOut)
//!                   │
//!                   └─kill-after─▶ Killed ─exit─▶ Finished(Killed)
//! ```
//!
//! Both timers are scheduled once, from the same origin, when the loop is
//! built. Only the exit event ends the loop.

use std::future::pending;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{sleep_until, Instant, Sleep};
use tracing::{debug, info, warn};

use crate::config::TimeoutSpec;
use crate::exec::waiter::{WaitResult, Waiter};
use crate::exit::{classify_wait, ExitStatus, Phase};
use crate::signal::policy::KILL_SIGNAL;
use crate::signal::{Signal, SignalTarget};

/// What the loop needs to know, fixed at spawn time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EscalationPlan {
    pub target: SignalTarget,
    pub signal: Signal,
    pub timeout_at: Instant,
    /// `None` when kill-after is disabled.
    pub kill_at: Option<Instant>,
}

impl EscalationPlan {
    pub fn new(started: Instant, spec: &TimeoutSpec, target: SignalTarget) -> Self {
        let timeout_at = deadline(started, spec.duration);
        let kill_at = spec
            .kill_after_enabled()
            .then(|| deadline(timeout_at, spec.kill_after));

        Self {
            target,
            signal: spec.signal(),
            timeout_at,
            kill_at,
        }
    }
}

/// One thing the loop can react to.
#[derive(Debug)]
enum EscalationEvent {
    Exited(WaitResult),
    TimedOut,
    KillAfter,
}

type Timer = Option<Pin<Box<Sleep>>>;

/// Drive the child to completion and report exactly one status.
pub(crate) async fn run_escalation(plan: EscalationPlan, waiter: Waiter) -> ExitStatus {
    let Waiter { mut exited, kill } = waiter;
    let mut kill_handle = Some(kill);
    let pid = plan.target.pid();

    let mut phase = Phase::Normal;
    let mut timeout: Timer = Some(Box::pin(sleep_until(plan.timeout_at)));
    let mut kill_after: Timer = plan.kill_at.map(|at| Box::pin(sleep_until(at)));

    loop {
        let event = tokio::select! {
            res = &mut exited => EscalationEvent::Exited(res.unwrap_or_else(|_| {
                Err(io::Error::other("child waiter dropped without a result"))
            })),
            () = fire(&mut timeout), if timeout.is_some() => EscalationEvent::TimedOut,
            () = fire(&mut kill_after), if kill_after.is_some() => EscalationEvent::KillAfter,
        };

        match event {
            EscalationEvent::Exited(result) => {
                if let Err(e) = &result {
                    warn!(?pid, error = %e, "could not decode child exit; reporting code 0");
                }
                let (code, signaled) = classify_wait(&result);
                let status = ExitStatus::new(code, signaled, phase);
                info!(
                    ?pid,
                    phase = phase.as_str(),
                    child_exit_code = code,
                    signaled,
                    exit_code = status.exit_code(),
                    "child exited"
                );
                return status;
            }

            EscalationEvent::TimedOut => {
                timeout = None;
                phase = phase.escalate(Phase::TimedOut);
                info!(
                    ?pid,
                    signal = plan.signal.as_str(),
                    group = plan.target.is_group(),
                    "timed out; signalling child"
                );
                deliver(plan.target, plan.signal);
            }

            EscalationEvent::KillAfter => {
                // Only the exit event matters from here on.
                timeout = None;
                kill_after = None;
                phase = phase.escalate(Phase::Killed);
                info!(
                    ?pid,
                    group = plan.target.is_group(),
                    "kill-after expired; killing child"
                );
                deliver(plan.target, KILL_SIGNAL);
                // The signal above may not have reached the child; kill it
                // through its handle as well.
                request_direct_kill(&mut kill_handle);
            }
        }
    }
}

/// Resolves when the timer fires; never resolves for a spent timer.
async fn fire(timer: &mut Timer) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}

fn deliver(target: SignalTarget, signal: Signal) {
    match target.deliver(signal) {
        Ok(()) => debug!(pid = ?target.pid(), signal = signal.as_str(), "signal delivered"),
        Err(e) => warn!(
            pid = ?target.pid(),
            signal = signal.as_str(),
            error = %e,
            "signal delivery failed; continuing"
        ),
    }
}

fn request_direct_kill(kill_handle: &mut Option<oneshot::Sender<()>>) {
    if let Some(tx) = kill_handle.take() {
        if tx.send(()).is_err() {
            debug!("child waiter already finished; direct kill skipped");
        }
    }
}

/// `start + after`, saturating far in the future instead of overflowing.
fn deadline(start: Instant, after: Duration) -> Instant {
    start
        .checked_add(after)
        .unwrap_or_else(|| start + Duration::from_secs(86_400 * 365 * 30))
}
