// src/exec/facade.rs

//! Convenience entry points built on [`Supervisor::spawn`].
//!
//! Output is pumped by one task per stream. Once the exit status is in, the
//! pumps get [`OUTPUT_DRAIN_GRACE`] to reach end of file; a descendant that
//! outlived the child can hold the pipes open, so after the grace period the
//! pumps are told to stop and whatever they already read is kept.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, warn};

use crate::errors::Result;
use crate::exec::supervisor::Supervisor;
use crate::exit::ExitStatus;

/// How long output may keep flowing after the child has exited.
pub const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(250);

const CHUNK_SIZE: usize = 8 * 1024;

/// Result of [`Supervisor::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Supervisor {
    /// Run the command with stdout/stderr captured in memory.
    ///
    /// Output is decoded lossily as UTF-8. A spawn failure is returned as an
    /// error before anything is captured.
    pub async fn run(&self) -> Result<CapturedRun> {
        let mut handle = self.spawn(Stdio::piped(), Stdio::piped())?;

        let stdout = Pump::start("stdout", handle.take_stdout(), Vec::new());
        let stderr = Pump::start("stderr", handle.take_stderr(), Vec::new());

        let status = handle.wait().await?;

        let drain_until = Instant::now() + OUTPUT_DRAIN_GRACE;
        let stdout = stdout.finish(drain_until).await.unwrap_or_default();
        let stderr = stderr.finish(drain_until).await.unwrap_or_default();

        Ok(CapturedRun {
            status,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    /// Run the command forwarding its output to this process's stdout and
    /// stderr as it is produced, and return the exit code to report.
    ///
    /// With `preserve_status` the child's own code is returned even if the
    /// run timed out or was killed.
    pub async fn run_streaming(&self, preserve_status: bool) -> i32 {
        self.run_streaming_to(preserve_status, tokio::io::stdout(), tokio::io::stderr())
            .await
    }

    /// [`Supervisor::run_streaming`] with caller-supplied sinks.
    ///
    /// Both forwarders are drained before returning, bounded by
    /// [`OUTPUT_DRAIN_GRACE`] once the child has exited.
    pub async fn run_streaming_to<O, E>(&self, preserve_status: bool, out: O, err: E) -> i32
    where
        O: AsyncWrite + Unpin + Send + 'static,
        E: AsyncWrite + Unpin + Send + 'static,
    {
        let mut handle = match self.spawn(Stdio::piped(), Stdio::piped()) {
            Ok(handle) => handle,
            Err(e) => {
                error!(
                    cmd = %self.spec().display_command(),
                    error = %e,
                    "failed to start command"
                );
                return e.exit_code();
            }
        };

        let stdout = Pump::start("stdout", handle.take_stdout(), out);
        let stderr = Pump::start("stderr", handle.take_stderr(), err);

        let status = match handle.wait().await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "no exit status from supervisor");
                return e.exit_code();
            }
        };

        let drain_until = Instant::now() + OUTPUT_DRAIN_GRACE;
        stdout.finish(drain_until).await;
        stderr.finish(drain_until).await;

        if preserve_status {
            status.child_exit_code()
        } else {
            status.exit_code()
        }
    }
}

/// Copies one child stream into a sink until EOF or until told to stop.
struct Pump<W> {
    stream: &'static str,
    stop: oneshot::Sender<()>,
    task: JoinHandle<(W, io::Result<u64>)>,
}

impl<W> Pump<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn start<R>(stream: &'static str, reader: Option<R>, sink: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (stop, stop_rx) = oneshot::channel();
        let task = tokio::spawn(pump(stream, reader, sink, stop_rx));
        Self { stream, stop, task }
    }

    /// Wait for the pump to reach EOF, or stop it at `drain_until`.
    ///
    /// Returns the sink with everything copied so far, or `None` if the pump
    /// task panicked.
    async fn finish(mut self, drain_until: Instant) -> Option<W> {
        let drained = timeout_at(drain_until, &mut self.task).await;
        let joined = match drained {
            Ok(joined) => joined,
            Err(_) => {
                debug!(
                    stream = self.stream,
                    "output still open after child exit; a descendant holds the pipe"
                );
                // Err means the pump already finished on its own.
                let _ = self.stop.send(());
                self.task.await
            }
        };

        match joined {
            Ok((sink, Ok(_))) => Some(sink),
            Ok((sink, Err(e))) => {
                warn!(stream = self.stream, error = %e, "output forwarding failed");
                Some(sink)
            }
            Err(e) => {
                warn!(stream = self.stream, error = %e, "output task panicked");
                None
            }
        }
    }
}

async fn pump<R, W>(
    stream: &'static str,
    reader: Option<R>,
    mut sink: W,
    mut stop: oneshot::Receiver<()>,
) -> (W, io::Result<u64>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut reader) = reader else {
        return (sink, Ok(0));
    };

    let mut copied = 0u64;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let result: io::Result<()> = async {
        loop {
            // `read` is cancel safe: a stop never loses bytes already read.
            let n = tokio::select! {
                _ = &mut stop => break,
                n = reader.read(&mut chunk) => n?,
            };
            if n == 0 {
                break;
            }
            sink.write_all(&chunk[..n]).await?;
            copied += n as u64;
        }
        sink.flush().await
    }
    .await;

    debug!(stream, bytes = copied, "output stream closed");
    (sink, result.map(|()| copied))
}
