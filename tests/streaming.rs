// tests/streaming.rs

#![cfg(unix)]

use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;

use timebound::exit::{EXIT_NOT_FOUND, EXIT_TIMED_OUT};
use timebound::{Supervisor, TimeoutSpec};
use timebound_test_utils::builders::ShellSpecBuilder;
use timebound_test_utils::{init_tracing, ms, with_timeout};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn sleeper() -> Supervisor {
    Supervisor::new(TimeoutSpec::new("sleep", ["10"], ms(100)))
}

#[tokio::test]
async fn escalation_aware_code_by_default() {
    init_tracing();

    let (out, _out_rx) = tokio::io::duplex(1024);
    let (err, _err_rx) = tokio::io::duplex(1024);
    let code = with_timeout(sleeper().run_streaming_to(false, out, err)).await;
    assert_eq!(code, EXIT_TIMED_OUT);
}

#[tokio::test]
async fn preserve_status_returns_child_code() {
    init_tracing();

    let (out, _out_rx) = tokio::io::duplex(1024);
    let (err, _err_rx) = tokio::io::duplex(1024);
    let code = with_timeout(sleeper().run_streaming_to(true, out, err)).await;
    assert_eq!(code, 128 + 15);
}

#[tokio::test]
async fn normal_exit_is_the_same_either_way() {
    init_tracing();

    let sup = Supervisor::new(ShellSpecBuilder::new("exit 7").build());
    for preserve in [false, true] {
        let (out, _out_rx) = tokio::io::duplex(1024);
        let (err, _err_rx) = tokio::io::duplex(1024);
        let code = with_timeout(sup.run_streaming_to(preserve, out, err)).await;
        assert_eq!(code, 7, "preserve_status = {preserve}");
    }
}

#[tokio::test]
async fn all_output_is_forwarded_before_returning() -> TestResult {
    init_tracing();

    let sup = Supervisor::new(
        ShellSpecBuilder::new("for i in 1 2 3; do echo line$i; done; printf tail; echo oops >&2")
            .build(),
    );

    let (out, mut out_rx) = tokio::io::duplex(64 * 1024);
    let (err, mut err_rx) = tokio::io::duplex(64 * 1024);
    let code = with_timeout(sup.run_streaming_to(false, out, err)).await;
    assert_eq!(code, 0);

    let mut stdout = String::new();
    let mut stderr = String::new();
    out_rx.read_to_string(&mut stdout).await?;
    err_rx.read_to_string(&mut stderr).await?;

    assert_eq!(stdout, "line1\nline2\nline3\ntail");
    assert_eq!(stderr, "oops\n");
    Ok(())
}

#[tokio::test]
async fn orphaned_grandchild_does_not_delay_streaming_run() -> TestResult {
    init_tracing();

    // TERM ends the shell; its `sleep` inherits and holds the pipes.
    let sup = Supervisor::new(
        ShellSpecBuilder::new("echo started; sleep 4; true")
            .duration(ms(100))
            .build(),
    );

    let (out, mut out_rx) = tokio::io::duplex(64 * 1024);
    let (err, _err_rx) = tokio::io::duplex(1024);
    let started = Instant::now();
    let code = with_timeout(sup.run_streaming_to(false, out, err)).await;
    let elapsed = started.elapsed();

    assert_eq!(code, EXIT_TIMED_OUT);
    assert!(elapsed < Duration::from_secs(2), "streaming returned late: {elapsed:?}");

    let mut stdout = String::new();
    out_rx.read_to_string(&mut stdout).await?;
    assert_eq!(stdout, "started\n");
    Ok(())
}

#[tokio::test]
async fn spawn_failure_returns_its_code() {
    init_tracing();

    let sup = Supervisor::new(TimeoutSpec::new(
        "/nonexistent/timebound-no-such-cmd",
        Vec::<String>::new(),
        ms(100),
    ));
    let (out, _out_rx) = tokio::io::duplex(1024);
    let (err, _err_rx) = tokio::io::duplex(1024);
    assert_eq!(sup.run_streaming_to(false, out, err).await, EXIT_NOT_FOUND);
}
