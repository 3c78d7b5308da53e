//! Deadline-accuracy and orphan tests for bounded execution.
//!
//! These validate the two observable guarantees: a bounded `sleep 5` with a
//! one-second limit returns in roughly one to two seconds (not five), and
//! no child from the call is left running afterwards.

#![cfg(unix)]

use std::process::Command;
use std::time::{Duration, Instant};

use coreshim_timeout::{run_bounded, run_bounded_default, BoundedConfig, BoundedOutcome};

/// Count live processes whose command line matches a pattern.
fn count_processes_matching(pattern: &str) -> usize {
    let output = Command::new("pgrep")
        .arg("-f")
        .arg(pattern)
        .output()
        .expect("failed to run pgrep");

    if output.status.success() {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .count()
    } else {
        0
    }
}

#[test]
fn one_second_limit_bounds_a_five_second_sleep() {
    let start = Instant::now();
    let outcome = run_bounded_default(None, Duration::from_secs(1), "sleep", &["5"]).unwrap();
    let elapsed = start.elapsed();

    assert!(outcome.timed_out());
    assert!(
        elapsed >= Duration::from_millis(900) && elapsed < Duration::from_millis(2500),
        "expected ~1-2s, took {elapsed:?}"
    );
}

#[test]
fn no_child_survives_a_timeout() {
    // An argument unusual enough that pgrep -f only matches our child.
    let marker = "5.0731";
    let outcome = run_bounded(
        None,
        Duration::from_millis(200),
        "sleep",
        &[marker],
        &BoundedConfig {
            grace: Duration::from_millis(200),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(outcome.timed_out());

    // Give the kernel a beat to reap.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(
        count_processes_matching(&format!("sleep {marker}")),
        0,
        "bounded child escaped the deadline"
    );
}

#[test]
fn native_timeout_binary_is_honored_when_present() {
    let Ok(native) = which::which("timeout") else {
        // Host has no timeout binary; the emulation tests cover it.
        return;
    };

    let outcome = run_bounded_default(
        Some(native.as_path()),
        Duration::from_secs(5),
        "echo",
        &["ok"],
    )
    .unwrap();
    assert_eq!(outcome, BoundedOutcome::Completed { exit_code: 0 });

    let start = Instant::now();
    let outcome = run_bounded_default(
        Some(native.as_path()),
        Duration::from_secs(1),
        "sleep",
        &["5"],
    )
    .unwrap();
    assert!(outcome.timed_out());
    assert_eq!(outcome.exit_code(), 124);
    assert!(start.elapsed() < Duration::from_millis(2500));
}

#[test]
fn completion_cancels_the_deadline() {
    // The fast path must not wait out the limit.
    let start = Instant::now();
    let outcome = run_bounded_default(None, Duration::from_secs(30), "true", &[]).unwrap();
    assert_eq!(outcome, BoundedOutcome::Completed { exit_code: 0 });
    assert!(start.elapsed() < Duration::from_secs(5));
}
