//! Unix emulation of bounded execution.
//!
//! The child runs as the leader of a fresh process group (`setpgid(0, 0)`
//! via `pre_exec`), so deadline signals reach its whole subtree through
//! `killpg()`. The deadline loop drives the [`DeadlineState`] machine:
//! SIGTERM at expiry, a grace window, SIGKILL escalation only if the group
//! leader is still alive when the window closes.

use std::os::unix::process::CommandExt;
use std::process::Command;
use std::time::{Duration, Instant};

use libc::{killpg, SIGKILL};
use tracing::debug;

use coreshim_core::run::status_code;
use coreshim_core::{CoreshimError, CoreshimResult};

use crate::{BoundedConfig, BoundedOutcome, DeadlineState};

/// Polling interval for checking if the child has exited.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn run_bounded_impl(
    limit: Duration,
    command: &str,
    args: &[&str],
    config: &BoundedConfig,
) -> CoreshimResult<BoundedOutcome> {
    let mut cmd = Command::new(command);
    cmd.args(args);

    // SAFETY: setpgid(0, 0) creates a new process group with the child's
    // PID as the PGID. Standard job-control practice.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setpgid(0, 0) != 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| CoreshimError::spawn(command, e))?;

    // Child is the group leader, so pid == pgid.
    let pgid = child.id() as i32;
    let start = Instant::now();
    let mut state = DeadlineState::Running;
    let mut grace_deadline = None::<Instant>;
    let mut escalated = false;

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if state == DeadlineState::Running {
                    return Ok(BoundedOutcome::Completed {
                        exit_code: status_code(status),
                    });
                }
                // Exited after the deadline signal; the zombie is reaped
                // and the outcome records whether escalation was needed.
                debug!(?state, escalated, "child exited after deadline signal");
                return Ok(BoundedOutcome::TimedOut {
                    signal_sent: config.signal,
                    escalated,
                });
            }
            Ok(None) => {
                let now = Instant::now();
                match state {
                    DeadlineState::Running if now.duration_since(start) >= limit => {
                        // SAFETY: killpg with the child's own pgid.
                        unsafe {
                            killpg(pgid, config.signal);
                        }
                        state = DeadlineState::SoftKilled;
                        grace_deadline = Some(now + config.grace);
                    }
                    DeadlineState::SoftKilled
                        if grace_deadline.is_some_and(|deadline| now >= deadline) =>
                    {
                        // Still alive after the grace window: escalate.
                        // SAFETY: as above; ESRCH on an already-dead group
                        // is harmless.
                        unsafe {
                            killpg(pgid, SIGKILL);
                        }
                        state = DeadlineState::HardKilled;
                        escalated = true;
                    }
                    _ => {}
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(CoreshimError::internal(format!(
                    "wait on bounded child failed: {e}"
                )));
            }
        }
    }
}
