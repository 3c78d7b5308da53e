//! coreshim-timeout: Bounded-time execution with signal escalation.
//!
//! This crate provides:
//! - Execution through a native `timeout`/`gtimeout` binary when the host
//!   resolved one ([`run_bounded`] with a native path)
//! - A Unix emulation for hosts without one: the child runs in its own
//!   process group, a deadline loop sends SIGTERM at expiry, waits a grace
//!   period, and escalates to SIGKILL
//!
//! # Deadline State Machine
//!
//! The emulation is an explicit state machine rather than a detached
//! watchdog process:
//!
//! ```text
//! Running ──deadline──▶ SoftKilled ──grace expired──▶ HardKilled
//!    │                      │
//!    └──────▶ Completed ◀───┘
//! ```
//!
//! Because the deadline loop and the wait share one thread, the "watchdog"
//! is cancelled structurally when the target finishes first; no sleeper can
//! outlive the call.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use coreshim_timeout::{run_bounded, BoundedConfig, BoundedOutcome};
//!
//! let outcome = run_bounded(
//!     None, // no native timeout binary; emulate
//!     Duration::from_secs(5),
//!     "sleep",
//!     &["60"],
//!     &BoundedConfig::default(),
//! ).unwrap();
//!
//! match outcome {
//!     BoundedOutcome::Completed { exit_code } => println!("exit {exit_code}"),
//!     BoundedOutcome::TimedOut { escalated, .. } => println!("killed, escalated: {escalated}"),
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use coreshim_core::{exit_codes, run_status, CoreshimResult};

#[cfg(unix)]
mod unix;

/// Configuration for bounded execution.
#[derive(Debug, Clone)]
pub struct BoundedConfig {
    /// Initial signal to send on timeout. Default: SIGTERM.
    pub signal: i32,

    /// Grace period before escalating to SIGKILL. Default: 1 second.
    pub grace: Duration,
}

#[cfg(unix)]
impl Default for BoundedConfig {
    fn default() -> Self {
        Self {
            signal: libc::SIGTERM,
            grace: Duration::from_secs(1),
        }
    }
}

#[cfg(not(unix))]
impl Default for BoundedConfig {
    fn default() -> Self {
        Self {
            signal: 15,
            grace: Duration::from_secs(1),
        }
    }
}

/// Phase of a bounded execution, used by the emulation's deadline loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineState {
    /// Child is running, deadline not yet reached.
    Running,
    /// Deadline reached; initial signal sent, grace window open.
    SoftKilled,
    /// Grace expired; SIGKILL sent.
    HardKilled,
    /// Child exited.
    Completed,
}

/// Outcome of bounded execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BoundedOutcome {
    /// Command finished within the deadline.
    Completed {
        /// Child exit code (`128 + signal` for signal deaths).
        exit_code: i32,
    },

    /// Command exceeded the deadline and was killed.
    TimedOut {
        /// Signal sent at the deadline.
        signal_sent: i32,
        /// Whether escalation to SIGKILL was necessary.
        escalated: bool,
    },
}

impl BoundedOutcome {
    /// Whether the deadline expired.
    pub fn timed_out(&self) -> bool {
        matches!(self, BoundedOutcome::TimedOut { .. })
    }

    /// Shell-style exit code for this outcome.
    ///
    /// Timeouts map to 124 on both the native and emulated paths, matching
    /// GNU `timeout` so scripted callers see one convention.
    pub fn exit_code(&self) -> i32 {
        match self {
            BoundedOutcome::Completed { exit_code } => *exit_code,
            BoundedOutcome::TimedOut { .. } => exit_codes::TIMEOUT,
        }
    }
}

/// Run a command under a hard deadline.
///
/// When `native` carries a resolved `timeout`/`gtimeout` path, the command
/// runs under it with inherited stdio and the binary's own 124 convention
/// is translated back into [`BoundedOutcome::TimedOut`]. Otherwise the Unix
/// emulation takes over; on non-Unix targets without a native binary the
/// call fails with `Unsupported`.
///
/// # Errors
///
/// * `Spawn` - the command (or the timeout binary) could not be launched
/// * `Unsupported` - no native binary and no emulation on this target
pub fn run_bounded(
    native: Option<&Path>,
    limit: Duration,
    command: &str,
    args: &[&str],
    config: &BoundedConfig,
) -> CoreshimResult<BoundedOutcome> {
    if let Some(timeout_bin) = native {
        return run_native(timeout_bin, limit, command, args);
    }

    #[cfg(unix)]
    return unix::run_bounded_impl(limit, command, args, config);

    #[cfg(not(unix))]
    {
        let _ = config;
        Err(coreshim_core::CoreshimError::unsupported(
            "timeout emulation",
            std::env::consts::OS,
        ))
    }
}

/// Run a command with default bounded-execution configuration.
///
/// Equivalent to `run_bounded(native, limit, command, args,
/// &BoundedConfig::default())`: SIGTERM at the deadline, 1 second grace.
pub fn run_bounded_default(
    native: Option<&Path>,
    limit: Duration,
    command: &str,
    args: &[&str],
) -> CoreshimResult<BoundedOutcome> {
    run_bounded(native, limit, command, args, &BoundedConfig::default())
}

fn run_native(
    timeout_bin: &Path,
    limit: Duration,
    command: &str,
    args: &[&str],
) -> CoreshimResult<BoundedOutcome> {
    // GNU and BSD timeout both accept fractional seconds.
    let seconds = format!("{}", limit.as_secs_f64());
    let mut full_args: Vec<&str> = vec![seconds.as_str(), command];
    full_args.extend_from_slice(args);

    debug!(
        timeout_bin = %timeout_bin.display(),
        seconds = %seconds,
        command = command,
        "running under native timeout"
    );

    let code = run_status(timeout_bin, &full_args)?;
    if code == exit_codes::TIMEOUT {
        #[cfg(unix)]
        let signal_sent = libc::SIGTERM;
        #[cfg(not(unix))]
        let signal_sent = 15;
        return Ok(BoundedOutcome::TimedOut {
            signal_sent,
            escalated: false,
        });
    }
    Ok(BoundedOutcome::Completed { exit_code: code })
}
