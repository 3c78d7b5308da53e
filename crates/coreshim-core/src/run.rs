//! Synchronous capture-mode process runner.
//!
//! Every abstracted operation funnels its child-process calls through this
//! module so that spawn failures, nonzero exits, and signal deaths are
//! mapped to the canonical error type in exactly one place.
//!
//! The runner keeps a command's printed output distinct from its status:
//! [`run_capture`] returns the output alongside the exit code and leaves
//! success interpretation to the caller, while [`run_checked`] converts any
//! nonzero exit into [`CoreshimError::Execution`]. Callers must not treat
//! empty stdout as failure; several wrapped utilities legitimately print
//! nothing.

use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};

use tracing::trace;

use crate::error::{CoreshimError, CoreshimResult};

/// Captured output of a finished child process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Raw stdout, lossily decoded.
    pub stdout: String,
    /// Raw stderr, lossily decoded.
    pub stderr: String,
    /// Exit code; `128 + signal` for signal deaths on Unix.
    pub code: i32,
}

impl CommandOutput {
    /// Whether the child exited zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Stdout with surrounding whitespace removed.
    ///
    /// Most wrapped utilities terminate their single-value answers with a
    /// newline; this is the accessor operations use for scalar results.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Stderr with surrounding whitespace removed.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Map an exit status to a single integer code.
///
/// Signal deaths become `128 + signal` so the value survives round trips
/// through shell-style exit codes.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return crate::exit_codes::SIGNAL_BASE + signal;
        }
    }

    // No code and no signal: treat as a generic failure.
    crate::exit_codes::FAILURE
}

fn display_name(program: &OsStr) -> String {
    program.to_string_lossy().into_owned()
}

/// Run a command, capturing stdout and stderr.
///
/// Returns `Ok` even when the child exits nonzero; only a failure to spawn
/// is an error. Use [`run_checked`] when nonzero should be fatal.
pub fn run_capture<P, S>(program: P, args: &[S]) -> CoreshimResult<CommandOutput>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| CoreshimError::spawn(display_name(program), e))?;

    let result = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: status_code(output.status),
    };

    trace!(
        command = %display_name(program),
        code = result.code,
        "captured command finished"
    );

    Ok(result)
}

/// Run a command, capturing output, and fail on nonzero exit.
pub fn run_checked<P, S>(program: P, args: &[S]) -> CoreshimResult<CommandOutput>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let name = display_name(program.as_ref());
    let output = run_capture(program, args)?;
    if !output.success() {
        return Err(CoreshimError::execution(
            name,
            output.code,
            output.stderr_trimmed().to_string(),
        ));
    }
    Ok(output)
}

/// Run a command with inherited stdio and return its exit code.
///
/// Used where the wrapped tool's streams belong to the caller (bounded
/// execution of arbitrary commands).
pub fn run_status<P, S>(program: P, args: &[S]) -> CoreshimResult<i32>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| CoreshimError::spawn(display_name(program), e))?;
    Ok(status_code(status))
}
