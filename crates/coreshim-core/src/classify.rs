//! Flag-dialect classification for resolved binaries.
//!
//! A binary's name is not a reliable dialect signal: a BSD host can carry
//! GNU tools under unprefixed names, and `gstat` on macOS is GNU while
//! `stat` beside it is not. The real signal is the installed tool itself,
//! so classification shells out once per binary and inspects its
//! `--version` output.
//!
//! The decision logic lives in [`classify_version_text`], a pure function
//! over captured text that is unit-tested with canned version strings;
//! [`classify_binary`] is the thin probe wrapper around it.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::run::run_capture;

/// Flag dialect of one resolved binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolDialect {
    /// GNU coreutils-style long options and format codes.
    Gnu,
    /// Traditional BSD userland option letters.
    Bsd,
    /// BusyBox applet; a narrow, mostly GNU-shaped subset.
    Busybox,
    /// Probe was inconclusive.
    Unknown,
}

impl ToolDialect {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolDialect::Gnu => "gnu",
            ToolDialect::Bsd => "bsd",
            ToolDialect::Busybox => "busybox",
            ToolDialect::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ToolDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a binary's dialect from its `--version` output.
///
/// Order matters: BusyBox applets reject `--version` and print their banner
/// on stderr with a nonzero exit, so the banner checks must run before the
/// rejected-option heuristic that identifies true BSD tools.
pub fn classify_version_text(stdout: &str, stderr: &str, exited_zero: bool) -> ToolDialect {
    let combined = format!("{stdout}\n{stderr}");
    let lower = combined.to_lowercase();

    if combined.contains("GNU") {
        return ToolDialect::Gnu;
    }
    if lower.contains("busybox") {
        return ToolDialect::Busybox;
    }
    // BSD userland tools have no --version; they reject the flag and print
    // a usage synopsis.
    if !exited_zero || lower.contains("illegal option") || lower.contains("usage:") {
        return ToolDialect::Bsd;
    }
    ToolDialect::Unknown
}

/// Probe a binary with `--version` and classify the result.
///
/// Never fails: an unspawnable binary classifies as `Unknown` and the
/// caller applies its default strategy.
pub fn classify_binary(path: &Path) -> ToolDialect {
    match run_capture(path, &["--version"]) {
        Ok(out) => {
            let dialect = classify_version_text(&out.stdout, &out.stderr, out.success());
            debug!(binary = %path.display(), dialect = %dialect, "classified binary");
            dialect
        }
        Err(_) => {
            debug!(binary = %path.display(), "version probe failed to spawn");
            ToolDialect::Unknown
        }
    }
}
