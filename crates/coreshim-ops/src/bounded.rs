//! Context-aware bounded execution.
//!
//! Thin wrapper over `coreshim-timeout`: the command table decides whether
//! a native `timeout`/`gtimeout` binary drives the deadline or the Unix
//! emulation takes over.

use std::time::Duration;

use coreshim_core::CoreshimResult;
use coreshim_timeout::{run_bounded, BoundedConfig, BoundedOutcome};
use coreshim_toolbox::{CommandKind, PlatformContext};

/// Run a command under a hard deadline, native binary preferred.
pub fn run_with_timeout(
    ctx: &PlatformContext,
    limit: Duration,
    command: &str,
    args: &[&str],
) -> CoreshimResult<BoundedOutcome> {
    run_with_timeout_config(ctx, limit, command, args, &BoundedConfig::default())
}

/// Run a command under a hard deadline with explicit signal/grace settings.
pub fn run_with_timeout_config(
    ctx: &PlatformContext,
    limit: Duration,
    command: &str,
    args: &[&str],
    config: &BoundedConfig,
) -> CoreshimResult<BoundedOutcome> {
    let native = ctx
        .maybe_command(CommandKind::Timeout)
        .map(|c| c.path.as_path());
    run_bounded(native, limit, command, args, config)
}
