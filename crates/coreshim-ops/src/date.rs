//! Timestamp rendering via the resolved `date` binary.
//!
//! Three shapes: named presets (iso8601/rfc3339/epoch), raw `+`-patterns
//! passed through untouched, and epoch rendering. The last is where the
//! dialects truly diverge: GNU renders an epoch with `-d @EPOCH`, BSD with
//! `-r EPOCH`. The flag comes from the table, the argument shape from the
//! resolved binary's dialect.

use std::str::FromStr;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult, ToolDialect};
use coreshim_toolbox::{CommandKind, FlagKey, PlatformContext};

/// Named output formats the toolkit asks for by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    /// `2026-08-07T12:34:56+0000`-shaped.
    Iso8601,
    /// `2026-08-07 12:34:56+00:00`-shaped.
    Rfc3339,
    /// Seconds since the Unix epoch.
    Epoch,
}

impl DatePreset {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            DatePreset::Iso8601 => "iso8601",
            DatePreset::Rfc3339 => "rfc3339",
            DatePreset::Epoch => "epoch",
        }
    }

    fn flag_key(self) -> FlagKey {
        match self {
            DatePreset::Iso8601 => FlagKey::DateIso8601,
            DatePreset::Rfc3339 => FlagKey::DateRfc3339,
            DatePreset::Epoch => FlagKey::DateEpoch,
        }
    }
}

impl FromStr for DatePreset {
    type Err = CoreshimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso8601" | "iso-8601" => Ok(DatePreset::Iso8601),
            "rfc3339" | "rfc-3339" => Ok(DatePreset::Rfc3339),
            "epoch" => Ok(DatePreset::Epoch),
            other => Err(CoreshimError::configuration(format!(
                "unknown date preset '{other}' (expected iso8601, rfc3339, or epoch)"
            ))),
        }
    }
}

impl std::fmt::Display for DatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn require_pattern(pattern: &str) -> CoreshimResult<()> {
    if !pattern.starts_with('+') {
        return Err(CoreshimError::configuration(format!(
            "raw date patterns must start with '+', got '{pattern}'"
        )));
    }
    Ok(())
}

/// The current time in a named preset format.
pub fn date_preset(ctx: &PlatformContext, preset: DatePreset) -> CoreshimResult<String> {
    let date = ctx.command(CommandKind::Date)?;
    let flag = ctx.flag(preset.flag_key()).ok_or_else(|| {
        CoreshimError::unsupported(format!("date {preset}"), ctx.userland().as_str())
    })?;

    let out = run_checked(&date.path, flag)?;
    Ok(out.stdout_trimmed().to_string())
}

/// The current time in a caller-supplied `+`-pattern.
pub fn date_pattern(ctx: &PlatformContext, pattern: &str) -> CoreshimResult<String> {
    require_pattern(pattern)?;
    let date = ctx.command(CommandKind::Date)?;
    let out = run_checked(&date.path, &[pattern])?;
    Ok(out.stdout_trimmed().to_string())
}

/// Render a Unix epoch as a timestamp, optionally through a `+`-pattern.
///
/// With no pattern the binary's default rendering is returned, which is
/// what round-trips `date_preset(Epoch)` within the same second.
pub fn date_from_epoch(
    ctx: &PlatformContext,
    epoch: i64,
    pattern: Option<&str>,
) -> CoreshimResult<String> {
    let date = ctx.command(CommandKind::Date)?;
    let flag = ctx.flag(FlagKey::DateFromEpoch).ok_or_else(|| {
        CoreshimError::unsupported("date from_epoch", ctx.userland().as_str())
    })?;

    let mut args: Vec<String> = flag.to_vec();
    match date.dialect {
        // BSD: `date -r EPOCH`
        ToolDialect::Bsd => args.push(epoch.to_string()),
        // GNU/BusyBox: `date -d @EPOCH`
        _ => args.push(format!("@{epoch}")),
    }
    if let Some(pattern) = pattern {
        require_pattern(pattern)?;
        args.push(pattern.to_string());
    }

    let out = run_checked(&date.path, &args)?;
    Ok(out.stdout_trimmed().to_string())
}
