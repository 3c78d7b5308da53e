//! File metadata via the resolved `stat` binary.
//!
//! GNU stat takes `-c` with `%s`-style tokens; BSD stat takes `-f` with a
//! disjoint token alphabet. Both are captured in the flag table, so this
//! module only assembles argv and normalizes the answer.

use std::ffi::OsString;
use std::path::Path;
use std::str::FromStr;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult};
use coreshim_toolbox::{CommandKind, FlagKey, PlatformContext};

/// Scalar a stat call can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    /// Size in bytes.
    Size,
    /// Modification time as a Unix epoch.
    Mtime,
    /// Access time as a Unix epoch.
    Atime,
    /// Status-change time as a Unix epoch.
    Ctime,
    /// Permission bits in octal.
    Mode,
}

impl StatField {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            StatField::Size => "size",
            StatField::Mtime => "mtime",
            StatField::Atime => "atime",
            StatField::Ctime => "ctime",
            StatField::Mode => "mode",
        }
    }

    fn flag_key(self) -> FlagKey {
        match self {
            StatField::Size => FlagKey::StatSize,
            StatField::Mtime => FlagKey::StatMtime,
            StatField::Atime => FlagKey::StatAtime,
            StatField::Ctime => FlagKey::StatCtime,
            StatField::Mode => FlagKey::StatMode,
        }
    }
}

impl FromStr for StatField {
    type Err = CoreshimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "size" => Ok(StatField::Size),
            "mtime" => Ok(StatField::Mtime),
            "atime" => Ok(StatField::Atime),
            "ctime" => Ok(StatField::Ctime),
            "mode" => Ok(StatField::Mode),
            other => Err(CoreshimError::configuration(format!(
                "unknown stat field '{other}' (expected size, mtime, atime, ctime, or mode)"
            ))),
        }
    }
}

impl std::fmt::Display for StatField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scalar of file metadata as the decimal/octal string `stat` printed.
///
/// # Errors
///
/// * `Resolution` - no stat binary on this host
/// * `Unsupported` - the resolved stat cannot answer this field
/// * `Execution` - stat ran but failed (typically a missing file)
pub fn stat_field(ctx: &PlatformContext, field: StatField, path: &Path) -> CoreshimResult<String> {
    let stat = ctx.command(CommandKind::Stat)?;
    let flag = ctx.flag(field.flag_key()).ok_or_else(|| {
        CoreshimError::unsupported(format!("stat {field}"), ctx.userland().as_str())
    })?;

    let mut args: Vec<OsString> = flag.iter().map(OsString::from).collect();
    args.push(path.as_os_str().to_os_string());

    let out = run_checked(&stat.path, &args)?;
    Ok(out.stdout_trimmed().to_string())
}
