//! Temp file and directory creation via the resolved `mktemp` binary.
//!
//! The `-d` directory switch and `XXXXXX` templates behave the same across
//! GNU, BSD, and BusyBox, so this is the one operation whose argv needs no
//! dialect branch at all, only resolution.

use std::path::PathBuf;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult};
use coreshim_toolbox::{CommandKind, PlatformContext};

/// What kind of scratch entry to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempKind {
    File,
    Dir,
}

/// Create a temp file or directory and return its path.
///
/// A template, when given, must contain `XXXXXX` and is forwarded verbatim;
/// without one the binary's default location applies.
///
/// # Errors
///
/// * `Configuration` - template lacks the `XXXXXX` run
/// * `Resolution` - no mktemp binary on this host
/// * `Execution` - mktemp ran but failed
pub fn make_temp(
    ctx: &PlatformContext,
    kind: TempKind,
    template: Option<&str>,
) -> CoreshimResult<PathBuf> {
    if let Some(template) = template {
        if !template.contains("XXXXXX") {
            return Err(CoreshimError::configuration(format!(
                "mktemp template '{template}' must contain XXXXXX"
            )));
        }
    }

    let mktemp = ctx.command(CommandKind::Mktemp)?;

    let mut args: Vec<&str> = Vec::new();
    if kind == TempKind::Dir {
        args.push("-d");
    }
    if let Some(template) = template {
        args.push(template);
    }

    let out = run_checked(&mktemp.path, &args)?;
    Ok(PathBuf::from(out.stdout_trimmed()))
}
