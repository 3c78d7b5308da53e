//! Canonical path resolution.
//!
//! The happy path is the table's `readlink -f` (GNU or greadlink). True BSD
//! readlink has no canonical mode, so the table carries no flag there and
//! this module walks the emulation chain instead:
//!
//! 1. `python3` `os.path.realpath`
//! 2. `perl` `Cwd::abs_path`
//! 3. manual reconstruction: resolve the parent directory, re-join the
//!    final component
//!
//! Every tier handles a non-existent leaf component: the parent must
//! resolve, the leaf need not exist. The result is absolute, symlink-free,
//! and stable under repeated application.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult};
use coreshim_toolbox::{lookup, CommandKind, FlagKey, PlatformContext};

const PYTHON_REALPATH: &str = "import os, sys\nprint(os.path.realpath(sys.argv[1]))";
const PERL_REALPATH: &str = "use Cwd qw(abs_path); print abs_path(shift);";

/// Resolve a path to absolute, symlink-free form.
///
/// # Errors
///
/// * `Configuration` - the parent directory cannot be resolved (the leaf
///   may be missing; its parent may not)
/// * `Execution` - a chain tool ran and failed
pub fn canonicalize(ctx: &PlatformContext, path: &Path) -> CoreshimResult<PathBuf> {
    // Tier 1: the resolved readlink knows -f.
    if let (Some(flag), Some(readlink)) = (
        ctx.flag(FlagKey::ReadlinkCanonical),
        ctx.maybe_command(CommandKind::Readlink),
    ) {
        let mut args: Vec<OsString> = flag.iter().map(OsString::from).collect();
        args.push(path.as_os_str().to_os_string());
        let out = run_checked(&readlink.path, &args)?;
        return Ok(PathBuf::from(out.stdout_trimmed()));
    }

    let path_arg = path.to_string_lossy();

    // Tier 2: python3 realpath.
    if let Some(python) = lookup("python3") {
        debug!(path = %path.display(), "canonicalizing via python3");
        let out = run_checked(&python, &["-c", PYTHON_REALPATH, path_arg.as_ref()])?;
        let resolved = out.stdout_trimmed();
        if !resolved.is_empty() {
            return Ok(PathBuf::from(resolved));
        }
    }

    // Tier 3: perl Cwd. abs_path prints nothing for unresolvable input,
    // so an empty answer falls through instead of failing.
    if let Some(perl) = lookup("perl") {
        debug!(path = %path.display(), "canonicalizing via perl");
        if let Ok(out) = run_checked(&perl, &["-e", PERL_REALPATH, "--", path_arg.as_ref()]) {
            let resolved = out.stdout_trimmed();
            if !resolved.is_empty() {
                return Ok(PathBuf::from(resolved));
            }
        }
    }

    // Tier 4: manual reconstruction.
    debug!(path = %path.display(), "canonicalizing via manual reconstruction");
    manual_resolve(path)
}

/// Resolve directories directly; resolve files (and non-existent leaves) by
/// joining the resolved parent with the final component.
fn manual_resolve(path: &Path) -> CoreshimResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env::current_dir()
            .map_err(|e| CoreshimError::internal(format!("cannot read working directory: {e}")))?;
        cwd.join(path)
    };

    // An existing path (file or directory) resolves in one step.
    if let Ok(resolved) = fs::canonicalize(&absolute) {
        return Ok(resolved);
    }

    let parent = absolute
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| {
            CoreshimError::configuration(format!(
                "cannot canonicalize '{}': no parent directory",
                path.display()
            ))
        })?;
    let leaf = absolute.file_name().ok_or_else(|| {
        CoreshimError::configuration(format!(
            "cannot canonicalize '{}': no final component",
            path.display()
        ))
    })?;

    let parent_resolved = fs::canonicalize(parent).map_err(|e| {
        CoreshimError::configuration(format!(
            "cannot canonicalize '{}': parent '{}' is unresolvable: {e}",
            path.display(),
            parent.display()
        ))
    })?;

    Ok(parent_resolved.join(leaf))
}
