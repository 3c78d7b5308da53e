//! In-place text editing via the resolved `sed` binary.

use std::ffi::OsString;
use std::path::Path;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult};
use coreshim_toolbox::{CommandKind, FlagKey, PlatformContext};

/// Apply a sed expression to a file in place.
///
/// The in-place flag fragment comes from the table: bare `-i` for GNU and
/// BusyBox, `-i ''` for BSD, where the empty backup-suffix token is
/// mandatory (without it BSD sed consumes the expression as the suffix).
/// Either way no backup artifact is left behind.
///
/// # Errors
///
/// * `Resolution` - no sed binary on this host
/// * `Unsupported` - the resolved sed cannot edit in place
/// * `Execution` - sed rejected the expression or the file
pub fn sed_inplace(ctx: &PlatformContext, expr: &str, path: &Path) -> CoreshimResult<()> {
    let sed = ctx.command(CommandKind::Sed)?;
    let flag = ctx
        .flag(FlagKey::SedInPlace)
        .ok_or_else(|| CoreshimError::unsupported("sed in-place", ctx.userland().as_str()))?;

    let mut args: Vec<OsString> = flag.iter().map(OsString::from).collect();
    args.push(OsString::from(expr));
    args.push(path.as_os_str().to_os_string());

    run_checked(&sed.path, &args)?;
    Ok(())
}
