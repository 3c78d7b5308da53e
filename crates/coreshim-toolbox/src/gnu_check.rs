//! macOS advisory for missing GNU tools.
//!
//! coreshim works on a stock BSD userland, but several operations run
//! better (or drop their emulation paths) when Homebrew coreutils are
//! installed. This check is advisory only: it reports what is missing and
//! which package provides it, and changes no behavior.

use coreshim_core::{OsFamily, PlatformProfile};
use tracing::{info, warn};

use crate::resolver::lookup;

/// g-prefixed GNU tools worth having on macOS, with their Homebrew package.
pub const GNU_TOOL_PACKAGES: &[(&str, &str)] = &[
    ("gstat", "coreutils"),
    ("gdate", "coreutils"),
    ("greadlink", "coreutils"),
    ("gmktemp", "coreutils"),
    ("gbase64", "coreutils"),
    ("gtimeout", "coreutils"),
    ("gfind", "findutils"),
    ("gxargs", "findutils"),
    ("gsed", "gnu-sed"),
    ("ggrep", "grep"),
    ("gawk", "gawk"),
    ("gtar", "gnu-tar"),
];

/// A GNU tool that is not installed, with the package that provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingTool {
    pub tool: &'static str,
    pub package: &'static str,
}

/// Report GNU tools missing from a macOS host.
///
/// Logs a warning per missing tool and an install hint when anything is
/// missing. On every other OS this is a no-op returning an empty list.
pub fn check_gnu_tools(profile: &PlatformProfile) -> Vec<MissingTool> {
    if profile.os != OsFamily::Macos {
        return Vec::new();
    }

    let missing: Vec<MissingTool> = GNU_TOOL_PACKAGES
        .iter()
        .copied()
        .filter(|(tool, _)| lookup(tool).is_none())
        .map(|(tool, package)| MissingTool { tool, package })
        .collect();

    if missing.is_empty() {
        info!("all advisory GNU tools present");
    } else {
        for m in &missing {
            warn!(tool = m.tool, package = m.package, "GNU tool not installed");
        }
        let packages: Vec<&str> = {
            let mut p: Vec<&str> = missing.iter().map(|m| m.package).collect();
            p.sort_unstable();
            p.dedup();
            p
        };
        warn!("install with: brew install {}", packages.join(" "));
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use coreshim_core::Userland;

    #[test]
    fn non_macos_hosts_are_a_noop() {
        let profile = PlatformProfile {
            os: OsFamily::Linux,
            userland: Userland::Gnu,
        };
        assert!(check_gnu_tools(&profile).is_empty());
    }

    #[test]
    fn advisory_table_has_unique_tools() {
        let mut tools: Vec<&str> = GNU_TOOL_PACKAGES.iter().map(|(t, _)| *t).collect();
        tools.sort_unstable();
        tools.dedup();
        assert_eq!(tools.len(), GNU_TOOL_PACKAGES.len());
    }

    #[test]
    fn every_advisory_tool_is_g_prefixed() {
        for (tool, package) in GNU_TOOL_PACKAGES {
            assert!(tool.starts_with('g'), "{tool} should be g-prefixed");
            assert!(!package.is_empty());
        }
    }
}
