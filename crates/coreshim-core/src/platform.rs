//! Host OS and userland detection.
//!
//! Classification is split into pure functions over probe text
//! ([`classify_sysname`], [`is_wsl_kernel`]) and a thin probing layer that
//! runs `uname` and reads `/proc/version`. The pure halves are unit-tested
//! against canned strings; the probing layer never fails and degrades to
//! `unknown` instead.
//!
//! Detection runs once per process: [`PlatformProfile::current`] memoizes
//! the result in a `OnceLock`, making [`detect_os`]/[`detect_variant`]
//! idempotent. There is no re-detection API.

use std::fs;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::classify::{classify_binary, ToolDialect};
use crate::run::run_capture;

// ============================================================================
// OS Family
// ============================================================================

/// Host operating-system family, as reported by `uname -s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Linux,
    Macos,
    /// Windows Subsystem for Linux; a Linux kernel with Windows plumbing.
    Wsl,
    Freebsd,
    Openbsd,
    Netbsd,
    Solaris,
    /// A Windows Unix layer (Cygwin, MSYS, Git Bash).
    Windows,
    Unknown,
}

impl OsFamily {
    /// Stable lowercase name, used in logs and `Unsupported` errors.
    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::Macos => "macos",
            OsFamily::Wsl => "wsl",
            OsFamily::Freebsd => "freebsd",
            OsFamily::Openbsd => "openbsd",
            OsFamily::Netbsd => "netbsd",
            OsFamily::Solaris => "solaris",
            OsFamily::Windows => "windows",
            OsFamily::Unknown => "unknown",
        }
    }

    /// Whether this OS ships a BSD userland by default (macOS included).
    pub fn is_bsd_family(self) -> bool {
        matches!(
            self,
            OsFamily::Macos | OsFamily::Freebsd | OsFamily::Openbsd | OsFamily::Netbsd
        )
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Userland Variant
// ============================================================================

/// Installed core-utility flavor, independent of OS family.
///
/// A BSD host with Homebrew coreutils and a Linux container with BusyBox
/// are both real configurations; the variant is what decides flag syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Userland {
    Gnu,
    Bsd,
    Busybox,
    Solaris,
    Unknown,
}

impl Userland {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Userland::Gnu => "gnu",
            Userland::Bsd => "bsd",
            Userland::Busybox => "busybox",
            Userland::Solaris => "solaris",
            Userland::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Userland {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Platform Profile
// ============================================================================

/// The detected host: OS family plus userland variant.
///
/// Immutable once built; detection never fails, unresolved cases map to
/// `unknown` and callers apply the GNU-default strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    pub os: OsFamily,
    pub userland: Userland,
}

static PROFILE: OnceLock<PlatformProfile> = OnceLock::new();

impl PlatformProfile {
    /// The memoized profile for this process.
    ///
    /// The first call probes the host; later calls return the cached value.
    pub fn current() -> &'static PlatformProfile {
        PROFILE.get_or_init(Self::detect)
    }

    /// Run detection without touching the process-wide cache.
    ///
    /// Exists for the table builder's tests; production callers want
    /// [`PlatformProfile::current`].
    pub fn detect() -> PlatformProfile {
        let os = detect_os_uncached();
        let userland = detect_userland(os);
        debug!(os = %os, userland = %userland, "host detection complete");
        PlatformProfile { os, userland }
    }
}

/// Classified OS family for this host (memoized).
pub fn detect_os() -> OsFamily {
    PlatformProfile::current().os
}

/// Classified userland variant for this host (memoized).
pub fn detect_variant() -> Userland {
    PlatformProfile::current().userland
}

// ============================================================================
// Pure classifiers
// ============================================================================

/// Map a `uname -s` string to an OS family.
///
/// Does not distinguish WSL; that needs kernel text, see [`is_wsl_kernel`].
pub fn classify_sysname(sysname: &str) -> OsFamily {
    let s = sysname.trim();
    match s {
        "Linux" => OsFamily::Linux,
        "Darwin" => OsFamily::Macos,
        "FreeBSD" => OsFamily::Freebsd,
        "OpenBSD" => OsFamily::Openbsd,
        "NetBSD" => OsFamily::Netbsd,
        "SunOS" => OsFamily::Solaris,
        _ => {
            if s.starts_with("CYGWIN") || s.starts_with("MINGW") || s.starts_with("MSYS") {
                OsFamily::Windows
            } else {
                OsFamily::Unknown
            }
        }
    }
}

/// Whether kernel release/version text identifies a WSL kernel.
///
/// WSL1 reports "Microsoft" in the release, WSL2 "microsoft-standard-WSL2";
/// both are matched case-insensitively.
pub fn is_wsl_kernel(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("microsoft") || lower.contains("wsl")
}

// ============================================================================
// Probing layer
// ============================================================================

fn uname(flag: &str) -> Option<String> {
    let out = run_capture("uname", &[flag]).ok()?;
    if out.success() {
        Some(out.stdout_trimmed().to_string())
    } else {
        None
    }
}

/// Kernel release + version text, with `/proc/version` as a fallback for
/// hosts where `uname` is unusable.
fn kernel_text() -> String {
    let mut text = String::new();
    if let Some(release) = uname("-r") {
        text.push_str(&release);
        text.push(' ');
    }
    if let Some(version) = uname("-v") {
        text.push_str(&version);
        text.push(' ');
    }
    if let Ok(proc_version) = fs::read_to_string("/proc/version") {
        text.push_str(&proc_version);
    }
    text
}

fn detect_os_uncached() -> OsFamily {
    let Some(sysname) = uname("-s") else {
        debug!("uname -s unavailable; os is unknown");
        return OsFamily::Unknown;
    };

    let os = classify_sysname(&sysname);
    if os == OsFamily::Linux && is_wsl_kernel(&kernel_text()) {
        return OsFamily::Wsl;
    }
    os
}

fn detect_userland(os: OsFamily) -> Userland {
    match os {
        OsFamily::Macos | OsFamily::Freebsd | OsFamily::Openbsd | OsFamily::Netbsd => Userland::Bsd,
        OsFamily::Solaris => Userland::Solaris,
        OsFamily::Unknown => Userland::Unknown,
        // Windows Unix layers carry GNU coreutils, so they take the same
        // probe as Linux rather than a hardcoded answer.
        OsFamily::Linux | OsFamily::Wsl | OsFamily::Windows => {
            match classify_binary("stat".as_ref()) {
                ToolDialect::Gnu => Userland::Gnu,
                ToolDialect::Busybox => Userland::Busybox,
                dialect @ (ToolDialect::Bsd | ToolDialect::Unknown) => {
                    // GNU tools are the common superset on these hosts.
                    debug!(
                        probe = %dialect,
                        "stat --version inconclusive; defaulting userland to gnu"
                    );
                    Userland::Gnu
                }
            }
        }
    }
}
