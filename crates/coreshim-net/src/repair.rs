//! Best-effort DNS and network repair.
//!
//! Repair operations never return hard errors: each strategy attempt is
//! logged, and the caller receives a [`RepairOutcome`] telling it whether
//! some strategy applied, every strategy failed, or this host has no
//! strategy at all. "Failed" and "unsupported on this platform" call for
//! different operator responses, so the answer stays three-way.

use serde::Serialize;
use tracing::{info, warn};

use coreshim_core::{run_capture, OsFamily, PlatformProfile};
use coreshim_toolbox::lookup;

/// Result of a best-effort repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "strategy", rename_all = "snake_case")]
pub enum RepairOutcome {
    /// A strategy ran and reported success.
    Applied(&'static str),
    /// Strategies exist here, but every attempt failed.
    Failed,
    /// No repair strategy exists on this host.
    Unsupported,
}

impl RepairOutcome {
    /// Whether some strategy reported success.
    pub fn applied(&self) -> bool {
        matches!(self, RepairOutcome::Applied(_))
    }
}

/// Run one strategy command; log and swallow every failure.
fn try_strategy(label: &'static str, program: &str, args: &[&str]) -> bool {
    if lookup(program).is_none() {
        warn!(strategy = label, program, "strategy tool not installed");
        return false;
    }
    match run_capture(program, args) {
        Ok(out) if out.success() => {
            info!(strategy = label, "repair strategy applied");
            true
        }
        Ok(out) => {
            warn!(
                strategy = label,
                code = out.code,
                stderr = out.stderr_trimmed(),
                "repair strategy failed"
            );
            false
        }
        Err(e) => {
            warn!(strategy = label, error = %e, "repair strategy could not run");
            false
        }
    }
}

/// Flush the system DNS cache.
///
/// OS-specific cascade, first success wins:
/// - macOS: `dscacheutil -flushcache`, then HUP `mDNSResponder`
/// - Linux/WSL: `resolvectl flush-caches` → `systemd-resolve
///   --flush-caches` → `nscd -i hosts`
/// - FreeBSD/OpenBSD/NetBSD: `unbound-control reload`
pub fn flush_dns(profile: &PlatformProfile) -> RepairOutcome {
    match profile.os {
        OsFamily::Macos => {
            if try_strategy("dscacheutil", "dscacheutil", &["-flushcache"]) {
                // The resolver daemon caches independently of dscacheutil.
                try_strategy("mDNSResponder HUP", "killall", &["-HUP", "mDNSResponder"]);
                RepairOutcome::Applied("dscacheutil")
            } else if try_strategy("mDNSResponder HUP", "killall", &["-HUP", "mDNSResponder"]) {
                RepairOutcome::Applied("mDNSResponder HUP")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Linux | OsFamily::Wsl => {
            if try_strategy("resolvectl", "resolvectl", &["flush-caches"]) {
                RepairOutcome::Applied("resolvectl")
            } else if try_strategy("systemd-resolve", "systemd-resolve", &["--flush-caches"]) {
                RepairOutcome::Applied("systemd-resolve")
            } else if try_strategy("nscd", "nscd", &["-i", "hosts"]) {
                RepairOutcome::Applied("nscd")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Freebsd | OsFamily::Openbsd | OsFamily::Netbsd => {
            if try_strategy("unbound-control", "unbound-control", &["reload"]) {
                RepairOutcome::Applied("unbound-control")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Solaris | OsFamily::Windows | OsFamily::Unknown => {
            warn!(os = %profile.os, "no DNS flush strategy for this host");
            RepairOutcome::Unsupported
        }
    }
}

/// Bounce one interface: down, then up, with the first tool that works.
fn bounce_interface(profile: &PlatformProfile, iface: &str) -> RepairOutcome {
    let use_ip = matches!(profile.os, OsFamily::Linux | OsFamily::Wsl) && lookup("ip").is_some();

    if use_ip {
        if try_strategy("ip link down", "ip", &["link", "set", iface, "down"])
            && try_strategy("ip link up", "ip", &["link", "set", iface, "up"])
        {
            return RepairOutcome::Applied("ip link bounce");
        }
        return RepairOutcome::Failed;
    }

    if lookup("ifconfig").is_some() {
        if try_strategy("ifconfig down", "ifconfig", &[iface, "down"])
            && try_strategy("ifconfig up", "ifconfig", &[iface, "up"])
        {
            return RepairOutcome::Applied("ifconfig bounce");
        }
        return RepairOutcome::Failed;
    }

    warn!(iface, "no interface-bounce tool on this host");
    RepairOutcome::Unsupported
}

/// Restart networking, for one interface or the whole stack.
///
/// With an interface the repair is a down/up bounce. Without one it is an
/// OS-specific service cascade:
/// - Linux/WSL: `systemctl restart NetworkManager` → `systemctl restart
///   systemd-networkd` → `service networking restart`
/// - FreeBSD: `service netif restart`
/// - OpenBSD: `sh /etc/netstart`
/// - NetBSD: `/etc/rc.d/network restart`
/// - macOS: unsupported without an interface (no single primary service to
///   guess at); pass the interface to bounce it
pub fn restart_network(profile: &PlatformProfile, iface: Option<&str>) -> RepairOutcome {
    if let Some(iface) = iface {
        return bounce_interface(profile, iface);
    }

    match profile.os {
        OsFamily::Linux | OsFamily::Wsl => {
            if try_strategy(
                "NetworkManager restart",
                "systemctl",
                &["restart", "NetworkManager"],
            ) {
                RepairOutcome::Applied("NetworkManager restart")
            } else if try_strategy(
                "systemd-networkd restart",
                "systemctl",
                &["restart", "systemd-networkd"],
            ) {
                RepairOutcome::Applied("systemd-networkd restart")
            } else if try_strategy(
                "networking service restart",
                "service",
                &["networking", "restart"],
            ) {
                RepairOutcome::Applied("networking service restart")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Freebsd => {
            if try_strategy("netif restart", "service", &["netif", "restart"]) {
                RepairOutcome::Applied("netif restart")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Openbsd => {
            if try_strategy("netstart", "sh", &["/etc/netstart"]) {
                RepairOutcome::Applied("netstart")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Netbsd => {
            if try_strategy("rc.d network restart", "/etc/rc.d/network", &["restart"]) {
                RepairOutcome::Applied("rc.d network restart")
            } else {
                RepairOutcome::Failed
            }
        }
        OsFamily::Macos | OsFamily::Solaris | OsFamily::Windows | OsFamily::Unknown => {
            warn!(os = %profile.os, "no whole-stack network restart strategy for this host");
            RepairOutcome::Unsupported
        }
    }
}
