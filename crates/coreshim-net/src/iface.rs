//! Interface address and MAC inspection.
//!
//! `ip` (iproute2) is preferred where installed; `ifconfig` covers
//! BSD/macOS and legacy-Linux hosts. The tools are resolved per call: the
//! candidate set depends on what the host carries, not on the userland
//! variant, and neither belongs to the fixed command table.

use tracing::debug;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult};
use coreshim_toolbox::lookup;

use crate::parse::{parse_ifconfig_inet, parse_ifconfig_mac, parse_ip_addr, parse_ip_link_mac};

/// The first IPv4 address of a named interface.
///
/// `Ok(None)` means the interface exists but carries no IPv4 address, a
/// legitimate state distinct from every error.
///
/// # Errors
///
/// * `Resolution` - neither `ip` nor `ifconfig` is installed
/// * `Execution` - the tool rejected the interface name
pub fn interface_ip(iface: &str) -> CoreshimResult<Option<String>> {
    if let Some(ip_bin) = lookup("ip") {
        debug!(iface, "querying address via ip");
        let out = run_checked(&ip_bin, &["-o", "-4", "addr", "show", "dev", iface])?;
        return Ok(parse_ip_addr(&out.stdout));
    }

    if let Some(ifconfig) = lookup("ifconfig") {
        debug!(iface, "querying address via ifconfig");
        let out = run_checked(&ifconfig, &[iface])?;
        return Ok(parse_ifconfig_inet(&out.stdout));
    }

    Err(CoreshimError::resolution("ip (alternates: ifconfig)"))
}

/// The MAC address of a named interface.
///
/// `Ok(None)` for interfaces without a hardware address (loopback).
///
/// # Errors
///
/// * `Resolution` - neither `ip` nor `ifconfig` is installed
/// * `Execution` - the tool rejected the interface name
pub fn interface_mac(iface: &str) -> CoreshimResult<Option<String>> {
    if let Some(ip_bin) = lookup("ip") {
        debug!(iface, "querying MAC via ip");
        let out = run_checked(&ip_bin, &["-o", "link", "show", "dev", iface])?;
        return Ok(parse_ip_link_mac(&out.stdout));
    }

    if let Some(ifconfig) = lookup("ifconfig") {
        debug!(iface, "querying MAC via ifconfig");
        let out = run_checked(&ifconfig, &[iface])?;
        return Ok(parse_ifconfig_mac(&out.stdout));
    }

    Err(CoreshimError::resolution("ip (alternates: ifconfig)"))
}
