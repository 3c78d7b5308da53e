//! coreshim-net: Interface inspection and best-effort network repair.
//!
//! This crate provides:
//! - Interface IPv4/MAC lookup over `ip` or `ifconfig` text, with parsers
//!   for every field layout in the wild ([`interface_ip`],
//!   [`interface_mac`])
//! - DNS-cache flushing and network restarts as OS-specific strategy
//!   cascades that log failures instead of raising them ([`flush_dns`],
//!   [`restart_network`])
//!
//! Repairs answer with a [`RepairOutcome`]: applied, failed, or
//! unsupported-on-this-host. The caller decides how loud to be about each.

pub mod iface;
pub mod parse;
pub mod repair;

pub use iface::{interface_ip, interface_mac};
pub use repair::{flush_dns, restart_network, RepairOutcome};
