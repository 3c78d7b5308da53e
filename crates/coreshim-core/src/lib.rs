//! coreshim-core: Core types, errors, and host detection
//!
//! This crate provides the foundational pieces used across all coreshim
//! modules:
//! - The canonical error taxonomy ([`CoreshimError`]) and result alias
//! - Process exit-code constants for the CLI contract
//! - Schema ID constants for JSON output contracts
//! - The synchronous capture-mode process runner
//! - OS/userland detection ([`PlatformProfile`]) and per-binary flag
//!   dialect classification ([`classify`])
//!
//! ## Detection Model
//!
//! Detection never fails; unresolved hosts degrade to `unknown` and
//! downstream code applies the GNU-default strategy. The profile is
//! memoized per process; command/flag tables built on top of it live in
//! an explicit context owned by the caller (see `coreshim-toolbox`), not in
//! process globals.

pub mod classify;
pub mod error;
pub mod exit_codes;
pub mod platform;
pub mod run;
pub mod schema;

// Re-export the canonical error type and the detection surface at the
// crate root; these are the names the rest of the workspace imports.
pub use classify::{classify_binary, classify_version_text, ToolDialect};
pub use error::{CoreshimError, CoreshimResult};
pub use platform::{detect_os, detect_variant, OsFamily, PlatformProfile, Userland};
pub use run::{run_capture, run_checked, run_status, CommandOutput};
