//! Process exit-code constants.
//!
//! The CLI follows the GNU `timeout`/shell conventions so scripted callers
//! can distinguish "the tool failed" from "the command under it failed":
//!
//! | Constant | Value | Meaning |
//! |----------|-------|---------|
//! | `SUCCESS` | 0 | operation succeeded |
//! | `FAILURE` | 1 | generic operation failure |
//! | `USAGE` | 2 | bad arguments / configuration |
//! | `INTERNAL_ERROR` | 70 | bug or impossible state (EX_SOFTWARE) |
//! | `TIMEOUT` | 124 | deadline expired |
//! | `CANNOT_INVOKE` | 126 | command found but not executable |
//! | `NOT_FOUND` | 127 | command not found |
//! | `SIGNAL_BASE` | 128 | add the signal number for signal deaths |

/// Operation succeeded.
pub const SUCCESS: i32 = 0;

/// Generic operation failure.
pub const FAILURE: i32 = 1;

/// Bad arguments or configuration.
pub const USAGE: i32 = 2;

/// No implementation strategy exists on this host.
pub const UNSUPPORTED: i32 = 4;

/// Internal software error (sysexits EX_SOFTWARE).
pub const INTERNAL_ERROR: i32 = 70;

/// A bounded command exceeded its deadline.
pub const TIMEOUT: i32 = 124;

/// Command was found but could not be invoked.
pub const CANNOT_INVOKE: i32 = 126;

/// Command was not found.
pub const NOT_FOUND: i32 = 127;

/// Base for signal-death exit codes: `SIGNAL_BASE + signo`.
pub const SIGNAL_BASE: i32 = 128;
