//! Error types for coreshim operations.
//!
//! This module defines the error taxonomy for the whole workspace:
//! - [`CoreshimError`] - Canonical error type for all coreshim operations
//!
//! ## Design Principles
//!
//! - **Structured**: Errors carry typed context (command, exit code) not
//!   just messages
//! - **Status vs output**: an operation's printed output never doubles as
//!   its failure signal; empty output can be a legitimate success
//! - **Never-failing detection**: host detection degrades to `unknown`
//!   instead of raising, so no detection error variant exists here
//!
//! Variant inconclusiveness ("environment ambiguous") is deliberately not an
//! error: it is logged at debug level where it occurs and resolved to the
//! GNU default.

use std::io;
use thiserror::Error;

// ============================================================================
// Canonical Error Type
// ============================================================================

/// Canonical error type for all coreshim operations.
///
/// This is the single error type used across the coreshim workspace. It maps
/// to stable error codes for CLI exit status via [`CoreshimError::error_code`].
///
/// ## Error Code Mapping
///
/// | Variant | Code |
/// |---------|------|
/// | `Configuration` | 2 |
/// | `Resolution` | 127 |
/// | `Unsupported` | 4 |
/// | `Execution` | child's exit code, or 1 |
/// | `Spawn` | 127 when the binary was missing, else 126 |
/// | `Internal` | 70 |
#[derive(Debug, Error)]
pub enum CoreshimError {
    /// A semantic key or argument was malformed or unknown.
    ///
    /// Returned for unknown stat field names, date patterns without a
    /// leading `+`, mktemp templates without `XXXXXX`, unparsable
    /// durations, and unsupported checksum algorithm names.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of what was invalid.
        message: String,
    },

    /// No binary could be resolved for a logical command.
    ///
    /// The typed not-found sentinel: distinct from an empty-but-valid
    /// resolution, which cannot be represented.
    #[error("No binary found for '{command}'")]
    Resolution {
        /// The logical command (or alternate list) that failed to resolve.
        command: String,
    },

    /// No implementation strategy exists for this operation on this host.
    ///
    /// Distinct from `Execution`: nothing was attempted because nothing
    /// could be.
    #[error("Operation '{feature}' not supported on {platform}")]
    Unsupported {
        /// The feature with no strategy here.
        feature: String,
        /// The platform it is unsupported on.
        platform: String,
    },

    /// A resolved binary ran but returned a nonzero exit status.
    #[error("'{command}' failed with exit code {code}: {stderr}")]
    Execution {
        /// The command that failed.
        command: String,
        /// The exit code (or 128+signal when terminated by a signal).
        code: i32,
        /// Trimmed stderr from the child, possibly empty.
        stderr: String,
    },

    /// A binary could not be launched at all.
    ///
    /// Wraps the underlying IO error from process creation.
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        /// The command that could not be launched.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl CoreshimError {
    /// Get the stable error code for this error.
    ///
    /// Used by the CLI to derive its process exit status.
    pub fn error_code(&self) -> i32 {
        use crate::exit_codes;

        match self {
            CoreshimError::Configuration { .. } => exit_codes::USAGE,
            CoreshimError::Resolution { .. } => exit_codes::NOT_FOUND,
            CoreshimError::Unsupported { .. } => exit_codes::UNSUPPORTED,
            CoreshimError::Execution { code, .. } => {
                if *code > 0 {
                    *code
                } else {
                    exit_codes::FAILURE
                }
            }
            CoreshimError::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => exit_codes::NOT_FOUND,
                _ => exit_codes::CANNOT_INVOKE,
            },
            CoreshimError::Internal { .. } => exit_codes::INTERNAL_ERROR,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl CoreshimError {
    /// Create a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        CoreshimError::Configuration {
            message: message.into(),
        }
    }

    /// Create a `Resolution` error.
    pub fn resolution(command: impl Into<String>) -> Self {
        CoreshimError::Resolution {
            command: command.into(),
        }
    }

    /// Create an `Unsupported` error.
    pub fn unsupported(feature: impl Into<String>, platform: impl Into<String>) -> Self {
        CoreshimError::Unsupported {
            feature: feature.into(),
            platform: platform.into(),
        }
    }

    /// Create an `Execution` error.
    pub fn execution(command: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        CoreshimError::Execution {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Create a `Spawn` error from an IO error.
    pub fn spawn(command: impl Into<String>, source: io::Error) -> Self {
        CoreshimError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        CoreshimError::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for coreshim operations.
pub type CoreshimResult<T> = Result<T, CoreshimError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreshimError::configuration("unknown stat field 'blocks'");
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown stat field 'blocks'"
        );

        let err = CoreshimError::resolution("gsed");
        assert_eq!(err.to_string(), "No binary found for 'gsed'");

        let err = CoreshimError::unsupported("readlink -f", "openbsd");
        assert_eq!(
            err.to_string(),
            "Operation 'readlink -f' not supported on openbsd"
        );

        let err = CoreshimError::execution("stat", 1, "No such file or directory");
        assert_eq!(
            err.to_string(),
            "'stat' failed with exit code 1: No such file or directory"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CoreshimError::configuration("").error_code(), 2);
        assert_eq!(CoreshimError::resolution("").error_code(), 127);
        assert_eq!(CoreshimError::unsupported("", "").error_code(), 4);
        assert_eq!(CoreshimError::execution("", 3, "").error_code(), 3);
        assert_eq!(
            CoreshimError::spawn("", io::Error::other("nope")).error_code(),
            126
        );
        assert_eq!(
            CoreshimError::spawn("", io::Error::new(io::ErrorKind::NotFound, "gone")).error_code(),
            127
        );
        assert_eq!(
            CoreshimError::spawn("", io::Error::new(io::ErrorKind::PermissionDenied, "no"))
                .error_code(),
            126
        );
        assert_eq!(CoreshimError::internal("").error_code(), 70);
    }

    #[test]
    fn test_execution_code_never_zero() {
        // A zero or negative child code still has to map to a failing exit.
        assert_eq!(CoreshimError::execution("x", 0, "").error_code(), 1);
        assert_eq!(CoreshimError::execution("x", -1, "").error_code(), 1);
    }

    #[test]
    fn test_spawn_source_is_accessible() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "command not found");
        let err = CoreshimError::spawn("uname", io_err);

        match err {
            CoreshimError::Spawn { ref source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Spawn"),
        }
    }
}
