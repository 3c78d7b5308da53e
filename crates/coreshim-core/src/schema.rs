//! Schema ID constants for JSON output contracts.
//!
//! All coreshim JSON outputs include a `schema_id` field that references
//! the corresponding schema. These constants define the canonical schema
//! URLs.
//!
//! ## URI Structure
//!
//! ```text
//! https://schemas.coreshim.dev/<module>/<topic>/<version>/<filename>
//! ```
//!
//! coreshim does NOT perform runtime JSON schema validation; output shapes
//! are pinned by serde derives and verified in CI against the hosted
//! schemas. Schema ID constants are unit-tested for uniqueness and host.

/// Schema ID for platform report JSON output (v1.0.0).
///
/// This schema defines the structure of `coreshim info --json` output.
pub const PLATFORM_REPORT_V1: &str =
    "https://schemas.coreshim.dev/coreshim/platform/v1.0.0/platform-report.schema.json";

/// Schema ID for self-test report JSON output (v1.0.0).
///
/// This schema defines the structure of `coreshim selftest --json` output.
pub const SELFTEST_REPORT_V1: &str =
    "https://schemas.coreshim.dev/coreshim/selftest/v1.0.0/selftest-report.schema.json";

/// Schema ID for bounded-execution result JSON output (v1.0.0).
///
/// This schema defines the structure of `coreshim timeout --json` output.
pub const BOUNDED_RESULT_V1: &str =
    "https://schemas.coreshim.dev/coreshim/timeout/v1.0.0/bounded-result.schema.json";

// ============================================================================
// Schema Host Constants
// ============================================================================

/// Base URL for coreshim schemas.
pub const SCHEMA_HOST: &str = "https://schemas.coreshim.dev";

/// Module name for coreshim in schema URIs.
pub const SCHEMA_MODULE: &str = "coreshim";
