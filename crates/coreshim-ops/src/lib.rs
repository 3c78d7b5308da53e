//! coreshim-ops: Variant-abstracted operations.
//!
//! Each operation takes a `&PlatformContext`, looks up its binary and flag
//! fragments from the tables, executes through the capture runner, and
//! normalizes the answer. Status stays distinct from output throughout:
//! empty output is a legitimate result wherever the wrapped tool prints
//! nothing.
//!
//! Operations:
//! - [`stat_field`] - file metadata scalars
//! - [`date_preset`] / [`date_pattern`] / [`date_from_epoch`] - timestamps
//! - [`sed_inplace`] - in-place text edits
//! - [`canonicalize`] - absolute symlink-free paths, with emulation chain
//! - [`make_temp`] - temp files and directories
//! - [`checksum`] - file digests
//! - [`run_with_timeout`] - bounded execution

pub mod bounded;
pub mod checksum;
pub mod date;
pub mod edit;
pub mod mktemp;
pub mod pathres;
pub mod stat;

pub use bounded::{run_with_timeout, run_with_timeout_config};
pub use checksum::{checksum, ChecksumAlgo};
pub use date::{date_from_epoch, date_pattern, date_preset, DatePreset};
pub use edit::sed_inplace;
pub use mktemp::{make_temp, TempKind};
pub use pathres::canonicalize;
pub use stat::{stat_field, StatField};
