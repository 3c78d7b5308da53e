//! File digests via whichever checksum tool the host carries.
//!
//! GNU userlands ship `md5sum`/`sha256sum`-style tools that print
//! `<digest>  <file>`; macOS/BSD hosts fall back to `shasum -a <bits>`
//! (same output shape) or `md5 -q` (digest only). These tools are resolved
//! per call rather than through the command table, because the candidate
//! set depends on the algorithm, not the userland.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use coreshim_core::{run_checked, CoreshimError, CoreshimResult};
use coreshim_toolbox::lookup;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgo {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumAlgo {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumAlgo::Md5 => "md5",
            ChecksumAlgo::Sha1 => "sha1",
            ChecksumAlgo::Sha256 => "sha256",
            ChecksumAlgo::Sha512 => "sha512",
        }
    }

    /// The GNU-style `<algo>sum` binary name.
    fn sum_binary(self) -> &'static str {
        match self {
            ChecksumAlgo::Md5 => "md5sum",
            ChecksumAlgo::Sha1 => "sha1sum",
            ChecksumAlgo::Sha256 => "sha256sum",
            ChecksumAlgo::Sha512 => "sha512sum",
        }
    }

    /// Bit width argument for `shasum -a`; None for md5.
    fn shasum_bits(self) -> Option<&'static str> {
        match self {
            ChecksumAlgo::Md5 => None,
            ChecksumAlgo::Sha1 => Some("1"),
            ChecksumAlgo::Sha256 => Some("256"),
            ChecksumAlgo::Sha512 => Some("512"),
        }
    }

    /// Expected hex digest length.
    pub fn digest_len(self) -> usize {
        match self {
            ChecksumAlgo::Md5 => 32,
            ChecksumAlgo::Sha1 => 40,
            ChecksumAlgo::Sha256 => 64,
            ChecksumAlgo::Sha512 => 128,
        }
    }
}

impl FromStr for ChecksumAlgo {
    type Err = CoreshimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumAlgo::Md5),
            "sha1" => Ok(ChecksumAlgo::Sha1),
            "sha256" => Ok(ChecksumAlgo::Sha256),
            "sha512" => Ok(ChecksumAlgo::Sha512),
            other => Err(CoreshimError::configuration(format!(
                "unsupported checksum algorithm '{other}' (expected md5, sha1, sha256, or sha512)"
            ))),
        }
    }
}

impl std::fmt::Display for ChecksumAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract and validate the digest from a checksum tool's output.
///
/// `<algo>sum` and `shasum` print `<digest>  <file>`; `md5 -q` prints the
/// digest alone. Either way the first whitespace-separated token is the
/// digest, and its length and alphabet are checked against the algorithm.
fn parse_digest(algo: ChecksumAlgo, output: &str) -> CoreshimResult<String> {
    let digest = output
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    if digest.len() != algo.digest_len() || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoreshimError::internal(format!(
            "unexpected {algo} digest '{digest}'"
        )));
    }
    Ok(digest)
}

/// The hex digest of a file's contents.
///
/// # Errors
///
/// * `Resolution` - no tool for this algorithm on this host
/// * `Execution` - the tool ran but failed (typically a missing file)
pub fn checksum(algo: ChecksumAlgo, path: &Path) -> CoreshimResult<String> {
    let path_arg = path.to_string_lossy();
    let path_arg: &str = &path_arg;

    if let Some(tool) = lookup(algo.sum_binary()) {
        let out = run_checked(&tool, &[path_arg])?;
        return parse_digest(algo, &out.stdout);
    }

    if let Some(bits) = algo.shasum_bits() {
        if let Some(shasum) = lookup("shasum") {
            debug!(algo = %algo, "falling back to shasum");
            let out = run_checked(&shasum, &["-a", bits, path_arg])?;
            return parse_digest(algo, &out.stdout);
        }
    }

    if algo == ChecksumAlgo::Md5 {
        if let Some(md5) = lookup("md5") {
            debug!("falling back to md5 -q");
            let out = run_checked(&md5, &["-q", path_arg])?;
            return parse_digest(algo, &out.stdout);
        }
    }

    Err(CoreshimError::resolution(algo.sum_binary()))
}
