//! PATH-based command resolution.
//!
//! [`find_command`] probes a list of preferred alternates before the
//! logical name itself; the table builder uses this to prefer g-prefixed
//! GNU tool names on BSD/macOS hosts, where GNU coreutils are conventionally
//! installed with a `g` prefix to avoid shadowing system tools.

use std::path::PathBuf;

use coreshim_core::{CoreshimError, CoreshimResult};

/// PATH lookup predicate: the absolute path of `name`, if installed.
pub fn lookup(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Resolve a logical command, trying preferred alternates first.
///
/// Each alternate is probed in order; the logical name itself is the last
/// candidate. Returns [`CoreshimError::Resolution`] when nothing resolves:
/// the typed not-found sentinel, distinct from any valid path.
pub fn find_command(name: &str, alternates: &[&str]) -> CoreshimResult<PathBuf> {
    for alternate in alternates {
        if let Some(path) = lookup(alternate) {
            return Ok(path);
        }
    }
    lookup(name).ok_or_else(|| {
        let tried = if alternates.is_empty() {
            name.to_string()
        } else {
            format!("{} (alternates: {})", name, alternates.join(", "))
        };
        CoreshimError::resolution(tried)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_logical_name_when_alternates_missing() {
        // A host with only plain sed must still resolve it.
        let path = find_command("sed", &["coreshim_missing_gsed_xyz"]).unwrap();
        assert!(path.ends_with("sed"));
    }

    #[test]
    fn prefers_alternates_over_logical_name() {
        let path = find_command("coreshim_missing_xyz", &["sh"]).unwrap();
        assert!(path.ends_with("sh"));
    }

    #[test]
    fn nothing_resolves_is_a_typed_sentinel() {
        let err =
            find_command("coreshim_missing_xyz", &["coreshim_missing_alt_xyz"]).unwrap_err();
        assert!(matches!(err, CoreshimError::Resolution { .. }));
        assert!(err.to_string().contains("coreshim_missing_xyz"));
    }

    #[test]
    fn lookup_is_a_plain_predicate() {
        assert!(lookup("sh").is_some());
        assert!(lookup("coreshim_missing_xyz").is_none());
    }
}
