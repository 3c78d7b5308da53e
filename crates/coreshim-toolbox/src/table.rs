//! Command and flag tables.
//!
//! The table builder turns a [`PlatformProfile`] into two enum-keyed maps:
//! logical command → resolved binary (with its flag dialect), and semantic
//! flag key → concrete argv fragment. Both are built in one pass so a
//! command's flags always match the dialect of the binary that actually
//! resolved, not the dialect the OS family would suggest.
//!
//! Flag fragments are argv token lists, not strings: BSD `sed -i ''` is two
//! tokens (the empty backup suffix is mandatory, and omitting it makes sed
//! eat the expression as the suffix), which a single flag string cannot
//! represent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use coreshim_core::{
    classify_binary, CoreshimError, CoreshimResult, PlatformProfile, ToolDialect, Userland,
};

use crate::resolver::find_command;

// ============================================================================
// Logical commands
// ============================================================================

/// Logical command names the toolkit abstracts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Stat,
    Date,
    Sed,
    Base64,
    Find,
    Xargs,
    Grep,
    Awk,
    Readlink,
    Tar,
    Mktemp,
    Timeout,
}

impl CommandKind {
    /// Every logical command, in table order.
    pub const ALL: [CommandKind; 12] = [
        CommandKind::Stat,
        CommandKind::Date,
        CommandKind::Sed,
        CommandKind::Base64,
        CommandKind::Find,
        CommandKind::Xargs,
        CommandKind::Grep,
        CommandKind::Awk,
        CommandKind::Readlink,
        CommandKind::Tar,
        CommandKind::Mktemp,
        CommandKind::Timeout,
    ];

    /// Commands whose absence fails the table build outright.
    pub const CRITICAL: [CommandKind; 6] = [
        CommandKind::Stat,
        CommandKind::Date,
        CommandKind::Sed,
        CommandKind::Find,
        CommandKind::Grep,
        CommandKind::Awk,
    ];

    /// The plain binary name for this command.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Stat => "stat",
            CommandKind::Date => "date",
            CommandKind::Sed => "sed",
            CommandKind::Base64 => "base64",
            CommandKind::Find => "find",
            CommandKind::Xargs => "xargs",
            CommandKind::Grep => "grep",
            CommandKind::Awk => "awk",
            CommandKind::Readlink => "readlink",
            CommandKind::Tar => "tar",
            CommandKind::Mktemp => "mktemp",
            CommandKind::Timeout => "timeout",
        }
    }

    /// Whether this command is critical (see [`CommandKind::CRITICAL`]).
    pub fn is_critical(self) -> bool {
        Self::CRITICAL.contains(&self)
    }

    /// Preferred g-prefixed alternates on BSD userland hosts.
    fn bsd_alternates(self) -> &'static [&'static str] {
        match self {
            CommandKind::Stat => &["gstat"],
            CommandKind::Date => &["gdate"],
            CommandKind::Sed => &["gsed", "gnu-sed"],
            CommandKind::Base64 => &["gbase64"],
            CommandKind::Find => &["gfind"],
            CommandKind::Xargs => &["gxargs"],
            CommandKind::Grep => &["ggrep"],
            CommandKind::Awk => &["gawk"],
            CommandKind::Readlink => &["greadlink"],
            CommandKind::Tar => &["gtar"],
            CommandKind::Mktemp => &["gmktemp"],
            CommandKind::Timeout => &["gtimeout"],
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Semantic flag keys
// ============================================================================

/// Semantic flag keys the operations look up.
///
/// Enum-keyed so a miss is a compile error at the call site, not a runtime
/// string typo; a key that is *absent from the table* means the resolved
/// binary has no such capability (BSD `readlink` has no canonical mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKey {
    StatSize,
    StatMtime,
    StatAtime,
    StatCtime,
    StatMode,
    DateIso8601,
    DateRfc3339,
    DateEpoch,
    DateFromEpoch,
    SedInPlace,
    SedExtendedRegex,
    ReadlinkCanonical,
    Base64Decode,
    GrepExtended,
    XargsNullSep,
}

impl FlagKey {
    /// Stable snake_case name, used in the diagnostic report.
    pub fn name(self) -> &'static str {
        match self {
            FlagKey::StatSize => "stat_size",
            FlagKey::StatMtime => "stat_mtime",
            FlagKey::StatAtime => "stat_atime",
            FlagKey::StatCtime => "stat_ctime",
            FlagKey::StatMode => "stat_mode",
            FlagKey::DateIso8601 => "date_iso8601",
            FlagKey::DateRfc3339 => "date_rfc3339",
            FlagKey::DateEpoch => "date_epoch",
            FlagKey::DateFromEpoch => "date_from_epoch",
            FlagKey::SedInPlace => "sed_in_place",
            FlagKey::SedExtendedRegex => "sed_extended_regex",
            FlagKey::ReadlinkCanonical => "readlink_canonical",
            FlagKey::Base64Decode => "base64_decode",
            FlagKey::GrepExtended => "grep_extended",
            FlagKey::XargsNullSep => "xargs_null_sep",
        }
    }
}

impl std::fmt::Display for FlagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Tables
// ============================================================================

/// One resolved logical command: the binary plus its flag dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCommand {
    /// Absolute path of the resolved binary.
    pub path: PathBuf,
    /// Flag dialect the binary speaks (decided by probe on BSD hosts).
    pub dialect: ToolDialect,
}

/// Logical command → resolved binary. Unresolved commands are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    entries: BTreeMap<CommandKind, ResolvedCommand>,
}

impl CommandTable {
    /// The resolved binary for a command, if any.
    pub fn get(&self, kind: CommandKind) -> Option<&ResolvedCommand> {
        self.entries.get(&kind)
    }

    /// Number of resolved commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table resolved nothing at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate resolved commands in table order.
    pub fn iter(&self) -> impl Iterator<Item = (CommandKind, &ResolvedCommand)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    fn insert(&mut self, kind: CommandKind, resolved: ResolvedCommand) {
        self.entries.insert(kind, resolved);
    }
}

/// Semantic flag key → argv fragment. Unavailable capabilities are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTable {
    entries: BTreeMap<FlagKey, Vec<String>>,
}

impl FlagTable {
    /// The argv fragment for a flag key, if the capability exists here.
    pub fn get(&self, key: FlagKey) -> Option<&[String]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Number of populated flag keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no flags were populated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate populated flags in table order.
    pub fn iter(&self) -> impl Iterator<Item = (FlagKey, &[String])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    fn insert(&mut self, key: FlagKey, argv: Vec<String>) {
        self.entries.insert(key, argv);
    }
}

// ============================================================================
// Flag sets per dialect
// ============================================================================

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| (*t).to_string()).collect()
}

/// The flag entries one resolved command contributes, by dialect.
///
/// Exhaustive over `(CommandKind, ToolDialect)`; `Unknown` dialects are
/// normalized to GNU before this is called. BusyBox rows are the
/// single-guess minimal set, GNU-shaped where the applets accept it.
fn flags_for(kind: CommandKind, dialect: ToolDialect) -> Vec<(FlagKey, Vec<String>)> {
    use CommandKind::*;
    use FlagKey::*;
    use ToolDialect::*;

    match (kind, dialect) {
        (Stat, Gnu | Busybox | Unknown) => vec![
            (StatSize, argv(&["-c%s"])),
            (StatMtime, argv(&["-c%Y"])),
            (StatAtime, argv(&["-c%X"])),
            (StatCtime, argv(&["-c%Z"])),
            (StatMode, argv(&["-c%a"])),
        ],
        (Stat, Bsd) => vec![
            (StatSize, argv(&["-f%z"])),
            (StatMtime, argv(&["-f%m"])),
            (StatAtime, argv(&["-f%a"])),
            (StatCtime, argv(&["-f%c"])),
            (StatMode, argv(&["-f%Lp"])),
        ],

        (Date, Gnu | Unknown) => vec![
            (DateIso8601, argv(&["-Iseconds"])),
            (DateRfc3339, argv(&["--rfc-3339=seconds"])),
            (DateEpoch, argv(&["+%s"])),
            (DateFromEpoch, argv(&["-d"])),
        ],
        (Date, Bsd) => vec![
            (DateIso8601, argv(&["+%Y-%m-%dT%H:%M:%S%z"])),
            (DateRfc3339, argv(&["+%Y-%m-%d %H:%M:%S%z"])),
            (DateEpoch, argv(&["+%s"])),
            (DateFromEpoch, argv(&["-r"])),
        ],
        (Date, Busybox) => vec![
            (DateIso8601, argv(&["-Iseconds"])),
            // BusyBox date has no --rfc-3339; the equivalent pattern is
            // close enough for the toolkit's consumers.
            (DateRfc3339, argv(&["+%Y-%m-%d %H:%M:%S%z"])),
            (DateEpoch, argv(&["+%s"])),
            (DateFromEpoch, argv(&["-d"])),
        ],

        (Sed, Gnu | Busybox | Unknown) => vec![
            (SedInPlace, argv(&["-i"])),
            (SedExtendedRegex, argv(&["-E"])),
        ],
        // The empty suffix token is mandatory: without it BSD sed parses
        // the expression as the backup suffix.
        (Sed, Bsd) => vec![
            (SedInPlace, argv(&["-i", ""])),
            (SedExtendedRegex, argv(&["-E"])),
        ],

        (Readlink, Gnu | Busybox | Unknown) => vec![(ReadlinkCanonical, argv(&["-f"]))],
        // True BSD readlink has no -f; the operation falls back to its
        // emulation chain.
        (Readlink, Bsd) => vec![],

        (Base64, Gnu | Busybox | Unknown) => vec![(Base64Decode, argv(&["-d"]))],
        (Base64, Bsd) => vec![(Base64Decode, argv(&["-D"]))],

        (Grep, _) => vec![(GrepExtended, argv(&["-E"]))],
        (Xargs, _) => vec![(XargsNullSep, argv(&["-0"]))],

        (Find | Awk | Tar | Mktemp | Timeout, _) => vec![],
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Alternates to probe before the plain name, per variant.
fn alternates_for(kind: CommandKind, userland: Userland) -> &'static [&'static str] {
    match userland {
        Userland::Bsd => kind.bsd_alternates(),
        _ => &[],
    }
}

/// The dialect of a resolved binary, per variant policy.
///
/// GNU and BusyBox variants trust the variant; BSD hosts re-probe the
/// resolved binary, because a g-prefixed alternate is GNU while the system
/// tool beside it is not, and an unprefixed name can be either.
fn dialect_for(kind: CommandKind, path: &Path, userland: Userland) -> ToolDialect {
    match userland {
        Userland::Gnu => ToolDialect::Gnu,
        Userland::Busybox => ToolDialect::Busybox,
        Userland::Bsd => match classify_binary(path) {
            ToolDialect::Unknown => ToolDialect::Bsd,
            dialect => dialect,
        },
        Userland::Solaris | Userland::Unknown => match classify_binary(path) {
            ToolDialect::Unknown => {
                debug!(command = %kind, "dialect probe inconclusive; assuming gnu");
                ToolDialect::Gnu
            }
            dialect => dialect,
        },
    }
}

/// Build the command and flag tables for a detected profile.
///
/// Non-critical commands that fail to resolve degrade to absent entries
/// with a warning; a missing critical command fails the whole build with a
/// [`CoreshimError::Resolution`] naming every missing critical. Building
/// twice from the same profile yields equal tables.
pub fn build_tables(profile: &PlatformProfile) -> CoreshimResult<(CommandTable, FlagTable)> {
    if profile.userland == Userland::Unknown {
        warn!(
            os = %profile.os,
            "userland variant unknown; attempting best-effort command resolution"
        );
    }

    let mut commands = CommandTable::default();
    let mut flags = FlagTable::default();
    let mut missing_critical: Vec<&'static str> = Vec::new();

    for kind in CommandKind::ALL {
        let alternates = alternates_for(kind, profile.userland);
        match find_command(kind.name(), alternates) {
            Ok(path) => {
                let dialect = dialect_for(kind, &path, profile.userland);
                // An Unknown dialect would leave the command without flags;
                // normalize to the GNU superset instead.
                let effective = if dialect == ToolDialect::Unknown {
                    ToolDialect::Gnu
                } else {
                    dialect
                };
                for (key, fragment) in flags_for(kind, effective) {
                    flags.insert(key, fragment);
                }
                commands.insert(kind, ResolvedCommand { path, dialect });
            }
            Err(_) if kind.is_critical() => missing_critical.push(kind.name()),
            Err(_) => {
                warn!(command = %kind, "optional command not found; feature degraded");
            }
        }
    }

    if !missing_critical.is_empty() {
        return Err(CoreshimError::resolution(missing_critical.join(", ")));
    }

    Ok((commands, flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(kind: CommandKind, dialect: ToolDialect, key: FlagKey) -> Option<Vec<String>> {
        flags_for(kind, dialect)
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    #[test]
    fn stat_tokens_are_disjoint_alphabets() {
        assert_eq!(
            flag(CommandKind::Stat, ToolDialect::Gnu, FlagKey::StatSize).unwrap(),
            vec!["-c%s"]
        );
        assert_eq!(
            flag(CommandKind::Stat, ToolDialect::Bsd, FlagKey::StatSize).unwrap(),
            vec!["-f%z"]
        );
        assert_eq!(
            flag(CommandKind::Stat, ToolDialect::Bsd, FlagKey::StatMtime).unwrap(),
            vec!["-f%m"]
        );
    }

    #[test]
    fn bsd_sed_carries_the_empty_suffix_token() {
        assert_eq!(
            flag(CommandKind::Sed, ToolDialect::Bsd, FlagKey::SedInPlace).unwrap(),
            vec!["-i".to_string(), String::new()]
        );
        assert_eq!(
            flag(CommandKind::Sed, ToolDialect::Gnu, FlagKey::SedInPlace).unwrap(),
            vec!["-i"]
        );
    }

    #[test]
    fn bsd_readlink_has_no_canonical_flag() {
        assert!(flag(
            CommandKind::Readlink,
            ToolDialect::Bsd,
            FlagKey::ReadlinkCanonical
        )
        .is_none());
        assert_eq!(
            flag(
                CommandKind::Readlink,
                ToolDialect::Busybox,
                FlagKey::ReadlinkCanonical
            )
            .unwrap(),
            vec!["-f"]
        );
    }

    #[test]
    fn epoch_rendering_flags_differ_by_dialect() {
        assert_eq!(
            flag(CommandKind::Date, ToolDialect::Gnu, FlagKey::DateFromEpoch).unwrap(),
            vec!["-d"]
        );
        assert_eq!(
            flag(CommandKind::Date, ToolDialect::Bsd, FlagKey::DateFromEpoch).unwrap(),
            vec!["-r"]
        );
    }

    #[test]
    fn critical_set_matches_contract() {
        for kind in [
            CommandKind::Stat,
            CommandKind::Date,
            CommandKind::Sed,
            CommandKind::Find,
            CommandKind::Grep,
            CommandKind::Awk,
        ] {
            assert!(kind.is_critical(), "{kind} must be critical");
        }
        assert!(!CommandKind::Readlink.is_critical());
        assert!(!CommandKind::Timeout.is_critical());
    }

    #[test]
    #[cfg(unix)]
    fn builds_on_this_host() {
        let profile = PlatformProfile::detect();
        let (commands, flags) = build_tables(&profile).unwrap();

        for kind in CommandKind::CRITICAL {
            assert!(commands.get(kind).is_some(), "{kind} must resolve");
        }
        assert!(flags.get(FlagKey::StatSize).is_some());
        assert!(flags.get(FlagKey::GrepExtended).is_some());
    }

    #[test]
    #[cfg(unix)]
    fn building_twice_is_byte_identical() {
        let profile = PlatformProfile::detect();
        let first = build_tables(&profile).unwrap();
        let second = build_tables(&profile).unwrap();
        assert_eq!(first, second);
    }
}
