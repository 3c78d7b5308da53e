//! The platform context: detection plus tables as one explicit value.
//!
//! The original design this replaces kept the command/flag tables in
//! process-global mutable state guarded by an "initialized flag AND table
//! non-empty" double check, because a freshly spawned subshell could see
//! the flag without the contents. Owning the tables in a value removes the
//! hazard: [`PlatformContext::init`] either returns a context whose command
//! table passed [`PlatformContext::verify`], or an error. Operations take
//! `&PlatformContext`; nothing re-detects behind the caller's back.

use std::path::Path;

use serde::Serialize;

use coreshim_core::schema::PLATFORM_REPORT_V1;
use coreshim_core::{
    CoreshimError, CoreshimResult, OsFamily, PlatformProfile, ToolDialect, Userland,
};

use crate::table::{build_tables, CommandKind, CommandTable, FlagKey, FlagTable, ResolvedCommand};

/// Resolved platform state: profile, command table, flag table.
///
/// Built once, read-only afterwards, passed by reference into every
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformContext {
    profile: PlatformProfile,
    commands: CommandTable,
    flags: FlagTable,
}

impl PlatformContext {
    /// Detect the host (memoized) and build the tables.
    pub fn init() -> CoreshimResult<Self> {
        Self::with_profile(*PlatformProfile::current())
    }

    /// Build tables for an explicit profile.
    ///
    /// Used by tests and by callers that already hold a profile; `init` is
    /// the production entry point.
    pub fn with_profile(profile: PlatformProfile) -> CoreshimResult<Self> {
        let (commands, flags) = build_tables(&profile)?;
        let ctx = Self {
            profile,
            commands,
            flags,
        };
        ctx.verify()?;
        Ok(ctx)
    }

    /// The detected profile.
    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// OS family shorthand.
    pub fn os(&self) -> OsFamily {
        self.profile.os
    }

    /// Userland variant shorthand.
    pub fn userland(&self) -> Userland {
        self.profile.userland
    }

    /// The resolved binary for a logical command.
    ///
    /// Errors with the typed not-found sentinel when the command did not
    /// resolve on this host.
    pub fn command(&self, kind: CommandKind) -> CoreshimResult<&ResolvedCommand> {
        self.commands
            .get(kind)
            .ok_or_else(|| CoreshimError::resolution(kind.name()))
    }

    /// The resolved binary for a logical command, if any.
    pub fn maybe_command(&self, kind: CommandKind) -> Option<&ResolvedCommand> {
        self.commands.get(kind)
    }

    /// The resolved path for a logical command.
    pub fn command_path(&self, kind: CommandKind) -> CoreshimResult<&Path> {
        self.command(kind).map(|c| c.path.as_path())
    }

    /// The argv fragment for a semantic flag key, if the capability exists.
    pub fn flag(&self, key: FlagKey) -> Option<&[String]> {
        self.flags.get(key)
    }

    /// Re-check the non-empty invariant.
    ///
    /// A context must never look initialized while its tables are empty;
    /// callers that receive a context across a trust boundary can re-assert
    /// it here.
    pub fn verify(&self) -> CoreshimResult<()> {
        if self.commands.is_empty() || self.flags.is_empty() {
            return Err(CoreshimError::internal(
                "platform context published with empty tables",
            ));
        }
        Ok(())
    }

    /// Diagnostic dump of everything the context resolved.
    pub fn report(&self) -> PlatformReport {
        PlatformReport {
            schema_id: PLATFORM_REPORT_V1,
            os: self.profile.os,
            userland: self.profile.userland,
            commands: self
                .commands
                .iter()
                .map(|(kind, resolved)| CommandReportEntry {
                    name: kind.name(),
                    path: resolved.path.display().to_string(),
                    dialect: resolved.dialect,
                })
                .collect(),
            flags: self
                .flags
                .iter()
                .map(|(key, fragment)| FlagReportEntry {
                    key: key.name(),
                    argv: fragment.to_vec(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Diagnostic report
// ============================================================================

/// One resolved command in the diagnostic report.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReportEntry {
    pub name: &'static str,
    pub path: String,
    pub dialect: ToolDialect,
}

/// One populated flag in the diagnostic report.
#[derive(Debug, Clone, Serialize)]
pub struct FlagReportEntry {
    pub key: &'static str,
    pub argv: Vec<String>,
}

/// The `info` diagnostic dump: profile plus both tables.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformReport {
    pub schema_id: &'static str,
    pub os: OsFamily,
    pub userland: Userland,
    pub commands: Vec<CommandReportEntry>,
    pub flags: Vec<FlagReportEntry>,
}
