//! coreshim-toolbox: Command resolution and per-variant flag tables
//!
//! This crate provides:
//! - PATH-based command resolution with preferred alternates
//!   ([`find_command`])
//! - The once-per-process command/flag tables, built by branching on the
//!   detected userland variant and re-probing resolved binaries on BSD
//!   hosts ([`build_tables`])
//! - The explicit [`PlatformContext`] value that every abstracted operation
//!   consumes
//! - The macOS GNU-tools advisory ([`check_gnu_tools`])
//!
//! # Example
//!
//! ```no_run
//! use coreshim_toolbox::{CommandKind, FlagKey, PlatformContext};
//!
//! let ctx = PlatformContext::init().unwrap();
//! let stat = ctx.command(CommandKind::Stat).unwrap();
//! let size_flag = ctx.flag(FlagKey::StatSize).unwrap();
//! println!("{} {:?}", stat.path.display(), size_flag);
//! ```

pub mod context;
pub mod gnu_check;
pub mod resolver;
pub mod table;

pub use context::{PlatformContext, PlatformReport};
pub use gnu_check::{check_gnu_tools, MissingTool, GNU_TOOL_PACKAGES};
pub use resolver::{find_command, lookup};
pub use table::{build_tables, CommandKind, CommandTable, FlagKey, FlagTable, ResolvedCommand};
