use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use coreshim_core::schema::BOUNDED_RESULT_V1;
use coreshim_core::{exit_codes, CoreshimError};
use coreshim_net::{flush_dns, interface_ip, interface_mac, restart_network, RepairOutcome};
use coreshim_ops::{
    canonicalize, checksum, date_from_epoch, date_pattern, date_preset, make_temp,
    run_with_timeout_config, sed_inplace, stat_field, ChecksumAlgo, DatePreset, StatField,
    TempKind,
};
use coreshim_timeout::{BoundedConfig, BoundedOutcome};
use coreshim_toolbox::{check_gnu_tools, PlatformContext};

mod selftest;

/// A userland shim: one flag dialect per host, resolved once.
#[derive(Parser, Debug)]
#[command(name = "coreshim", version, about, long_about = None)]
struct Cli {
    /// The format for log output.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// The minimum log level to display.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the detected platform and every resolved command and flag.
    Info(InfoArgs),

    /// Exercise every operation against a scratch directory.
    ///
    /// Exits nonzero if any check fails. Takes a couple of seconds: the
    /// deadline checks really do bound a sleeping child.
    Selftest(SelftestArgs),

    /// Advise on missing GNU tools (macOS only; no-op elsewhere).
    CheckGnuTools,

    /// Print one scalar of file metadata.
    Stat(StatArgs),

    /// Render the current time, a raw pattern, or an epoch.
    Date(DateArgs),

    /// Edit a file in place with a sed expression.
    SedInplace(SedArgs),

    /// Resolve a path to absolute, symlink-free form.
    Canonicalize(CanonicalizeArgs),

    /// Create a temp file or directory and print its path.
    Mktemp(MktempArgs),

    /// Run a command with a hard deadline.
    ///
    /// Uses the native timeout binary when one resolved; otherwise the
    /// emulation sends SIGTERM at the deadline and escalates to SIGKILL
    /// after a grace period. Exits 124 on timeout.
    Timeout(TimeoutArgs),

    /// Print a file's hex digest.
    Checksum(ChecksumArgs),

    /// Print an interface's IPv4 address or MAC.
    Interface(InterfaceArgs),

    /// Flush the system DNS cache (best effort).
    DnsFlush,

    /// Restart networking, or bounce one interface (best effort).
    NetRestart(NetRestartArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Output JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SelftestArgs {
    /// Output the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct StatArgs {
    /// Which scalar to print: size, mtime, atime, ctime, or mode.
    #[arg(long, value_name = "FIELD", default_value = "size")]
    field: String,

    /// Target file.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct DateArgs {
    /// Named preset: iso8601, rfc3339, or epoch.
    #[arg(long, value_name = "PRESET", conflicts_with = "format")]
    preset: Option<String>,

    /// Raw date pattern, e.g. "+%Y-%m-%d".
    #[arg(long, value_name = "PATTERN")]
    format: Option<String>,

    /// Render this epoch instead of the current time.
    #[arg(long, value_name = "EPOCH", conflicts_with = "preset")]
    epoch: Option<i64>,
}

#[derive(Parser, Debug)]
struct SedArgs {
    /// Sed expression, e.g. "s/old/new/g".
    #[arg(value_name = "EXPR")]
    expr: String,

    /// Target file.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct CanonicalizeArgs {
    /// Path to resolve; the final component need not exist.
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct MktempArgs {
    /// Create a directory instead of a file.
    #[arg(short = 'd', long)]
    dir: bool,

    /// Template containing XXXXXX; default location when omitted.
    #[arg(value_name = "TEMPLATE")]
    template: Option<String>,
}

#[derive(Parser, Debug)]
struct TimeoutArgs {
    /// Deadline (e.g. "5s", "1m", "500ms"); plain numbers are seconds.
    #[arg(value_name = "DURATION")]
    duration: String,

    /// Command to execute.
    #[arg(value_name = "COMMAND")]
    command: String,

    /// Arguments to pass to the command.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    /// Send SIGKILL if the command is still running after this grace
    /// period (default: 1s).
    #[arg(short = 'k', long = "kill-after", value_name = "DURATION")]
    kill_after: Option<String>,

    /// Output a JSON result instead of only the exit code.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ChecksumArgs {
    /// Algorithm: md5, sha1, sha256, or sha512.
    #[arg(long, value_name = "ALGO", default_value = "sha256")]
    algo: String,

    /// Target file.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct InterfaceArgs {
    /// Interface name, e.g. eth0 or en0.
    #[arg(value_name = "IFACE")]
    iface: String,

    /// Print the MAC address instead of the IPv4 address.
    #[arg(long)]
    mac: bool,
}

#[derive(Parser, Debug)]
struct NetRestartArgs {
    /// Bounce just this interface instead of restarting the stack.
    #[arg(value_name = "IFACE")]
    iface: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable text format.
    Text,
    /// Machine-readable JSON format.
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize the tracing subscriber
    let filter = EnvFilter::from_default_env().add_directive(cli.log_level.into());

    match cli.log_format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }

    let Some(command) = cli.command else {
        // Bare invocation: a one-line identity, like `uname` would give.
        let profile = coreshim_core::PlatformProfile::current();
        println!("{} / {}", profile.os, profile.userland);
        return;
    };

    match run_command(command) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("coreshim: {err}");
            std::process::exit(err.error_code());
        }
    }
}

fn run_command(command: Command) -> Result<i32, CoreshimError> {
    match command {
        Command::Info(args) => run_info(args),
        Command::Selftest(args) => run_selftest_cmd(args),
        Command::CheckGnuTools => run_check_gnu_tools(),
        Command::Stat(args) => run_stat(args),
        Command::Date(args) => run_date(args),
        Command::SedInplace(args) => run_sed(args),
        Command::Canonicalize(args) => run_canonicalize(args),
        Command::Mktemp(args) => run_mktemp(args),
        Command::Timeout(args) => run_timeout(args),
        Command::Checksum(args) => run_checksum(args),
        Command::Interface(args) => run_interface(args),
        Command::DnsFlush => Ok(repair_exit(flush_dns(coreshim_core::PlatformProfile::current()))),
        Command::NetRestart(args) => Ok(repair_exit(restart_network(
            coreshim_core::PlatformProfile::current(),
            args.iface.as_deref(),
        ))),
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

fn run_info(args: InfoArgs) -> Result<i32, CoreshimError> {
    let ctx = PlatformContext::init()?;
    let report = ctx.report();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("serialize json")
        );
        return Ok(exit_codes::SUCCESS);
    }

    println!("os:       {}", report.os);
    println!("userland: {}", report.userland);
    println!();
    println!("{:<10} {:<10} PATH", "COMMAND", "DIALECT");
    for entry in &report.commands {
        println!("{:<10} {:<10} {}", entry.name, entry.dialect.as_str(), entry.path);
    }
    println!();
    println!("{:<20} ARGV", "FLAG");
    for entry in &report.flags {
        println!("{:<20} {:?}", entry.key, entry.argv);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_selftest_cmd(args: SelftestArgs) -> Result<i32, CoreshimError> {
    let ctx = PlatformContext::init()?;
    let report = selftest::run_selftest(&ctx);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("serialize json")
        );
    } else {
        for check in &report.passed {
            println!("PASS {check}");
        }
        for failure in &report.failed {
            println!("FAIL {} ({})", failure.check, failure.reason);
        }
        println!(
            "{} passed, {} failed",
            report.passed.len(),
            report.failed.len()
        );
    }

    Ok(if report.ok() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    })
}

fn run_check_gnu_tools() -> Result<i32, CoreshimError> {
    let profile = coreshim_core::PlatformProfile::current();
    let missing = check_gnu_tools(profile);

    if profile.os != coreshim_core::OsFamily::Macos {
        println!("not macOS; nothing to advise");
        return Ok(exit_codes::SUCCESS);
    }

    if missing.is_empty() {
        println!("all advisory GNU tools present");
    } else {
        for m in &missing {
            println!("missing {} (brew install {})", m.tool, m.package);
        }
    }
    // Advisory only; never a failing exit.
    Ok(exit_codes::SUCCESS)
}

// ============================================================================
// Operations
// ============================================================================

fn run_stat(args: StatArgs) -> Result<i32, CoreshimError> {
    let field: StatField = args.field.parse()?;
    let ctx = PlatformContext::init()?;
    println!("{}", stat_field(&ctx, field, &args.file)?);
    Ok(exit_codes::SUCCESS)
}

fn run_date(args: DateArgs) -> Result<i32, CoreshimError> {
    let ctx = PlatformContext::init()?;

    let rendered = if let Some(epoch) = args.epoch {
        date_from_epoch(&ctx, epoch, args.format.as_deref())?
    } else if let Some(pattern) = args.format.as_deref() {
        date_pattern(&ctx, pattern)?
    } else {
        let preset: DatePreset = args.preset.as_deref().unwrap_or("iso8601").parse()?;
        date_preset(&ctx, preset)?
    };

    println!("{rendered}");
    Ok(exit_codes::SUCCESS)
}

fn run_sed(args: SedArgs) -> Result<i32, CoreshimError> {
    let ctx = PlatformContext::init()?;
    sed_inplace(&ctx, &args.expr, &args.file)?;
    Ok(exit_codes::SUCCESS)
}

fn run_canonicalize(args: CanonicalizeArgs) -> Result<i32, CoreshimError> {
    let ctx = PlatformContext::init()?;
    println!("{}", canonicalize(&ctx, &args.path)?.display());
    Ok(exit_codes::SUCCESS)
}

fn run_mktemp(args: MktempArgs) -> Result<i32, CoreshimError> {
    let ctx = PlatformContext::init()?;
    let kind = if args.dir { TempKind::Dir } else { TempKind::File };
    println!(
        "{}",
        make_temp(&ctx, kind, args.template.as_deref())?.display()
    );
    Ok(exit_codes::SUCCESS)
}

#[derive(Serialize)]
struct BoundedResultJson {
    schema_id: &'static str,
    outcome: BoundedOutcome,
    exit_code: i32,
}

fn run_timeout(args: TimeoutArgs) -> Result<i32, CoreshimError> {
    let limit = parse_duration(&args.duration)?;
    let grace = match &args.kill_after {
        Some(d) => parse_duration(d)?,
        None => Duration::from_secs(1),
    };

    let ctx = PlatformContext::init()?;
    let config = BoundedConfig {
        grace,
        ..Default::default()
    };

    let arg_refs: Vec<&str> = args.args.iter().map(String::as_str).collect();

    info!(
        command = %args.command,
        limit_ms = limit.as_millis() as u64,
        "running command under deadline"
    );

    let outcome = run_with_timeout_config(&ctx, limit, &args.command, &arg_refs, &config)?;

    if args.json {
        let out = BoundedResultJson {
            schema_id: BOUNDED_RESULT_V1,
            outcome,
            exit_code: outcome.exit_code(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&out).expect("serialize json")
        );
    }

    Ok(outcome.exit_code())
}

fn run_checksum(args: ChecksumArgs) -> Result<i32, CoreshimError> {
    let algo: ChecksumAlgo = args.algo.parse()?;
    println!("{}", checksum(algo, &args.file)?);
    Ok(exit_codes::SUCCESS)
}

fn run_interface(args: InterfaceArgs) -> Result<i32, CoreshimError> {
    let answer = if args.mac {
        interface_mac(&args.iface)?
    } else {
        interface_ip(&args.iface)?
    };

    // No address is a legitimate answer, not a failure; print nothing.
    if let Some(value) = answer {
        println!("{value}");
    }
    Ok(exit_codes::SUCCESS)
}

fn repair_exit(outcome: RepairOutcome) -> i32 {
    match outcome {
        RepairOutcome::Applied(strategy) => {
            println!("applied: {strategy}");
            exit_codes::SUCCESS
        }
        RepairOutcome::Failed => {
            println!("failed (see warnings)");
            exit_codes::FAILURE
        }
        RepairOutcome::Unsupported => {
            println!("unsupported on this host");
            exit_codes::UNSUPPORTED
        }
    }
}

// ============================================================================
// Duration parsing
// ============================================================================

fn parse_duration(s: &str) -> Result<Duration, CoreshimError> {
    let s = s.trim();

    // Try to parse as plain number (seconds)
    if let Ok(secs) = s.parse::<f64>() {
        if secs < 0.0 {
            return Err(CoreshimError::configuration("duration cannot be negative"));
        }
        return Ok(Duration::from_secs_f64(secs));
    }

    // Try to parse with suffix
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("ms") {
        (n, 0.001)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60.0)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3600.0)
    } else {
        return Err(CoreshimError::configuration(format!(
            "invalid duration '{s}': expected number or number with suffix (ms, s, m, h)"
        )));
    };

    let num: f64 = num_str.trim().parse().map_err(|_| {
        CoreshimError::configuration(format!("invalid duration '{s}': not a valid number"))
    })?;

    if num < 0.0 {
        return Err(CoreshimError::configuration("duration cannot be negative"));
    }

    Ok(Duration::from_secs_f64(num * multiplier))
}
