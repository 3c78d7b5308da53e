//! Self-test harness.
//!
//! Exercises every abstracted operation against a scratch directory that is
//! itself created through the mktemp operation, so a failing table shows up
//! in the very first check. Each check logs a PASS/FAIL line; the report
//! carries the names for the JSON contract and the exit status.

use std::fs;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info};

use coreshim_core::schema::SELFTEST_REPORT_V1;
use coreshim_ops::{
    canonicalize, checksum, date_from_epoch, date_preset, make_temp, run_with_timeout,
    sed_inplace, stat_field, ChecksumAlgo, DatePreset, StatField, TempKind,
};
use coreshim_toolbox::PlatformContext;

/// Outcome of one self-test run.
#[derive(Debug, Serialize)]
pub struct SelftestReport {
    pub schema_id: &'static str,
    pub passed: Vec<&'static str>,
    pub failed: Vec<FailedCheck>,
}

/// One failing check with its reason.
#[derive(Debug, Serialize)]
pub struct FailedCheck {
    pub check: &'static str,
    pub reason: String,
}

impl SelftestReport {
    /// Whether every check passed.
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, check: &'static str, result: Result<(), String>) {
        match result {
            Ok(()) => {
                info!(check, "PASS");
                self.passed.push(check);
            }
            Err(reason) => {
                error!(check, reason = %reason, "FAIL");
                self.failed.push(FailedCheck { check, reason });
            }
        }
    }
}

/// Run every check. Never panics; failures land in the report.
pub fn run_selftest(ctx: &PlatformContext) -> SelftestReport {
    let mut report = SelftestReport {
        schema_id: SELFTEST_REPORT_V1,
        passed: Vec::new(),
        failed: Vec::new(),
    };

    report.record("tables_idempotent", check_tables_idempotent(ctx));

    // Scratch directory through the shim's own mktemp; everything after
    // this depends on it.
    let scratch = match make_temp(ctx, TempKind::Dir, None) {
        Ok(dir) => {
            report.record("mktemp_dir", Ok(()));
            dir
        }
        Err(e) => {
            report.record("mktemp_dir", Err(e.to_string()));
            return report;
        }
    };

    report.record("stat_size_literal", check_stat_size(ctx, &scratch));
    report.record("date_epoch_roundtrip", check_date_roundtrip(ctx));
    report.record("date_iso8601", check_date_iso8601(ctx));
    report.record("sed_inplace_clean", check_sed_inplace(ctx, &scratch));
    report.record("canonicalize_stable", check_canonicalize(ctx, &scratch));
    report.record("mktemp_template", check_mktemp_template(ctx, &scratch));
    report.record("checksum_sensitive", check_checksum(&scratch));
    report.record("timeout_bounds", check_timeout_bounds(ctx));
    report.record("timeout_fast_path", check_timeout_fast(ctx));

    if let Err(e) = fs::remove_dir_all(&scratch) {
        error!(scratch = %scratch.display(), error = %e, "scratch cleanup failed");
    }

    report
}

fn fail(reason: impl Into<String>) -> Result<(), String> {
    Err(reason.into())
}

fn check_tables_idempotent(ctx: &PlatformContext) -> Result<(), String> {
    let rebuilt = PlatformContext::init().map_err(|e| e.to_string())?;
    if rebuilt != *ctx {
        return fail("second table build differs from the first");
    }
    Ok(())
}

fn check_stat_size(ctx: &PlatformContext, scratch: &std::path::Path) -> Result<(), String> {
    let file = scratch.join("five.bin");
    fs::write(&file, b"12345").map_err(|e| e.to_string())?;
    let size = stat_field(ctx, StatField::Size, &file).map_err(|e| e.to_string())?;
    if size != "5" {
        return fail(format!("expected \"5\", got \"{size}\""));
    }
    Ok(())
}

fn check_date_roundtrip(ctx: &PlatformContext) -> Result<(), String> {
    let epoch_str = date_preset(ctx, DatePreset::Epoch).map_err(|e| e.to_string())?;
    let epoch: i64 = epoch_str
        .parse()
        .map_err(|_| format!("epoch preset printed \"{epoch_str}\""))?;
    let round = date_from_epoch(ctx, epoch, Some("+%s")).map_err(|e| e.to_string())?;
    if round != epoch_str {
        return fail(format!("round trip drifted: {epoch_str} -> {round}"));
    }
    Ok(())
}

fn check_date_iso8601(ctx: &PlatformContext) -> Result<(), String> {
    let iso = date_preset(ctx, DatePreset::Iso8601).map_err(|e| e.to_string())?;
    if !iso.contains('T') {
        return fail(format!("iso8601 preset printed \"{iso}\""));
    }
    Ok(())
}

fn check_sed_inplace(ctx: &PlatformContext, scratch: &std::path::Path) -> Result<(), String> {
    let dir = scratch.join("sed");
    fs::create_dir(&dir).map_err(|e| e.to_string())?;
    let file = dir.join("text.txt");
    fs::write(&file, "hello\n").map_err(|e| e.to_string())?;

    sed_inplace(ctx, "s/hello/goodbye/", &file).map_err(|e| e.to_string())?;

    let content = fs::read_to_string(&file).map_err(|e| e.to_string())?;
    if content != "goodbye\n" {
        return fail(format!("edit produced \"{content}\""));
    }

    let extra: Vec<String> = fs::read_dir(&dir)
        .map_err(|e| e.to_string())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "text.txt")
        .collect();
    if !extra.is_empty() {
        return fail(format!("backup artifacts left behind: {extra:?}"));
    }
    Ok(())
}

fn check_canonicalize(ctx: &PlatformContext, scratch: &std::path::Path) -> Result<(), String> {
    let file = scratch.join("canon.txt");
    fs::write(&file, "x").map_err(|e| e.to_string())?;

    let once = canonicalize(ctx, &file).map_err(|e| e.to_string())?;
    if !once.is_absolute() {
        return fail(format!("resolved path not absolute: {}", once.display()));
    }
    if once.file_name().map(|n| n != "canon.txt").unwrap_or(true) {
        return fail("basename not preserved");
    }
    let twice = canonicalize(ctx, &once).map_err(|e| e.to_string())?;
    if once != twice {
        return fail("resolution is not idempotent");
    }
    Ok(())
}

fn check_mktemp_template(ctx: &PlatformContext, scratch: &std::path::Path) -> Result<(), String> {
    let template = format!("{}/probe.XXXXXX", scratch.display());
    let path = make_temp(ctx, TempKind::File, Some(&template)).map_err(|e| e.to_string())?;
    if !path.is_file() {
        return fail(format!("{} was not created", path.display()));
    }
    if !path.starts_with(scratch) {
        return fail("template location ignored");
    }
    Ok(())
}

fn check_checksum(scratch: &std::path::Path) -> Result<(), String> {
    let file = scratch.join("digest.bin");
    fs::write(&file, b"abc123").map_err(|e| e.to_string())?;

    let first = checksum(ChecksumAlgo::Sha256, &file).map_err(|e| e.to_string())?;
    let second = checksum(ChecksumAlgo::Sha256, &file).map_err(|e| e.to_string())?;
    if first != second {
        return fail("digest not deterministic");
    }
    if first.len() != ChecksumAlgo::Sha256.digest_len() {
        return fail(format!("unexpected digest width {}", first.len()));
    }

    fs::write(&file, b"abc124").map_err(|e| e.to_string())?;
    let changed = checksum(ChecksumAlgo::Sha256, &file).map_err(|e| e.to_string())?;
    if first == changed {
        return fail("digest ignored a content change");
    }
    Ok(())
}

fn check_timeout_bounds(ctx: &PlatformContext) -> Result<(), String> {
    let start = Instant::now();
    let outcome = run_with_timeout(ctx, Duration::from_secs(1), "sleep", &["5"])
        .map_err(|e| e.to_string())?;
    let elapsed = start.elapsed();

    if !outcome.timed_out() {
        return fail("sleep 5 was not cut off");
    }
    if elapsed >= Duration::from_millis(2500) {
        return fail(format!("deadline overran: {elapsed:?}"));
    }
    Ok(())
}

fn check_timeout_fast(ctx: &PlatformContext) -> Result<(), String> {
    let outcome =
        run_with_timeout(ctx, Duration::from_secs(5), "true", &[]).map_err(|e| e.to_string())?;
    if outcome.timed_out() || outcome.exit_code() != 0 {
        return fail(format!("fast path misbehaved: {outcome:?}"));
    }
    Ok(())
}
