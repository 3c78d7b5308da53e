//! Live-context integration tests for the abstracted operations.
//!
//! These run against whatever userland the host carries; the assertions
//! are the contracts that hold on every supported variant.

#![cfg(unix)]

use std::fs;
use std::time::{Duration, Instant};

use coreshim_ops::{
    canonicalize, checksum, date_from_epoch, date_preset, make_temp, run_with_timeout,
    sed_inplace, stat_field, ChecksumAlgo, DatePreset, StatField, TempKind,
};
use coreshim_toolbox::PlatformContext;

fn ctx() -> PlatformContext {
    PlatformContext::init().expect("host must build a platform context")
}

// ============================================================================
// stat
// ============================================================================

#[test]
fn stat_size_is_the_literal_byte_count() {
    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();

    let file = dir.path().join("five.bin");
    fs::write(&file, b"12345").unwrap();
    assert_eq!(stat_field(&ctx, StatField::Size, &file).unwrap(), "5");

    let empty = dir.path().join("zero.bin");
    fs::write(&empty, b"").unwrap();
    assert_eq!(stat_field(&ctx, StatField::Size, &empty).unwrap(), "0");
}

#[test]
fn stat_times_are_epoch_integers() {
    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("stamped.txt");
    fs::write(&file, "x").unwrap();

    for field in [StatField::Mtime, StatField::Atime, StatField::Ctime] {
        let value = stat_field(&ctx, field, &file).unwrap();
        let epoch: i64 = value.parse().unwrap_or_else(|_| {
            panic!("{field} should be an epoch integer, got '{value}'")
        });
        // Written moments ago; anything in 2020+ is sane.
        assert!(epoch > 1_577_836_800, "{field} epoch {epoch} is implausible");
    }
}

#[test]
fn stat_mode_reflects_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("mode.txt");
    fs::write(&file, "x").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

    assert_eq!(stat_field(&ctx, StatField::Mode, &file).unwrap(), "640");
}

#[test]
fn stat_on_missing_file_fails_with_status_not_output() {
    let ctx = ctx();
    let err = stat_field(&ctx, StatField::Size, "/nonexistent/coreshim.bin".as_ref()).unwrap_err();
    assert!(matches!(
        err,
        coreshim_core::CoreshimError::Execution { .. }
    ));
}

// ============================================================================
// date
// ============================================================================

#[test]
fn epoch_round_trips_through_from_epoch() {
    let ctx = ctx();

    let epoch_str = date_preset(&ctx, DatePreset::Epoch).unwrap();
    let epoch: i64 = epoch_str.parse().expect("epoch preset must be an integer");

    // Rendering that epoch back through +%s must reproduce it exactly.
    let round_tripped = date_from_epoch(&ctx, epoch, Some("+%s")).unwrap();
    assert_eq!(round_tripped, epoch_str);

    // And the default rendering lands within the same second.
    let rendered = date_from_epoch(&ctx, epoch, None).unwrap();
    assert!(!rendered.is_empty());
}

#[test]
fn iso8601_preset_contains_a_date_and_time() {
    let ctx = ctx();
    let iso = date_preset(&ctx, DatePreset::Iso8601).unwrap();
    assert!(iso.contains('T'), "iso8601 output was '{iso}'");
    assert!(iso.starts_with("20"), "iso8601 output was '{iso}'");
}

#[test]
fn raw_pattern_is_forwarded() {
    let ctx = ctx();
    let year = date_pattern_year(&ctx);
    assert_eq!(year.len(), 4);
    assert!(year.starts_with("20"));
}

fn date_pattern_year(ctx: &PlatformContext) -> String {
    coreshim_ops::date_pattern(ctx, "+%Y").unwrap()
}

// ============================================================================
// canonicalize
// ============================================================================

#[test]
fn canonical_paths_are_absolute_and_keep_the_basename() {
    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("target.txt");
    fs::write(&file, "x").unwrap();
    fs::create_dir(dir.path().join("detour")).unwrap();

    let dotted = dir.path().join("detour/../target.txt");
    let resolved = canonicalize(&ctx, &dotted).unwrap();

    assert!(resolved.is_absolute());
    assert_eq!(resolved.file_name().unwrap(), "target.txt");
}

#[test]
fn canonicalize_is_idempotent() {
    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("stable.txt");
    fs::write(&file, "x").unwrap();

    let once = canonicalize(&ctx, &file).unwrap();
    let twice = canonicalize(&ctx, &once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn canonicalize_resolves_symlinks() {
    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("real.txt");
    fs::write(&real, "x").unwrap();
    let link = dir.path().join("alias.txt");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let resolved = canonicalize(&ctx, &link).unwrap();
    assert_eq!(resolved, fs::canonicalize(&real).unwrap());
}

#[test]
fn canonicalize_handles_a_missing_leaf() {
    let ctx = ctx();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-created-yet.txt");

    let resolved = canonicalize(&ctx, &missing).unwrap();
    assert!(resolved.is_absolute());
    assert_eq!(resolved.file_name().unwrap(), "not-created-yet.txt");
}

// ============================================================================
// mktemp
// ============================================================================

#[test]
fn make_temp_creates_files_and_directories() {
    let ctx = ctx();

    let file = make_temp(&ctx, TempKind::File, None).unwrap();
    assert!(file.is_file());
    fs::remove_file(&file).unwrap();

    let dir = make_temp(&ctx, TempKind::Dir, None).unwrap();
    assert!(dir.is_dir());
    fs::remove_dir(&dir).unwrap();
}

#[test]
fn make_temp_honors_templates() {
    let ctx = ctx();
    let scratch = tempfile::tempdir().unwrap();
    let template = format!("{}/shim.XXXXXX", scratch.path().display());

    let file = make_temp(&ctx, TempKind::File, Some(&template)).unwrap();
    assert!(file.is_file());
    assert!(file.starts_with(scratch.path()));
    let name = file.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("shim."), "unexpected name {name}");
}

// ============================================================================
// checksum
// ============================================================================

#[test]
fn digests_match_known_vectors() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hello.txt");
    fs::write(&file, "hello\n").unwrap();

    assert_eq!(
        checksum(ChecksumAlgo::Md5, &file).unwrap(),
        "b1946ac92492d2347c6235b4d2611184"
    );
    assert_eq!(
        checksum(ChecksumAlgo::Sha256, &file).unwrap(),
        "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
    );
}

#[test]
fn digests_are_deterministic_and_content_sensitive() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("payload.bin");
    fs::write(&file, b"abc123").unwrap();

    let first = checksum(ChecksumAlgo::Sha256, &file).unwrap();
    let second = checksum(ChecksumAlgo::Sha256, &file).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), ChecksumAlgo::Sha256.digest_len());

    fs::write(&file, b"abc124").unwrap();
    let changed = checksum(ChecksumAlgo::Sha256, &file).unwrap();
    assert_ne!(first, changed);
}

#[test]
fn every_algorithm_yields_its_width() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("widths.bin");
    fs::write(&file, b"width probe").unwrap();

    for algo in [
        ChecksumAlgo::Md5,
        ChecksumAlgo::Sha1,
        ChecksumAlgo::Sha256,
        ChecksumAlgo::Sha512,
    ] {
        let digest = checksum(algo, &file).unwrap();
        assert_eq!(digest.len(), algo.digest_len(), "width mismatch for {algo}");
    }
}

// ============================================================================
// bounded execution
// ============================================================================

#[test]
fn bounded_sleep_is_cut_off_in_time() {
    let ctx = ctx();
    let start = Instant::now();
    let outcome = run_with_timeout(&ctx, Duration::from_secs(1), "sleep", &["5"]).unwrap();
    let elapsed = start.elapsed();

    assert!(outcome.timed_out());
    assert_eq!(outcome.exit_code(), 124);
    assert!(
        elapsed < Duration::from_millis(2500),
        "deadline overran: {elapsed:?}"
    );
}

#[test]
fn bounded_fast_command_completes_normally() {
    let ctx = ctx();
    let outcome = run_with_timeout(&ctx, Duration::from_secs(5), "true", &[]).unwrap();
    assert!(!outcome.timed_out());
    assert_eq!(outcome.exit_code(), 0);
}
