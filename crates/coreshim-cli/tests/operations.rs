//! End-to-end tests for the operation subcommands.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// stat --field size prints the literal byte count.
#[test]
#[cfg(unix)]
fn stat_size_prints_the_byte_count() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("five.bin");
    fs::write(&file, b"12345").unwrap();

    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("stat")
        .arg("--field")
        .arg("size")
        .arg(&file);

    cmd.assert().success().stdout("5\n");
}

/// An unknown stat field is a usage error.
#[test]
fn stat_unknown_field_is_a_usage_error() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("stat")
        .arg("--field")
        .arg("blocks")
        .arg("/etc/hosts");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("unknown stat field"));
}

/// date --format forwards raw patterns.
#[test]
#[cfg(unix)]
fn date_raw_pattern_is_forwarded() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("date")
        .arg("--format")
        .arg("+%s");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{10,}\n$").unwrap());
}

/// date --epoch renders a fixed epoch through a pattern.
#[test]
#[cfg(unix)]
fn date_epoch_rendering_round_trips() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("date")
        .arg("--epoch")
        .arg("1700000000")
        .arg("--format")
        .arg("+%s");

    cmd.assert().success().stdout("1700000000\n");
}

/// checksum prints a digest of the algorithm's width.
#[test]
#[cfg(unix)]
fn checksum_md5_prints_32_hex_chars() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("payload.txt");
    fs::write(&file, "hello\n").unwrap();

    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("checksum")
        .arg("--algo")
        .arg("md5")
        .arg(&file);

    cmd.assert()
        .success()
        .stdout("b1946ac92492d2347c6235b4d2611184\n");
}

/// An unsupported algorithm is a usage error.
#[test]
fn checksum_unknown_algorithm_is_a_usage_error() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("checksum")
        .arg("--algo")
        .arg("crc32")
        .arg("/etc/hosts");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported checksum algorithm"));
}

/// sed-inplace edits the file and leaves no backup beside it.
#[test]
#[cfg(unix)]
fn sed_inplace_edits_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("text.txt");
    fs::write(&file, "hello world\n").unwrap();

    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("sed-inplace")
        .arg("s/hello/goodbye/")
        .arg(&file);

    cmd.assert().success();
    assert_eq!(fs::read_to_string(&file).unwrap(), "goodbye world\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

/// canonicalize turns a relative path absolute and keeps the basename.
#[test]
#[cfg(unix)]
fn canonicalize_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("target.txt"), "x").unwrap();

    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.current_dir(dir.path())
        .arg("--log-level")
        .arg("error")
        .arg("canonicalize")
        .arg("target.txt");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("/"))
        .stdout(predicate::str::ends_with("/target.txt\n"));
}

/// mktemp --dir creates a directory and prints its path.
#[test]
#[cfg(unix)]
fn mktemp_creates_a_directory() {
    let scratch = tempfile::tempdir().unwrap();
    let template = format!("{}/shim.XXXXXX", scratch.path().display());

    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("mktemp")
        .arg("--dir")
        .arg(&template);

    let output = cmd.assert().success().get_output().stdout.clone();
    let path = String::from_utf8(output).unwrap().trim().to_string();
    assert!(std::path::Path::new(&path).is_dir());
}
