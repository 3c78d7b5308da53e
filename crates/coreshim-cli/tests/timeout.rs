use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Test that timeout completes successfully for fast commands.
#[test]
fn timeout_fast_command_succeeds() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("5s")
        .arg("echo")
        .arg("hello");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

/// Test that timeout returns exit code 124 when the command times out.
#[test]
#[cfg(unix)]
fn timeout_slow_command_returns_124() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("100ms")
        .arg("--kill-after")
        .arg("100ms")
        .arg("sleep")
        .arg("60");

    cmd.assert().code(124);
}

/// Test that timeout returns exit code 127 for command not found.
#[test]
fn timeout_command_not_found_returns_127() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("5s")
        .arg("nonexistent_command_xyz_12345");

    cmd.assert().code(127);
}

/// Test that the child's own exit code is propagated on completion.
#[test]
#[cfg(unix)]
fn timeout_propagates_child_exit_code() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("5s")
        .arg("sh")
        .arg("-c")
        .arg("exit 3");

    cmd.assert().code(3);
}

/// Test duration parsing with various formats.
#[test]
fn timeout_duration_parsing_seconds() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("1") // Plain number = seconds
        .arg("echo")
        .arg("test");

    cmd.assert().success();
}

#[test]
fn timeout_duration_parsing_milliseconds() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("500ms")
        .arg("echo")
        .arg("test");

    cmd.assert().success();
}

/// Test invalid duration is rejected with a usage error.
#[test]
fn timeout_invalid_duration_rejected() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("invalid")
        .arg("echo")
        .arg("test");

    cmd.assert().code(2);
}

/// Test that --json emits the bounded-result contract.
#[test]
#[cfg(unix)]
fn timeout_json_output_carries_the_schema() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("timeout")
        .arg("--json")
        .arg("100ms")
        .arg("--kill-after")
        .arg("100ms")
        .arg("sleep")
        .arg("60");

    cmd.assert()
        .code(124)
        .stdout(predicate::str::contains("bounded-result.schema.json"))
        .stdout(predicate::str::contains("timed_out"));
}
