//! Tests for the diagnostic surfaces: bare invocation, info, selftest,
//! check-gnu-tools, interface.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Bare invocation prints the detected profile.
#[test]
fn bare_invocation_prints_the_profile() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level").arg("error");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"^\w+ / \w+\n$").unwrap());
}

/// info lists the detected platform and resolved commands.
#[test]
#[cfg(unix)]
fn info_lists_resolved_commands() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level").arg("error").arg("info");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("os:"))
        .stdout(predicate::str::contains("stat"))
        .stdout(predicate::str::contains("stat_size"));
}

/// info --json carries the platform-report schema.
#[test]
#[cfg(unix)]
fn info_json_carries_the_schema() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level").arg("error").arg("info").arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("platform-report.schema.json"))
        .stdout(predicate::str::contains("\"commands\""));
}

/// check-gnu-tools never fails; it only advises.
#[test]
fn check_gnu_tools_is_advisory() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level").arg("error").arg("check-gnu-tools");

    cmd.assert().success();
}

/// The self-test passes end to end on a healthy host.
///
/// This is the slow test of the suite: the deadline check really bounds a
/// sleeping child, so expect a couple of seconds.
#[test]
#[cfg(unix)]
fn selftest_passes_on_this_host() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level").arg("error").arg("selftest");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PASS stat_size_literal"))
        .stdout(predicate::str::contains(", 0 failed"));
}

/// selftest --json carries the report schema.
#[test]
#[cfg(unix)]
fn selftest_json_carries_the_schema() {
    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level")
        .arg("error")
        .arg("selftest")
        .arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("selftest-report.schema.json"));
}

/// Loopback has an address; empty output would mean a conflated failure.
#[test]
#[cfg(target_os = "linux")]
fn interface_reports_the_loopback_address() {
    if which_missing("ip") && which_missing("ifconfig") {
        return;
    }

    let mut cmd = cargo_bin_cmd!("coreshim");
    cmd.arg("--log-level").arg("error").arg("interface").arg("lo");

    cmd.assert().success().stdout("127.0.0.1\n");
}

#[cfg(target_os = "linux")]
fn which_missing(tool: &str) -> bool {
    !std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {tool}"))
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
