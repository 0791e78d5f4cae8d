//! End-to-end tests for the `subcmd-demo` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn demo() -> Command {
    let mut cmd = Command::cargo_bin("subcmd-demo").expect("demo binary is built");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn runs_nested_subcommand() {
    demo()
        .args(["db", "scan", "db-scan-argument"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "db scan: args=[\"db-scan-argument\"]",
        ));
}

#[test]
fn binds_leaf_flags() {
    demo()
        .args(["run", "-background", "-port=8080", "run-argument"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run: background=true listen=0.0.0.0:8080"))
        .stdout(predicate::str::contains("args=[\"run-argument\"]"));
}

#[test]
fn global_flags_apply_before_subcommands() {
    demo()
        .args(["-dry-run", "job", "pause", "-timeout", "90s", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[dry-run] job pause: timeout=1m30s args=[\"42\"]",
        ));
}

#[test]
fn root_help_exits_cleanly() {
    demo()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Usage: subcmd-demo [flags] <command> [args...]",
        ))
        .stderr(predicate::str::contains("-dry-run"));
}

#[test]
fn leaf_help_exits_cleanly() {
    demo()
        .args(["run", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Runs the daemon."))
        .stderr(predicate::str::contains("-data-dir directory"));
}

#[test]
fn help_command_describes_nested_target() {
    demo()
        .args(["help", "job", "cancel"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Usage: subcmd-demo job cancel [flags] [args...]",
        ))
        .stderr(predicate::str::contains("Cancels a job."));
}

#[test]
fn group_without_subcommand_fails() {
    demo()
        .arg("db")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: subcmd-demo db <command>"))
        .stderr(predicate::str::contains("error: db: missing subcommand"));
}

#[test]
fn bad_flag_value_fails() {
    demo()
        .args(["run", "-port=abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: invalid value \"abc\" for flag -port: parse error",
        ));
}
