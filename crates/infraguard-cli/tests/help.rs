use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the infraguard binary.
#[allow(deprecated)]
fn infraguard_cmd() -> Command {
    Command::cargo_bin("infraguard").unwrap()
}

#[test]
fn help_works() {
    infraguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("rules"));
}

#[test]
fn check_requires_graph() {
    infraguard_cmd()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--graph"));
}
