use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("prv")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--backend-url"));
}

#[test]
fn test_eval_help_shows_raw_flag() {
    cargo_bin_cmd!("prv")
        .args(["eval", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--raw"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("prv")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set-url"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("prv")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
