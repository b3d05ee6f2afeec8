use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_tokens() {
    Command::cargo_bin("formula")
        .unwrap()
        .args(["tokens", "max(1, 2) > 1 ? 'a' : 'b'"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OpeningParen"))
        .stdout(predicate::str::contains("RPN: 1 2 max/2 1 > ?['a']:['b']"));
}

#[test]
fn test_cli_tokens_reports_unknown_token() {
    Command::cargo_bin("formula")
        .unwrap()
        .args(["tokens", "1 + @"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownToken"));
}

#[test]
fn test_cli_functions() {
    Command::cargo_bin("formula")
        .unwrap()
        .arg("functions")
        .assert()
        .success()
        .stdout(predicate::str::contains("substring"))
        .stdout(predicate::str::contains("days_between"))
        .stdout(predicate::str::contains("Extension"));
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("formula")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("tokens"));
}
