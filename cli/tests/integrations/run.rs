use assert_cmd::Command;
use predicates::prelude::*;

fn formula() -> Command {
    Command::cargo_bin("formula").unwrap()
}

#[test]
fn test_cli_eval_simple_expression() {
    formula()
        .args(["eval", "2 ^ 3 ^ 2"])
        .assert()
        .success()
        .stdout("512\n");
}

#[test]
fn test_cli_eval_leading_minus() {
    formula()
        .args(["eval", "-2 ^ 2"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_cli_eval_with_variables() {
    formula()
        .args(["eval", "$x * 2 + $y", "x=20", "$y=2"])
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn test_cli_eval_typed_bindings() {
    formula()
        .args(["eval", "$flag ? upper($name) : 'no'", "flag=true", "name=ada"])
        .assert()
        .success()
        .stdout("\"ADA\"\n");

    formula()
        .args(["eval", "$start + 1", "start=2024-02-28"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2024-02-29"));
}

#[test]
fn test_cli_eval_runtime_error() {
    formula()
        .args(["eval", "1 / 0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DivisionByZero"))
        .stderr(predicate::str::contains("Division by zero"));
}

#[test]
fn test_cli_eval_syntax_error() {
    formula()
        .args(["eval", "(1 + 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MismatchedParentheses"));
}

#[test]
fn test_cli_eval_missing_variable() {
    formula()
        .args(["eval", "$x + 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VariableNotFound"));
}

#[test]
fn test_cli_eval_rejects_malformed_binding() {
    formula()
        .args(["eval", "$x", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected NAME=VALUE"));
}

#[test]
fn test_cli_eval_json() {
    formula()
        .args(["eval", "--json", "1 + 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"rpnTokens\""));
}

#[test]
fn test_cli_eval_json_failure() {
    formula()
        .args(["eval", "--json", "1 / 0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("\"code\": \"DivisionByZero\""));
}

#[test]
fn test_cli_eval_ast() {
    formula()
        .args(["eval", "--ast", "1 + 2 * 3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("└─ * = 6"))
        .stdout(predicate::str::ends_with("7\n"));
}
