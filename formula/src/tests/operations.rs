use crate::ast::Span;
use crate::error::ErrorCode;
use crate::evaluator::operations::{binary, unary};
use crate::operators::OperatorKind;
use crate::parser::{Token, TokenKind};
use crate::value::Value;
use crate::Engine;
use chrono::DateTime;

fn op_token(kind: OperatorKind) -> Token {
    Token::new(
        TokenKind::Operator { operator: kind },
        kind.symbol(),
        Span::new(3, 1),
    )
}

fn eval(text: &str) -> crate::CalcResult<Value> {
    Engine::new().evaluate(text, None)
}

fn error_code(text: &str) -> ErrorCode {
    eval(text).unwrap_err().code
}

#[test]
fn test_division_by_zero() {
    let token = op_token(OperatorKind::Divide);
    let err = binary(
        OperatorKind::Divide,
        &Value::Number(9.0),
        &Value::Number(0.0),
        &token,
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::DivisionByZero);
    assert_eq!(err.span, Span::new(3, 1));

    assert_eq!(error_code("5 % 0"), ErrorCode::DivisionByZero);
}

#[test]
fn test_string_concatenation() {
    assert_eq!(eval("\"ab\" + 'cd'").unwrap(), Value::from("abcd"));
    assert_eq!(error_code("\"ab\" + 1"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("\"ab\" - \"a\""), ErrorCode::UnsupportedOperation);
}

#[test]
fn test_comparisons() {
    assert_eq!(eval("1 < 2").unwrap(), Value::Boolean(true));
    assert_eq!(eval("2 <= 2").unwrap(), Value::Boolean(true));
    assert_eq!(eval("'b' > 'a'").unwrap(), Value::Boolean(true));
    assert_eq!(eval("1 = 1").unwrap(), Value::Boolean(true));
    assert_eq!(eval("1 <> 1").unwrap(), Value::Boolean(false));
    assert_eq!(eval("true == true").unwrap(), Value::Boolean(true));
    assert_eq!(eval("0.1 + 0.2 == 0.3").unwrap(), Value::Boolean(false));
}

#[test]
fn test_comparisons_require_same_type() {
    assert_eq!(error_code("1 == '1'"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("1 < '1'"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("true < false"), ErrorCode::UnsupportedOperation);
}

#[test]
fn test_logical() {
    assert_eq!(eval("true && false").unwrap(), Value::Boolean(false));
    assert_eq!(eval("true || false").unwrap(), Value::Boolean(true));
    assert_eq!(eval("¬true ∨ true").unwrap(), Value::Boolean(true));
    assert_eq!(error_code("1 && true"), ErrorCode::TypeMismatch);
}

#[test]
fn test_bitwise() {
    assert_eq!(eval("6 & 3").unwrap(), Value::Number(2.0));
    assert_eq!(eval("6 | 3").unwrap(), Value::Number(7.0));
    assert_eq!(eval("7 ^^ 2").unwrap(), Value::Number(5.0));
    assert_eq!(eval("7 ⊕ 2").unwrap(), Value::Number(5.0));
    assert_eq!(eval("true ^^ true").unwrap(), Value::Boolean(false));
    assert_eq!(eval("1 << 4").unwrap(), Value::Number(16.0));
    assert_eq!(eval("-16 >> 2").unwrap(), Value::Number(-4.0));
    assert_eq!(eval("~5").unwrap(), Value::Number(-6.0));
}

#[test]
fn test_bitwise_requires_integers() {
    let err = eval("~1.5").unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
    assert!(err.message.contains("integer"));

    assert_eq!(error_code("1.5 & 1"), ErrorCode::TypeMismatch);
    assert_eq!(eval("3.0000000001 & 1").unwrap(), Value::Number(1.0));
    assert_eq!(error_code("1 << 64"), ErrorCode::UnsupportedOperation);
    assert_eq!(error_code("1 << -1"), ErrorCode::UnsupportedOperation);
}

#[test]
fn test_bitwise_rejects_values_outside_i64() {
    // 2^63 is one past i64::MAX
    assert_eq!(error_code("~9223372036854775808"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("9223372036854775808 & 1"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("1 | -9223372036854777856"), ErrorCode::TypeMismatch);

    assert_eq!(
        crate::value::to_integer(-9_223_372_036_854_775_808.0),
        Some(i64::MIN)
    );
    assert_eq!(crate::value::to_integer(9_223_372_036_854_775_808.0), None);
    assert_eq!(
        eval("4611686018427387904 | 0").unwrap(),
        Value::Number(4611686018427387904.0)
    );
}

#[test]
fn test_unary() {
    assert_eq!(eval("√16").unwrap(), Value::Number(4.0));
    assert_eq!(eval("5!").unwrap(), Value::Number(120.0));
    assert_eq!(eval("0!").unwrap(), Value::Number(1.0));
    assert_eq!(eval("+3").unwrap(), Value::Number(3.0));
    assert_eq!(eval("!false").unwrap(), Value::Boolean(true));
}

#[test]
fn test_unary_errors() {
    let err = eval("!5").unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
    assert!(err.message.contains("boolean"));

    assert_eq!(error_code("√-4"), ErrorCode::UnsupportedOperation);
    assert_eq!(error_code("171!"), ErrorCode::UnsupportedOperation);
    assert_eq!(error_code("(-1)!"), ErrorCode::UnsupportedOperation);
    assert_eq!(error_code("2.5!"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("-true"), ErrorCode::TypeMismatch);
}

#[test]
fn test_largest_factorial_is_finite() {
    match eval("170!").unwrap() {
        Value::Number(n) => assert!(n.is_finite() && n > 7.2e306),
        other => panic!("expected number, got {:?}", other),
    }
}

#[test]
fn test_unary_helper_direct() {
    let token = Token::new(
        TokenKind::UnaryPrefixOperator {
            operator: OperatorKind::Negate,
        },
        "-",
        Span::new(0, 1),
    );
    assert_eq!(
        unary(OperatorKind::Negate, &Value::Number(2.0), &token).unwrap(),
        Value::Number(-2.0)
    );
}

#[test]
fn test_date_arithmetic() {
    let date = |s: &str| Value::Date(DateTime::parse_from_rfc3339(s).unwrap());
    assert_eq!(
        eval("date(2024, 1, 30) + 2").unwrap(),
        date("2024-02-01T00:00:00Z")
    );
    assert_eq!(
        eval("date(2024, 3, 1) - 1").unwrap(),
        date("2024-02-29T00:00:00Z")
    );
    assert_eq!(
        eval("date(2024, 3, 1) - date(2024, 2, 1)").unwrap(),
        Value::Number(29.0)
    );
    assert_eq!(
        eval("date(2024, 1, 1) < date(2024, 1, 2)").unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(error_code("date(2024, 1, 1) * 2"), ErrorCode::TypeMismatch);
    assert_eq!(error_code("1 - date(2024, 1, 1)"), ErrorCode::TypeMismatch);
}
