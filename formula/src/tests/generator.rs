use super::{rpn, tokens};
use crate::ast::Span;
use crate::error::{CalcError, ErrorCode};
use crate::parser::{generate, TokenKind};
use crate::ResourceLimits;

fn generate_err(text: &str) -> CalcError {
    generate(&tokens(text), &ResourceLimits::default()).unwrap_err()
}

#[test]
fn test_precedence_and_associativity() {
    insta::assert_snapshot!(rpn("2^3^2"), @"2 3 2 ^ ^");
    insta::assert_snapshot!(rpn("10-5-4"), @"10 5 - 4 -");
    insta::assert_snapshot!(rpn("1 + 2 * 3"), @"1 2 3 * +");
    insta::assert_snapshot!(rpn("(1 + 2) * 3"), @"1 2 + 3 *");
    insta::assert_snapshot!(rpn("1 < 2 && 3 > 2 || false"), @"1 2 < 3 2 > && false ||");
}

#[test]
fn test_unary_operators() {
    insta::assert_snapshot!(rpn("-1 +--1"), @"1 -u 1 -u -u +");
    insta::assert_snapshot!(rpn("-3!"), @"3 ! -u");
    insta::assert_snapshot!(rpn("2^-1"), @"2 1 -u ^");
    insta::assert_snapshot!(rpn("!true && false"), @"true ! false &&");
}

#[test]
fn test_function_argument_counts() {
    insta::assert_snapshot!(rpn("max(1, 2+3, 4)"), @"1 2 3 + 4 max/3");
    insta::assert_snapshot!(rpn("pi()"), @"pi/0");
    insta::assert_snapshot!(rpn("max(min(1, 2), 3)"), @"1 2 min/2 3 max/2");
}

#[test]
fn test_ternary_becomes_one_token() {
    insta::assert_snapshot!(rpn("true ? 1 : 2"), @"true ?[1]:[2]");
    insta::assert_snapshot!(rpn("1 + (true ? 2 : 3) * 4"), @"1 true ?[2]:[3] 4 * +");
    insta::assert_snapshot!(rpn("max(false ? 1 : 2, 3)"), @"false ?[1]:[2] 3 max/2");
}

#[test]
fn test_nested_ternary_is_right_associative() {
    insta::assert_snapshot!(
        rpn("false ? 1 : true ? 2 : 3"),
        @"false ?[1]:[true ?[2]:[3]]"
    );
    insta::assert_snapshot!(
        rpn("true ? false ? 1 : 2 : 3"),
        @"true ?[false ?[1]:[2]]:[3]"
    );
}

#[test]
fn test_conditional_has_lowest_precedence() {
    insta::assert_snapshot!(rpn("1 + 1 == 2 ? 10 : 20 + 1"), @"1 1 + 2 == ?[10]:[20 1 +]");
}

#[test]
fn test_ternary_token_carries_branches() {
    let out = generate(&tokens("true ? 1 : 9 / 0"), &ResourceLimits::default()).unwrap();
    assert_eq!(out.len(), 2);
    let branches = out[1].ternary_branches().unwrap();
    assert_eq!(branches.true_branch.len(), 1);
    assert_eq!(branches.false_branch.len(), 3);
    assert_eq!(out[1].span, Span::new(5, 1));
    assert!(matches!(out[1].kind, TokenKind::Ternary { .. }));
}

#[test]
fn test_mismatched_parentheses() {
    let err = generate_err("(1 + 2");
    assert_eq!(err.code, ErrorCode::MismatchedParentheses);
    assert_eq!(err.span, Span::new(0, 1));

    let err = generate_err("1 + 2)");
    assert_eq!(err.code, ErrorCode::MismatchedParentheses);
    assert_eq!(err.span, Span::new(5, 1));
}

#[test]
fn test_missing_operand() {
    let err = generate_err("1 +");
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.span, Span::new(2, 1));

    let err = generate_err("1 + * 2");
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.span, Span::new(4, 1));

    let err = generate_err("max(1,,2)");
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.span, Span::new(6, 1));
}

#[test]
fn test_invalid_syntax() {
    let err = generate_err("2 3");
    assert_eq!(err.code, ErrorCode::InvalidSyntax);
    assert_eq!(err.span, Span::new(2, 1));

    assert_eq!(generate_err("2 (3)").code, ErrorCode::InvalidSyntax);
    assert_eq!(generate_err("1, 2").code, ErrorCode::InvalidSyntax);
}

#[test]
fn test_empty_parentheses() {
    let err = generate_err("()");
    assert_eq!(err.code, ErrorCode::InvalidSyntax);
    assert_eq!(err.span, Span::new(0, 2));
}

#[test]
fn test_malformed_ternary() {
    let err = generate_err("true ? 1");
    assert_eq!(err.code, ErrorCode::InvalidSyntax);
    assert_eq!(err.span, Span::new(5, 1));

    let err = generate_err("1 : 2");
    assert_eq!(err.code, ErrorCode::InvalidSyntax);
    assert_eq!(err.span, Span::new(2, 1));

    let err = generate_err("true ? : 2");
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.span, Span::new(5, 1));

    let err = generate_err("true ? 1 :");
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.span, Span::new(9, 1));

    assert_eq!(generate_err("? 1 : 2").code, ErrorCode::MissingOperand);
}

#[test]
fn test_nesting_limit() {
    let limits = ResourceLimits {
        max_nesting_depth: 3,
        ..ResourceLimits::default()
    };
    assert!(generate(&tokens("(((1)))"), &limits).is_ok());

    let err = generate(&tokens("((((1))))"), &limits).unwrap_err();
    assert_eq!(err.code, ErrorCode::NestingTooDeep);
    assert_eq!(err.span, Span::new(3, 1));

    let err = generate(&tokens("(((true ? 1 : 2)))"), &limits).unwrap_err();
    assert_eq!(err.code, ErrorCode::NestingTooDeep);
}
