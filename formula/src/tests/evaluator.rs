use crate::ast::Span;
use crate::error::ErrorCode;
use crate::evaluator::{Evaluator, Variables};
use crate::functions::{ArgumentSpec, FunctionError, FunctionExtension, FunctionSignature};
use crate::parser::{generate, tokenize, Token, TokenKind};
use crate::value::{DataTypes, Value};
use crate::{CalcResult, Environment, ResourceLimits};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn compile(text: &str, env: &Environment) -> Vec<Token> {
    let limits = ResourceLimits::default();
    generate(&tokenize(text, env, &limits).unwrap(), &limits).unwrap()
}

fn eval_in(text: &str, env: &Environment, vars: Option<&Variables>) -> CalcResult<Value> {
    Evaluator::new(env, vars).evaluate(&compile(text, env))
}

fn eval(text: &str) -> CalcResult<Value> {
    eval_in(text, &Environment::with_defaults(), None)
}

fn number(text: &str) -> f64 {
    match eval(text) {
        Ok(Value::Number(n)) => n,
        other => panic!("{} did not evaluate to a number: {:?}", text, other),
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(number("1 + 2 * 3"), 7.0);
    assert_eq!(number("2^3^2"), 512.0);
    assert_eq!(number("10-5-4"), 1.0);
    assert_eq!(number("-1 +--1"), 0.0);
    assert_eq!(number("-1 +---1"), -2.0);
    assert_eq!(number("7 % 3"), 1.0);
    assert_eq!(number("-7 % 3"), -1.0);
}

#[test]
fn test_literal_operand_values() {
    let env = Environment::with_defaults();
    let evaluator = Evaluator::new(&env, None);
    let token = Token::new(
        TokenKind::String {
            value: "hi".to_string(),
        },
        "\"hi\"",
        Span::new(0, 4),
    );
    assert_eq!(evaluator.operand(&token).unwrap(), Value::from("hi"));
}

#[test]
fn test_variables() {
    let env = Environment::with_defaults();
    let mut vars = Variables::new();
    vars.insert("x".to_string(), Value::Number(4.0));
    assert_eq!(
        eval_in("$x * 2", &env, Some(&vars)).unwrap(),
        Value::Number(8.0)
    );

    let err = eval_in("$y * 2", &env, Some(&vars)).unwrap_err();
    assert_eq!(err.code, ErrorCode::VariableNotFound);
    assert_eq!(err.span, Span::new(0, 2));
}

#[test]
fn test_ternary_only_evaluates_selected_branch() {
    assert_eq!(eval("false ? 1 / 0 : 7").unwrap(), Value::Number(7.0));
    assert_eq!(eval("true ? 7 : $missing").unwrap(), Value::Number(7.0));
    assert_eq!(number("true ? 1 : true ? 2 : 3"), 1.0);
    assert_eq!(number("false ? 1 : true ? 2 : 3"), 2.0);
    assert_eq!(number("false ? 1 : false ? 2 : 3"), 3.0);
}

#[test]
fn test_ternary_condition_must_be_boolean() {
    let err = eval("1 ? 2 : 3").unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
    assert_eq!(err.span, Span::new(2, 1));
}

#[test]
fn test_error_in_taken_branch_is_reported() {
    let err = eval("true ? 1 / 0 : 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::DivisionByZero);
    assert_eq!(err.span, Span::new(9, 1));
}

#[test]
fn test_malformed_rpn_is_rejected() {
    let env = Environment::new();
    let plus = Token::new(
        TokenKind::Operator {
            operator: crate::OperatorKind::Add,
        },
        "+",
        Span::new(0, 1),
    );
    let err = Evaluator::new(&env, None).evaluate(&[plus]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidExpression);

    let one = Token::new(TokenKind::Number { value: 1.0 }, "1", Span::new(0, 1));
    let err = Evaluator::new(&env, None)
        .evaluate(&[one.clone(), one])
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidExpression);
}

struct Counting {
    calls: AtomicUsize,
}

impl FunctionExtension for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn functions(&self) -> Vec<FunctionSignature> {
        vec![
            FunctionSignature::new(
                "twice",
                vec![ArgumentSpec::required("value", DataTypes::NUMBER)],
            ),
            FunctionSignature::new("explode", vec![]),
            FunctionSignature::new("refuse", vec![]),
        ]
    }

    fn execute(&self, function: &str, arguments: &[Value]) -> Result<Value, FunctionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match function {
            "twice" => Ok(Value::Number(arguments[0].as_number().unwrap_or(0.0) * 2.0)),
            "explode" => panic!("boom"),
            _ => Err(FunctionError::Failed("refused".to_string())),
        }
    }
}

fn counting_env() -> (Environment, Arc<Counting>) {
    let extension = Arc::new(Counting {
        calls: AtomicUsize::new(0),
    });
    let mut env = Environment::new();
    env.register_extension(extension.clone());
    (env, extension)
}

#[test]
fn test_function_call() {
    let (env, ext) = counting_env();
    assert_eq!(eval_in("twice(21)", &env, None).unwrap(), Value::Number(42.0));
    assert_eq!(ext.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_function_validation_happens_before_execution() {
    let (env, ext) = counting_env();

    let err = eval_in("twice(1, 2)", &env, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgumentCount);
    assert_eq!(err.span, Span::new(0, 5));

    let err = eval_in("twice(\"a\")", &env, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFunctionArgument);
    assert!(err.message.contains("number"));

    assert_eq!(ext.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_function() {
    let (env, _) = counting_env();
    let err = eval_in("1 + thrice(1)", &env, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::FunctionNotFound);
    assert_eq!(err.span, Span::new(4, 6));
}

#[test]
fn test_extension_failures_are_wrapped() {
    let (env, _) = counting_env();

    let err = eval_in("refuse()", &env, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::FunctionExecutionError);
    assert!(err.message.contains("refuse"));

    let err = eval_in("explode()", &env, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedException);
    assert!(err.message.contains("boom"));
}
