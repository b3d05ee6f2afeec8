//! RPN evaluation
//!
//! A single pass over the compiled token stream with a value stack:
//! 1. Literals, constants and variables push a value
//! 2. Operators pop their operands and push the result
//! 3. Function calls pop their arguments, are checked against the registered
//!    signature and then run by their extension
//! 4. A conditional pops its condition and evaluates exactly one of its
//!    branches, recursively

pub mod bitwise;
pub mod context;
pub mod datetime;
pub mod logical;
pub mod operations;
pub mod unary;

pub use context::{normalize_name, VariableContext, Variables};

use crate::environment::Environment;
use crate::error::{CalcError, ErrorCode};
use crate::functions::{ArgumentError, FunctionError};
use crate::parser::{Token, TokenKind};
use crate::value::Value;
use crate::CalcResult;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Evaluate compiled RPN against an environment and optional caller bindings
pub fn evaluate(
    rpn: &[Token],
    source: &str,
    environment: &Environment,
    variables: Option<&Variables>,
) -> CalcResult<Value> {
    let result = Evaluator::new(environment, variables).evaluate(rpn);
    match &result {
        Ok(value) => tracing::debug!(expression = source, %value, "evaluated"),
        Err(error) => tracing::debug!(
            expression = source,
            code = %error.code,
            start = error.span.start,
            length = error.span.length,
            "evaluation failed"
        ),
    }
    result
}

/// Stack machine over one environment and one set of caller bindings
pub struct Evaluator<'a> {
    environment: &'a Environment,
    variables: VariableContext<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(environment: &'a Environment, variables: Option<&'a Variables>) -> Self {
        Self {
            environment,
            variables: VariableContext::new(environment, variables),
        }
    }

    pub fn evaluate(&self, rpn: &[Token]) -> CalcResult<Value> {
        self.run(rpn, ErrorCode::InvalidExpression)
    }

    /// `shape_error` is reported when the sequence does not reduce to one value
    fn run(&self, rpn: &[Token], shape_error: ErrorCode) -> CalcResult<Value> {
        let mut stack: Vec<Value> = Vec::with_capacity(rpn.len());

        for token in rpn {
            let value = match &token.kind {
                TokenKind::Number { .. }
                | TokenKind::String { .. }
                | TokenKind::Constant { .. }
                | TokenKind::Variable { .. } => self.operand(token)?,
                TokenKind::Operator { .. } => {
                    let operands = pop(&mut stack, 2, token, shape_error)?;
                    self.apply(token, &operands)?
                }
                TokenKind::UnaryPrefixOperator { .. } | TokenKind::UnaryPostfixOperator { .. } => {
                    let operands = pop(&mut stack, 1, token, shape_error)?;
                    self.apply(token, &operands)?
                }
                TokenKind::Function { arguments, .. } => {
                    let operands = pop(&mut stack, *arguments, token, shape_error)?;
                    self.apply(token, &operands)?
                }
                TokenKind::Ternary { branches } => {
                    let condition = pop(&mut stack, 1, token, shape_error)?;
                    let taken = select_branch(token, &condition[0])?;
                    let branch = if taken {
                        &branches.true_branch
                    } else {
                        &branches.false_branch
                    };
                    tracing::trace!(at = token.span.start, taken, "selected conditional branch");
                    self.run(branch, ErrorCode::TernaryBranchError)?
                }
                TokenKind::OpeningParen
                | TokenKind::ClosingParen
                | TokenKind::Comma
                | TokenKind::TernaryIf
                | TokenKind::TernaryElse => {
                    return Err(CalcError::new(
                        shape_error,
                        format!("Unexpected '{}' in compiled expression", token.text),
                        token.span.clone(),
                    ))
                }
            };
            stack.push(value);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => Err(CalcError::new(
                shape_error,
                "Compiled expression does not reduce to a single value",
                rpn.first().map(|t| t.span.clone()).unwrap_or_default(),
            )),
        }
    }

    /// Value of a literal, constant or variable token
    pub(crate) fn operand(&self, token: &Token) -> CalcResult<Value> {
        match &token.kind {
            TokenKind::Number { value } => Ok(Value::Number(*value)),
            TokenKind::String { value } => Ok(Value::String(value.clone())),
            TokenKind::Constant { name } => {
                self.environment.constant(name).cloned().ok_or_else(|| {
                    CalcError::new(
                        ErrorCode::ConstantNotFound,
                        format!("Constant '{}' is not defined", name),
                        token.span.clone(),
                    )
                })
            }
            TokenKind::Variable { name } => self.variables.lookup(name).cloned().ok_or_else(|| {
                CalcError::new(
                    ErrorCode::VariableNotFound,
                    format!("Variable '{}' is not defined", name),
                    token.span.clone(),
                )
            }),
            _ => Err(CalcError::new(
                ErrorCode::InvalidExpression,
                format!("'{}' is not a value", token.text),
                token.span.clone(),
            )),
        }
    }

    /// Result of an operator or function token applied to its popped operands
    pub(crate) fn apply(&self, token: &Token, operands: &[Value]) -> CalcResult<Value> {
        match (&token.kind, operands) {
            (TokenKind::Operator { operator }, [left, right]) => {
                operations::binary(*operator, left, right, token)
            }
            (TokenKind::UnaryPrefixOperator { operator }, [operand])
            | (TokenKind::UnaryPostfixOperator { operator }, [operand]) => {
                operations::unary(*operator, operand, token)
            }
            (TokenKind::Function { name, .. }, arguments) => self.call(token, name, arguments),
            _ => Err(CalcError::new(
                ErrorCode::InvalidExpression,
                format!(
                    "'{}' cannot be applied to {} operand(s)",
                    token.text,
                    operands.len()
                ),
                token.span.clone(),
            )),
        }
    }

    fn call(&self, token: &Token, name: &str, arguments: &[Value]) -> CalcResult<Value> {
        let function = self.environment.function(name).ok_or_else(|| {
            CalcError::new(
                ErrorCode::FunctionNotFound,
                format!("Function '{}' is not defined", name),
                token.span.clone(),
            )
        })?;

        function
            .signature
            .validate(arguments)
            .map_err(|e| argument_error(name, e, token))?;

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            function.extension.execute(name, arguments)
        }));
        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(function_error(name, error, token)),
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                tracing::warn!(function = name, detail = %detail, "function extension panicked");
                Err(CalcError::unexpected(
                    format!("Function '{}' panicked: {}", name, detail),
                    token.span.clone(),
                ))
            }
        }
    }
}

/// Which branch of a conditional runs: `true` for the true branch
pub fn select_branch(token: &Token, condition: &Value) -> CalcResult<bool> {
    condition.as_boolean().ok_or_else(|| {
        CalcError::new(
            ErrorCode::TypeMismatch,
            format!(
                "Condition of '?' must be a boolean, got {}",
                condition.data_type()
            ),
            token.span.clone(),
        )
    })
}

fn pop(
    stack: &mut Vec<Value>,
    count: usize,
    token: &Token,
    shape_error: ErrorCode,
) -> CalcResult<Vec<Value>> {
    if stack.len() < count {
        return Err(CalcError::new(
            shape_error,
            format!("Not enough operands for '{}'", token.text),
            token.span.clone(),
        ));
    }
    Ok(stack.split_off(stack.len() - count))
}

fn argument_error(name: &str, error: ArgumentError, token: &Token) -> CalcError {
    match error {
        ArgumentError::Count { expected, actual } => CalcError::new(
            ErrorCode::InvalidArgumentCount,
            format!(
                "Function '{}' expects {} argument(s), got {}",
                name, expected, actual
            ),
            token.span.clone(),
        ),
        ArgumentError::Type {
            index,
            name: argument,
            expected,
            actual,
        } => CalcError::new(
            ErrorCode::InvalidFunctionArgument,
            format!(
                "Argument {} ('{}') of '{}' must be {}, got {}",
                index + 1,
                argument,
                name,
                expected.describe(),
                actual
            ),
            token.span.clone(),
        ),
    }
}

fn function_error(name: &str, error: FunctionError, token: &Token) -> CalcError {
    let code = match &error {
        FunctionError::UnknownFunction(_) => ErrorCode::FunctionNotFound,
        FunctionError::InvalidArgument(_) => ErrorCode::InvalidFunctionArgument,
        FunctionError::Failed(_) => ErrorCode::FunctionExecutionError,
    };
    CalcError::new(
        code,
        format!("Function '{}' failed: {}", name, error),
        token.span.clone(),
    )
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
