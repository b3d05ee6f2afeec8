use crate::ast::Span;
use serde::Serialize;
use std::fmt;

/// Error taxonomy; each pipeline stage owns a numeric band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    // Tokenizer
    InvalidExpression,
    EmptyExpression,
    UnknownToken,
    UnterminatedString,
    InvalidNumberFormat,
    ExpressionTooLong,

    // Generator
    MismatchedParentheses,
    InvalidSyntax,
    MissingOperand,
    NestingTooDeep,

    // Evaluator
    DivisionByZero,
    InvalidFunctionArgument,
    VariableNotFound,
    FunctionNotFound,
    TypeMismatch,
    UnsupportedOperation,
    TernaryBranchError,
    ArgumentNull,
    FunctionExecutionError,
    InvalidArgumentCount,
    ConstantNotFound,

    UnexpectedException,
}

/// The pipeline stage that owns an error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tokenizer,
    Generator,
    Evaluator,
    Internal,
}

impl ErrorCode {
    pub fn number(&self) -> u16 {
        match self {
            ErrorCode::InvalidExpression => 1000,
            ErrorCode::EmptyExpression => 1001,
            ErrorCode::UnknownToken => 1002,
            ErrorCode::UnterminatedString => 1003,
            ErrorCode::InvalidNumberFormat => 1004,
            ErrorCode::ExpressionTooLong => 1005,
            ErrorCode::MismatchedParentheses => 2000,
            ErrorCode::InvalidSyntax => 2001,
            ErrorCode::MissingOperand => 2002,
            ErrorCode::NestingTooDeep => 2003,
            ErrorCode::DivisionByZero => 3000,
            ErrorCode::InvalidFunctionArgument => 3001,
            ErrorCode::VariableNotFound => 3002,
            ErrorCode::FunctionNotFound => 3003,
            ErrorCode::TypeMismatch => 3004,
            ErrorCode::UnsupportedOperation => 3005,
            ErrorCode::TernaryBranchError => 3006,
            ErrorCode::ArgumentNull => 3007,
            ErrorCode::FunctionExecutionError => 3008,
            ErrorCode::InvalidArgumentCount => 3009,
            ErrorCode::ConstantNotFound => 3010,
            ErrorCode::UnexpectedException => 9000,
        }
    }

    pub fn stage(&self) -> Stage {
        match self.number() {
            1000..=1999 => Stage::Tokenizer,
            2000..=2999 => Stage::Generator,
            3000..=3999 => Stage::Evaluator,
            _ => Stage::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A positioned diagnostic produced by any pipeline stage
///
/// Serializes to the stable shape `{ code, message, startIndex, length, severity }`
/// that editor integrations rely on for highlighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    pub severity: Severity,
}

impl CalcError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            severity: Severity::Error,
        }
    }

    /// Wrap an unexpected internal failure (such as a caught panic)
    pub fn unexpected(detail: impl fmt::Display, span: Span) -> Self {
        Self::new(
            ErrorCode::UnexpectedException,
            format!("Unexpected error: {}", detail),
            span,
        )
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn start_index(&self) -> usize {
        self.span.start
    }

    pub fn length(&self) -> usize {
        self.span.length
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} at {}..{}",
            self.code,
            self.code.number(),
            self.message,
            self.span.start,
            self.span.end()
        )
    }
}

impl std::error::Error for CalcError {}
