//! Operator dispatch
//!
//! Every operator token reaches [`binary`] or [`unary`]. Operand types are
//! checked against the operator table first, then the operation for the
//! operator's category runs on the typed values.

use super::{bitwise, datetime, logical, unary as unary_ops};
use crate::error::{CalcError, ErrorCode};
use crate::operators::{OperatorCategory, OperatorKind};
use crate::parser::Token;
use crate::value::Value;
use crate::CalcResult;
use std::cmp::Ordering;

/// Apply a binary operator to two operands
pub fn binary(kind: OperatorKind, left: &Value, right: &Value, token: &Token) -> CalcResult<Value> {
    let valid = kind.operator().valid_types;
    if !valid.contains(left.data_type()) || !valid.contains(right.data_type()) {
        // Both sides of one type the operator has no meaning for, e.g. `true + false`
        let code = if left.data_type() == right.data_type() {
            ErrorCode::UnsupportedOperation
        } else {
            ErrorCode::TypeMismatch
        };
        return Err(CalcError::new(
            code,
            format!(
                "Operator '{}' cannot be applied to {} and {}; it accepts {}",
                kind,
                left.data_type(),
                right.data_type(),
                valid.describe()
            ),
            token.span.clone(),
        ));
    }

    match kind.category() {
        OperatorCategory::Arithmetic => arithmetic(kind, left, right, token),
        OperatorCategory::Bitwise => bitwise::binary(kind, left, right, token),
        OperatorCategory::Comparison => comparison(kind, left, right, token),
        OperatorCategory::Logical => logical::binary(kind, left, right, token),
        OperatorCategory::Unary | OperatorCategory::Conditional => Err(CalcError::new(
            ErrorCode::InvalidSyntax,
            format!("Operator '{}' is not a binary operator", kind),
            token.span.clone(),
        )),
    }
}

/// Apply a prefix or postfix operator to its operand
pub fn unary(kind: OperatorKind, operand: &Value, token: &Token) -> CalcResult<Value> {
    let valid = kind.operator().valid_types;
    if !valid.contains(operand.data_type()) {
        return Err(CalcError::new(
            ErrorCode::TypeMismatch,
            format!(
                "Operator '{}' requires a {} operand, got {}",
                kind,
                valid.describe(),
                operand.data_type()
            ),
            token.span.clone(),
        ));
    }
    unary_ops::apply(kind, operand, token)
}

fn arithmetic(kind: OperatorKind, left: &Value, right: &Value, token: &Token) -> CalcResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            number_arithmetic(kind, *l, *r, token).map(Value::Number)
        }
        (Value::String(l), Value::String(r)) if kind == OperatorKind::Add => {
            Ok(Value::String(format!("{}{}", l, r)))
        }
        (Value::Date(_), _) | (_, Value::Date(_)) => {
            datetime::date_arithmetic(kind, left, right, token)
        }
        _ => Err(CalcError::new(
            ErrorCode::TypeMismatch,
            format!(
                "Operator '{}' cannot be applied to {} and {}",
                kind,
                left.data_type(),
                right.data_type()
            ),
            token.span.clone(),
        )),
    }
}

fn number_arithmetic(kind: OperatorKind, left: f64, right: f64, token: &Token) -> CalcResult<f64> {
    let result = match kind {
        OperatorKind::Add => left + right,
        OperatorKind::Subtract => left - right,
        OperatorKind::Multiply => left * right,
        OperatorKind::Divide | OperatorKind::Modulo => {
            if right == 0.0 {
                return Err(CalcError::new(
                    ErrorCode::DivisionByZero,
                    "Division by zero",
                    token.span.clone(),
                ));
            }
            if kind == OperatorKind::Divide {
                left / right
            } else {
                left % right
            }
        }
        OperatorKind::Power => left.powf(right),
        _ => {
            return Err(CalcError::new(
                ErrorCode::UnsupportedOperation,
                format!("Operator '{}' is not an arithmetic operator", kind),
                token.span.clone(),
            ))
        }
    };
    Ok(result)
}

fn comparison(kind: OperatorKind, left: &Value, right: &Value, token: &Token) -> CalcResult<Value> {
    if left.data_type() != right.data_type() {
        return Err(CalcError::new(
            ErrorCode::TypeMismatch,
            format!(
                "Cannot compare {} with {}",
                left.data_type(),
                right.data_type()
            ),
            token.span.clone(),
        ));
    }

    let result = match kind {
        OperatorKind::Equal => left == right,
        OperatorKind::NotEqual => left != right,
        _ => {
            let ordering = order(left, right).ok_or_else(|| {
                CalcError::new(
                    ErrorCode::UnsupportedOperation,
                    format!("Values of type {} have no ordering", left.data_type()),
                    token.span.clone(),
                )
            })?;
            match kind {
                OperatorKind::Less => ordering == Ordering::Less,
                OperatorKind::LessOrEqual => ordering != Ordering::Greater,
                OperatorKind::Greater => ordering == Ordering::Greater,
                OperatorKind::GreaterOrEqual => ordering != Ordering::Less,
                _ => {
                    return Err(CalcError::new(
                        ErrorCode::UnsupportedOperation,
                        format!("Operator '{}' is not a comparison operator", kind),
                        token.span.clone(),
                    ))
                }
            }
        }
    };
    Ok(Value::Boolean(result))
}

/// Ordering of two values of the same type; `None` for booleans and NaN
fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Date(l), Value::Date(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
