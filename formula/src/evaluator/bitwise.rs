//! Bitwise operators
//!
//! Numbers take part only when they are integral (within tolerance); they are
//! converted through `i64` and the result is converted back. `^^` on booleans
//! is logical exclusive or.

use crate::error::{CalcError, ErrorCode};
use crate::operators::OperatorKind;
use crate::parser::Token;
use crate::value::Value;
use crate::CalcResult;

const MAX_SHIFT: i64 = 63;

pub fn binary(kind: OperatorKind, left: &Value, right: &Value, token: &Token) -> CalcResult<Value> {
    if let (Value::Boolean(l), Value::Boolean(r)) = (left, right) {
        return match kind {
            OperatorKind::BitwiseXor => Ok(Value::Boolean(l ^ r)),
            _ => Err(CalcError::new(
                ErrorCode::UnsupportedOperation,
                format!("Operator '{}' cannot be applied to booleans", kind),
                token.span.clone(),
            )),
        };
    }

    let l = integer_operand(kind, left, token)?;
    let r = integer_operand(kind, right, token)?;
    let result = match kind {
        OperatorKind::BitwiseAnd => l & r,
        OperatorKind::BitwiseOr => l | r,
        OperatorKind::BitwiseXor => l ^ r,
        OperatorKind::ShiftLeft | OperatorKind::ShiftRight => {
            if !(0..=MAX_SHIFT).contains(&r) {
                return Err(CalcError::new(
                    ErrorCode::UnsupportedOperation,
                    format!("Shift count must be between 0 and {}, got {}", MAX_SHIFT, r),
                    token.span.clone(),
                ));
            }
            if kind == OperatorKind::ShiftLeft {
                l << r
            } else {
                l >> r
            }
        }
        _ => {
            return Err(CalcError::new(
                ErrorCode::UnsupportedOperation,
                format!("Operator '{}' is not a bitwise operator", kind),
                token.span.clone(),
            ))
        }
    };
    Ok(Value::Number(result as f64))
}

/// The integral value of a numeric operand, or a type error naming the operator
pub(crate) fn integer_operand(kind: OperatorKind, value: &Value, token: &Token) -> CalcResult<i64> {
    value.as_integer().ok_or_else(|| {
        CalcError::new(
            ErrorCode::TypeMismatch,
            format!("Operator '{}' requires an integer operand, got {}", kind, value),
            token.span.clone(),
        )
    })
}
