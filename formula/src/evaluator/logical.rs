//! Logical operators
//!
//! `&&` and `||` see both operands already evaluated; only `?:` skips work.

use crate::error::{CalcError, ErrorCode};
use crate::operators::OperatorKind;
use crate::parser::Token;
use crate::value::Value;
use crate::CalcResult;

pub fn binary(kind: OperatorKind, left: &Value, right: &Value, token: &Token) -> CalcResult<Value> {
    let (l, r) = match (left.as_boolean(), right.as_boolean()) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            return Err(CalcError::new(
                ErrorCode::TypeMismatch,
                format!(
                    "Operator '{}' requires boolean operands, got {} and {}",
                    kind,
                    left.data_type(),
                    right.data_type()
                ),
                token.span.clone(),
            ))
        }
    };

    match kind {
        OperatorKind::And => Ok(Value::Boolean(l && r)),
        OperatorKind::Or => Ok(Value::Boolean(l || r)),
        _ => Err(CalcError::new(
            ErrorCode::UnsupportedOperation,
            format!("Operator '{}' is not a logical operator", kind),
            token.span.clone(),
        )),
    }
}
