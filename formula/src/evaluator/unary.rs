//! Prefix and postfix operators

use super::bitwise::integer_operand;
use crate::error::{CalcError, ErrorCode};
use crate::operators::OperatorKind;
use crate::parser::Token;
use crate::value::Value;
use crate::CalcResult;

/// Largest n whose factorial is finite in double precision
pub const MAX_FACTORIAL: i64 = 170;

pub fn apply(kind: OperatorKind, operand: &Value, token: &Token) -> CalcResult<Value> {
    match (kind, operand) {
        (OperatorKind::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (OperatorKind::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (OperatorKind::Identity, Value::Number(n)) => Ok(Value::Number(*n)),
        (OperatorKind::BitwiseNot, Value::Number(_)) => {
            let n = integer_operand(kind, operand, token)?;
            Ok(Value::Number(!n as f64))
        }
        (OperatorKind::SquareRoot, Value::Number(n)) => {
            if *n < 0.0 {
                return Err(CalcError::new(
                    ErrorCode::UnsupportedOperation,
                    format!("Cannot take the square root of negative number {}", n),
                    token.span.clone(),
                ));
            }
            Ok(Value::Number(n.sqrt()))
        }
        (OperatorKind::Factorial, Value::Number(_)) => {
            let n = integer_operand(kind, operand, token)?;
            factorial(n)
                .map(Value::Number)
                .ok_or_else(|| {
                    CalcError::new(
                        ErrorCode::UnsupportedOperation,
                        format!(
                            "Factorial is defined for integers from 0 to {}, got {}",
                            MAX_FACTORIAL, n
                        ),
                        token.span.clone(),
                    )
                })
        }
        _ => Err(CalcError::new(
            ErrorCode::TypeMismatch,
            format!(
                "Operator '{}' cannot be applied to {}",
                kind,
                operand.data_type()
            ),
            token.span.clone(),
        )),
    }
}

fn factorial(n: i64) -> Option<f64> {
    if !(0..=MAX_FACTORIAL).contains(&n) {
        return None;
    }
    Some((2..=n).fold(1.0, |acc, k| acc * k as f64))
}
