//! Logical functions
//!
//! `if` evaluates both value arguments before it is called; use the `?:`
//! operator when only the selected branch may run.

use super::{argument, boolean, ArgumentSpec, FunctionError, FunctionExtension, FunctionSignature};
use crate::value::{DataTypes, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogicalFunctions;

impl FunctionExtension for LogicalFunctions {
    fn name(&self) -> &str {
        "logical"
    }

    fn functions(&self) -> Vec<FunctionSignature> {
        let b = DataTypes::BOOLEAN;
        vec![
            FunctionSignature::new(
                "if",
                vec![
                    ArgumentSpec::required("condition", b),
                    ArgumentSpec::required("then", DataTypes::ANY),
                    ArgumentSpec::required("else", DataTypes::ANY),
                ],
            ),
            FunctionSignature::new("and", vec![ArgumentSpec::repeated("values", b, 1, None)]),
            FunctionSignature::new("or", vec![ArgumentSpec::repeated("values", b, 1, None)]),
            FunctionSignature::new("not", vec![ArgumentSpec::required("value", b)]),
        ]
    }

    fn execute(&self, function: &str, arguments: &[Value]) -> Result<Value, FunctionError> {
        let booleans = || -> Result<Vec<bool>, FunctionError> {
            (0..arguments.len()).map(|i| boolean(arguments, i)).collect()
        };
        let value = match function {
            "if" => {
                let index = if boolean(arguments, 0)? { 1 } else { 2 };
                argument(arguments, index)?.clone()
            }
            "and" => Value::Boolean(booleans()?.into_iter().all(|b| b)),
            "or" => Value::Boolean(booleans()?.into_iter().any(|b| b)),
            "not" => Value::Boolean(!boolean(arguments, 0)?),
            other => return Err(FunctionError::UnknownFunction(other.to_string())),
        };
        Ok(value)
    }
}
