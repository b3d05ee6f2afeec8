//! Numeric functions

use super::{number, ArgumentSpec, FunctionError, FunctionExtension, FunctionSignature};
use crate::value::{to_integer, DataTypes, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct MathFunctions;

const UNARY: [&str; 11] = [
    "abs", "floor", "ceil", "sqrt", "ln", "log10", "exp", "sin", "cos", "tan", "sign",
];

impl FunctionExtension for MathFunctions {
    fn name(&self) -> &str {
        "math"
    }

    fn functions(&self) -> Vec<FunctionSignature> {
        let n = DataTypes::NUMBER;
        let mut signatures: Vec<FunctionSignature> = UNARY
            .iter()
            .map(|name| FunctionSignature::new(name, vec![ArgumentSpec::required("value", n)]))
            .collect();
        signatures.extend([
            FunctionSignature::new(
                "round",
                vec![
                    ArgumentSpec::required("value", n),
                    ArgumentSpec::optional("digits", n),
                ],
            ),
            FunctionSignature::new(
                "pow",
                vec![
                    ArgumentSpec::required("base", n),
                    ArgumentSpec::required("exponent", n),
                ],
            ),
            FunctionSignature::new("min", vec![ArgumentSpec::repeated("values", n, 1, None)]),
            FunctionSignature::new("max", vec![ArgumentSpec::repeated("values", n, 1, None)]),
            FunctionSignature::new("sum", vec![ArgumentSpec::repeated("values", n, 1, None)]),
            FunctionSignature::new("avg", vec![ArgumentSpec::repeated("values", n, 1, None)]),
        ]);
        signatures
    }

    fn execute(&self, function: &str, arguments: &[Value]) -> Result<Value, FunctionError> {
        let numbers = || -> Result<Vec<f64>, FunctionError> {
            (0..arguments.len()).map(|i| number(arguments, i)).collect()
        };

        let result = match function {
            "abs" => number(arguments, 0)?.abs(),
            "floor" => number(arguments, 0)?.floor(),
            "ceil" => number(arguments, 0)?.ceil(),
            "sign" => {
                let x = number(arguments, 0)?;
                if x == 0.0 {
                    0.0
                } else {
                    x.signum()
                }
            }
            "sqrt" => {
                let x = number(arguments, 0)?;
                if x < 0.0 {
                    return Err(FunctionError::InvalidArgument(format!(
                        "cannot take the square root of {}",
                        x
                    )));
                }
                x.sqrt()
            }
            "ln" | "log10" => {
                let x = number(arguments, 0)?;
                if x <= 0.0 {
                    return Err(FunctionError::InvalidArgument(format!(
                        "logarithm is undefined for {}",
                        x
                    )));
                }
                if function == "ln" {
                    x.ln()
                } else {
                    x.log10()
                }
            }
            "exp" => number(arguments, 0)?.exp(),
            "sin" => number(arguments, 0)?.sin(),
            "cos" => number(arguments, 0)?.cos(),
            "tan" => number(arguments, 0)?.tan(),
            "round" => {
                let x = number(arguments, 0)?;
                let digits = match arguments.get(1) {
                    Some(_) => to_integer(number(arguments, 1)?).ok_or_else(|| {
                        FunctionError::InvalidArgument("digits must be an integer".to_string())
                    })?,
                    None => 0,
                };
                if !(-15..=15).contains(&digits) {
                    return Err(FunctionError::InvalidArgument(format!(
                        "digits must be between -15 and 15, got {}",
                        digits
                    )));
                }
                let factor = 10f64.powi(digits as i32);
                (x * factor).round() / factor
            }
            "pow" => number(arguments, 0)?.powf(number(arguments, 1)?),
            "min" => numbers()?.into_iter().fold(f64::INFINITY, f64::min),
            "max" => numbers()?.into_iter().fold(f64::NEG_INFINITY, f64::max),
            "sum" => numbers()?.iter().sum(),
            "avg" => {
                let values = numbers()?;
                values.iter().sum::<f64>() / values.len() as f64
            }
            other => return Err(FunctionError::UnknownFunction(other.to_string())),
        };
        Ok(Value::Number(result))
    }
}
