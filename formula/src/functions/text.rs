//! String functions

use super::{
    argument, number, string, ArgumentSpec, FunctionError, FunctionExtension, FunctionSignature,
};
use crate::value::{to_integer, DataTypes, Value};
use regex::Regex;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextFunctions;

impl FunctionExtension for TextFunctions {
    fn name(&self) -> &str {
        "text"
    }

    fn functions(&self) -> Vec<FunctionSignature> {
        let s = DataTypes::STRING;
        let n = DataTypes::NUMBER;
        let single =
            |name: &str| FunctionSignature::new(name, vec![ArgumentSpec::required("text", s)]);
        vec![
            single("len"),
            single("upper"),
            single("lower"),
            single("trim"),
            FunctionSignature::new(
                "concat",
                vec![ArgumentSpec::repeated("values", DataTypes::ANY, 1, None)],
            ),
            FunctionSignature::new(
                "contains",
                vec![
                    ArgumentSpec::required("text", s),
                    ArgumentSpec::required("search", s),
                ],
            ),
            FunctionSignature::new(
                "substring",
                vec![
                    ArgumentSpec::required("text", s),
                    ArgumentSpec::required("start", n),
                    ArgumentSpec::optional("length", n),
                ],
            ),
            FunctionSignature::new(
                "matches",
                vec![
                    ArgumentSpec::required("text", s),
                    ArgumentSpec::required("pattern", s),
                ],
            ),
            FunctionSignature::new("text", vec![ArgumentSpec::required("value", DataTypes::ANY)]),
        ]
    }

    fn execute(&self, function: &str, arguments: &[Value]) -> Result<Value, FunctionError> {
        let value = match function {
            "len" => Value::Number(string(arguments, 0)?.chars().count() as f64),
            "upper" => Value::String(string(arguments, 0)?.to_uppercase()),
            "lower" => Value::String(string(arguments, 0)?.to_lowercase()),
            "trim" => Value::String(string(arguments, 0)?.trim().to_string()),
            "concat" => Value::String(arguments.iter().map(|a| a.to_string()).collect()),
            "contains" => Value::Boolean(string(arguments, 0)?.contains(string(arguments, 1)?)),
            "substring" => {
                let text = string(arguments, 0)?;
                let start = index(number(arguments, 1)?, "start")?;
                let chars = text.chars().skip(start);
                let result: String = match arguments.get(2) {
                    Some(_) => chars.take(index(number(arguments, 2)?, "length")?).collect(),
                    None => chars.collect(),
                };
                Value::String(result)
            }
            "matches" => {
                let pattern = string(arguments, 1)?;
                let regex = Regex::new(pattern).map_err(|e| {
                    FunctionError::InvalidArgument(format!("invalid pattern '{}': {}", pattern, e))
                })?;
                Value::Boolean(regex.is_match(string(arguments, 0)?))
            }
            "text" => Value::String(argument(arguments, 0)?.to_string()),
            other => return Err(FunctionError::UnknownFunction(other.to_string())),
        };
        Ok(value)
    }
}

fn index(n: f64, what: &str) -> Result<usize, FunctionError> {
    to_integer(n)
        .filter(|i| *i >= 0)
        .map(|i| i as usize)
        .ok_or_else(|| {
            FunctionError::InvalidArgument(format!(
                "{} must be a non-negative integer, got {}",
                what, n
            ))
        })
}
