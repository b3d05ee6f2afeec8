//! Date functions
//!
//! Dates carry a fixed UTC offset. Day arithmetic keeps the offset of the
//! input date.

use super::{
    argument, invalid, number, string, ArgumentSpec, FunctionError, FunctionExtension,
    FunctionSignature,
};
use crate::evaluator::datetime::{add_days, date_from_ymd, days_between, parse_date};
use crate::value::{to_integer, DataTypes, Value};
use chrono::{DateTime, Datelike, FixedOffset};

#[derive(Debug, Default, Clone, Copy)]
pub struct DateFunctions;

impl FunctionExtension for DateFunctions {
    fn name(&self) -> &str {
        "date"
    }

    fn functions(&self) -> Vec<FunctionSignature> {
        let n = DataTypes::NUMBER;
        let d = DataTypes::DATE;
        let part =
            |name: &str| FunctionSignature::new(name, vec![ArgumentSpec::required("date", d)]);
        vec![
            FunctionSignature::new(
                "date",
                vec![
                    ArgumentSpec::required("year", n),
                    ArgumentSpec::required("month", n),
                    ArgumentSpec::required("day", n),
                ],
            ),
            FunctionSignature::new(
                "parse_date",
                vec![ArgumentSpec::required("text", DataTypes::STRING)],
            ),
            part("year"),
            part("month"),
            part("day"),
            part("weekday"),
            FunctionSignature::new(
                "add_days",
                vec![
                    ArgumentSpec::required("date", d),
                    ArgumentSpec::required("days", n),
                ],
            ),
            FunctionSignature::new(
                "days_between",
                vec![
                    ArgumentSpec::required("from", d),
                    ArgumentSpec::required("to", d),
                ],
            ),
        ]
    }

    fn execute(&self, function: &str, arguments: &[Value]) -> Result<Value, FunctionError> {
        let value = match function {
            "date" => {
                let part = |i: usize| -> Result<i64, FunctionError> {
                    to_integer(number(arguments, i)?).ok_or_else(|| {
                        FunctionError::InvalidArgument(format!(
                            "argument {} must be an integer",
                            i + 1
                        ))
                    })
                };
                let (year, month, day) = (part(0)?, part(1)?, part(2)?);
                Value::Date(from_ymd(year, month, day)?)
            }
            "parse_date" => {
                let text = string(arguments, 0)?;
                Value::Date(parse_date(text).ok_or_else(|| {
                    FunctionError::InvalidArgument(format!("cannot parse '{}' as a date", text))
                })?)
            }
            "year" => Value::Number(f64::from(date(arguments, 0)?.year())),
            "month" => Value::Number(f64::from(date(arguments, 0)?.month())),
            "day" => Value::Number(f64::from(date(arguments, 0)?.day())),
            "weekday" => Value::Number(f64::from(
                date(arguments, 0)?.weekday().number_from_monday(),
            )),
            "add_days" => {
                let start = date(arguments, 0)?;
                Value::Date(add_days(start, number(arguments, 1)?).ok_or_else(|| {
                    FunctionError::Failed("resulting date is out of range".to_string())
                })?)
            }
            "days_between" => {
                let from = date(arguments, 0)?;
                let to = date(arguments, 1)?;
                Value::Number(days_between(from, to))
            }
            other => return Err(FunctionError::UnknownFunction(other.to_string())),
        };
        Ok(value)
    }
}

fn date(arguments: &[Value], index: usize) -> Result<&DateTime<FixedOffset>, FunctionError> {
    argument(arguments, index)?
        .as_date()
        .ok_or_else(|| invalid(index, "a date"))
}

fn from_ymd(year: i64, month: i64, day: i64) -> Result<DateTime<FixedOffset>, FunctionError> {
    let parts = (
        i32::try_from(year).ok(),
        u32::try_from(month).ok(),
        u32::try_from(day).ok(),
    );
    let date = match parts {
        (Some(y), Some(m), Some(d)) => date_from_ymd(y, m, d),
        _ => None,
    };
    date.ok_or_else(|| {
        FunctionError::InvalidArgument(format!("{}-{}-{} is not a valid date", year, month, day))
    })
}
