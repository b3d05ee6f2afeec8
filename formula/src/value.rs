//! Typed values
//!
//! Every literal, bound variable, constant and intermediate result is a [`Value`].
//! Exactly one variant is populated; the typed accessors return `None` when a
//! caller asks for a variant the value does not hold.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;
use std::fmt;

/// A value produced or consumed by a formula
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Date(DateTime<FixedOffset>),
    String(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Number(_) => DataType::Number,
            Value::Boolean(_) => DataType::Boolean,
            Value::Date(_) => DataType::Date,
            Value::String(_) => DataType::String,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integral view of a number within [`INTEGER_TOLERANCE`] of its rounded value
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(to_integer)
    }
}

/// Maximum distance between a number and its rounded value for it to count as an integer
pub const INTEGER_TOLERANCE: f64 = 1e-9;

/// Convert a float to `i64` if it is integral within tolerance and in range
pub fn to_integer(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let rounded = n.round();
    if (n - rounded).abs() > INTEGER_TOLERANCE {
        return None;
    }
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return None;
    }
    Some(rounded as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Value::Date(d)
    }
}

/// The tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Number,
    Boolean,
    Date,
    String,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::String => "string",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            DataType::Number => 1,
            DataType::Boolean => 2,
            DataType::Date => 4,
            DataType::String => 8,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of data types an operator or function argument accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataTypes(u8);

impl DataTypes {
    pub const NONE: DataTypes = DataTypes(0);
    pub const NUMBER: DataTypes = DataTypes(1);
    pub const BOOLEAN: DataTypes = DataTypes(2);
    pub const DATE: DataTypes = DataTypes(4);
    pub const STRING: DataTypes = DataTypes(8);
    pub const ANY: DataTypes = DataTypes(15);

    pub const fn union(self, other: DataTypes) -> DataTypes {
        DataTypes(self.0 | other.0)
    }

    pub const fn contains(self, data_type: DataType) -> bool {
        self.0 & data_type.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = DataType> {
        [
            DataType::Number,
            DataType::Boolean,
            DataType::Date,
            DataType::String,
        ]
        .into_iter()
        .filter(move |t| self.contains(*t))
    }

    /// Human readable listing, e.g. "number or date"
    pub fn describe(self) -> String {
        if self == DataTypes::ANY {
            return "any value".to_string();
        }
        let names: Vec<&str> = self.iter().map(|t| t.name()).collect();
        match names.len() {
            0 => "nothing".to_string(),
            1 => names[0].to_string(),
            n => format!("{} or {}", names[..n - 1].join(", "), names[n - 1]),
        }
    }
}

impl From<DataType> for DataTypes {
    fn from(data_type: DataType) -> Self {
        DataTypes(data_type.bit())
    }
}

impl Serialize for DataTypes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
