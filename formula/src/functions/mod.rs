//! Function extensions
//!
//! Functions are provided by registered extensions. Each extension declares the
//! signatures of the functions it offers; the evaluator checks arity and argument
//! types against the declared signature before `execute` is called, so extensions
//! only deal with well-typed input.

pub mod date;
pub mod logical;
pub mod math;
pub mod text;

use crate::value::{DataType, DataTypes, Value};
use serde::Serialize;
use thiserror::Error;

/// A provider of named functions
pub trait FunctionExtension: Send + Sync {
    /// Name of the extension, e.g. "math"
    fn name(&self) -> &str;

    /// Signatures of every function this extension provides
    fn functions(&self) -> Vec<FunctionSignature>;

    /// Run `function` with arguments already validated against its signature
    fn execute(&self, function: &str, arguments: &[Value]) -> Result<Value, FunctionError>;
}

/// Failure reported by a function extension
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    #[error("function '{0}' is not provided by this extension")]
    UnknownFunction(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub arguments: Vec<ArgumentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub types: DataTypes,
    pub optional: bool,
    /// Repeating group: how many consecutive arguments this spec may absorb
    pub repeat: Option<Repeat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repeat {
    pub min: usize,
    pub max: Option<usize>,
}

impl ArgumentSpec {
    pub fn required(name: &str, types: DataTypes) -> Self {
        Self {
            name: name.to_string(),
            types,
            optional: false,
            repeat: None,
        }
    }

    pub fn optional(name: &str, types: DataTypes) -> Self {
        Self {
            optional: true,
            ..Self::required(name, types)
        }
    }

    pub fn repeated(name: &str, types: DataTypes, min: usize, max: Option<usize>) -> Self {
        Self {
            repeat: Some(Repeat { min, max }),
            ..Self::required(name, types)
        }
    }

    fn min_count(&self) -> usize {
        match (self.repeat, self.optional) {
            (Some(repeat), _) => repeat.min,
            (None, true) => 0,
            (None, false) => 1,
        }
    }

    fn max_count(&self) -> Option<usize> {
        match self.repeat {
            Some(repeat) => repeat.max,
            None => Some(1),
        }
    }
}

/// Why a call does not match a signature
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentError {
    Count {
        expected: String,
        actual: usize,
    },
    Type {
        index: usize,
        name: String,
        expected: DataTypes,
        actual: DataType,
    },
}

impl FunctionSignature {
    pub fn new(name: &str, arguments: Vec<ArgumentSpec>) -> Self {
        Self {
            name: name.to_string(),
            arguments,
        }
    }

    pub fn min_arguments(&self) -> usize {
        self.arguments.iter().map(|a| a.min_count()).sum()
    }

    pub fn max_arguments(&self) -> Option<usize> {
        self.arguments
            .iter()
            .try_fold(0usize, |acc, a| a.max_count().map(|m| acc + m))
    }

    fn describe_arity(&self) -> String {
        let min = self.min_arguments();
        match self.max_arguments() {
            Some(max) if max == min => format!("exactly {}", min),
            Some(max) => format!("between {} and {}", min, max),
            None => format!("at least {}", min),
        }
    }

    /// Assign arguments to specs in order and check their types
    ///
    /// Optional and repeating specs absorb as many arguments as they can while
    /// leaving enough for the required specs that follow them.
    pub fn validate(&self, arguments: &[Value]) -> Result<(), ArgumentError> {
        let count_error = || ArgumentError::Count {
            expected: self.describe_arity(),
            actual: arguments.len(),
        };

        let mut position = 0;
        for (k, spec) in self.arguments.iter().enumerate() {
            let reserved: usize = self.arguments[k + 1..].iter().map(|a| a.min_count()).sum();
            let available = (arguments.len() - position).saturating_sub(reserved);
            let take = available.min(spec.max_count().unwrap_or(usize::MAX));
            if take < spec.min_count() {
                return Err(count_error());
            }

            for (offset, argument) in arguments[position..position + take].iter().enumerate() {
                if !spec.types.contains(argument.data_type()) {
                    return Err(ArgumentError::Type {
                        index: position + offset,
                        name: spec.name.clone(),
                        expected: spec.types,
                        actual: argument.data_type(),
                    });
                }
            }
            position += take;
        }

        if position < arguments.len() {
            return Err(count_error());
        }
        Ok(())
    }
}

pub(crate) fn argument(arguments: &[Value], index: usize) -> Result<&Value, FunctionError> {
    arguments
        .get(index)
        .ok_or_else(|| FunctionError::InvalidArgument(format!("argument {} is missing", index + 1)))
}

pub(crate) fn number(arguments: &[Value], index: usize) -> Result<f64, FunctionError> {
    argument(arguments, index)?
        .as_number()
        .ok_or_else(|| invalid(index, "a number"))
}

pub(crate) fn boolean(arguments: &[Value], index: usize) -> Result<bool, FunctionError> {
    argument(arguments, index)?
        .as_boolean()
        .ok_or_else(|| invalid(index, "a boolean"))
}

pub(crate) fn string(arguments: &[Value], index: usize) -> Result<&str, FunctionError> {
    argument(arguments, index)?
        .as_str()
        .ok_or_else(|| invalid(index, "a string"))
}

pub(crate) fn invalid(index: usize, expected: &str) -> FunctionError {
    FunctionError::InvalidArgument(format!("argument {} must be {}", index + 1, expected))
}
