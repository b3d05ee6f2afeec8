//! # Formula
//!
//! **Typed expressions with exact diagnostics**
//!
//! Formula is an embeddable expression engine. A formula such as
//! `$price * (1 + $vat) > 100 ? "expensive" : "cheap"` is tokenized,
//! converted to Reverse Polish Notation with a shunting-yard pass and
//! evaluated on a value stack. Failures come back as positioned
//! diagnostics rather than panics.
//!
//! ## Quick Start
//!
//! ```rust
//! use formula::{Engine, Value, Variables};
//!
//! let engine = Engine::new();
//! let result = engine.calculate("2 ^ 3 ^ 2");
//! assert_eq!(result.value, Some(Value::Number(512.0)));
//!
//! let compiled = engine.compile("$x > 10 ? \"big\" : \"small\"").unwrap();
//! let mut vars = Variables::new();
//! vars.insert("x".to_string(), Value::Number(12.0));
//! assert_eq!(compiled.evaluate(Some(&vars)).unwrap(), Value::from("big"));
//! ```
//!
//! ## Core Concepts
//!
//! ### Values
//! Every value is a number, boolean, date or string. Operators check the
//! types of their operands; nothing is converted implicitly.
//!
//! ### Conditionals
//! `cond ? a : b` evaluates only the branch it selects, so an error in the
//! other branch never surfaces.
//!
//! ### Environment
//! Functions, constants, operator spellings and default variable bindings
//! live in an [`Environment`]. Function sets are provided by
//! [`FunctionExtension`]s.

pub mod ast;
pub mod engine;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod operators;
pub mod parser;
pub mod resource_limits;
pub mod response;
pub mod value;

pub use ast::{build_ast, AstNode, AstNodeKind, Span};
pub use engine::{CompiledExpression, Engine};
pub use environment::{Environment, RegisteredFunction};
pub use error::{CalcError, ErrorCode, Severity, Stage};
pub use evaluator::{evaluate, Evaluator, Variables};
pub use functions::{ArgumentSpec, FunctionError, FunctionExtension, FunctionSignature};
pub use operators::{Associativity, Operator, OperatorCategory, OperatorKind, OperatorSpelling};
pub use parser::{generate, parse, tokenize, Token, TokenKind, TokenType};
pub use resource_limits::ResourceLimits;
pub use response::CalculationResult;
pub use value::{DataType, DataTypes, Value};

/// Result type for pipeline stages
pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests;
