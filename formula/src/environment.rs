//! Evaluation environment
//!
//! Holds the registered functions, named constants, operator spellings and
//! environment-level variable bindings. Everything except the variables is
//! meant to be set up once and then shared read-only; per-call bindings go in
//! a separate [`Variables`](crate::Variables) map.

use crate::evaluator::normalize_name;
use crate::functions::date::DateFunctions;
use crate::functions::logical::LogicalFunctions;
use crate::functions::math::MathFunctions;
use crate::functions::text::TextFunctions;
use crate::functions::{FunctionExtension, FunctionSignature};
use crate::operators::{default_spellings, OperatorSpelling};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts;
use std::fmt;
use std::sync::Arc;

/// A function as seen by the evaluator
#[derive(Clone)]
pub struct RegisteredFunction {
    pub signature: FunctionSignature,
    pub extension: Arc<dyn FunctionExtension>,
}

impl fmt::Debug for RegisteredFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredFunction")
            .field("signature", &self.signature)
            .field("extension", &self.extension.name())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    functions: BTreeMap<String, RegisteredFunction>,
    constants: HashMap<String, Value>,
    operators: HashMap<String, OperatorSpelling>,
    variables: HashMap<String, Value>,
    with_builtins: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Operators and the boolean constants, no functions
    pub fn new() -> Self {
        let mut environment = Self {
            functions: BTreeMap::new(),
            constants: HashMap::new(),
            operators: default_spellings()
                .into_iter()
                .map(|(symbol, spelling)| (symbol.to_string(), spelling))
                .collect(),
            variables: HashMap::new(),
            with_builtins: false,
        };
        environment.add_constant("true", Value::Boolean(true));
        environment.add_constant("false", Value::Boolean(false));
        environment
    }

    /// Operators, boolean and mathematical constants, and the built-in
    /// math, text, date and logical functions
    pub fn with_defaults() -> Self {
        let mut environment = Self::new();
        environment.with_builtins = true;
        environment.install_builtins();
        environment
    }

    fn install_builtins(&mut self) {
        for (name, value) in [
            ("pi", consts::PI),
            ("\u{03c0}", consts::PI),
            ("e", consts::E),
            ("tau", consts::TAU),
            ("\u{03c4}", consts::TAU),
            ("phi", 1.618_033_988_749_895),
            ("\u{03c6}", 1.618_033_988_749_895),
        ] {
            self.add_constant(name, Value::Number(value));
        }
        self.register_extension(Arc::new(MathFunctions));
        self.register_extension(Arc::new(TextFunctions));
        self.register_extension(Arc::new(DateFunctions));
        self.register_extension(Arc::new(LogicalFunctions));
    }

    /// Register every function an extension declares
    ///
    /// A function name already registered is replaced.
    pub fn register_extension(&mut self, extension: Arc<dyn FunctionExtension>) {
        for signature in extension.functions() {
            let name = signature.name.clone();
            let registered = RegisteredFunction {
                signature,
                extension: Arc::clone(&extension),
            };
            if let Some(previous) = self.functions.insert(name.clone(), registered) {
                tracing::warn!(
                    function = %name,
                    previous = previous.extension.name(),
                    replacement = extension.name(),
                    "function registration replaced an existing function"
                );
            }
        }
        tracing::debug!(extension = extension.name(), "registered function extension");
    }

    pub fn function(&self, name: &str) -> Option<&RegisteredFunction> {
        self.functions.get(name)
    }

    /// All registered functions, ordered by name
    pub fn functions(&self) -> impl Iterator<Item = &RegisteredFunction> {
        self.functions.values()
    }

    pub fn add_constant(&mut self, name: &str, value: Value) {
        self.constants.insert(name.to_string(), value);
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.variables
            .insert(normalize_name(name).to_string(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(normalize_name(name))
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(normalize_name(name))
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    /// Add a spelling for operators; positions it does not set keep any
    /// existing meaning of that spelling
    pub fn add_operator_alias(&mut self, symbol: &str, spelling: OperatorSpelling) {
        let merged = match self.operators.get(symbol) {
            Some(existing) => existing.merge(spelling),
            None => spelling,
        };
        self.operators.insert(symbol.to_string(), merged);
    }

    pub fn spelling(&self, symbol: &str) -> Option<OperatorSpelling> {
        self.operators.get(symbol).copied()
    }

    /// Length in characters of the longest operator spelling
    pub fn max_spelling_len(&self) -> usize {
        self.operators
            .keys()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Back to the state this environment was created in: custom functions,
    /// constants, aliases and variables are dropped
    pub fn reset(&mut self) {
        *self = if self.with_builtins {
            Self::with_defaults()
        } else {
            Self::new()
        };
    }
}
