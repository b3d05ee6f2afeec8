//! Variable resolution for one evaluation
//!
//! Bindings come from two layers: the map supplied with the call, then the
//! environment's own bindings. Neither layer is copied or merged.

use crate::environment::Environment;
use crate::parser::tokenizer::VARIABLE_SIGIL;
use crate::value::Value;
use std::collections::HashMap;

/// Per-call variable bindings, keyed by name without the `$` sigil
pub type Variables = HashMap<String, Value>;

#[derive(Clone, Copy)]
pub struct VariableContext<'a> {
    overlay: Option<&'a Variables>,
    environment: &'a Environment,
}

impl<'a> VariableContext<'a> {
    pub fn new(environment: &'a Environment, overlay: Option<&'a Variables>) -> Self {
        Self {
            overlay,
            environment,
        }
    }

    /// Caller bindings first, then the environment
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.overlay
            .and_then(|vars| lookup_in(vars, name))
            .or_else(|| self.environment.variable(name))
    }
}

fn lookup_in<'v>(vars: &'v Variables, name: &str) -> Option<&'v Value> {
    vars.get(name)
        .or_else(|| vars.get(&format!("{}{}", VARIABLE_SIGIL, name)))
}

/// Strip a leading `$` from a binding key
pub fn normalize_name(name: &str) -> &str {
    name.strip_prefix(VARIABLE_SIGIL).unwrap_or(name)
}
