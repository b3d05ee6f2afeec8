// Parser tests
mod generator;

mod evaluator;
mod operations;

// Surrounding components
mod ast;

use crate::environment::Environment;
use crate::parser::{generate, render, tokenize, Token};
use crate::ResourceLimits;

pub(crate) fn tokens(text: &str) -> Vec<Token> {
    tokenize(text, &Environment::with_defaults(), &ResourceLimits::default()).unwrap()
}

pub(crate) fn rpn(text: &str) -> String {
    let tokens = tokens(text);
    render(&generate(&tokens, &ResourceLimits::default()).unwrap())
}
