use crate::environment::Environment;
use crate::{CalcResult, ResourceLimits};

pub mod generator;
pub(crate) mod literals;
pub(crate) mod ternary;
pub mod token;
pub mod tokenizer;

pub use generator::generate;
pub use token::{render, TernaryBranches, Token, TokenKind, TokenType};
pub use tokenizer::tokenize;

/// Tokens and RPN of one expression
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub tokens: Vec<Token>,
    pub rpn: Vec<Token>,
}

/// Tokenize and generate RPN in one step
pub fn parse(
    text: &str,
    environment: &Environment,
    limits: &ResourceLimits,
) -> CalcResult<Parsed> {
    let tokens = tokenize(text, environment, limits)?;
    let rpn = generate(&tokens, limits)?;
    Ok(Parsed { tokens, rpn })
}
