use crate::ast::Span;
use crate::operators::OperatorKind;
use serde::Serialize;
use std::fmt;

/// A positioned token
///
/// Produced by the tokenizer; the generator fills in function argument counts
/// and replaces each `cond ? a : b` construct with a single [`TokenKind::Ternary`]
/// token carrying both branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub span: Span,
    pub text: String,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenKind {
    Number { value: f64 },
    String { value: String },
    Constant { name: String },
    Variable { name: String },
    Operator { operator: OperatorKind },
    UnaryPrefixOperator { operator: OperatorKind },
    UnaryPostfixOperator { operator: OperatorKind },
    OpeningParen,
    ClosingParen,
    Comma,
    Function { name: String, arguments: usize },
    /// `?` as scanned
    TernaryIf,
    /// `:` as scanned
    TernaryElse,
    /// A whole conditional after generation
    Ternary { branches: Box<TernaryBranches> },
}

/// Branch-local RPN for a conditional; only one of them is ever evaluated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryBranches {
    pub true_branch: Vec<Token>,
    pub false_branch: Vec<Token>,
}

/// Coarse token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    Number,
    Operator,
    UnaryPrefixOperator,
    UnaryPostfixOperator,
    OpeningParen,
    ClosingParen,
    Constant,
    Variable,
    String,
    Function,
    Comma,
    Ternary,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            span,
            text: text.into(),
            kind,
        }
    }

    pub fn token_type(&self) -> TokenType {
        match &self.kind {
            TokenKind::Number { .. } => TokenType::Number,
            TokenKind::String { .. } => TokenType::String,
            TokenKind::Constant { .. } => TokenType::Constant,
            TokenKind::Variable { .. } => TokenType::Variable,
            TokenKind::Operator { .. } => TokenType::Operator,
            TokenKind::UnaryPrefixOperator { .. } => TokenType::UnaryPrefixOperator,
            TokenKind::UnaryPostfixOperator { .. } => TokenType::UnaryPostfixOperator,
            TokenKind::OpeningParen => TokenType::OpeningParen,
            TokenKind::ClosingParen => TokenType::ClosingParen,
            TokenKind::Comma => TokenType::Comma,
            TokenKind::Function { .. } => TokenType::Function,
            TokenKind::TernaryIf | TokenKind::TernaryElse | TokenKind::Ternary { .. } => {
                TokenType::Ternary
            }
        }
    }

    pub fn operator_kind(&self) -> Option<OperatorKind> {
        match &self.kind {
            TokenKind::Operator { operator }
            | TokenKind::UnaryPrefixOperator { operator }
            | TokenKind::UnaryPostfixOperator { operator } => Some(*operator),
            TokenKind::TernaryIf | TokenKind::TernaryElse | TokenKind::Ternary { .. } => {
                Some(OperatorKind::Conditional)
            }
            _ => None,
        }
    }

    /// Whether this token ends an operand, so that what follows is in infix/postfix position
    pub fn ends_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number { .. }
                | TokenKind::String { .. }
                | TokenKind::Constant { .. }
                | TokenKind::Variable { .. }
                | TokenKind::ClosingParen
                | TokenKind::UnaryPostfixOperator { .. }
        )
    }

    pub fn ternary_branches(&self) -> Option<&TernaryBranches> {
        match &self.kind {
            TokenKind::Ternary { branches } => Some(branches),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Function { name, arguments } => write!(f, "{}/{}", name, arguments),
            TokenKind::Ternary { branches } => {
                write!(f, "?[")?;
                write_sequence(f, &branches.true_branch)?;
                write!(f, "]:[")?;
                write_sequence(f, &branches.false_branch)?;
                write!(f, "]")
            }
            TokenKind::UnaryPrefixOperator {
                operator: operator @ (OperatorKind::Negate | OperatorKind::Identity),
            } => write!(f, "{}u", operator.symbol()),
            _ => f.write_str(&self.text),
        }
    }
}

fn write_sequence(f: &mut fmt::Formatter<'_>, tokens: &[Token]) -> fmt::Result {
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", token)?;
    }
    Ok(())
}

/// Render a token sequence separated by spaces, e.g. `2 3 2 ^ ^`
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
