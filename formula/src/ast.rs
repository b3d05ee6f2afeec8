//! Source spans and the introspection tree
//!
//! This module contains:
//! - `Span` for tracking source locations (character offsets) through every stage
//! - `AstNode`, a tree view of compiled RPN for tooling and debugging
//! - `build_ast`, which walks RPN the same way the evaluator does

use crate::environment::Environment;
use crate::error::{CalcError, ErrorCode};
use crate::evaluator::{select_branch, Evaluator, Variables};
use crate::parser::{Token, TokenKind};
use crate::value::Value;
use crate::CalcResult;
use serde::Serialize;
use std::fmt;

/// Location of a token or error in the expression text
///
/// Offsets count Unicode scalar values, not bytes, so a multi-byte operator
/// like `×` occupies exactly one position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    #[serde(rename = "startIndex")]
    pub start: usize,
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Offset one past the last covered character
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Smallest span containing both `a` and `b`
    pub fn covering(a: &Span, b: &Span) -> Self {
        let start = a.start.min(b.start);
        let end = a.end().max(b.end());
        Self::new(start, end - start)
    }

    /// The covered substring of `text`
    pub fn slice(&self, text: &str) -> String {
        text.chars().skip(self.start).take(self.length).collect()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AstNodeKind {
    Number,
    String,
    Constant,
    Variable,
    BinaryOperator,
    PrefixOperator,
    PostfixOperator,
    Function,
    Ternary,
}

/// One node of the introspection tree
///
/// `value` is what the node evaluated to. Nodes inside the branch a
/// conditional did not take are built for their shape only and carry no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstNode {
    #[serde(rename = "type")]
    pub kind: AstNodeKind,
    pub label: String,
    #[serde(rename = "sourceRange")]
    pub span: Span,
    #[serde(rename = "evaluatedValue", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(AstNode::size).sum::<usize>()
    }
}

/// Build the tree for `rpn`, evaluating every node on the taken path
pub fn build_ast(
    rpn: &[Token],
    environment: &Environment,
    variables: Option<&Variables>,
) -> CalcResult<AstNode> {
    let builder = Builder {
        evaluator: Evaluator::new(environment, variables),
    };
    builder.build(rpn, true, ErrorCode::InvalidExpression)
}

struct Builder<'a> {
    evaluator: Evaluator<'a>,
}

impl<'a> Builder<'a> {
    fn build(&self, rpn: &[Token], evaluate: bool, shape_error: ErrorCode) -> CalcResult<AstNode> {
        let mut stack: Vec<AstNode> = Vec::new();

        for token in rpn {
            let node = match &token.kind {
                TokenKind::Number { .. }
                | TokenKind::String { .. }
                | TokenKind::Constant { .. }
                | TokenKind::Variable { .. } => {
                    let value = if evaluate {
                        Some(self.evaluator.operand(token)?)
                    } else {
                        None
                    };
                    leaf(token, value)
                }
                TokenKind::Operator { .. } => {
                    let children = pop_children(&mut stack, 2, token, shape_error)?;
                    self.operation(token, AstNodeKind::BinaryOperator, children, evaluate)?
                }
                TokenKind::UnaryPrefixOperator { .. } => {
                    let children = pop_children(&mut stack, 1, token, shape_error)?;
                    self.operation(token, AstNodeKind::PrefixOperator, children, evaluate)?
                }
                TokenKind::UnaryPostfixOperator { .. } => {
                    let children = pop_children(&mut stack, 1, token, shape_error)?;
                    self.operation(token, AstNodeKind::PostfixOperator, children, evaluate)?
                }
                TokenKind::Function { arguments, .. } => {
                    let children = pop_children(&mut stack, *arguments, token, shape_error)?;
                    self.operation(token, AstNodeKind::Function, children, evaluate)?
                }
                TokenKind::Ternary { branches } => {
                    let condition = pop_children(&mut stack, 1, token, shape_error)?
                        .pop()
                        .ok_or_else(|| shape(token, shape_error))?;
                    let taken = match (&condition.value, evaluate) {
                        (Some(value), true) => Some(select_branch(token, value)?),
                        _ => None,
                    };
                    let when_true = self.build(
                        &branches.true_branch,
                        taken == Some(true),
                        ErrorCode::TernaryBranchError,
                    )?;
                    let when_false = self.build(
                        &branches.false_branch,
                        taken == Some(false),
                        ErrorCode::TernaryBranchError,
                    )?;
                    let value = match taken {
                        Some(true) => when_true.value.clone(),
                        Some(false) => when_false.value.clone(),
                        None => None,
                    };
                    AstNode {
                        kind: AstNodeKind::Ternary,
                        label: "?:".to_string(),
                        span: Span::covering(&condition.span, &when_false.span),
                        value,
                        children: vec![condition, when_true, when_false],
                    }
                }
                _ => return Err(shape(token, shape_error)),
            };
            stack.push(node);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(node), true) => Ok(node),
            _ => Err(CalcError::new(
                shape_error,
                "Compiled expression does not reduce to a single value",
                rpn.first().map(|t| t.span.clone()).unwrap_or_default(),
            )),
        }
    }

    fn operation(
        &self,
        token: &Token,
        kind: AstNodeKind,
        children: Vec<AstNode>,
        evaluate: bool,
    ) -> CalcResult<AstNode> {
        let value = if evaluate {
            let operands: Vec<Value> = children.iter().filter_map(|c| c.value.clone()).collect();
            Some(self.evaluator.apply(token, &operands)?)
        } else {
            None
        };
        let span = children
            .iter()
            .fold(token.span.clone(), |span, child| Span::covering(&span, &child.span));
        Ok(AstNode {
            kind,
            label: token.to_string(),
            span,
            value,
            children,
        })
    }
}

fn leaf(token: &Token, value: Option<Value>) -> AstNode {
    let kind = match token.kind {
        TokenKind::Number { .. } => AstNodeKind::Number,
        TokenKind::String { .. } => AstNodeKind::String,
        TokenKind::Constant { .. } => AstNodeKind::Constant,
        _ => AstNodeKind::Variable,
    };
    AstNode {
        kind,
        label: token.text.clone(),
        span: token.span.clone(),
        value,
        children: Vec::new(),
    }
}

fn pop_children(
    stack: &mut Vec<AstNode>,
    count: usize,
    token: &Token,
    shape_error: ErrorCode,
) -> CalcResult<Vec<AstNode>> {
    if stack.len() < count {
        return Err(shape(token, shape_error));
    }
    Ok(stack.split_off(stack.len() - count))
}

fn shape(token: &Token, code: ErrorCode) -> CalcError {
    CalcError::new(
        code,
        format!("Malformed compiled expression at '{}'", token.text),
        token.span.clone(),
    )
}
