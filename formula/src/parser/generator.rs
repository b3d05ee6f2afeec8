//! Shunting-yard generator
//!
//! Converts the infix token sequence into Reverse Polish Notation. Besides the
//! classic operator-precedence handling it counts function arguments and turns
//! every conditional into one [`TokenKind::Ternary`] token whose branches are
//! compiled separately, so the evaluator can only ever visit the branch it selects.

use super::ternary::find_branches;
use super::token::{TernaryBranches, Token, TokenKind};
use crate::ast::Span;
use crate::error::{CalcError, ErrorCode};
use crate::operators::Associativity;
use crate::{CalcResult, ResourceLimits};

pub fn generate(tokens: &[Token], limits: &ResourceLimits) -> CalcResult<Vec<Token>> {
    let rpn = Generator { limits, depth: 0 }.run(tokens)?;
    tree_depth(&rpn, limits.max_tree_depth)?;
    tracing::trace!(rpn = %super::token::render(&rpn), "generated rpn");
    Ok(rpn)
}

/// Depth of the operand tree described by `rpn`
///
/// Fails at the first token whose subtree would be deeper than `limit`.
fn tree_depth(rpn: &[Token], limit: usize) -> CalcResult<usize> {
    let mut depths: Vec<usize> = Vec::new();
    for token in rpn {
        let arity = match &token.kind {
            TokenKind::Operator { .. } => 2,
            TokenKind::UnaryPrefixOperator { .. }
            | TokenKind::UnaryPostfixOperator { .. }
            | TokenKind::Ternary { .. } => 1,
            TokenKind::Function { arguments, .. } => *arguments,
            _ => 0,
        };
        let split = depths.len().saturating_sub(arity);
        let mut depth = depths.drain(split..).max().unwrap_or(0) + 1;
        if let TokenKind::Ternary { branches } = &token.kind {
            let when_true = tree_depth(&branches.true_branch, limit)?;
            let when_false = tree_depth(&branches.false_branch, limit)?;
            depth = depth.max(when_true.max(when_false) + 1);
        }
        if depth > limit {
            return Err(CalcError::new(
                ErrorCode::NestingTooDeep,
                format!("Expression tree depth exceeds the limit of {}", limit),
                token.span.clone(),
            ));
        }
        depths.push(depth);
    }
    Ok(depths.into_iter().max().unwrap_or(0))
}

struct Generator<'a> {
    limits: &'a ResourceLimits,
    /// Nesting of the sequence being generated (enclosing groups and conditionals)
    depth: usize,
}

/// Entries of the operator stack
enum Pending {
    Operator(Token),
    Group(Group),
}

/// An open parenthesis, possibly the argument list of a function call
struct Group {
    open: Token,
    function: Option<Token>,
    /// Arguments completed by a comma so far
    arguments: usize,
}

impl<'a> Generator<'a> {
    fn run(&self, tokens: &[Token]) -> CalcResult<Vec<Token>> {
        let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
        let mut stack: Vec<Pending> = Vec::new();
        let mut expect_operand = true;
        let mut pending_function: Option<Token> = None;
        let mut open_groups = 0usize;
        let mut prev: Option<&Token> = None;
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];

            if let Some(function) = &pending_function {
                if token.kind != TokenKind::OpeningParen {
                    return Err(CalcError::new(
                        ErrorCode::InvalidSyntax,
                        format!("Expected '(' after function name '{}'", function.text),
                        function.span.clone(),
                    ));
                }
            }

            match &token.kind {
                TokenKind::Number { .. }
                | TokenKind::String { .. }
                | TokenKind::Constant { .. }
                | TokenKind::Variable { .. }
                | TokenKind::Ternary { .. } => {
                    if !expect_operand {
                        return Err(missing_operator(token));
                    }
                    emit(&mut output, token.clone());
                    expect_operand = false;
                }
                TokenKind::Function { .. } => {
                    if !expect_operand {
                        return Err(missing_operator(token));
                    }
                    pending_function = Some(token.clone());
                }
                TokenKind::UnaryPrefixOperator { .. } => {
                    if !expect_operand {
                        return Err(missing_operator(token));
                    }
                    stack.push(Pending::Operator(token.clone()));
                }
                TokenKind::UnaryPostfixOperator { .. } => {
                    if expect_operand {
                        return Err(missing_operand(token));
                    }
                    emit(&mut output, token.clone());
                }
                TokenKind::Operator { operator } => {
                    if expect_operand {
                        return Err(missing_operand(token));
                    }
                    let precedence = operator.precedence();
                    let left = operator.associativity() == Associativity::Left;
                    while let Some(Pending::Operator(top)) = stack.last() {
                        let top_precedence = top
                            .operator_kind()
                            .map(|k| k.precedence())
                            .unwrap_or_default();
                        if top_precedence > precedence || (top_precedence == precedence && left) {
                            pop_operator(&mut stack, &mut output);
                        } else {
                            break;
                        }
                    }
                    stack.push(Pending::Operator(token.clone()));
                    expect_operand = true;
                }
                TokenKind::OpeningParen => {
                    if !expect_operand {
                        return Err(missing_operator(token));
                    }
                    open_groups += 1;
                    if self.depth + open_groups > self.limits.max_nesting_depth {
                        return Err(too_deep(token, self.limits.max_nesting_depth));
                    }
                    stack.push(Pending::Group(Group {
                        open: token.clone(),
                        function: pending_function.take(),
                        arguments: 0,
                    }));
                    expect_operand = true;
                }
                TokenKind::Comma => {
                    if expect_operand {
                        return Err(CalcError::new(
                            ErrorCode::MissingOperand,
                            "Missing function argument before ','",
                            token.span.clone(),
                        ));
                    }
                    drain_operators(&mut stack, &mut output);
                    match stack.last_mut() {
                        Some(Pending::Group(group)) if group.function.is_some() => {
                            group.arguments += 1;
                        }
                        _ => {
                            return Err(CalcError::new(
                                ErrorCode::InvalidSyntax,
                                "Unexpected ',' outside of a function call",
                                token.span.clone(),
                            ))
                        }
                    }
                    expect_operand = true;
                }
                TokenKind::ClosingParen => {
                    let empty = prev.is_some_and(|p| p.kind == TokenKind::OpeningParen);
                    if expect_operand && !empty {
                        return Err(CalcError::new(
                            ErrorCode::MissingOperand,
                            "Missing operand before ')'",
                            token.span.clone(),
                        ));
                    }
                    drain_operators(&mut stack, &mut output);
                    let group = match stack.pop() {
                        Some(Pending::Group(group)) => group,
                        _ => {
                            return Err(CalcError::new(
                                ErrorCode::MismatchedParentheses,
                                "Unmatched ')'",
                                token.span.clone(),
                            ))
                        }
                    };
                    open_groups -= 1;
                    match group.function {
                        Some(function) => {
                            let arguments = if empty { 0 } else { group.arguments + 1 };
                            emit(&mut output, function_call(function, arguments));
                        }
                        None if empty => {
                            return Err(CalcError::new(
                                ErrorCode::InvalidSyntax,
                                "Empty parentheses",
                                Span::covering(&group.open.span, &token.span),
                            ))
                        }
                        None => {}
                    }
                    expect_operand = false;
                }
                TokenKind::TernaryIf => {
                    if expect_operand {
                        return Err(missing_operand(token));
                    }
                    drain_operators(&mut stack, &mut output);
                    let depth = self.depth + open_groups + 1;
                    if depth > self.limits.max_nesting_depth {
                        return Err(too_deep(token, self.limits.max_nesting_depth));
                    }

                    let rest = &tokens[i..];
                    let ranges = find_branches(rest, 0)?;
                    let branch = Generator {
                        limits: self.limits,
                        depth,
                    };
                    let true_branch = branch.run(&rest[ranges.when_true.clone()])?;
                    let false_branch = branch.run(&rest[ranges.when_false.clone()])?;
                    tracing::trace!(
                        at = token.span.start,
                        true_len = true_branch.len(),
                        false_len = false_branch.len(),
                        "extracted conditional branches"
                    );

                    let ternary = Token::new(
                        TokenKind::Ternary {
                            branches: Box::new(TernaryBranches {
                                true_branch,
                                false_branch,
                            }),
                        },
                        token.text.clone(),
                        token.span.clone(),
                    );
                    emit(&mut output, ternary);
                    expect_operand = false;
                    i += ranges.end();
                    prev = tokens.get(i - 1);
                    continue;
                }
                TokenKind::TernaryElse => {
                    return Err(CalcError::new(
                        ErrorCode::InvalidSyntax,
                        "Unexpected ':' without a matching '?'",
                        token.span.clone(),
                    ))
                }
            }

            prev = Some(token);
            i += 1;
        }

        if let Some(function) = pending_function {
            return Err(CalcError::new(
                ErrorCode::InvalidSyntax,
                format!("Expected '(' after function name '{}'", function.text),
                function.span,
            ));
        }

        if expect_operand {
            let span = tokens
                .last()
                .map(|t| t.span.clone())
                .unwrap_or_else(|| Span::new(0, 0));
            return Err(CalcError::new(
                ErrorCode::MissingOperand,
                "Expression ends without an operand",
                span,
            ));
        }

        while let Some(entry) = stack.pop() {
            match entry {
                Pending::Operator(op) => emit(&mut output, op),
                Pending::Group(group) => {
                    return Err(CalcError::new(
                        ErrorCode::MismatchedParentheses,
                        "Unclosed '('",
                        group.open.span,
                    ))
                }
            }
        }

        Ok(output)
    }
}

fn pop_operator(stack: &mut Vec<Pending>, output: &mut Vec<Token>) {
    if let Some(Pending::Operator(op)) = stack.pop() {
        emit(output, op);
    }
}

fn emit(output: &mut Vec<Token>, token: Token) {
    tracing::trace!(token = %token, at = token.span.start, "emit");
    output.push(token);
}

/// Move operators to the output down to the innermost open group
fn drain_operators(stack: &mut Vec<Pending>, output: &mut Vec<Token>) {
    while let Some(Pending::Operator(_)) = stack.last() {
        pop_operator(stack, output);
    }
}

fn function_call(function: Token, arguments: usize) -> Token {
    let name = match function.kind {
        TokenKind::Function { name, .. } => name,
        _ => function.text.clone(),
    };
    Token::new(
        TokenKind::Function { name, arguments },
        function.text,
        function.span,
    )
}

fn missing_operand(token: &Token) -> CalcError {
    CalcError::new(
        ErrorCode::MissingOperand,
        format!("Missing operand for '{}'", token.text),
        token.span.clone(),
    )
}

fn missing_operator(token: &Token) -> CalcError {
    CalcError::new(
        ErrorCode::InvalidSyntax,
        format!("Unexpected '{}', expected an operator", token.text),
        token.span.clone(),
    )
}

fn too_deep(token: &Token, limit: usize) -> CalcError {
    CalcError::new(
        ErrorCode::NestingTooDeep,
        format!("Expression nesting exceeds the limit of {}", limit),
        token.span.clone(),
    )
}
