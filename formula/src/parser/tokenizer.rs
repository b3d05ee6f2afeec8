//! Tokenizer
//!
//! Scans expression text left to right into positioned tokens. Operator
//! spellings are looked up in the environment (longest match first), and the
//! previous token decides whether an ambiguous spelling is infix, prefix or
//! postfix: after something that ends an operand `-` is subtraction and `!` is
//! factorial, everywhere else they are negation and logical not.

use super::literals::{scan_number, scan_string, STRING_DELIMITERS};
use super::token::{Token, TokenKind};
use crate::ast::Span;
use crate::environment::Environment;
use crate::error::{CalcError, ErrorCode};
use crate::operators::OperatorSpelling;
use crate::{CalcResult, ResourceLimits};

pub const VARIABLE_SIGIL: char = '$';

pub fn tokenize(
    text: &str,
    environment: &Environment,
    limits: &ResourceLimits,
) -> CalcResult<Vec<Token>> {
    Tokenizer::new(text, environment).run(limits)
}

struct Tokenizer<'a> {
    chars: Vec<char>,
    environment: &'a Environment,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &str, environment: &'a Environment) -> Self {
        Self {
            chars: text.chars().collect(),
            environment,
            tokens: Vec::new(),
            pos: 0,
        }
    }

    fn run(mut self, limits: &ResourceLimits) -> CalcResult<Vec<Token>> {
        let len = self.chars.len();
        if len > limits.max_expression_length {
            return Err(CalcError::new(
                ErrorCode::ExpressionTooLong,
                format!(
                    "Expression is {} characters long, the limit is {}",
                    len, limits.max_expression_length
                ),
                Span::new(0, len),
            ));
        }
        if self.chars.iter().all(|c| c.is_whitespace()) {
            return Err(CalcError::new(
                ErrorCode::EmptyExpression,
                "Expression is empty",
                Span::new(0, len),
            ));
        }

        let max_symbol_len = self.environment.max_spelling_len();

        while self.pos < len {
            let c = self.chars[self.pos];
            let start = self.pos;

            if c.is_whitespace() {
                self.pos += 1;
            } else if c.is_ascii_digit() || (c == '.' && self.peek_is_digit(start + 1)) {
                let (value, end) = scan_number(&self.chars, start)?;
                self.push(TokenKind::Number { value }, start, end);
            } else if STRING_DELIMITERS.contains(&c) {
                let (value, end) = scan_string(&self.chars, start)?;
                self.push(TokenKind::String { value }, start, end);
            } else if c == VARIABLE_SIGIL {
                self.scan_variable(start)?;
            } else if is_identifier_start(c) {
                self.scan_identifier(start)?;
            } else if let Some(kind) = structural(c) {
                self.push(kind, start, start + 1);
            } else {
                self.scan_operator(start, max_symbol_len)?;
            }
        }

        tracing::trace!(count = self.tokens.len(), "tokenized expression");
        Ok(self.tokens)
    }

    fn peek_is_digit(&self, i: usize) -> bool {
        self.chars.get(i).is_some_and(|c| c.is_ascii_digit())
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text: String = self.chars[start..end].iter().collect();
        tracing::trace!(token = %text, at = start, "token");
        self.tokens
            .push(Token::new(kind, text, Span::new(start, end - start)));
        self.pos = end;
    }

    fn identifier_end(&self, from: usize) -> usize {
        let mut i = from;
        while self.chars.get(i).is_some_and(|c| is_identifier_char(*c)) {
            i += 1;
        }
        i
    }

    fn scan_variable(&mut self, start: usize) -> CalcResult<()> {
        let name_start = start + 1;
        let end = match self.chars.get(name_start) {
            Some(c) if is_identifier_start(*c) => self.identifier_end(name_start),
            _ => {
                return Err(CalcError::new(
                    ErrorCode::UnknownToken,
                    "Expected a variable name after '$'",
                    Span::new(start, 1),
                ))
            }
        };
        let name: String = self.chars[name_start..end].iter().collect();
        self.push(TokenKind::Variable { name }, start, end);
        Ok(())
    }

    fn scan_identifier(&mut self, start: usize) -> CalcResult<()> {
        let end = self.identifier_end(start);
        let name: String = self.chars[start..end].iter().collect();

        if let Some(spelling) = self.environment.spelling(&name) {
            return self.push_operator(spelling, start, end);
        }

        let mut next = end;
        while self.chars.get(next).is_some_and(|c| c.is_whitespace()) {
            next += 1;
        }
        if self.chars.get(next) == Some(&'(') {
            self.push(TokenKind::Function { name, arguments: 0 }, start, end);
            return Ok(());
        }

        if self.environment.constant(&name).is_some() {
            self.push(TokenKind::Constant { name }, start, end);
            return Ok(());
        }

        Err(CalcError::new(
            ErrorCode::UnknownToken,
            format!("Unknown identifier '{}'", name),
            Span::new(start, end - start),
        ))
    }

    fn scan_operator(&mut self, start: usize, max_len: usize) -> CalcResult<()> {
        let available = self.chars.len() - start;
        for len in (1..=max_len.min(available)).rev() {
            let candidate: String = self.chars[start..start + len].iter().collect();
            if let Some(spelling) = self.environment.spelling(&candidate) {
                return self.push_operator(spelling, start, start + len);
            }
        }
        Err(CalcError::new(
            ErrorCode::UnknownToken,
            format!("Unknown token '{}'", self.chars[start]),
            Span::new(start, 1),
        ))
    }

    fn push_operator(
        &mut self,
        spelling: OperatorSpelling,
        start: usize,
        end: usize,
    ) -> CalcResult<()> {
        let after_operand = self.tokens.last().is_some_and(|t| t.ends_operand());
        let kind = resolve_spelling(spelling, after_operand).ok_or_else(|| {
            CalcError::new(
                ErrorCode::UnknownToken,
                "Operator spelling has no operator kind",
                Span::new(start, end - start),
            )
        })?;
        self.push(kind, start, end);
        Ok(())
    }
}

/// Pick the positional reading of a spelling from its left context
///
/// A reading that does not fit the context is still returned when it is the
/// only one, so the generator can report the misplaced operator precisely.
fn resolve_spelling(spelling: OperatorSpelling, after_operand: bool) -> Option<TokenKind> {
    let postfix = spelling
        .postfix
        .map(|operator| TokenKind::UnaryPostfixOperator { operator });
    let infix = spelling.infix.map(|operator| TokenKind::Operator { operator });
    let prefix = spelling
        .prefix
        .map(|operator| TokenKind::UnaryPrefixOperator { operator });

    if after_operand {
        postfix.or(infix).or(prefix)
    } else {
        prefix.or(infix).or(postfix)
    }
}

fn structural(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::OpeningParen),
        ')' => Some(TokenKind::ClosingParen),
        ',' => Some(TokenKind::Comma),
        '?' => Some(TokenKind::TernaryIf),
        ':' => Some(TokenKind::TernaryElse),
        _ => None,
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
