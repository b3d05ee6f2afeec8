//! Conditional branch extraction
//!
//! Locates the token ranges of `cond ? a : b` so the generator can compile each
//! branch on its own instead of flattening it into the outer RPN stream.

use super::token::{Token, TokenKind};
use crate::error::{CalcError, ErrorCode};
use crate::CalcResult;
use std::ops::Range;

/// Token ranges of one conditional, relative to the scanned slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BranchRanges {
    pub when_true: Range<usize>,
    pub when_false: Range<usize>,
}

impl BranchRanges {
    /// Index of the first token after the conditional
    pub fn end(&self) -> usize {
        self.when_false.end
    }
}

/// Find the branches of the `?` at `question`
///
/// The true branch runs to the `:` that matches this `?`, skipping nested
/// conditionals and parenthesised groups. The false branch runs to the first
/// unmatched `)`, `,` or `:` at the same depth, or to the end of the slice,
/// which makes conditionals right-associative.
pub(crate) fn find_branches(tokens: &[Token], question: usize) -> CalcResult<BranchRanges> {
    let colon = scan_level(tokens, question + 1, Stop::Colon).ok_or_else(|| {
        CalcError::new(
            ErrorCode::InvalidSyntax,
            "Conditional '?' has no matching ':'",
            tokens[question].span.clone(),
        )
    })?;
    let end = scan_level(tokens, colon + 1, Stop::Boundary).unwrap_or(tokens.len());

    let ranges = BranchRanges {
        when_true: question + 1..colon,
        when_false: colon + 1..end,
    };
    if ranges.when_true.is_empty() {
        return Err(CalcError::new(
            ErrorCode::MissingOperand,
            "Conditional is missing its true branch",
            tokens[question].span.clone(),
        ));
    }
    if ranges.when_false.is_empty() {
        return Err(CalcError::new(
            ErrorCode::MissingOperand,
            "Conditional is missing its false branch",
            tokens[colon].span.clone(),
        ));
    }
    Ok(ranges)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// The `:` matching the current `?`; any other boundary means there is none
    Colon,
    /// The first unmatched `)`, `,` or `:`
    Boundary,
}

fn scan_level(tokens: &[Token], from: usize, stop: Stop) -> Option<usize> {
    let mut parens = 0usize;
    let mut nested = 0usize;

    for (offset, token) in tokens[from..].iter().enumerate() {
        let index = from + offset;
        match token.kind {
            TokenKind::OpeningParen => parens += 1,
            TokenKind::ClosingParen if parens == 0 => {
                return (stop == Stop::Boundary).then_some(index);
            }
            TokenKind::ClosingParen => parens -= 1,
            TokenKind::Comma if parens == 0 => {
                return (stop == Stop::Boundary).then_some(index);
            }
            TokenKind::TernaryIf if parens == 0 => nested += 1,
            TokenKind::TernaryElse if parens == 0 => {
                if nested == 0 {
                    return Some(index);
                }
                nested -= 1;
            }
            _ => {}
        }
    }
    None
}
