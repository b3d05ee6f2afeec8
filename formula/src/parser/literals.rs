//! Number and string literal scanning
//!
//! Both scanners work on the expression as a char slice and return the decoded
//! literal plus the index just past it.

use crate::ast::Span;
use crate::error::{CalcError, ErrorCode};
use crate::CalcResult;

pub(crate) const STRING_DELIMITERS: [char; 3] = ['"', '\'', '`'];

/// Scan `digits [. digits] [(e|E) [+|-] digits]` starting at `start`
pub(crate) fn scan_number(chars: &[char], start: usize) -> CalcResult<(f64, usize)> {
    let digit_at = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());
    let mut i = start;
    let mut digits = 0;

    while digit_at(i) {
        i += 1;
        digits += 1;
    }

    if chars.get(i) == Some(&'.') {
        i += 1;
        while digit_at(i) {
            i += 1;
            digits += 1;
        }
        if chars.get(i) == Some(&'.') {
            return Err(CalcError::new(
                ErrorCode::InvalidNumberFormat,
                "Invalid number format: unexpected second decimal point",
                Span::new(i, 1),
            ));
        }
    }

    if digits == 0 {
        return Err(CalcError::new(
            ErrorCode::InvalidNumberFormat,
            "Invalid number format: expected digits",
            Span::new(start, i - start),
        ));
    }

    if matches!(chars.get(i), Some('e') | Some('E')) {
        let exponent_start = i;
        i += 1;
        if matches!(chars.get(i), Some('+') | Some('-')) {
            i += 1;
        }
        if !digit_at(i) {
            return Err(CalcError::new(
                ErrorCode::InvalidNumberFormat,
                "Invalid number format: exponent requires digits",
                Span::new(exponent_start, i - exponent_start),
            ));
        }
        while digit_at(i) {
            i += 1;
        }
        if chars.get(i) == Some(&'.') {
            return Err(CalcError::new(
                ErrorCode::InvalidNumberFormat,
                "Invalid number format: decimal point after exponent",
                Span::new(i, 1),
            ));
        }
    }

    let text: String = chars[start..i].iter().collect();
    let value = text.parse::<f64>().map_err(|e| {
        CalcError::new(
            ErrorCode::InvalidNumberFormat,
            format!("Invalid number format '{}': {}", text, e),
            Span::new(start, i - start),
        )
    })?;
    Ok((value, i))
}

/// Scan a string delimited by `"`, `'` or `` ` `` starting at the opening delimiter
pub(crate) fn scan_string(chars: &[char], start: usize) -> CalcResult<(String, usize)> {
    let delimiter = chars[start];
    let unterminated = || {
        CalcError::new(
            ErrorCode::UnterminatedString,
            format!("Unterminated string literal, expected closing {}", delimiter),
            Span::new(start, chars.len() - start),
        )
    };

    let mut value = String::new();
    let mut i = start + 1;
    loop {
        let c = *chars.get(i).ok_or_else(unterminated)?;
        if c == '\\' {
            let escaped = *chars.get(i + 1).ok_or_else(unterminated)?;
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '0' => value.push('\0'),
                '\\' => value.push('\\'),
                c if STRING_DELIMITERS.contains(&c) => value.push(c),
                other => {
                    value.push('\\');
                    value.push(other);
                }
            }
            i += 2;
        } else if c == delimiter {
            return Ok((value, i + 1));
        } else {
            value.push(c);
            i += 1;
        }
    }
}
