//! Date arithmetic
//!
//! Dates move by days: `date + n` and `date - n` shift by `n` days (fractions
//! allowed), `date - date` is the signed difference in days. The offset of the
//! date operand is preserved.

use crate::error::{CalcError, ErrorCode};
use crate::operators::OperatorKind;
use crate::parser::Token;
use crate::value::Value;
use crate::CalcResult;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

// Far beyond chrono's representable range, keeps the i64 cast exact
const MAX_SHIFT_MILLISECONDS: f64 = 1e17;

pub fn date_arithmetic(
    kind: OperatorKind,
    left: &Value,
    right: &Value,
    token: &Token,
) -> CalcResult<Value> {
    let overflow = || {
        CalcError::new(
            ErrorCode::UnsupportedOperation,
            "Resulting date is out of range",
            token.span.clone(),
        )
    };

    match (kind, left, right) {
        (OperatorKind::Add, Value::Date(d), Value::Number(n))
        | (OperatorKind::Add, Value::Number(n), Value::Date(d)) => {
            add_days(d, *n).map(Value::Date).ok_or_else(overflow)
        }
        (OperatorKind::Subtract, Value::Date(d), Value::Number(n)) => {
            add_days(d, -*n).map(Value::Date).ok_or_else(overflow)
        }
        (OperatorKind::Subtract, Value::Date(a), Value::Date(b)) => {
            Ok(Value::Number(days_between(b, a)))
        }
        _ => Err(CalcError::new(
            ErrorCode::TypeMismatch,
            format!(
                "Operator '{}' cannot be applied to {} and {}",
                kind,
                left.data_type(),
                right.data_type()
            ),
            token.span.clone(),
        )),
    }
}

/// Shift a date by a number of days
pub fn add_days(date: &DateTime<FixedOffset>, days: f64) -> Option<DateTime<FixedOffset>> {
    let millis = (days * MILLISECONDS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() > MAX_SHIFT_MILLISECONDS {
        return None;
    }
    date.checked_add_signed(Duration::milliseconds(millis as i64))
}

/// Signed distance in days from `from` to `to`
pub fn days_between(from: &DateTime<FixedOffset>, to: &DateTime<FixedOffset>) -> f64 {
    (*to - *from).num_milliseconds() as f64 / MILLISECONDS_PER_DAY
}

/// Midnight UTC of a calendar date
pub fn date_from_ymd(year: i32, month: u32, day: u32) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Utc.fix().from_local_datetime(&naive).single()
}

/// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`
///
/// Inputs without an offset are taken as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Utc.fix().from_local_datetime(&naive).single()
}
