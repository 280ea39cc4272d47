//! Coercion of request literals to bound parameter values.

use chrono::{DateTime, NaiveDate, NaiveTime};
use compact_str::CompactString;
use relgraph_types::PrimitiveKind;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::filter::Literal;
use crate::value::Value;

/// Converts literals in request text form to typed [`Value`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralConverter {
    case_insensitive_null: bool,
}

impl LiteralConverter {
    pub fn new(case_insensitive_null: bool) -> Self {
        Self {
            case_insensitive_null,
        }
    }

    pub fn is_null(&self, literal: &Literal) -> bool {
        if self.case_insensitive_null {
            literal.text().eq_ignore_ascii_case("null")
        } else {
            literal.is_null()
        }
    }

    /// Converts `literal` to a value of `target`; with no target the kind is
    /// inferred from the literal's shape. `parameter` names the attribute or
    /// function argument for error reporting.
    ///
    /// ```
    /// use relgraph_core::filter::{Literal, LiteralConverter};
    /// use relgraph_core::{PrimitiveKind, Value};
    ///
    /// let conv = LiteralConverter::default();
    /// let v = conv.convert(&Literal::new("42", None), Some(PrimitiveKind::Int32), "Age").unwrap();
    /// assert_eq!(v, Value::Integer(42));
    /// assert!(conv.convert(&Literal::new("4x", None), Some(PrimitiveKind::Int32), "Age").is_err());
    /// ```
    pub fn convert(
        &self,
        literal: &Literal,
        target: Option<PrimitiveKind>,
        parameter: &str,
    ) -> Result<Value> {
        if self.is_null(literal) {
            return Ok(Value::Null);
        }
        let text = literal.text();
        let fail = || Error::conversion(text, parameter);

        let Some(kind) = target.or(literal.kind()) else {
            return Ok(infer(text));
        };

        match kind {
            PrimitiveKind::String => unquote(text).map(Value::from).ok_or_else(fail),
            PrimitiveKind::Guid => checked(text, is_guid).ok_or_else(fail),
            PrimitiveKind::Boolean => {
                if text.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err(fail())
                }
            }
            PrimitiveKind::Byte => parse_integer(text, 0, i64::from(u8::MAX)).ok_or_else(fail),
            PrimitiveKind::Int16 => {
                parse_integer(text, i64::from(i16::MIN), i64::from(i16::MAX)).ok_or_else(fail)
            }
            PrimitiveKind::Int32 => {
                parse_integer(text, i64::from(i32::MIN), i64::from(i32::MAX)).ok_or_else(fail)
            }
            PrimitiveKind::Int64 => parse_integer(text, i64::MIN, i64::MAX).ok_or_else(fail),
            PrimitiveKind::Decimal | PrimitiveKind::Single | PrimitiveKind::Double => {
                let trimmed = text.trim_end_matches(['m', 'M', 'd', 'D', 'f', 'F']);
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Value::Real)
                    .ok_or_else(fail)
            }
            PrimitiveKind::Date => checked(text, is_date).ok_or_else(fail),
            PrimitiveKind::TimeOfDay => checked(text, is_time).ok_or_else(fail),
            PrimitiveKind::DateTimeOffset => checked(text, is_date_time).ok_or_else(fail),
            PrimitiveKind::Binary => Err(fail()),
        }
    }
}

/// Strips the quotes of a string literal and undoubles embedded quotes.
fn unquote(text: &str) -> Option<CompactString> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = CompactString::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // A lone quote inside the literal is malformed
            if chars.next_if_eq(&'\'').is_none() {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

fn infer(text: &str) -> Value {
    if let Some(s) = unquote(text) {
        return Value::Text(s);
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(v) = text.parse::<i64>() {
        return Value::Integer(v);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Value::Real(v),
        _ => Value::from(text),
    }
}

fn parse_integer(text: &str, min: i64, max: i64) -> Option<Value> {
    let text = text.strip_suffix(['l', 'L']).unwrap_or(text);
    let v = text.parse::<i64>().ok()?;
    (min..=max).contains(&v).then_some(Value::Integer(v))
}

/// Validates a temporal or GUID literal with `parse` and binds its unquoted
/// text.
fn checked(text: &str, parse: fn(&str) -> bool) -> Option<Value> {
    let raw = unquote(text).unwrap_or_else(|| CompactString::from(text));
    parse(&raw).then(|| Value::Text(raw))
}

/// `YYYY-MM-DD`, rejecting dates that do not exist
fn is_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// `HH:MM[:SS[.fff]]`
fn is_time(s: &str) -> bool {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
        || NaiveTime::parse_from_str(s, "%H:%M").is_ok()
}

/// RFC 3339 date-time, seconds optional
fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%#z").is_ok()
}

/// Hyphenated `8-4-4-4-12` form only
fn is_guid(s: &str) -> bool {
    s.len() == 36 && Uuid::try_parse(s).is_ok()
}
