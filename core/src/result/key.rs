//! Typed correlation keys.

use core::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::value::Value;

/// One key attribute value. `Null` is its own variant and can never be
/// equal to a real value, whatever that value's text form is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern of an `f64`
    Real(u64),
    Text(CompactString),
    Bytes(Vec<u8>),
}

impl From<&Value> for KeyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => KeyValue::Null,
            Value::Boolean(v) => KeyValue::Bool(*v),
            Value::Integer(v) => KeyValue::Int(*v),
            // -0.0 and 0.0 identify the same row
            Value::Real(v) if *v == 0.0 => KeyValue::Real(0f64.to_bits()),
            Value::Real(v) => KeyValue::Real(v.to_bits()),
            Value::Text(v) => KeyValue::Text(v.clone()),
            Value::Blob(v) => KeyValue::Bytes(v.clone()),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Null => f.write_str("null"),
            KeyValue::Bool(v) => write!(f, "{v}"),
            KeyValue::Int(v) => write!(f, "{v}"),
            KeyValue::Real(bits) => write!(f, "{}", f64::from_bits(*bits)),
            KeyValue::Text(v) => f.write_str(v),
            KeyValue::Bytes(v) => {
                for b in v {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Key values of one nesting level, in key attribute order.
pub type KeySegment = SmallVec<[KeyValue; 2]>;

/// Composite key of a row across nesting levels: one segment per level,
/// outermost first.
///
/// `Display` renders the segments as `a|b/c`, with `null` for absent values;
/// the rendering is for diagnostics only and never used for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NavigationKey {
    segments: SmallVec<[KeySegment; 4]>,
}

impl NavigationKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_segment(&mut self, segment: KeySegment) {
        self.segments.push(segment);
    }

    pub fn with_segment<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let segment = values
            .into_iter()
            .map(|v| {
                let value: Value = v.into();
                KeyValue::from(&value)
            })
            .collect();
        self.segments.push(segment);
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }

    /// True when every value of the innermost segment is null, i.e. the row
    /// came from an outer join without a match at that level.
    pub fn is_absent(&self) -> bool {
        self.segments
            .last()
            .is_some_and(|s| !s.is_empty() && s.iter().all(|v| *v == KeyValue::Null))
    }
}

impl fmt::Display for NavigationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for (j, value) in segment.iter().enumerate() {
                if j > 0 {
                    f.write_str("|")?;
                }
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_never_equals_null_text() {
        let absent = NavigationKey::new().with_segment([Value::Null]);
        let text = NavigationKey::new().with_segment([Value::from("null")]);
        assert_ne!(absent, text);
        assert_eq!(absent.to_string(), text.to_string());
        assert!(absent.is_absent());
        assert!(!text.is_absent());
    }

    #[test]
    fn test_segments_are_not_flattened() {
        // "1|2" at one level vs "1" then "2" at two levels
        let flat = NavigationKey::new().with_segment([1, 2]);
        let nested = NavigationKey::new().with_segment([1]).with_segment([2]);
        assert_ne!(flat, nested);
        assert_eq!(flat.to_string(), "1|2");
        assert_eq!(nested.to_string(), "1/2");
    }

    #[test]
    fn test_text_containing_separators() {
        let a = NavigationKey::new().with_segment(["a|b"]);
        let b = NavigationKey::new().with_segment(["a", "b"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_signed_zero() {
        let a = NavigationKey::new().with_segment([0.0f64]);
        let b = NavigationKey::new().with_segment([-0.0f64]);
        assert_eq!(a, b);
    }
}
