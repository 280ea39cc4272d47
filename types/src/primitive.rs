//! Primitive type kinds of the entity-graph protocol.
//!
//! Attributes, literals and translated expressions are tagged with one of
//! these kinds. Literal coercion and the numeric/string/date rules of the
//! filter translator dispatch on them.

/// A primitive type of the protocol (`Edm.*` names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Decimal,
    Single,
    Double,
    String,
    Date,
    TimeOfDay,
    DateTimeOffset,
    Guid,
    Binary,
}

impl PrimitiveKind {
    /// Fully qualified protocol name, e.g. `Edm.String`.
    #[must_use]
    pub const fn full_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Edm.Boolean",
            PrimitiveKind::Byte => "Edm.Byte",
            PrimitiveKind::Int16 => "Edm.Int16",
            PrimitiveKind::Int32 => "Edm.Int32",
            PrimitiveKind::Int64 => "Edm.Int64",
            PrimitiveKind::Decimal => "Edm.Decimal",
            PrimitiveKind::Single => "Edm.Single",
            PrimitiveKind::Double => "Edm.Double",
            PrimitiveKind::String => "Edm.String",
            PrimitiveKind::Date => "Edm.Date",
            PrimitiveKind::TimeOfDay => "Edm.TimeOfDay",
            PrimitiveKind::DateTimeOffset => "Edm.DateTimeOffset",
            PrimitiveKind::Guid => "Edm.Guid",
            PrimitiveKind::Binary => "Edm.Binary",
        }
    }

    /// Parses a qualified (`Edm.Int32`) or bare (`Int32`) type name.
    ///
    /// ```
    /// use relgraph_types::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::parse("Edm.String"), Some(PrimitiveKind::String));
    /// assert_eq!(PrimitiveKind::parse("date"), Some(PrimitiveKind::Date));
    /// assert_eq!(PrimitiveKind::parse("Edm.Stream"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let bare = match name.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("edm.") => &name[4..],
            _ => name,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.full_name()[4..].eq_ignore_ascii_case(bare))
    }

    pub const ALL: &'static [PrimitiveKind] = &[
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Decimal,
        PrimitiveKind::Single,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Date,
        PrimitiveKind::TimeOfDay,
        PrimitiveKind::DateTimeOffset,
        PrimitiveKind::Guid,
        PrimitiveKind::Binary,
    ];

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte | PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::Int64
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                PrimitiveKind::Decimal | PrimitiveKind::Single | PrimitiveKind::Double
            )
    }

    #[inline]
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, PrimitiveKind::String | PrimitiveKind::Guid)
    }

    #[inline]
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Date | PrimitiveKind::TimeOfDay | PrimitiveKind::DateTimeOffset
        )
    }
}

impl core::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_qualified_and_bare_names() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::parse(kind.full_name()), Some(*kind));
            assert_eq!(PrimitiveKind::parse(&kind.full_name()[4..]), Some(*kind));
        }
        assert_eq!(PrimitiveKind::parse("EDM.INT64"), Some(PrimitiveKind::Int64));
        assert_eq!(PrimitiveKind::parse("Edm."), None);
        assert_eq!(PrimitiveKind::parse(""), None);
    }

    #[test]
    fn test_kind_families() {
        assert!(PrimitiveKind::Int32.is_integer());
        assert!(PrimitiveKind::Int32.is_numeric());
        assert!(!PrimitiveKind::Decimal.is_integer());
        assert!(PrimitiveKind::Decimal.is_numeric());
        assert!(PrimitiveKind::String.is_textual());
        assert!(PrimitiveKind::Date.is_temporal());
        assert!(!PrimitiveKind::Boolean.is_numeric());
    }
}
