//! Unified database dialect enum
//!
//! A single source of truth for the database variants the filter translator
//! and the query renderer know about. Each dialect selects a set of
//! translation hooks (cast, date/time extraction, string search) and a
//! placeholder style.

/// SQL dialect for database-specific behavior
///
/// # Examples
///
/// ```
/// use relgraph_types::Dialect;
///
/// let dialect = Dialect::PostgreSQL;
/// assert!(dialect.uses_numbered_placeholders());
///
/// let h2 = Dialect::H2;
/// assert!(!h2.uses_numbered_placeholders());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// Generic ANSI-ish database: `CONCAT` based string cast, no date/time
    /// extraction.
    #[default]
    Default,

    /// H2 - `PARSEDATETIME` for date conversion
    H2,

    /// HSQLDB - `TO_DATE` for date conversion
    #[cfg_attr(feature = "serde", serde(alias = "hypersql"))]
    HSQLDB,

    /// SQLite - `INSTR` for locate, `DATE()`/`TIME()` for extraction
    SQLite,

    /// PostgreSQL - uses `$1, $2, ...` numbered placeholders
    #[cfg_attr(feature = "serde", serde(alias = "postgres"))]
    PostgreSQL,
}

impl Dialect {
    pub const ALL: &'static [Dialect] = &[
        Dialect::Default,
        Dialect::H2,
        Dialect::HSQLDB,
        Dialect::SQLite,
        Dialect::PostgreSQL,
    ];

    /// Returns `true` if this dialect uses numbered placeholders (`$1, $2, ...`)
    ///
    /// Only PostgreSQL uses numbered placeholders, everything else binds
    /// positional `?` markers.
    #[inline]
    #[must_use]
    pub const fn uses_numbered_placeholders(&self) -> bool {
        matches!(self, Dialect::PostgreSQL)
    }

    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Supports the common aliases:
    /// - Default: `"default"`, `"generic"`, `"ansi"`
    /// - H2: `"h2"`
    /// - HSQLDB: `"hsqldb"`, `"hypersql"`
    /// - SQLite: `"sqlite"`, `"libsql"`
    /// - PostgreSQL: `"postgresql"`, `"postgres"`, `"pg"`
    ///
    /// ```
    /// use relgraph_types::Dialect;
    ///
    /// assert_eq!(Dialect::parse("h2"), Some(Dialect::H2));
    /// assert_eq!(Dialect::parse("pg"), Some(Dialect::PostgreSQL));
    /// assert_eq!(Dialect::parse("unknown"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("default")
            || s.eq_ignore_ascii_case("generic")
            || s.eq_ignore_ascii_case("ansi")
        {
            Some(Dialect::Default)
        } else if s.eq_ignore_ascii_case("h2") {
            Some(Dialect::H2)
        } else if s.eq_ignore_ascii_case("hsqldb") || s.eq_ignore_ascii_case("hypersql") {
            Some(Dialect::HSQLDB)
        } else if s.eq_ignore_ascii_case("sqlite") || s.eq_ignore_ascii_case("libsql") {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else {
            None
        }
    }

    /// Get the dialect name as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::Default => "default",
            Dialect::H2 => "h2",
            Dialect::HSQLDB => "hsqldb",
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or(DialectParseError)
    }
}

/// Error returned when parsing an unknown dialect string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectParseError;

impl core::fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown dialect")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DialectParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!(Dialect::parse("default"), Some(Dialect::Default));
        assert_eq!(Dialect::parse("Generic"), Some(Dialect::Default));

        assert_eq!(Dialect::parse("h2"), Some(Dialect::H2));
        assert_eq!(Dialect::parse("H2"), Some(Dialect::H2));

        assert_eq!(Dialect::parse("hsqldb"), Some(Dialect::HSQLDB));
        assert_eq!(Dialect::parse("HyperSQL"), Some(Dialect::HSQLDB));

        assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
        assert_eq!(Dialect::parse("libsql"), Some(Dialect::SQLite));

        assert_eq!(Dialect::parse("postgresql"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("PG"), Some(Dialect::PostgreSQL));

        assert_eq!(Dialect::parse("oracle"), None);
        assert_eq!(Dialect::parse(""), None);
    }

    #[test]
    fn test_dialect_round_trips_through_display() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(*dialect));
        }
    }

    #[test]
    fn test_dialect_placeholders() {
        assert!(!Dialect::Default.uses_numbered_placeholders());
        assert!(!Dialect::SQLite.uses_numbered_placeholders());
        assert!(Dialect::PostgreSQL.uses_numbered_placeholders());
    }
}
