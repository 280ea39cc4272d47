mod chunk;
mod tokens;

pub use chunk::*;
pub use tokens::*;

use compact_str::CompactString;
use core::fmt::{Display, Write};
use relgraph_types::Dialect;
use smallvec::SmallVec;
use std::borrow::Cow;

use crate::value::Value;

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL fragments
/// without heap allocation. Fragments own their parameter values so that a
/// translated filter can outlive the node tree it was built from.
///
/// # Example
///
/// ```
/// use relgraph_core::sql::{SQL, Token};
/// use relgraph_core::Dialect;
///
/// let sql = SQL::column("t0", "age")
///     .push(Token::GT)
///     .append(SQL::param(18));
/// let (text, params) = sql.build(Dialect::PostgreSQL);
/// assert_eq!(text, r#""t0"."age" > $1"#);
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SQL {
    pub chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Token(t)],
        }
    }

    /// Creates SQL with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<CompactString>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Ident(name.into())],
        }
    }

    /// Creates SQL with raw text (unquoted)
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Raw(text.into())],
        }
    }

    /// Creates SQL with an inline string literal
    #[inline]
    pub fn text(text: impl Into<CompactString>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Text(text.into())],
        }
    }

    /// Creates SQL with a single integer literal.
    #[inline]
    pub fn number(value: i64) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Number(value)],
        }
    }

    /// Creates SQL with a single bound parameter
    #[inline]
    pub fn param(value: impl Into<Value>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Param(value.into())],
        }
    }

    /// Creates SQL referencing a qualified column: "qualifier"."name"
    #[inline]
    pub fn column(qualifier: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::column(qualifier, name)],
        }
    }

    /// Creates SQL for a function call: NAME(args)
    #[inline]
    pub fn func(name: &'static str, args: SQL) -> Self {
        SQL::raw(name)
            .push(Token::LPAREN)
            .append(args)
            .push(Token::RPAREN)
    }

    // ==================== builder methods ====================

    /// Append another SQL fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<SQL>) -> Self {
        crate::relgraph_profile_scope!("sql_render", "append");
        let other = other.into();

        if self.chunks.is_empty() {
            return other;
        }
        if other.chunks.is_empty() {
            return self;
        }

        self.chunks.extend(other.chunks);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<SQL>) {
        let other = other.into();

        if self.chunks.is_empty() {
            self.chunks = other.chunks;
            return;
        }
        self.chunks.extend(other.chunks);
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SQLChunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn push_mut(&mut self, chunk: impl Into<SQLChunk>) {
        self.chunks.push(chunk.into());
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== combinators ====================

    /// Joins multiple SQL fragments with a separator
    pub fn join<T>(sqls: T, separator: Token) -> SQL
    where
        T: IntoIterator<Item = SQL>,
    {
        let mut iter = sqls.into_iter();
        let Some(mut result) = iter.next() else {
            return SQL::empty();
        };

        let (lower, _) = iter.size_hint();
        result.chunks.reserve(lower.saturating_mul(2));

        for other in iter {
            result.chunks.push(SQLChunk::Token(separator));
            result.chunks.extend(other.chunks);
        }
        result
    }

    /// Wrap in parentheses: (self)
    #[inline]
    pub fn parens(self) -> Self {
        SQL::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Creates an aliased version: self AS "name"
    pub fn alias(self, name: impl Into<CompactString>) -> SQL {
        self.push(Token::AS).push(SQLChunk::Ident(name.into()))
    }

    // ==================== output methods ====================

    /// Returns the SQL string with dialect-appropriate placeholders.
    pub fn sql(&self, dialect: Dialect) -> String {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(128));
        self.write_to(&mut buf, dialect);
        buf
    }

    /// Generates the SQL string and collects parameter references in a single pass.
    pub fn build(&self, dialect: Dialect) -> (String, SmallVec<[&Value; 8]>) {
        crate::relgraph_profile_scope!("sql_render", "build");
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(128));
        let mut params: SmallVec<[&Value; 8]> = SmallVec::new();

        for (i, chunk) in self.chunks.iter().enumerate() {
            match chunk {
                SQLChunk::Param(value) => {
                    params.push(value);
                    write_placeholder(dialect, params.len(), &mut buf);
                }
                _ => chunk.write(&mut buf),
            }

            if self.needs_space(i) {
                let _ = buf.write_char(' ');
            }
        }

        (buf, params)
    }

    /// Write SQL to a buffer with dialect-appropriate placeholders.
    pub fn write_to(&self, buf: &mut impl Write, dialect: Dialect) {
        let mut param_index = 0usize;
        for (i, chunk) in self.chunks.iter().enumerate() {
            match chunk {
                SQLChunk::Param(_) => {
                    param_index += 1;
                    write_placeholder(dialect, param_index, buf);
                }
                _ => chunk.write(buf),
            }

            if self.needs_space(i) {
                let _ = buf.write_char(' ');
            }
        }
    }

    fn needs_space(&self, index: usize) -> bool {
        let Some(next) = self.chunks.get(index + 1) else {
            return false;
        };

        chunk_needs_space(&self.chunks[index], next)
    }

    /// Returns an iterator over references to parameter values
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.chunks.iter().filter_map(|chunk| match chunk {
            SQLChunk::Param(value) => Some(value),
            _ => None,
        })
    }
}

/// Writes the placeholder for the 1-based parameter `index`.
///
/// PostgreSQL uses `$1, $2, ...`; every other dialect binds positional `?`.
pub fn write_placeholder(dialect: Dialect, index: usize, buf: &mut impl Write) {
    if dialect.uses_numbered_placeholders() {
        let _ = write!(buf, "${index}");
    } else {
        let _ = buf.write_char('?');
    }
}

/// Canonical spacing logic for SQL chunk rendering.
pub(crate) fn chunk_needs_space(current: &SQLChunk, next: &SQLChunk) -> bool {
    match (current, next) {
        // No space before closing/separator punctuation
        (_, SQLChunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        // No space after opening punctuation
        (SQLChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // Space after comma
        (SQLChunk::Token(Token::COMMA), _) => true,
        // Function call: raw name directly followed by its argument list
        (SQLChunk::Raw(_), SQLChunk::Token(Token::LPAREN)) => false,
        // Space after closing paren if next is word-like (e.g., ") FROM")
        (SQLChunk::Token(Token::RPAREN), next) => next.is_word_like() || is_operator(next),
        // Space before opening paren if preceded by word-like (e.g., "AND (")
        (current, SQLChunk::Token(Token::LPAREN)) => current.is_word_like() || is_operator(current),
        // Space around comparison/arithmetic operators
        (SQLChunk::Token(t), _) if t.is_operator() => true,
        (_, SQLChunk::Token(t)) if t.is_operator() => true,
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

#[inline]
fn is_operator(chunk: &SQLChunk) -> bool {
    matches!(chunk, SQLChunk::Token(t) if t.is_operator())
}

// ==================== trait implementations ====================

impl From<Token> for SQL {
    fn from(value: Token) -> Self {
        SQL::token(value)
    }
}

impl From<SQLChunk> for SQL {
    fn from(value: SQLChunk) -> Self {
        Self {
            chunks: smallvec::smallvec![value],
        }
    }
}

impl Display for SQL {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let params: Vec<_> = self.params().collect();
        write!(
            f,
            r#"sql: "{}", params: {:?}"#,
            self.sql(Dialect::Default),
            params
        )
    }
}

impl FromIterator<SQLChunk> for SQL {
    fn from_iter<I: IntoIterator<Item = SQLChunk>>(iter: I) -> Self {
        Self {
            chunks: SmallVec::from_iter(iter),
        }
    }
}

impl IntoIterator for SQL {
    type Item = SQLChunk;
    type IntoIter = smallvec::IntoIter<[SQLChunk; 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_call_spacing() {
        let sql = SQL::func(
            "SUBSTRING",
            SQL::join(
                [SQL::column("t0", "name"), SQL::param(1), SQL::param(3)],
                Token::COMMA,
            ),
        );
        assert_eq!(
            sql.sql(Dialect::SQLite),
            r#"SUBSTRING("t0"."name", ?, ?)"#
        );
        assert_eq!(
            sql.sql(Dialect::PostgreSQL),
            r#"SUBSTRING("t0"."name", $1, $2)"#
        );
    }

    #[test]
    fn test_count_star() {
        let sql = SQL::func("COUNT", SQL::token(Token::STAR)).alias("count");
        assert_eq!(sql.sql(Dialect::Default), r#"COUNT(*) AS "count""#);
    }

    #[test]
    fn test_boolean_and_parens() {
        let left = SQL::column("t0", "a").push(Token::EQ).append(SQL::param(1));
        let right = SQL::column("t0", "b")
            .push(Token::IS)
            .push(Token::NULL)
            .parens();
        let sql = SQL::token(Token::NOT).append(
            left.parens()
                .push(Token::AND)
                .append(right)
                .parens(),
        );
        assert_eq!(
            sql.sql(Dialect::Default),
            r#"NOT (("t0"."a" = ?) AND ("t0"."b" IS NULL))"#
        );
    }

    #[test]
    fn test_arithmetic_around_parens() {
        let sql = SQL::column("t0", "a")
            .parens()
            .push(Token::PLUS)
            .append(SQL::number(1));
        assert_eq!(sql.sql(Dialect::Default), r#"("t0"."a") + 1"#);
    }

    #[test]
    fn test_like_escape_and_text_literal_quoting() {
        let sql = SQL::column("t0", "name")
            .push(Token::LIKE)
            .append(SQL::param("%a\\%%"))
            .push(Token::ESCAPE)
            .append(SQL::text("\\"));
        assert_eq!(sql.sql(Dialect::Default), r#""t0"."name" LIKE ? ESCAPE '\'"#);
        assert_eq!(SQL::text("it's").sql(Dialect::Default), "'it''s'");
    }

    #[test]
    fn test_build_collects_params_in_order() {
        let sql = SQL::join([SQL::param(1), SQL::param("x")], Token::COMMA);
        let (text, params) = sql.build(Dialect::PostgreSQL);
        assert_eq!(text, "$1, $2");
        assert_eq!(params.as_slice(), &[&Value::Integer(1), &Value::Text("x".into())]);
    }

    #[test]
    fn test_join_empty() {
        assert!(SQL::join(Vec::new(), Token::COMMA).is_empty());
    }
}
