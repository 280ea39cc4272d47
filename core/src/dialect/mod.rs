//! Per-database translation hooks.
//!
//! Cast, date/time extraction, pattern matching, string location and
//! concatenation are the dialect-sensitive parts of filter translation.
//! Every hook has a default: "not implemented" for the cast family, ANSI-ish
//! SQL for the rest. One implementation per [`Dialect`] is registered in a
//! static table and selected once when an
//! [`ExpressionBuilder`](crate::builder::ExpressionBuilder) is created.

mod ansi;
mod postgres;
mod sqlite;

pub use ansi::{DefaultDialect, H2Dialect, HsqldbDialect};
pub use postgres::PostgresDialect;
pub use relgraph_types::Dialect;
pub use sqlite::SqliteDialect;

use relgraph_types::PrimitiveKind;

use crate::builder::{Expression, ExpressionBuilder, LikePattern};
use crate::error::{Error, Result};
use crate::sql::{SQL, Token};

pub trait DatabaseDialect: Send + Sync + core::fmt::Debug {
    /// `CAST(value, type)`. Only string and date targets are dispatched;
    /// everything else is not implemented.
    fn cast(&self, value: Expression, target: PrimitiveKind) -> Result<Expression> {
        match target {
            PrimitiveKind::String => self.cast_to_string(value),
            PrimitiveKind::Date => self.date(value),
            _ => Err(Error::unsupported_operator("CAST")),
        }
    }

    fn cast_to_string(&self, _value: Expression) -> Result<Expression> {
        Err(Error::unsupported_operator("CAST"))
    }

    fn date(&self, _value: Expression) -> Result<Expression> {
        Err(Error::unsupported_operator("DATE"))
    }

    fn time(&self, _value: Expression) -> Result<Expression> {
        Err(Error::unsupported_operator("TIME"))
    }

    /// Pattern match used by CONTAINS, STARTSWITH and ENDSWITH. The pattern
    /// is already wrapped and escaped.
    fn contains(
        &self,
        builder: &ExpressionBuilder,
        value: Expression,
        pattern: LikePattern,
    ) -> Result<Expression> {
        Ok(builder.like(value, pattern))
    }

    /// `LOCATE(needle, haystack)`
    fn locate(&self, haystack: Expression, needle: Expression) -> Expression {
        call("LOCATE", [needle, haystack], Some(PrimitiveKind::Int32))
    }

    /// `CONCAT(left, right)`
    fn concat(&self, left: Expression, right: Expression) -> Expression {
        call("CONCAT", [left, right], Some(PrimitiveKind::String))
    }
}

/// Returns the hooks registered for `dialect`.
pub fn hooks(dialect: Dialect) -> &'static dyn DatabaseDialect {
    match dialect {
        Dialect::Default => &DefaultDialect,
        Dialect::H2 => &H2Dialect,
        Dialect::HSQLDB => &HsqldbDialect,
        Dialect::SQLite => &SqliteDialect,
        Dialect::PostgreSQL => &PostgresDialect,
    }
}

pub(crate) fn call<const N: usize>(
    name: &'static str,
    args: [Expression; N],
    kind: Option<PrimitiveKind>,
) -> Expression {
    let args = SQL::join(args.into_iter().map(Expression::into_sql), Token::COMMA);
    Expression::atom(SQL::func(name, args), kind)
}

/// `CAST(value AS <sql_type>)`
pub(crate) fn cast_as(value: Expression, sql_type: &'static str, kind: PrimitiveKind) -> Expression {
    Expression::atom(
        SQL::func("CAST", value.into_sql().push(Token::AS).append(SQL::raw(sql_type))),
        Some(kind),
    )
}
