use relgraph_types::PrimitiveKind;

use crate::builder::Expression;
use crate::dialect::{DatabaseDialect, call, cast_as};
use crate::error::Result;

/// PostgreSQL: casts for every extraction, `STRPOS` for locate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl DatabaseDialect for PostgresDialect {
    fn cast_to_string(&self, value: Expression) -> Result<Expression> {
        Ok(cast_as(value, "TEXT", PrimitiveKind::String))
    }

    fn date(&self, value: Expression) -> Result<Expression> {
        Ok(cast_as(value, "DATE", PrimitiveKind::Date))
    }

    fn time(&self, value: Expression) -> Result<Expression> {
        Ok(cast_as(value, "TIME", PrimitiveKind::TimeOfDay))
    }

    fn locate(&self, haystack: Expression, needle: Expression) -> Expression {
        call("STRPOS", [haystack, needle], Some(PrimitiveKind::Int32))
    }
}
