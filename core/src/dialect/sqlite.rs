use relgraph_types::PrimitiveKind;

use crate::builder::Expression;
use crate::dialect::{DatabaseDialect, call, cast_as};
use crate::error::Result;
use crate::sql::Token;

/// SQLite: `CAST(.. AS TEXT)`, `DATE()`/`TIME()`, `INSTR` and `||`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl DatabaseDialect for SqliteDialect {
    fn cast_to_string(&self, value: Expression) -> Result<Expression> {
        Ok(cast_as(value, "TEXT", PrimitiveKind::String))
    }

    fn date(&self, value: Expression) -> Result<Expression> {
        Ok(call("DATE", [value], Some(PrimitiveKind::Date)))
    }

    fn time(&self, value: Expression) -> Result<Expression> {
        Ok(call("TIME", [value], Some(PrimitiveKind::TimeOfDay)))
    }

    fn locate(&self, haystack: Expression, needle: Expression) -> Expression {
        call("INSTR", [haystack, needle], Some(PrimitiveKind::Int32))
    }

    fn concat(&self, left: Expression, right: Expression) -> Expression {
        Expression::new(
            left.operand().push(Token::CONCAT).append(right.operand()),
            Some(PrimitiveKind::String),
        )
    }
}
