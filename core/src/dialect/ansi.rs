use relgraph_types::PrimitiveKind;

use crate::builder::Expression;
use crate::dialect::{DatabaseDialect, call};
use crate::error::Result;
use crate::sql::SQL;

const DATE_PATTERN: &str = "YYYY-MM-DD";

fn date_pattern() -> Expression {
    Expression::atom(SQL::text(DATE_PATTERN), Some(PrimitiveKind::String))
}

/// Generic database: string cast through `CONCAT(value, '')`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDialect;

impl DatabaseDialect for DefaultDialect {
    fn cast_to_string(&self, value: Expression) -> Result<Expression> {
        let empty = Expression::atom(SQL::text(""), Some(PrimitiveKind::String));
        Ok(self.concat(value, empty))
    }
}

/// H2: default behaviour plus `PARSEDATETIME(value, 'YYYY-MM-DD')`.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl DatabaseDialect for H2Dialect {
    fn cast_to_string(&self, value: Expression) -> Result<Expression> {
        DefaultDialect.cast_to_string(value)
    }

    fn date(&self, value: Expression) -> Result<Expression> {
        Ok(call(
            "PARSEDATETIME",
            [value, date_pattern()],
            Some(PrimitiveKind::Date),
        ))
    }
}

/// HSQLDB: default behaviour plus `TO_DATE(value, 'YYYY-MM-DD')`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HsqldbDialect;

impl DatabaseDialect for HsqldbDialect {
    fn cast_to_string(&self, value: Expression) -> Result<Expression> {
        DefaultDialect.cast_to_string(value)
    }

    fn date(&self, value: Expression) -> Result<Expression> {
        Ok(call("TO_DATE", [value, date_pattern()], Some(PrimitiveKind::Date)))
    }
}
