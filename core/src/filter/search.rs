//! `$search`: free text matched against the searchable attributes.

use relgraph_types::PrimitiveKind;

use crate::builder::{CompareOp, Expression, ExpressionBuilder, PatternPosition};
use crate::error::Result;
use crate::metamodel::EntityType;

/// Builds the OR of one predicate per searchable attribute of `entity`.
///
/// Text attributes use a contains match, numeric attributes are cast to
/// text first, booleans match `true`/`1` and `false`/`0` exactly. Returns
/// `None` when no attribute can match the term.
pub fn search_expression(
    builder: &ExpressionBuilder,
    entity: &EntityType,
    qualifier: &str,
    term: &str,
) -> Result<Option<Expression>> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(None);
    }

    let mut combined: Option<Expression> = None;
    for attribute in entity.attributes().iter().filter(|a| a.is_searchable()) {
        let column = builder.column(qualifier, attribute);
        let predicate = match attribute.kind() {
            kind if kind.is_textual() => {
                builder.pattern_match(column, term, PatternPosition::Contains)?
            }
            kind if kind.is_numeric() => {
                let text = builder.cast(column, PrimitiveKind::String)?;
                builder.pattern_match(text, term, PatternPosition::Contains)?
            }
            PrimitiveKind::Boolean => match boolean_term(term) {
                Some(value) => builder.compare_value(CompareOp::Eq, column, value),
                None => continue,
            },
            _ => continue,
        };
        combined = Some(match combined {
            Some(previous) => builder.or(previous, predicate),
            None => predicate,
        });
    }
    Ok(combined)
}

fn boolean_term(term: &str) -> Option<bool> {
    if term.eq_ignore_ascii_case("true") || term == "1" {
        Some(true)
    } else if term.eq_ignore_ascii_case("false") || term == "0" {
        Some(false)
    } else {
        None
    }
}
