//! Translation of [`ExpressionNode`] trees into builder [`Expression`]s.

use compact_str::CompactString;
use relgraph_types::PrimitiveKind;

use crate::builder::{CompareOp, Expression, ExpressionBuilder, NumericOp, PatternPosition};
use crate::error::{Error, Result};
use crate::filter::{
    AggregationKind, ArithmeticOperator, BooleanOperator, ComparisonOperator, ExpressionNode,
    Literal, LiteralConverter, MethodKind,
};
use crate::metamodel::{EntityType, Metamodel};
use crate::sql::{SQL, Token};
use crate::value::Value;

/// Qualifier of the root table in every level query.
pub const ROOT_QUALIFIER: &str = "t0";

/// Qualifier of the table scanned by a correlated `$count` subquery.
const COUNT_QUALIFIER: &str = "c0";

/// Translates filter trees for one entity type.
///
/// Members resolve against `entity` and are qualified with `qualifier`.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    builder: &'a ExpressionBuilder,
    metamodel: &'a Metamodel,
    entity: &'a EntityType,
    qualifier: &'a str,
    literals: LiteralConverter,
}

/// Translates `node` against the root table of `entity`.
pub fn translate(
    node: &ExpressionNode,
    builder: &ExpressionBuilder,
    metamodel: &Metamodel,
    entity: &EntityType,
) -> Result<Expression> {
    Translator::new(builder, metamodel, entity, ROOT_QUALIFIER).translate(node)
}

impl<'a> Translator<'a> {
    pub fn new(
        builder: &'a ExpressionBuilder,
        metamodel: &'a Metamodel,
        entity: &'a EntityType,
        qualifier: &'a str,
    ) -> Self {
        Self {
            builder,
            metamodel,
            entity,
            qualifier,
            literals: LiteralConverter::default(),
        }
    }

    pub fn with_literals(mut self, literals: LiteralConverter) -> Self {
        self.literals = literals;
        self
    }

    pub fn translate(&self, node: &ExpressionNode) -> Result<Expression> {
        match node {
            ExpressionNode::Comparison { op, left, right } => self.comparison(*op, left, right),
            ExpressionNode::Boolean { op, left, right } => {
                let left = self.translate(left)?;
                let right = self.translate(right)?;
                Ok(match op {
                    BooleanOperator::And => self.builder.and(left, right),
                    BooleanOperator::Or => self.builder.or(left, right),
                })
            }
            ExpressionNode::Not(operand) => Ok(self.builder.not(self.translate(operand)?)),
            ExpressionNode::Arithmetic { op, left, right } => self.arithmetic(*op, left, right),
            ExpressionNode::Aggregation { kind, path } => self.aggregation(*kind, path.as_deref()),
            ExpressionNode::Literal(literal) => self.literal(literal, literal.kind(), "literal"),
            ExpressionNode::LiteralType(kind) => Err(Error::unsupported_filter(kind.full_name())),
            ExpressionNode::Member(path) => {
                let attribute = self.entity.resolve_path(path)?;
                Ok(self.builder.column(self.qualifier, attribute))
            }
            ExpressionNode::Call { kind, args } => self.call(*kind, args),
        }
    }

    // ==================== operators ====================

    fn comparison(
        &self,
        op: ComparisonOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Result<Expression> {
        let Some(op) = op.compare_op() else {
            return Err(unsupported(op.name()));
        };
        // Keep the literal on the right
        let (op, left, right) = if left.is_literal() && !right.is_literal() {
            (op.mirrored(), right, left)
        } else {
            (op, left, right)
        };

        let Some(literal) = right.as_literal() else {
            let left = self.translate(left)?;
            let right = self.translate(right)?;
            return Ok(self.builder.compare(op, left, right));
        };

        let left_expr = self.translate(left)?;
        if self.literals.is_null(literal) {
            match op {
                CompareOp::Eq => return Ok(self.builder.is_null(left_expr)),
                CompareOp::Ne => return Ok(self.builder.is_not_null(left_expr)),
                _ => {}
            }
        }
        let value = self
            .literals
            .convert(literal, left_expr.kind(), &parameter_name(left))?;
        Ok(self.builder.compare_value(op, left_expr, value))
    }

    fn arithmetic(
        &self,
        op: ArithmeticOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Result<Expression> {
        let Some(op) = op.numeric_op() else {
            // MOD works on integers only
            let left = self.builder.to_integer(self.numeric_operand(left)?);
            let right = self.builder.to_integer(self.numeric_operand(right)?);
            return Ok(self.builder.modulo(left, right));
        };

        let left_expr = self.translate(left)?;
        match right.as_literal() {
            Some(literal) => {
                let value = self.numeric_value(literal, &parameter_name(left))?;
                Ok(self.builder.arithmetic_value(op, left_expr, value))
            }
            None => Ok(self.builder.arithmetic(op, left_expr, self.translate(right)?)),
        }
    }

    fn aggregation(&self, kind: AggregationKind, path: Option<&str>) -> Result<Expression> {
        if kind != AggregationKind::Count {
            return Err(unsupported(kind.name()));
        }
        let Some(path) = path else {
            return Ok(self.builder.count_star());
        };

        // Correlated count of the related rows of a collection navigation
        let navigation = self.entity.resolve_navigation(path)?;
        let target = self.metamodel.target_of(navigation)?;
        let correlation = SQL::join(
            navigation.join_columns().iter().map(|join| {
                SQL::column(COUNT_QUALIFIER, join.target.as_str())
                    .push(Token::EQ)
                    .append(SQL::column(self.qualifier, join.source.as_str()))
            }),
            Token::AND,
        );
        let subquery = SQL::token(Token::SELECT)
            .append(self.builder.count_star().into_sql())
            .push(Token::FROM)
            .append(SQL::ident(target.table()))
            .push(Token::AS)
            .append(SQL::ident(COUNT_QUALIFIER))
            .push(Token::WHERE)
            .append(correlation);
        Ok(Expression::atom(subquery.parens(), Some(PrimitiveKind::Int64)))
    }

    // ==================== built-in functions ====================

    fn call(&self, kind: MethodKind, args: &[ExpressionNode]) -> Result<Expression> {
        let b = self.builder;
        match kind {
            MethodKind::Length => {
                let [s] = arity::<1>(kind, args)?;
                Ok(b.length(self.string_operand(s, kind)?))
            }
            MethodKind::Contains | MethodKind::StartsWith | MethodKind::EndsWith => {
                let [s, pattern] = arity::<2>(kind, args)?;
                let position = match kind {
                    MethodKind::StartsWith => PatternPosition::StartsWith,
                    MethodKind::EndsWith => PatternPosition::EndsWith,
                    _ => PatternPosition::Contains,
                };
                let text = self.pattern_text(pattern, kind)?;
                b.pattern_match(self.translate(s)?, &text, position)
            }
            MethodKind::IndexOf => {
                let [s, needle] = arity::<2>(kind, args)?;
                let haystack = self.string_operand(s, kind)?;
                let needle = self.string_operand(needle, kind)?;
                // Locate is 1-based, indexof 0-based
                Ok(b.arithmetic_value(NumericOp::Diff, b.locate(haystack, needle), 1))
            }
            MethodKind::Substring => {
                let (s, start, length) = match args {
                    [s, start] => (s, start, None),
                    [s, start, length] => (s, start, Some(length)),
                    _ => return Err(Error::unsupported_filter(kind.name())),
                };
                let value = self.string_operand(s, kind)?;
                let start = self.substring_start(start)?;
                let length = length.map(|l| self.integer_operand(l, kind)).transpose()?;
                Ok(b.substring(value, start, length))
            }
            MethodKind::ToLower => {
                let [s] = arity::<1>(kind, args)?;
                Ok(b.lower(self.string_operand(s, kind)?))
            }
            MethodKind::ToUpper => {
                let [s] = arity::<1>(kind, args)?;
                Ok(b.upper(self.string_operand(s, kind)?))
            }
            MethodKind::Trim => {
                let [s] = arity::<1>(kind, args)?;
                Ok(b.trim(self.string_operand(s, kind)?))
            }
            MethodKind::Concat => {
                let [left, right] = arity::<2>(kind, args)?;
                let left = self.string_operand(left, kind)?;
                let right = self.string_operand(right, kind)?;
                Ok(b.concat(left, right))
            }
            MethodKind::Cast => {
                let [value, target] = arity::<2>(kind, args)?;
                let target = cast_target(target)?;
                let value = match value.as_literal() {
                    Some(literal) => self.literal(literal, literal.kind(), kind.name())?,
                    None => self.translate(value)?,
                };
                b.cast(value, target)
            }
            MethodKind::Now => {
                let [] = arity::<0>(kind, args)?;
                Ok(b.current_timestamp())
            }
            MethodKind::Time => {
                let [value] = arity::<1>(kind, args)?;
                b.time(self.translate(value)?)
            }
            MethodKind::Date => {
                let [value] = arity::<1>(kind, args)?;
                b.date(self.translate(value)?)
            }
            MethodKind::Year
            | MethodKind::Month
            | MethodKind::Day
            | MethodKind::Hour
            | MethodKind::Minute
            | MethodKind::Second
            | MethodKind::Round
            | MethodKind::Floor
            | MethodKind::Ceiling
            | MethodKind::MatchesPattern => Err(unsupported(kind.name())),
        }
    }

    /// Shifts the 0-based protocol start index to the 1-based SQL one.
    fn substring_start(&self, start: &ExpressionNode) -> Result<Expression> {
        if let Some(literal) = start.as_literal() {
            let shifted = match self.literals.convert(
                literal,
                Some(PrimitiveKind::Int32),
                MethodKind::Substring.name(),
            )? {
                Value::Integer(start) => start + 1,
                _ => return Err(Error::conversion(literal.text(), MethodKind::Substring.name())),
            };
            return Ok(self.builder.literal(shifted, Some(PrimitiveKind::Int32)));
        }
        let start = self.translate(start)?;
        let start = match start.kind() {
            Some(kind) if kind.is_integer() => start,
            _ => self.builder.to_integer(start),
        };
        Ok(self.builder.arithmetic_value(NumericOp::Sum, start, 1))
    }

    // ==================== operands ====================

    fn literal(
        &self,
        literal: &Literal,
        kind: Option<PrimitiveKind>,
        parameter: &str,
    ) -> Result<Expression> {
        let value = self.literals.convert(literal, kind, parameter)?;
        Ok(self.builder.literal(value, kind))
    }

    /// String literals become bound string parameters, anything else is
    /// translated as is.
    fn string_operand(&self, node: &ExpressionNode, kind: MethodKind) -> Result<Expression> {
        match node.as_literal() {
            Some(literal) => self.literal(literal, Some(PrimitiveKind::String), kind.name()),
            None => self.translate(node),
        }
    }

    fn integer_operand(&self, node: &ExpressionNode, kind: MethodKind) -> Result<Expression> {
        match node.as_literal() {
            Some(literal) => self.literal(literal, Some(PrimitiveKind::Int32), kind.name()),
            None => self.translate(node),
        }
    }

    fn numeric_operand(&self, node: &ExpressionNode) -> Result<Expression> {
        match node.as_literal() {
            Some(literal) => {
                let value = self.numeric_value(literal, "MOD")?;
                Ok(self.builder.literal(value, None))
            }
            None => self.translate(node),
        }
    }

    fn numeric_value(&self, literal: &Literal, parameter: &str) -> Result<Value> {
        match self.literals.convert(literal, literal.kind(), parameter)? {
            value @ (Value::Integer(_) | Value::Real(_) | Value::Null) => Ok(value),
            _ => Err(Error::conversion(literal.text(), parameter)),
        }
    }

    fn pattern_text(&self, node: &ExpressionNode, kind: MethodKind) -> Result<CompactString> {
        let literal = node
            .as_literal()
            .ok_or_else(|| Error::unsupported_filter(kind.name()))?;
        match self
            .literals
            .convert(literal, Some(PrimitiveKind::String), kind.name())?
        {
            Value::Text(text) => Ok(text),
            _ => Err(Error::unsupported_filter(kind.name())),
        }
    }
}

fn arity<const N: usize>(kind: MethodKind, args: &[ExpressionNode]) -> Result<&[ExpressionNode; N]> {
    <&[ExpressionNode; N]>::try_from(args).map_err(|_| Error::unsupported_filter(kind.name()))
}

fn cast_target(node: &ExpressionNode) -> Result<PrimitiveKind> {
    let name = MethodKind::Cast.name();
    match node {
        ExpressionNode::LiteralType(kind) => Ok(*kind),
        ExpressionNode::Literal(literal) => {
            let text = literal.text().trim_matches('\'');
            PrimitiveKind::parse(text).ok_or_else(|| Error::unsupported_filter(name))
        }
        _ => Err(Error::unsupported_filter(name)),
    }
}

fn parameter_name(node: &ExpressionNode) -> CompactString {
    match node {
        ExpressionNode::Member(path) => path.clone(),
        ExpressionNode::Call { kind, .. } => kind.name().into(),
        ExpressionNode::Aggregation { kind, .. } => kind.name().into(),
        _ => "literal".into(),
    }
}

fn unsupported(name: &'static str) -> Error {
    crate::relgraph_trace_unsupported!(name);
    Error::unsupported_operator(name)
}
