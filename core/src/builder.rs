//! Query-builder handle used by the filter translator.
//!
//! [`ExpressionBuilder`] creates typed [`Expression`]s: a SQL fragment plus
//! the primitive kind of its result when known. Dialect specific functions
//! are delegated to the [`DatabaseDialect`] hooks selected at construction.

use compact_str::CompactString;
use relgraph_types::{Dialect, PrimitiveKind};

use crate::config::ProcessorConfig;
use crate::dialect::{self, DatabaseDialect};
use crate::error::Result;
use crate::metamodel::Attribute;
use crate::sql::{SQL, SQLChunk, Token};
use crate::value::Value;

// =============================================================================
// Expression
// =============================================================================

/// A translated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    sql: SQL,
    kind: Option<PrimitiveKind>,
    atomic: bool,
}

impl Expression {
    /// Wraps a fragment that is composite (binary operator, predicate).
    pub fn new(sql: SQL, kind: Option<PrimitiveKind>) -> Self {
        Self {
            sql,
            kind,
            atomic: false,
        }
    }

    /// Wraps a fragment that never needs parentheses (column, parameter,
    /// function call).
    pub fn atom(sql: SQL, kind: Option<PrimitiveKind>) -> Self {
        Self {
            sql,
            kind,
            atomic: true,
        }
    }

    pub fn sql(&self) -> &SQL {
        &self.sql
    }

    pub fn into_sql(self) -> SQL {
        self.sql
    }

    pub fn kind(&self) -> Option<PrimitiveKind> {
        self.kind
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Fragment safe to embed as an operand of a binary operator.
    pub fn operand(self) -> SQL {
        if self.atomic {
            self.sql
        } else {
            self.sql.parens()
        }
    }
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub const fn token(self) -> Token {
        match self {
            CompareOp::Eq => Token::EQ,
            CompareOp::Ne => Token::NE,
            CompareOp::Gt => Token::GT,
            CompareOp::Ge => Token::GE,
            CompareOp::Lt => Token::LT,
            CompareOp::Le => Token::LE,
        }
    }

    /// Operator to use when both operands trade places.
    pub const fn mirrored(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Ne => CompareOp::Ne,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericOp {
    Sum,
    Diff,
    Prod,
    Quot,
}

impl NumericOp {
    pub const fn token(self) -> Token {
        match self {
            NumericOp::Sum => Token::PLUS,
            NumericOp::Diff => Token::MINUS,
            NumericOp::Prod => Token::STAR,
            NumericOp::Quot => Token::SLASH,
        }
    }
}

/// Where the search text sits inside a LIKE pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternPosition {
    Contains,
    StartsWith,
    EndsWith,
}

/// An escaped LIKE pattern. `escape` is set when the literal contained a
/// reserved character and the predicate must carry an `ESCAPE` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    pub pattern: CompactString,
    pub escape: Option<char>,
}

// =============================================================================
// ExpressionBuilder
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ExpressionBuilder {
    dialect: Dialect,
    hooks: &'static dyn DatabaseDialect,
    escape_char: char,
}

impl ExpressionBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            hooks: dialect::hooks(dialect),
            escape_char: '\\',
        }
    }

    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self::new(config.dialect).with_escape_char(config.escape_char)
    }

    /// Uses custom dialect hooks instead of the registered ones.
    pub fn with_hooks(dialect: Dialect, hooks: &'static dyn DatabaseDialect) -> Self {
        Self {
            dialect,
            hooks,
            escape_char: '\\',
        }
    }

    pub fn with_escape_char(mut self, escape_char: char) -> Self {
        self.escape_char = escape_char;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn hooks(&self) -> &'static dyn DatabaseDialect {
        self.hooks
    }

    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    // ==================== operands ====================

    pub fn column(&self, qualifier: &str, attribute: &Attribute) -> Expression {
        Expression::atom(
            SQL::column(qualifier, attribute.column()),
            Some(attribute.kind()),
        )
    }

    /// A bound parameter.
    pub fn literal(&self, value: impl Into<Value>, kind: Option<PrimitiveKind>) -> Expression {
        Expression::atom(SQL::param(value), kind)
    }

    pub fn null(&self) -> Expression {
        Expression::atom(SQL::token(Token::NULL), None)
    }

    // ==================== predicates ====================

    pub fn is_null(&self, value: Expression) -> Expression {
        Expression::new(
            value.operand().push(Token::IS).push(Token::NULL),
            Some(PrimitiveKind::Boolean),
        )
    }

    pub fn is_not_null(&self, value: Expression) -> Expression {
        Expression::new(
            value
                .operand()
                .push(Token::IS)
                .push(Token::NOT)
                .push(Token::NULL),
            Some(PrimitiveKind::Boolean),
        )
    }

    /// Compare to expression.
    pub fn compare(&self, op: CompareOp, left: Expression, right: Expression) -> Expression {
        Expression::new(
            left.operand().push(op.token()).append(right.operand()),
            Some(PrimitiveKind::Boolean),
        )
    }

    /// Compare to literal.
    pub fn compare_value(&self, op: CompareOp, left: Expression, right: impl Into<Value>) -> Expression {
        let kind = left.kind();
        self.compare(op, left, self.literal(right, kind))
    }

    pub fn and(&self, left: Expression, right: Expression) -> Expression {
        Expression::new(
            left.operand().push(Token::AND).append(right.operand()),
            Some(PrimitiveKind::Boolean),
        )
    }

    pub fn or(&self, left: Expression, right: Expression) -> Expression {
        Expression::new(
            left.operand().push(Token::OR).append(right.operand()),
            Some(PrimitiveKind::Boolean),
        )
    }

    pub fn not(&self, value: Expression) -> Expression {
        Expression::new(
            SQL::token(Token::NOT).append(value.operand()),
            Some(PrimitiveKind::Boolean),
        )
    }

    /// `value LIKE pattern [ESCAPE 'c']`
    pub fn like(&self, value: Expression, pattern: LikePattern) -> Expression {
        let mut sql = value
            .operand()
            .push(Token::LIKE)
            .push(SQLChunk::Param(Value::Text(pattern.pattern)));
        if let Some(escape) = pattern.escape {
            sql = sql
                .push(Token::ESCAPE)
                .push(SQLChunk::Text(core::iter::once(escape).collect()));
        }
        Expression::new(sql, Some(PrimitiveKind::Boolean))
    }

    /// Builds a LIKE pattern around `text`, escaping `%`, `_` and the escape
    /// character itself so that the text matches literally.
    ///
    /// ```
    /// use relgraph_core::builder::{ExpressionBuilder, PatternPosition};
    /// use relgraph_core::Dialect;
    ///
    /// let builder = ExpressionBuilder::new(Dialect::Default);
    /// let plain = builder.like_pattern("abc", PatternPosition::StartsWith);
    /// assert_eq!(plain.pattern, "abc%");
    /// assert_eq!(plain.escape, None);
    ///
    /// let escaped = builder.like_pattern("50%", PatternPosition::Contains);
    /// assert_eq!(escaped.pattern, r"%50\%%");
    /// assert_eq!(escaped.escape, Some('\\'));
    /// ```
    pub fn like_pattern(&self, text: &str, position: PatternPosition) -> LikePattern {
        let mut pattern = CompactString::with_capacity(text.len() + 2);
        let mut escaped = false;

        if matches!(position, PatternPosition::Contains | PatternPosition::EndsWith) {
            pattern.push('%');
        }
        for c in text.chars() {
            if c == '%' || c == '_' || c == self.escape_char {
                pattern.push(self.escape_char);
                escaped = true;
            }
            pattern.push(c);
        }
        if matches!(position, PatternPosition::Contains | PatternPosition::StartsWith) {
            pattern.push('%');
        }

        LikePattern {
            pattern,
            escape: escaped.then_some(self.escape_char),
        }
    }

    /// Pattern match through the dialect's `contains` hook.
    pub fn pattern_match(
        &self,
        value: Expression,
        text: &str,
        position: PatternPosition,
    ) -> Result<Expression> {
        self.hooks
            .contains(self, value, self.like_pattern(text, position))
    }

    // ==================== arithmetic ====================

    pub fn arithmetic(&self, op: NumericOp, left: Expression, right: Expression) -> Expression {
        let kind = left.kind().or(right.kind());
        Expression::new(
            left.operand().push(op.token()).append(right.operand()),
            kind,
        )
    }

    pub fn arithmetic_value(&self, op: NumericOp, left: Expression, right: impl Into<Value>) -> Expression {
        let kind = left.kind();
        self.arithmetic(op, left, self.literal(right, kind))
    }

    /// `CAST(value AS INTEGER)`
    pub fn to_integer(&self, value: Expression) -> Expression {
        Expression::atom(
            SQL::func(
                "CAST",
                value.into_sql().push(Token::AS).push(SQLChunk::raw_static("INTEGER")),
            ),
            Some(PrimitiveKind::Int64),
        )
    }

    /// `left % right`; both operands must already be integer expressions.
    pub fn modulo(&self, left: Expression, right: Expression) -> Expression {
        Expression::new(
            left.operand().push(Token::PERCENT).append(right.operand()),
            Some(PrimitiveKind::Int64),
        )
    }

    // ==================== aggregation ====================

    pub fn count(&self, value: Expression) -> Expression {
        Expression::atom(SQL::func("COUNT", value.into_sql()), Some(PrimitiveKind::Int64))
    }

    pub fn count_star(&self) -> Expression {
        Expression::atom(
            SQL::func("COUNT", SQL::token(Token::STAR)),
            Some(PrimitiveKind::Int64),
        )
    }

    // ==================== functions ====================

    /// Generic function call `NAME(arg, ...)`.
    pub fn function(
        &self,
        name: &'static str,
        args: impl IntoIterator<Item = Expression>,
        kind: Option<PrimitiveKind>,
    ) -> Expression {
        let args = SQL::join(args.into_iter().map(Expression::into_sql), Token::COMMA);
        Expression::atom(SQL::func(name, args), kind)
    }

    pub fn length(&self, value: Expression) -> Expression {
        self.function("LENGTH", [value], Some(PrimitiveKind::Int32))
    }

    pub fn lower(&self, value: Expression) -> Expression {
        self.function("LOWER", [value], Some(PrimitiveKind::String))
    }

    pub fn upper(&self, value: Expression) -> Expression {
        self.function("UPPER", [value], Some(PrimitiveKind::String))
    }

    pub fn trim(&self, value: Expression) -> Expression {
        self.function("TRIM", [value], Some(PrimitiveKind::String))
    }

    /// `SUBSTRING(value, start[, length])` with a 1-based `start`.
    pub fn substring(&self, value: Expression, start: Expression, length: Option<Expression>) -> Expression {
        let args = core::iter::once(value)
            .chain(core::iter::once(start))
            .chain(length);
        self.function("SUBSTRING", args, Some(PrimitiveKind::String))
    }

    pub fn concat(&self, left: Expression, right: Expression) -> Expression {
        self.hooks.concat(left, right)
    }

    /// 1-based position of `needle` in `haystack`, 0 when absent.
    pub fn locate(&self, haystack: Expression, needle: Expression) -> Expression {
        self.hooks.locate(haystack, needle)
    }

    pub fn current_timestamp(&self) -> Expression {
        Expression::atom(
            SQL::raw("CURRENT_TIMESTAMP"),
            Some(PrimitiveKind::DateTimeOffset),
        )
    }

    pub fn cast(&self, value: Expression, target: PrimitiveKind) -> Result<Expression> {
        self.hooks.cast(value, target)
    }

    pub fn date(&self, value: Expression) -> Result<Expression> {
        self.hooks.date(value)
    }

    pub fn time(&self, value: Expression) -> Result<Expression> {
        self.hooks.time(value)
    }
}
