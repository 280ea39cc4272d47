//! Expression node tree of a `$filter` (or computed projection).
//!
//! Nodes are plain data. The parser that produces them lives outside this
//! crate; the constructors below are what it (and the tests) use.

use compact_str::CompactString;
use relgraph_types::PrimitiveKind;

use crate::builder::{CompareOp, NumericOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// Enum flag test, not supported by relational stores.
    Has,
}

impl ComparisonOperator {
    pub const fn name(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "EQ",
            ComparisonOperator::Ne => "NE",
            ComparisonOperator::Gt => "GT",
            ComparisonOperator::Ge => "GE",
            ComparisonOperator::Lt => "LT",
            ComparisonOperator::Le => "LE",
            ComparisonOperator::Has => "HAS",
        }
    }

    pub(crate) const fn compare_op(&self) -> Option<CompareOp> {
        Some(match self {
            ComparisonOperator::Eq => CompareOp::Eq,
            ComparisonOperator::Ne => CompareOp::Ne,
            ComparisonOperator::Gt => CompareOp::Gt,
            ComparisonOperator::Ge => CompareOp::Ge,
            ComparisonOperator::Lt => CompareOp::Lt,
            ComparisonOperator::Le => CompareOp::Le,
            ComparisonOperator::Has => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOperator {
    pub(crate) const fn numeric_op(&self) -> Option<NumericOp> {
        match self {
            ArithmeticOperator::Add => Some(NumericOp::Sum),
            ArithmeticOperator::Sub => Some(NumericOp::Diff),
            ArithmeticOperator::Mul => Some(NumericOp::Prod),
            ArithmeticOperator::Div => Some(NumericOp::Quot),
            ArithmeticOperator::Mod => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    Count,
    CountDistinct,
    Sum,
    Average,
    Min,
    Max,
}

impl AggregationKind {
    pub const fn name(&self) -> &'static str {
        match self {
            AggregationKind::Count => "COUNT",
            AggregationKind::CountDistinct => "COUNT_DISTINCT",
            AggregationKind::Sum => "SUM",
            AggregationKind::Average => "AVERAGE",
            AggregationKind::Min => "MIN",
            AggregationKind::Max => "MAX",
        }
    }
}

/// Built-in functions of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    // String
    Length,
    Contains,
    StartsWith,
    EndsWith,
    IndexOf,
    Substring,
    ToLower,
    ToUpper,
    Trim,
    Concat,
    Cast,
    // Date and time
    Now,
    Time,
    Date,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    // Math
    Round,
    Floor,
    Ceiling,
    MatchesPattern,
}

impl MethodKind {
    pub const fn name(&self) -> &'static str {
        match self {
            MethodKind::Length => "LENGTH",
            MethodKind::Contains => "CONTAINS",
            MethodKind::StartsWith => "STARTSWITH",
            MethodKind::EndsWith => "ENDSWITH",
            MethodKind::IndexOf => "INDEXOF",
            MethodKind::Substring => "SUBSTRING",
            MethodKind::ToLower => "TOLOWER",
            MethodKind::ToUpper => "TOUPPER",
            MethodKind::Trim => "TRIM",
            MethodKind::Concat => "CONCAT",
            MethodKind::Cast => "CAST",
            MethodKind::Now => "NOW",
            MethodKind::Time => "TIME",
            MethodKind::Date => "DATE",
            MethodKind::Year => "YEAR",
            MethodKind::Month => "MONTH",
            MethodKind::Day => "DAY",
            MethodKind::Hour => "HOUR",
            MethodKind::Minute => "MINUTE",
            MethodKind::Second => "SECOND",
            MethodKind::Round => "ROUND",
            MethodKind::Floor => "FLOOR",
            MethodKind::Ceiling => "CEILING",
            MethodKind::MatchesPattern => "MATCHESPATTERN",
        }
    }
}

/// A literal in its request text form: strings quoted (`'O''Neil'`),
/// numbers, booleans and dates bare, `null` for the null literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    text: CompactString,
    kind: Option<PrimitiveKind>,
}

impl Literal {
    pub fn new(text: impl Into<CompactString>, kind: Option<PrimitiveKind>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn null() -> Self {
        Self::new("null", None)
    }

    /// Quotes `value` as a string literal.
    pub fn string(value: &str) -> Self {
        let mut text = CompactString::with_capacity(value.len() + 2);
        text.push('\'');
        for c in value.chars() {
            if c == '\'' {
                text.push('\'');
            }
            text.push(c);
        }
        text.push('\'');
        Self::new(text, Some(PrimitiveKind::String))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Type the parser attached to the literal, if any.
    pub fn kind(&self) -> Option<PrimitiveKind> {
        self.kind
    }

    pub fn is_null(&self) -> bool {
        self.text == "null"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Comparison {
        op: ComparisonOperator,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
    Boolean {
        op: BooleanOperator,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
    /// Logical negation
    Not(Box<ExpressionNode>),
    Arithmetic {
        op: ArithmeticOperator,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
    /// `$count` of the root (`path = None`) or of a collection navigation.
    Aggregation {
        kind: AggregationKind,
        path: Option<CompactString>,
    },
    Literal(Literal),
    /// Type argument of `cast`, e.g. `Edm.String`.
    LiteralType(PrimitiveKind),
    /// Attribute path relative to the filtered entity.
    Member(CompactString),
    Call {
        kind: MethodKind,
        args: Vec<ExpressionNode>,
    },
}

impl ExpressionNode {
    pub fn compare(op: ComparisonOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equals(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::compare(ComparisonOperator::Eq, left, right)
    }

    pub fn and(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Boolean {
            op: BooleanOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Boolean {
            op: BooleanOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: ExpressionNode) -> Self {
        Self::Not(Box::new(operand))
    }

    pub fn arithmetic(op: ArithmeticOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn member(path: impl Into<CompactString>) -> Self {
        Self::Member(path.into())
    }

    /// Untyped literal in request text form.
    pub fn literal(text: impl Into<CompactString>) -> Self {
        Self::Literal(Literal::new(text, None))
    }

    pub fn string(value: &str) -> Self {
        Self::Literal(Literal::string(value))
    }

    pub fn null() -> Self {
        Self::Literal(Literal::null())
    }

    pub fn call(kind: MethodKind, args: impl IntoIterator<Item = ExpressionNode>) -> Self {
        Self::Call {
            kind,
            args: args.into_iter().collect(),
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            ExpressionNode::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, ExpressionNode::Literal(_))
    }
}
