//! Parsed entity-set request: the system query options of one read.

use compact_str::CompactString;

use crate::filter::ExpressionNode;

/// One `$orderby` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub path: CompactString,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(path: impl Into<CompactString>) -> Self {
        Self {
            path: path.into(),
            descending: false,
        }
    }

    pub fn desc(path: impl Into<CompactString>) -> Self {
        Self {
            path: path.into(),
            descending: true,
        }
    }
}

/// One `$expand` item with its nested `$select` and `$expand`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandSpec {
    pub path: CompactString,
    pub select: Vec<CompactString>,
    pub expand: Vec<ExpandSpec>,
}

impl ExpandSpec {
    pub fn new(path: impl Into<CompactString>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn select<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.select.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn expand(mut self, child: ExpandSpec) -> Self {
        self.expand.push(child);
        self
    }
}

/// A read of one entity set.
///
/// ```
/// use relgraph_core::filter::ExpressionNode;
/// use relgraph_core::query::{EntityRequest, ExpandSpec, OrderBy};
///
/// let request = EntityRequest::new("Person")
///     .filter(ExpressionNode::equals(
///         ExpressionNode::member("Name"),
///         ExpressionNode::string("Ada"),
///     ))
///     .expand(ExpandSpec::new("Roles"))
///     .order_by(OrderBy::desc("Age"))
///     .top(10)
///     .with_count();
///
/// assert!(request.count);
/// assert_eq!(request.expand.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityRequest {
    pub entity: CompactString,
    pub filter: Option<ExpressionNode>,
    pub search: Option<CompactString>,
    /// Attribute and element collection aliases, empty for all
    pub select: Vec<CompactString>,
    pub expand: Vec<ExpandSpec>,
    pub order_by: Vec<OrderBy>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: bool,
}

impl EntityRequest {
    pub fn new(entity: impl Into<CompactString>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: ExpressionNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn search(mut self, term: impl Into<CompactString>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn select<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.select.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn expand(mut self, spec: ExpandSpec) -> Self {
        self.expand.push(spec);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }
}
