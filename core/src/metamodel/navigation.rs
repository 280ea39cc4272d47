use core::borrow::Borrow;
use core::hash::{Hash, Hasher};

use compact_str::CompactString;
use smallvec::SmallVec;

/// How a navigation path reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKind {
    /// Association to another entity type; `many` selects collection or
    /// single-valued cardinality.
    Association { many: bool },
    /// Repeated values of a complex type stored in a collection table.
    ElementCollection,
}

/// Equality pair `source.column = target.column` used to join two levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinColumn {
    pub source: CompactString,
    pub target: CompactString,
}

/// A named route from one type to a related entity type or element
/// collection.
///
/// Identity is the alias: two paths with the same alias are the same path
/// within one source type.
#[derive(Debug, Clone)]
pub struct NavigationPath {
    alias: CompactString,
    source: CompactString,
    target: CompactString,
    kind: NavigationKind,
    join_columns: SmallVec<[JoinColumn; 2]>,
}

impl NavigationPath {
    pub fn association(
        alias: impl Into<CompactString>,
        source: impl Into<CompactString>,
        target: impl Into<CompactString>,
        many: bool,
    ) -> Self {
        Self {
            alias: alias.into(),
            source: source.into(),
            target: target.into(),
            kind: NavigationKind::Association { many },
            join_columns: SmallVec::new(),
        }
    }

    pub fn element_collection(
        alias: impl Into<CompactString>,
        source: impl Into<CompactString>,
        target: impl Into<CompactString>,
    ) -> Self {
        Self {
            alias: alias.into(),
            source: source.into(),
            target: target.into(),
            kind: NavigationKind::ElementCollection,
            join_columns: SmallVec::new(),
        }
    }

    /// Adds a join column pair; source column on the owning table, target
    /// column on the related or collection table.
    pub fn join(mut self, source: impl Into<CompactString>, target: impl Into<CompactString>) -> Self {
        self.join_columns.push(JoinColumn {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Name of the type declaring this path.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the terminal type of this path.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> NavigationKind {
        self.kind
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self.kind,
            NavigationKind::Association { many: true } | NavigationKind::ElementCollection
        )
    }

    pub fn is_element_collection(&self) -> bool {
        self.kind == NavigationKind::ElementCollection
    }

    pub fn join_columns(&self) -> &[JoinColumn] {
        &self.join_columns
    }

    /// Path segments as written in a request.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.alias.split('/')
    }
}

impl PartialEq for NavigationPath {
    fn eq(&self, other: &Self) -> bool {
        self.alias == other.alias
    }
}

impl Eq for NavigationPath {}

impl Hash for NavigationPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alias.hash(state);
    }
}

impl Borrow<str> for NavigationPath {
    fn borrow(&self) -> &str {
        &self.alias
    }
}
