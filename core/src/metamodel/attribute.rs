use compact_str::CompactString;
use relgraph_types::PrimitiveKind;

/// A primitive attribute of an entity or complex type, mapped to one column.
///
/// Attributes of embedded complex types are flattened with `/` separated
/// names (`Address/City`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: CompactString,
    column: CompactString,
    kind: PrimitiveKind,
    searchable: bool,
    nullable: bool,
}

impl Attribute {
    pub fn new(
        name: impl Into<CompactString>,
        column: impl Into<CompactString>,
        kind: PrimitiveKind,
    ) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            kind,
            searchable: false,
            nullable: true,
        }
    }

    /// Marks the attribute as participating in `$search`.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// External name used in filters and in hydrated entities.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Select alias of the attribute at its own level.
    pub fn alias(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}
