use std::sync::Arc;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::metamodel::{Attribute, NavigationPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Keyed entity type.
    Entity,
    /// Keyless complex type, the element type of an element collection.
    Complex,
}

/// An entity or complex type with its table mapping.
///
/// # Example
///
/// ```
/// use relgraph_core::metamodel::{Attribute, EntityType};
/// use relgraph_core::PrimitiveKind;
///
/// let person = EntityType::entity("Person", "person")
///     .key(Attribute::new("ID", "id", PrimitiveKind::Int64))
///     .attribute(Attribute::new("Name", "name", PrimitiveKind::String).searchable());
///
/// assert_eq!(person.key_attributes().map(|a| a.name()).collect::<Vec<_>>(), ["ID"]);
/// assert_eq!(person.resolve_path("Name").unwrap().column(), "name");
/// ```
#[derive(Debug, Clone)]
pub struct EntityType {
    name: CompactString,
    table: CompactString,
    kind: TypeKind,
    attributes: Vec<Attribute>,
    keys: SmallVec<[usize; 2]>,
    navigations: Vec<Arc<NavigationPath>>,
}

impl EntityType {
    pub fn entity(name: impl Into<CompactString>, table: impl Into<CompactString>) -> Self {
        Self::with_kind(name, table, TypeKind::Entity)
    }

    /// A complex type stored in its own collection table.
    pub fn complex(name: impl Into<CompactString>, table: impl Into<CompactString>) -> Self {
        Self::with_kind(name, table, TypeKind::Complex)
    }

    fn with_kind(
        name: impl Into<CompactString>,
        table: impl Into<CompactString>,
        kind: TypeKind,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            kind,
            attributes: Vec::new(),
            keys: SmallVec::new(),
            navigations: Vec::new(),
        }
    }

    /// Adds a key attribute. Key order is declaration order.
    pub fn key(mut self, attribute: Attribute) -> Self {
        self.keys.push(self.attributes.len());
        self.attributes.push(attribute.not_null());
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn navigation(mut self, path: NavigationPath) -> Self {
        self.navigations.push(Arc::new(path));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Key attributes in their fixed declaration order.
    pub fn key_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.keys.iter().map(|&i| &self.attributes[i])
    }

    pub fn is_key(&self, attribute: &Attribute) -> bool {
        self.key_attributes().any(|k| k.name() == attribute.name())
    }

    pub fn navigations(&self) -> &[Arc<NavigationPath>] {
        &self.navigations
    }

    pub fn attribute_named(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Resolves a `/` or `.` separated attribute path to its leaf attribute.
    pub fn resolve_path(&self, path: &str) -> Result<&Attribute> {
        let found = if path.contains('.') {
            let normalized = path.replace('.', "/");
            self.attribute_named(&normalized)
        } else {
            self.attribute_named(path)
        };
        found.ok_or_else(|| Error::UnknownAttribute {
            entity: self.name.clone(),
            attribute: path.into(),
        })
    }

    pub fn resolve_navigation(&self, alias: &str) -> Result<&Arc<NavigationPath>> {
        self.navigations
            .iter()
            .find(|n| n.alias() == alias)
            .ok_or_else(|| Error::UnknownAttribute {
                entity: self.name.clone(),
                attribute: alias.into(),
            })
    }
}
