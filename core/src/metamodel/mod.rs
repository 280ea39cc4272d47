//! Entity metamodel: types, attributes, keys and navigation paths.
//!
//! The metamodel is built once at startup and shared read-only between
//! requests.

mod attribute;
mod entity;
mod navigation;

pub use attribute::*;
pub use entity::*;
pub use navigation::*;

use std::sync::Arc;

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::error::{Error, Result};

/// Registry of all entity and complex types, addressed by external name.
#[derive(Debug, Clone, Default)]
pub struct Metamodel {
    types: HashMap<CompactString, Arc<EntityType>>,
}

impl Metamodel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, replacing any previous type of the same name.
    pub fn register(&mut self, entity: EntityType) -> &mut Self {
        self.types
            .insert(CompactString::from(entity.name()), Arc::new(entity));
        self
    }

    pub fn with(mut self, entity: EntityType) -> Self {
        self.register(entity);
        self
    }

    pub fn entity(&self, name: &str) -> Result<&Arc<EntityType>> {
        self.types
            .get(name)
            .ok_or_else(|| Error::UnknownEntity(CompactString::from(name)))
    }

    /// Terminal type of a navigation path.
    pub fn target_of(&self, path: &NavigationPath) -> Result<&Arc<EntityType>> {
        self.entity(path.target())
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.types.values()
    }
}
