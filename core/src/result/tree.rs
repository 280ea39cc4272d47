//! Result tree: the rows of every nesting level, bucketed for lookup by
//! parent row.

use std::sync::Arc;

use compact_str::CompactString;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::error::{Error, Result};
use crate::metamodel::EntityType;
use crate::result::{KeyBuilder, NavigationId, NavigationKey, NavigationTree, RowGroups, group_rows};
use crate::row::Row;

// =============================================================================
// Shared pieces
// =============================================================================

/// Expand children and element collections of one node, keyed by the
/// navigation alias. Each alias is populated at most once.
#[derive(Debug, Default)]
pub struct ResultChildren {
    expand: HashMap<CompactString, ExpandResult>,
    collections: HashMap<CompactString, ElementCollectionResult>,
}

impl ResultChildren {
    /// Fails with [`Error::DuplicateResultInsertion`] when the alias is
    /// already present; the first child stays in place.
    pub fn put_expand(&mut self, child: ExpandResult) -> Result<()> {
        match self.expand.entry(CompactString::from(child.path_alias())) {
            Entry::Occupied(entry) => Err(Error::DuplicateResultInsertion {
                path: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(child);
                Ok(())
            }
        }
    }

    pub fn put_collection(&mut self, child: ElementCollectionResult) -> Result<()> {
        match self.collections.entry(CompactString::from(child.path_alias())) {
            Entry::Occupied(entry) => Err(Error::DuplicateResultInsertion {
                path: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(child);
                Ok(())
            }
        }
    }

    pub fn expand(&self, path: &str) -> Option<&ExpandResult> {
        self.expand.get(path)
    }

    pub fn collection(&self, path: &str) -> Option<&ElementCollectionResult> {
        self.collections.get(path)
    }

    pub fn expand_len(&self) -> usize {
        self.expand.len()
    }

    pub fn collection_len(&self) -> usize {
        self.collections.len()
    }
}

/// Grouped rows of a non-root level.
#[derive(Debug)]
struct GroupedLevel {
    navigation: Arc<NavigationTree>,
    level: NavigationId,
    owner: NavigationId,
    groups: RowGroups,
}

impl GroupedLevel {
    fn group(navigation: Arc<NavigationTree>, level: NavigationId, rows: Vec<Row>) -> Result<Self> {
        let owner = navigation
            .builder(level)
            .parent()
            .map_or(level, |parent| parent.id());
        let groups = group_rows(rows, navigation.builder(level))?;
        Ok(Self {
            navigation,
            level,
            owner,
            groups,
        })
    }

    fn path_alias(&self) -> &str {
        self.navigation
            .builder(self.level)
            .navigation_path()
            .map_or("", |path| path.alias())
    }

    fn lookup(&self, key: &NavigationKey) -> Option<&[Row]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    fn lookup_row(&self, owner_row: &Row) -> Result<Option<&[Row]>> {
        let key = self.navigation.builder(self.owner).build_owning_key(owner_row)?;
        Ok(self.lookup(&key))
    }
}

// =============================================================================
// EntityResult
// =============================================================================

/// Common surface of the nodes that hold entity rows (root and expand).
pub trait EntityResult {
    fn navigation(&self) -> &NavigationTree;

    fn level(&self) -> NavigationId;

    fn children(&self) -> &ResultChildren;

    fn children_mut(&mut self) -> &mut ResultChildren;

    /// Attribute aliases requested for this level, empty for all.
    fn requested_attributes(&self) -> &[CompactString];

    fn key_builder(&self) -> KeyBuilder<'_> {
        self.navigation().builder(self.level())
    }

    fn entity_type(&self) -> &Arc<EntityType> {
        self.key_builder().target_type()
    }

    fn put_expand_result(&mut self, child: ExpandResult) -> Result<()> {
        self.children_mut().put_expand(child)
    }

    fn put_element_collection_result(&mut self, child: ElementCollectionResult) -> Result<()> {
        self.children_mut().put_collection(child)
    }

    fn expand_result(&self, path: &str) -> Option<&ExpandResult> {
        self.children().expand(path)
    }

    fn collection_result(&self, path: &str) -> Option<&ElementCollectionResult> {
        self.children().collection(path)
    }

    /// Rows of the expanded `path` that belong to `owner_row`, a row of this
    /// node. `None` when the path was not expanded or nothing matched.
    fn lookup_children(&self, path: &str, owner_row: &Row) -> Result<Option<&[Row]>> {
        match self.expand_result(path) {
            Some(child) => child.lookup_row(owner_row),
            None => Ok(None),
        }
    }

    /// Element collection rows of `path` that belong to `owner_row`.
    fn lookup_collection(&self, path: &str, owner_row: &Row) -> Result<Option<&[Row]>> {
        match self.collection_result(path) {
            Some(child) => child.lookup_row(owner_row),
            None => Ok(None),
        }
    }
}

// =============================================================================
// ResultTree
// =============================================================================

/// Root of a result: the root entity rows in query order plus the optional
/// total count.
#[derive(Debug)]
pub struct ResultTree {
    navigation: Arc<NavigationTree>,
    rows: Vec<Row>,
    count: Option<u64>,
    requested: Vec<CompactString>,
    children: ResultChildren,
}

impl ResultTree {
    pub fn new(navigation: Arc<NavigationTree>, rows: Vec<Row>) -> Self {
        Self {
            navigation,
            rows,
            count: None,
            requested: Vec::new(),
            children: ResultChildren::default(),
        }
    }

    pub fn with_count(mut self, count: Option<u64>) -> Self {
        self.count = count;
        self
    }

    pub fn with_requested(mut self, requested: Vec<CompactString>) -> Self {
        self.requested = requested;
        self
    }

    /// The single bucket of root rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn navigation_tree(&self) -> &Arc<NavigationTree> {
        &self.navigation
    }
}

impl EntityResult for ResultTree {
    fn navigation(&self) -> &NavigationTree {
        &self.navigation
    }

    fn level(&self) -> NavigationId {
        NavigationId::ROOT
    }

    fn children(&self) -> &ResultChildren {
        &self.children
    }

    fn children_mut(&mut self) -> &mut ResultChildren {
        &mut self.children
    }

    fn requested_attributes(&self) -> &[CompactString] {
        &self.requested
    }
}

// =============================================================================
// ExpandResult
// =============================================================================

/// Rows of one expanded navigation, bucketed by owning entity.
#[derive(Debug)]
pub struct ExpandResult {
    grouped: GroupedLevel,
    requested: Vec<CompactString>,
    children: ResultChildren,
}

impl ExpandResult {
    /// Groups `rows` of `level` by the key of the parent level.
    pub fn group(navigation: Arc<NavigationTree>, level: NavigationId, rows: Vec<Row>) -> Result<Self> {
        Ok(Self {
            grouped: GroupedLevel::group(navigation, level, rows)?,
            requested: Vec::new(),
            children: ResultChildren::default(),
        })
    }

    pub fn with_requested(mut self, requested: Vec<CompactString>) -> Self {
        self.requested = requested;
        self
    }

    pub fn path_alias(&self) -> &str {
        self.grouped.path_alias()
    }

    /// Rows owned by the entity with `key`.
    pub fn lookup(&self, key: &NavigationKey) -> Option<&[Row]> {
        self.grouped.lookup(key)
    }

    /// Rows owned by `owner_row`, a row of the parent level.
    pub fn lookup_row(&self, owner_row: &Row) -> Result<Option<&[Row]>> {
        self.grouped.lookup_row(owner_row)
    }

    pub fn groups(&self) -> &RowGroups {
        &self.grouped.groups
    }
}

impl EntityResult for ExpandResult {
    fn navigation(&self) -> &NavigationTree {
        &self.grouped.navigation
    }

    fn level(&self) -> NavigationId {
        self.grouped.level
    }

    fn children(&self) -> &ResultChildren {
        &self.children
    }

    fn children_mut(&mut self) -> &mut ResultChildren {
        &mut self.children
    }

    fn requested_attributes(&self) -> &[CompactString] {
        &self.requested
    }
}

// =============================================================================
// ElementCollectionResult
// =============================================================================

/// Rows of one element collection, bucketed by owning entity.
#[derive(Debug)]
pub struct ElementCollectionResult {
    grouped: GroupedLevel,
}

impl ElementCollectionResult {
    pub fn group(navigation: Arc<NavigationTree>, level: NavigationId, rows: Vec<Row>) -> Result<Self> {
        Ok(Self {
            grouped: GroupedLevel::group(navigation, level, rows)?,
        })
    }

    pub fn path_alias(&self) -> &str {
        self.grouped.path_alias()
    }

    /// Complex type of the collection elements.
    pub fn element_type(&self) -> &Arc<EntityType> {
        self.grouped.navigation.builder(self.grouped.level).target_type()
    }

    pub fn lookup(&self, key: &NavigationKey) -> Option<&[Row]> {
        self.grouped.lookup(key)
    }

    pub fn lookup_row(&self, owner_row: &Row) -> Result<Option<&[Row]>> {
        self.grouped.lookup_row(owner_row)
    }

    pub fn groups(&self) -> &RowGroups {
        &self.grouped.groups
    }
}
