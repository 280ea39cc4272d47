//! Navigation key builders, one per nesting level of a request.
//!
//! Builders live in an arena ([`NavigationTree`]) and refer to their parent
//! by [`NavigationId`]. A [`KeyBuilder`] is a borrowed view of one level that
//! computes the correlation keys of rows.

use core::fmt::Write;
use std::sync::Arc;

use compact_str::{CompactString, format_compact};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::metamodel::{EntityType, NavigationPath};
use crate::result::{KeySegment, KeyValue, NavigationKey};
use crate::row::Row;
use crate::value::Value;

/// Index of a level in its [`NavigationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationId(usize);

impl NavigationId {
    pub const ROOT: NavigationId = NavigationId(0);

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NavigationLevel {
    parent: Option<NavigationId>,
    level: usize,
    alias_prefix: CompactString,
    key_aliases: SmallVec<[CompactString; 2]>,
    prefixed_key_aliases: SmallVec<[CompactString; 2]>,
    member_aliases: SmallVec<[CompactString; 2]>,
    navigation: Option<Arc<NavigationPath>>,
    target: Arc<EntityType>,
    label: CompactString,
}

impl NavigationLevel {
    fn new(
        parent: Option<(NavigationId, &NavigationLevel)>,
        navigation: Option<Arc<NavigationPath>>,
        target: Arc<EntityType>,
    ) -> Self {
        let level = parent.map_or(1, |(_, p)| p.level + 1);
        let alias_prefix = match &navigation {
            Some(path) => format_compact!("{}{}", path.alias(), level),
            None => format_compact!("k{}", level),
        };
        let key_aliases: SmallVec<[CompactString; 2]> = target
            .key_attributes()
            .map(|k| CompactString::from(k.alias()))
            .collect();
        let prefixed_key_aliases = key_aliases
            .iter()
            .map(|alias| format_compact!("{alias_prefix}{alias}"))
            .collect();
        // Element collections carry no key; their value columns identify a row
        let member_aliases = if key_aliases.is_empty() {
            target
                .attributes()
                .iter()
                .map(|a| CompactString::from(a.alias()))
                .collect()
        } else {
            key_aliases.clone()
        };

        let mut label = CompactString::default();
        match (parent, &navigation) {
            (Some((_, p)), Some(path)) => {
                label.push_str(&p.label);
                label.push('#');
                for (i, segment) in path.segments().enumerate() {
                    if i > 0 {
                        label.push('/');
                    }
                    label.push_str(segment);
                }
                let _ = write!(label, "->{}", target.name());
            }
            _ => label.push_str(target.name()),
        }

        Self {
            parent: parent.map(|(id, _)| id),
            level,
            alias_prefix,
            key_aliases,
            prefixed_key_aliases,
            member_aliases,
            navigation,
            target,
            label,
        }
    }
}

/// Arena of the key builders of one request.
#[derive(Debug, Clone)]
pub struct NavigationTree {
    levels: Vec<NavigationLevel>,
}

impl NavigationTree {
    /// Creates the tree with its root level for `root`.
    pub fn new(root: Arc<EntityType>) -> Self {
        Self {
            levels: vec![NavigationLevel::new(None, None, root)],
        }
    }

    pub fn root(&self) -> KeyBuilder<'_> {
        self.builder(NavigationId::ROOT)
    }

    /// Builder view of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this tree. Use [`Self::get`] for
    /// ids of unknown origin.
    pub fn builder(&self, id: NavigationId) -> KeyBuilder<'_> {
        assert!(id.0 < self.levels.len(), "navigation level {} out of range", id.0);
        KeyBuilder { tree: self, id }
    }

    pub fn get(&self, id: NavigationId) -> Result<KeyBuilder<'_>> {
        if id.0 < self.levels.len() {
            Ok(KeyBuilder { tree: self, id })
        } else {
            Err(Error::UnknownLevel(id.0))
        }
    }

    /// Adds the level reached from `parent` through `path`.
    ///
    /// `target` must be the terminal type of `path`.
    pub fn derive_child(
        &mut self,
        parent: NavigationId,
        path: Arc<NavigationPath>,
        target: Arc<EntityType>,
    ) -> Result<NavigationId> {
        if path.target() != target.name() {
            return Err(Error::NavigationTargetMismatch {
                path: path.alias().into(),
                expected: path.target().into(),
                actual: target.name().into(),
            });
        }
        let owner = self.levels.get(parent.0).ok_or(Error::UnknownLevel(parent.0))?;
        let level = NavigationLevel::new(Some((parent, owner)), Some(path), target);
        self.levels.push(level);
        Ok(NavigationId(self.levels.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Direct children of `id` in creation order.
    pub fn children(&self, id: NavigationId) -> impl Iterator<Item = NavigationId> + '_ {
        self.levels
            .iter()
            .enumerate()
            .filter(move |(_, l)| l.parent == Some(id))
            .map(|(i, _)| NavigationId(i))
    }
}

/// One level of the tree.
#[derive(Debug, Clone, Copy)]
pub struct KeyBuilder<'a> {
    tree: &'a NavigationTree,
    id: NavigationId,
}

impl<'a> KeyBuilder<'a> {
    fn data(&self) -> &'a NavigationLevel {
        &self.tree.levels[self.id.0]
    }

    pub fn id(&self) -> NavigationId {
        self.id
    }

    pub fn parent(&self) -> Option<KeyBuilder<'a>> {
        self.data().parent.map(|id| self.tree.builder(id))
    }

    /// 1 at the root.
    pub fn level(&self) -> usize {
        self.data().level
    }

    /// `k<level>` at the root, `<navigation alias><level>` below it.
    pub fn alias_prefix(&self) -> &'a str {
        &self.data().alias_prefix
    }

    /// Unprefixed key aliases of the target type, in key order.
    pub fn key_aliases(&self) -> &'a [CompactString] {
        &self.data().key_aliases
    }

    /// Key aliases with this level's prefix, as selected by descendant
    /// level queries.
    pub fn prefixed_key_aliases(&self) -> &'a [CompactString] {
        &self.data().prefixed_key_aliases
    }

    /// Columns that are all null when an outer join found no row at this
    /// level: the key aliases, or the value aliases of an element collection.
    pub fn member_aliases(&self) -> &'a [CompactString] {
        &self.data().member_aliases
    }

    /// True when `row` carries this level's member columns and all of them
    /// are null.
    pub fn is_absent_in(&self, row: &Row) -> bool {
        let mut seen = false;
        for alias in self.member_aliases() {
            match row.get(alias) {
                Some(Value::Null) => seen = true,
                Some(_) => return false,
                None => {}
            }
        }
        seen
    }

    pub fn navigation_path(&self) -> Option<&'a Arc<NavigationPath>> {
        self.data().navigation.as_ref()
    }

    pub fn target_type(&self) -> &'a Arc<EntityType> {
        &self.data().target
    }

    /// `Person#Roles->Role#Details->RoleDetail`
    pub fn navigation_label(&self) -> &'a str {
        &self.data().label
    }

    /// Key of the entity a row at this level belongs to, read from the
    /// plain key columns of this level.
    pub fn build_owning_key(&self, row: &Row) -> Result<NavigationKey> {
        let mut key = self.parent_key(row)?;
        key.push_segment(segment(row, self.key_aliases())?);
        Ok(key)
    }

    /// Key of this level's entity as selected by a descendant level query,
    /// read from the prefixed key columns.
    pub fn build_target_key(&self, row: &Row) -> Result<NavigationKey> {
        let mut key = self.parent_key(row)?;
        key.push_segment(segment(row, self.prefixed_key_aliases())?);
        Ok(key)
    }

    fn parent_key(&self, row: &Row) -> Result<NavigationKey> {
        match self.parent() {
            Some(parent) => parent.build_target_key(row),
            None => Ok(NavigationKey::new()),
        }
    }
}

fn segment(row: &Row, aliases: &[CompactString]) -> Result<KeySegment> {
    aliases
        .iter()
        .map(|alias| row.try_get(alias).map(KeyValue::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::Attribute;
    use crate::value::Value;
    use relgraph_types::PrimitiveKind;

    fn types() -> (Arc<EntityType>, Arc<EntityType>, Arc<NavigationPath>) {
        let person = Arc::new(
            EntityType::entity("Person", "person")
                .key(Attribute::new("ID", "id", PrimitiveKind::Int64)),
        );
        let role = Arc::new(
            EntityType::entity("Role", "role")
                .key(Attribute::new("ID", "person_id", PrimitiveKind::Int64))
                .key(Attribute::new("RoleID", "role_id", PrimitiveKind::Int32)),
        );
        let path = Arc::new(NavigationPath::association("Roles", "Person", "Role", true));
        (person, role, path)
    }

    #[test]
    fn test_levels_and_prefixes() {
        let (person, role, path) = types();
        let mut tree = NavigationTree::new(person);
        let child = tree.derive_child(NavigationId::ROOT, path, role).unwrap();

        let root = tree.root();
        assert_eq!(root.level(), 1);
        assert_eq!(root.alias_prefix(), "k1");
        assert!(root.parent().is_none());
        assert_eq!(root.navigation_label(), "Person");

        let roles = tree.builder(child);
        assert_eq!(roles.level(), 2);
        assert_eq!(roles.alias_prefix(), "Roles2");
        assert_eq!(roles.prefixed_key_aliases(), ["Roles2ID", "Roles2RoleID"]);
        assert_eq!(roles.parent().map(|p| p.id()), Some(NavigationId::ROOT));
        assert_eq!(roles.navigation_label(), "Person#Roles->Role");
        assert_eq!(tree.children(NavigationId::ROOT).collect::<Vec<_>>(), [child]);
    }

    #[test]
    fn test_target_mismatch_is_rejected() {
        let (person, _, path) = types();
        let mut tree = NavigationTree::new(person.clone());
        let err = tree
            .derive_child(NavigationId::ROOT, path, person)
            .unwrap_err();
        assert!(matches!(err, Error::NavigationTargetMismatch { .. }));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_owning_key_of_child_row_equals_target_key_of_descendant() {
        let (person, role, path) = types();
        let mut tree = NavigationTree::new(person);
        let child = tree.derive_child(NavigationId::ROOT, path, role).unwrap();
        let roles = tree.builder(child);

        // A level-2 row and a level-3 row referring to it
        let role_row = Row::from_pairs([
            ("k1ID", Value::from(7)),
            ("ID", Value::from(7)),
            ("RoleID", Value::from(2)),
        ]);
        let detail_row = Row::from_pairs([
            ("k1ID", Value::from(7)),
            ("Roles2ID", Value::from(7)),
            ("Roles2RoleID", Value::from(2)),
        ]);
        let owning = roles.build_owning_key(&role_row).unwrap();
        assert_eq!(owning, roles.build_target_key(&detail_row).unwrap());
        assert_eq!(owning.to_string(), "7/7|2");
    }

    #[test]
    fn test_missing_key_column() {
        let (person, _, _) = types();
        let tree = NavigationTree::new(person);
        let row = Row::from_pairs([("Name", Value::from("x"))]);
        assert!(matches!(
            tree.root().build_owning_key(&row),
            Err(Error::MissingColumn(c)) if c == "ID"
        ));
    }

    #[test]
    fn test_foreign_level_id_is_an_error() {
        let (person, role, path) = types();
        let mut other = NavigationTree::new(person.clone());
        let foreign = other.derive_child(NavigationId::ROOT, path.clone(), role.clone()).unwrap();

        let mut tree = NavigationTree::new(person);
        assert!(matches!(tree.get(foreign), Err(Error::UnknownLevel(1))));
        let err = tree.derive_child(foreign, path, role).unwrap_err();
        assert!(matches!(err, Error::UnknownLevel(1)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_absent_member_columns() {
        let (person, role, path) = types();
        let mut tree = NavigationTree::new(person);
        let roles = tree.derive_child(NavigationId::ROOT, path, role).unwrap();
        let roles = tree.builder(roles);

        let unmatched = Row::from_pairs([
            ("k1ID", Value::from(7)),
            ("ID", Value::Null),
            ("RoleID", Value::Null),
        ]);
        let partial = Row::from_pairs([
            ("k1ID", Value::from(7)),
            ("ID", Value::Null),
            ("RoleID", Value::from(2)),
        ]);
        assert!(roles.is_absent_in(&unmatched));
        assert!(!roles.is_absent_in(&partial));
        assert!(!roles.is_absent_in(&Row::from_pairs([("k1ID", Value::from(7))])));
    }
}
