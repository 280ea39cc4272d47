//! Hydration of a [`ResultTree`] into nested entity values.

use compact_str::CompactString;

use crate::error::Result;
use crate::metamodel::{Attribute, EntityType};
use crate::result::{EntityResult, ResultTree};
use crate::row::Row;
use crate::value::Value;

/// Value of an expanded navigation property.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// Single-valued association, `None` when nothing is related.
    One(Option<Box<Entity>>),
    Many(Vec<Entity>),
}

/// One hydrated entity (or element of an element collection).
///
/// Properties are keyed by external attribute name and keep declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    entity_type: CompactString,
    properties: Vec<(CompactString, Value)>,
    navigation: Vec<(CompactString, Navigation)>,
    collections: Vec<(CompactString, Vec<Entity>)>,
}

impl Entity {
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn navigation(&self, alias: &str) -> Option<&Navigation> {
        self.navigation
            .iter()
            .find(|(n, _)| n == alias)
            .map(|(_, v)| v)
    }

    /// Related entities of `alias` as a slice, whatever the cardinality.
    pub fn related(&self, alias: &str) -> &[Entity] {
        match self.navigation(alias) {
            Some(Navigation::Many(entities)) => entities,
            Some(Navigation::One(Some(entity))) => core::slice::from_ref(entity.as_ref()),
            _ => &[],
        }
    }

    pub fn collection(&self, alias: &str) -> Option<&[Entity]> {
        self.collections
            .iter()
            .find(|(n, _)| n == alias)
            .map(|(_, v)| v.as_slice())
    }
}

/// Converts result trees top-down: root rows in query order, children looked
/// up per parent row.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityConverter;

impl EntityConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, tree: &ResultTree) -> Result<Vec<Entity>> {
        crate::relgraph_profile_scope!("entity", "convert");
        tree.rows().iter().map(|row| hydrate(tree, row)).collect()
    }
}

fn hydrate<R: EntityResult>(node: &R, row: &Row) -> Result<Entity> {
    let entity_type = node.entity_type();
    let requested = node.requested_attributes();

    let mut entity = Entity {
        entity_type: CompactString::from(entity_type.name()),
        properties: Vec::with_capacity(entity_type.attributes().len()),
        navigation: Vec::new(),
        collections: Vec::new(),
    };

    for attribute in entity_type.attributes() {
        if is_requested(entity_type, attribute, requested) {
            let value = row.try_get(attribute.alias())?.clone();
            entity.properties.push((CompactString::from(attribute.name()), value));
        }
    }

    for path in entity_type.navigations() {
        let alias = path.alias();
        if path.is_element_collection() {
            let Some(collection) = node.collection_result(alias) else {
                continue;
            };
            let element_type = collection.element_type();
            let elements = node
                .lookup_collection(alias, row)?
                .unwrap_or_default()
                .iter()
                .map(|element| element_entity(element_type, element))
                .collect::<Result<Vec<_>>>()?;
            entity.collections.push((CompactString::from(alias), elements));
            continue;
        }

        let Some(expanded) = node.expand_result(alias) else {
            continue;
        };
        let mut related = node
            .lookup_children(alias, row)?
            .unwrap_or_default()
            .iter()
            .map(|child| hydrate(expanded, child))
            .collect::<Result<Vec<_>>>()?;
        let value = if path.is_collection() {
            Navigation::Many(related)
        } else {
            Navigation::One((!related.is_empty()).then(|| Box::new(related.swap_remove(0))))
        };
        entity.navigation.push((CompactString::from(alias), value));
    }

    Ok(entity)
}

fn is_requested(entity_type: &EntityType, attribute: &Attribute, requested: &[CompactString]) -> bool {
    requested.is_empty()
        || entity_type.is_key(attribute)
        || requested.iter().any(|r| r == "*" || r == attribute.name())
}

fn element_entity(element_type: &EntityType, row: &Row) -> Result<Entity> {
    let properties = element_type
        .attributes()
        .iter()
        .map(|a| Ok((CompactString::from(a.name()), row.try_get(a.alias())?.clone())))
        .collect::<Result<Vec<_>>>()?;
    Ok(Entity {
        entity_type: CompactString::from(element_type.name()),
        properties,
        navigation: Vec::new(),
        collections: Vec::new(),
    })
}

// =============================================================================
// Serialization
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Entity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let len = self.properties.len() + self.navigation.len() + self.collections.len();
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &self.properties {
            map.serialize_entry(name.as_str(), value)?;
        }
        for (alias, value) in &self.navigation {
            map.serialize_entry(alias.as_str(), value)?;
        }
        for (alias, elements) in &self.collections {
            map.serialize_entry(alias.as_str(), elements)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Navigation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            Navigation::One(entity) => entity.serialize(serializer),
            Navigation::Many(entities) => entities.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use relgraph_types::PrimitiveKind;

    use super::*;
    use crate::metamodel::{Metamodel, NavigationPath};
    use crate::result::{LevelRows, NavigationId, NavigationTree, build_result_tree};

    fn person() -> EntityType {
        EntityType::entity("Person", "PERSON")
            .key(Attribute::new("ID", "ID", PrimitiveKind::Int64))
            .attribute(Attribute::new("Name", "NAME", PrimitiveKind::String))
            .navigation(NavigationPath::association("Manager", "Person", "Person", false).join("MANAGER_ID", "ID"))
            .navigation(NavigationPath::element_collection("Tags", "Person", "Tag").join("ID", "PERSON_ID"))
    }

    #[test]
    fn test_hydrates_single_valued_navigation_and_collection() {
        let metamodel = Metamodel::new()
            .with(person())
            .with(EntityType::complex("Tag", "TAG").attribute(Attribute::new("Label", "LABEL", PrimitiveKind::String)));
        let root = Arc::clone(metamodel.entity("Person").unwrap());
        let mut navigation = NavigationTree::new(Arc::clone(&root));
        let manager_path = Arc::clone(root.resolve_navigation("Manager").unwrap());
        let tags_path = Arc::clone(root.resolve_navigation("Tags").unwrap());
        let manager = navigation.derive_child(NavigationId::ROOT, manager_path, Arc::clone(&root)).unwrap();
        let tag_type = Arc::clone(metamodel.entity("Tag").unwrap());
        let tags = navigation.derive_child(NavigationId::ROOT, tags_path, tag_type).unwrap();

        let rows = LevelRows::new(
            NavigationId::ROOT,
            vec![
                Row::from_pairs([("ID", Value::from(1)), ("Name", Value::from("Ada"))]),
                Row::from_pairs([("ID", Value::from(2)), ("Name", Value::from("Grace"))]),
            ],
        )
        .with_requested(vec!["Name".into()])
        .with_child(LevelRows::new(
            manager,
            vec![Row::from_pairs([("k1ID", Value::from(2)), ("ID", Value::from(9)), ("Name", Value::from("Boss"))])],
        ))
        .with_child(LevelRows::new(
            tags,
            vec![
                Row::from_pairs([("k1ID", Value::from(1)), ("Label", Value::from("x"))]),
                Row::from_pairs([("k1ID", Value::from(1)), ("Label", Value::from("y"))]),
            ],
        ));

        let tree = build_result_tree(Arc::new(navigation), rows, None).unwrap();
        let entities = EntityConverter::new().convert(&tree).unwrap();
        assert_eq!(entities.len(), 2);

        let ada = &entities[0];
        assert_eq!(ada.property("Name"), Some(&Value::from("Ada")));
        assert_eq!(ada.navigation("Manager"), Some(&Navigation::One(None)));
        let labels: Vec<_> = ada.collection("Tags").unwrap().iter().map(|t| t.property("Label").cloned()).collect();
        assert_eq!(labels, [Some(Value::from("x")), Some(Value::from("y"))]);

        let grace = &entities[1];
        assert_eq!(grace.related("Manager")[0].property("Name"), Some(&Value::from("Boss")));
        assert_eq!(grace.collection("Tags"), Some(&[][..]));
    }
}
