mod common;

use std::sync::Arc;

use relgraph::error::Error;
use relgraph::result::{NavigationId, NavigationKey, NavigationTree, group_rows};
use relgraph::Value;

use common::*;

fn tree() -> (NavigationTree, NavigationId, NavigationId) {
    let metamodel = metamodel();
    let person = Arc::clone(metamodel.entity("Person").unwrap());
    let role = Arc::clone(metamodel.entity("Role").unwrap());
    let detail = Arc::clone(metamodel.entity("RoleDetail").unwrap());

    let mut tree = NavigationTree::new(Arc::clone(&person));
    let roles = tree
        .derive_child(
            NavigationId::ROOT,
            Arc::clone(person.resolve_navigation("Roles").unwrap()),
            Arc::clone(&role),
        )
        .unwrap();
    let details = tree
        .derive_child(
            roles,
            Arc::clone(role.resolve_navigation("Details").unwrap()),
            detail,
        )
        .unwrap();
    (tree, roles, details)
}

#[test]
fn test_prefixes_follow_level_and_alias() {
    let (tree, roles, details) = tree();
    assert_eq!(tree.root().alias_prefix(), "k1");
    assert_eq!(tree.builder(roles).alias_prefix(), "Roles2");
    assert_eq!(tree.builder(details).alias_prefix(), "Details3");
    assert_eq!(
        tree.builder(roles).prefixed_key_aliases(),
        ["Roles2PersonID", "Roles2Name"]
    );
    assert_eq!(tree.builder(details).navigation_label(), DETAILS);
}

#[test]
fn test_child_rows_found_from_parent_row() {
    let (tree, roles, _) = tree();
    let groups = group_rows(
        vec![
            role_row(1, "admin", 2010),
            role_row(1, "dev", 2012),
            role_row(2, "dev", 2015),
        ],
        tree.builder(roles),
    )
    .unwrap();
    assert_eq!(groups.len(), 2);

    let ada = person_row(1, "Ada");
    let key = tree.root().build_owning_key(&ada).unwrap();
    let bucket = &groups[&key];
    let names: Vec<_> = bucket.iter().map(|r| r.get("Name").cloned()).collect();
    assert_eq!(names, [Some(Value::from("admin")), Some(Value::from("dev"))]);

    // Keys built from a roles-level row agree with the builder of that level
    let role = role_row(2, "dev", 2015);
    let owning = tree.builder(roles).build_owning_key(&role).unwrap();
    assert_eq!(owning.to_string(), "2/2|dev");
}

#[test]
fn test_same_child_key_under_different_parents_stays_apart() {
    let (tree, roles, details) = tree();
    let groups = group_rows(
        vec![
            detail_row(1, "dev", 1, "rust"),
            detail_row(2, "dev", 1, "cobol"),
            detail_row(2, "dev", 2, "fortran"),
        ],
        tree.builder(details),
    )
    .unwrap();
    assert_eq!(groups.len(), 2);

    let of_ada = tree
        .builder(roles)
        .build_owning_key(&role_row(1, "dev", 2012))
        .unwrap();
    let of_grace = tree
        .builder(roles)
        .build_owning_key(&role_row(2, "dev", 2015))
        .unwrap();
    assert_ne!(of_ada, of_grace);
    assert_eq!(groups[&of_ada].len(), 1);
    assert_eq!(groups[&of_grace].len(), 2);
    assert_eq!(groups[&of_ada][0].get("Note"), Some(&Value::from("rust")));
}

#[test]
fn test_null_key_is_not_the_text_null() {
    let (tree, roles, details) = tree();
    let with_null = row([
        ("k1ID", Value::from(3)),
        ("Roles2PersonID", Value::from(3)),
        ("Roles2Name", Value::Null),
        ("Seq", Value::from(1)),
    ]);
    let with_text = row([
        ("k1ID", Value::from(3)),
        ("Roles2PersonID", Value::from(3)),
        ("Roles2Name", Value::from("null")),
        ("Seq", Value::from(1)),
    ]);
    let groups = group_rows(vec![with_null.clone(), with_text, with_null], tree.builder(details)).unwrap();
    assert_eq!(groups.len(), 2);

    let parent = row([
        ("k1ID", Value::from(3)),
        ("PersonID", Value::from(3)),
        ("Name", Value::Null),
    ]);
    let key = tree.builder(roles).build_owning_key(&parent).unwrap();
    assert_eq!(groups[&key].len(), 2);
}

#[test]
fn test_parent_without_children_has_no_bucket() {
    let (tree, roles, details) = tree();
    // Outer join rows: Linus has no role, Ada's admin role has no detail
    let unmatched_role = row([
        ("k1ID", Value::from(3)),
        ("PersonID", Value::Null),
        ("Name", Value::Null),
        ("Since", Value::Null),
    ]);
    let groups = group_rows(
        vec![unmatched_role, role_row(1, "dev", 2012)],
        tree.builder(roles),
    )
    .unwrap();
    assert_eq!(groups.len(), 1);
    let linus = tree.root().build_owning_key(&person_row(3, "Linus")).unwrap();
    assert!(groups.get(&linus).is_none());

    let unmatched_detail = row([
        ("k1ID", Value::from(1)),
        ("Roles2PersonID", Value::from(1)),
        ("Roles2Name", Value::from("admin")),
        ("PersonID", Value::Null),
        ("RoleName", Value::Null),
        ("Seq", Value::Null),
        ("Note", Value::Null),
    ]);
    let groups = group_rows(vec![unmatched_detail], tree.builder(details)).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_missing_key_column_fails_grouping() {
    let (tree, roles, _) = tree();
    let err = group_rows(vec![row([("ID", Value::from(1))])], tree.builder(roles)).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(ref c) if c == "k1ID"));
}

#[test]
fn test_root_builder_has_no_parent_segments() {
    let (tree, _, _) = tree();
    let key = tree.root().build_owning_key(&person_row(7, "x")).unwrap();
    assert_eq!(key.segments().len(), 1);
    assert_ne!(key, NavigationKey::new());
}
