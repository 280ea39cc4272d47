#![cfg(feature = "rusqlite")]

mod common;

use relgraph::entity::{EntityConverter, Navigation};
use relgraph::filter::{ComparisonOperator, ExpressionNode, MethodKind};
use relgraph::query::{EntityRequest, ExpandSpec, OrderBy, QueryExecutor};
use relgraph::result::EntityResult;
use relgraph::{Dialect, ProcessorConfig, Value};

use common::{metamodel, setup_db};

fn config() -> ProcessorConfig {
    ProcessorConfig::new(Dialect::SQLite)
}

fn names(entities: &[relgraph::entity::Entity]) -> Vec<Value> {
    entities
        .iter()
        .filter_map(|e| e.property("Name").cloned())
        .collect()
}

#[test]
fn test_nested_expand_round_trip() {
    let conn = setup_db();
    let metamodel = metamodel();
    let executor = QueryExecutor::new(&metamodel, config(), &conn);
    let request = EntityRequest::new("Person")
        .expand(ExpandSpec::new("Roles").expand(ExpandSpec::new("Details")))
        .order_by(OrderBy::asc("ID"))
        .with_count();

    let tree = executor.execute(&request).unwrap();
    assert_eq!(tree.count(), Some(3));

    let entities = EntityConverter::new().convert(&tree).unwrap();
    assert_eq!(
        names(&entities),
        [Value::from("Ada"), Value::from("Grace"), Value::from("Linus")]
    );

    let grace = &entities[1];
    let Some(Navigation::Many(roles)) = grace.navigation("Roles") else {
        panic!("Roles should be a collection");
    };
    assert_eq!(roles.len(), 1);
    let notes: Vec<_> = roles[0]
        .related("Details")
        .iter()
        .filter_map(|d| d.property("Note").cloned())
        .collect();
    assert_eq!(notes, [Value::from("cobol"), Value::from("fortran")]);

    // Ada's dev role shares its key values with Grace's but not its details
    let Some(Navigation::Many(ada_roles)) = entities[0].navigation("Roles") else {
        panic!("Roles should be a collection");
    };
    let dev = ada_roles
        .iter()
        .find(|r| r.property("Name") == Some(&Value::from("dev")))
        .unwrap();
    assert_eq!(dev.related("Details").len(), 1);

    let linus = &entities[2];
    assert_eq!(linus.related("Roles").len(), 0);
    assert_eq!(linus.collection("PhoneNumbers").map(<[_]>::len), Some(1));
}

#[test]
fn test_filtered_request_only_returns_matching_children() {
    let conn = setup_db();
    let metamodel = metamodel();
    let executor = QueryExecutor::new(&metamodel, config(), &conn);
    let request = EntityRequest::new("Person")
        .filter(ExpressionNode::compare(
            ComparisonOperator::Gt,
            ExpressionNode::member("Age"),
            ExpressionNode::literal("30"),
        ))
        .expand(ExpandSpec::new("Roles"))
        .with_count();

    let tree = executor.execute(&request).unwrap();
    assert_eq!(tree.count(), Some(2));
    let roles = tree.expand_result("Roles").unwrap();
    let grouped: usize = roles.groups().values().map(Vec::len).sum();
    assert_eq!(grouped, 3);
    assert_eq!(tree.collection_result("PhoneNumbers").unwrap().groups().len(), 1);
}

#[test]
fn test_single_valued_navigation() {
    let conn = setup_db();
    let metamodel = metamodel();
    let executor = QueryExecutor::new(&metamodel, config(), &conn);
    let request = EntityRequest::new("Person")
        .expand(ExpandSpec::new("Manager").select(["Name"]))
        .order_by(OrderBy::asc("ID"));

    let entities = EntityConverter::new()
        .convert(&executor.execute(&request).unwrap())
        .unwrap();
    assert_eq!(entities[0].navigation("Manager"), Some(&Navigation::One(None)));
    let Some(Navigation::One(Some(manager))) = entities[1].navigation("Manager") else {
        panic!("Grace has a manager");
    };
    assert_eq!(manager.property("Name"), Some(&Value::from("Ada")));
    assert_eq!(manager.property("Age"), None);
}

#[test]
fn test_search_and_paging() {
    let conn = setup_db();
    let metamodel = metamodel();
    let executor = QueryExecutor::new(&metamodel, config(), &conn);

    let request = EntityRequest::new("Person").search("race").with_count();
    let entities = EntityConverter::new()
        .convert(&executor.execute(&request).unwrap())
        .unwrap();
    assert_eq!(names(&entities), [Value::from("Grace")]);

    // Numeric attributes match through their text form
    let request = EntityRequest::new("Person").search("28");
    let entities = EntityConverter::new()
        .convert(&executor.execute(&request).unwrap())
        .unwrap();
    assert_eq!(names(&entities), [Value::from("Linus")]);

    let request = EntityRequest::new("Person")
        .order_by(OrderBy::asc("ID"))
        .skip(1)
        .with_count();
    let tree = executor.execute(&request).unwrap();
    assert_eq!(tree.rows().len(), 2);
    assert_eq!(tree.count(), Some(3));
}

#[test]
fn test_string_functions_execute() {
    let conn = setup_db();
    let metamodel = metamodel();
    let executor = QueryExecutor::new(&metamodel, config(), &conn);

    let starts = ExpressionNode::call(
        MethodKind::StartsWith,
        [ExpressionNode::member("Name"), ExpressionNode::string("Gr")],
    );
    let tree = executor
        .execute(&EntityRequest::new("Person").filter(starts))
        .unwrap();
    assert_eq!(tree.rows().len(), 1);

    // substring(Name, 1) eq 'inus'
    let substring = ExpressionNode::equals(
        ExpressionNode::call(
            MethodKind::Substring,
            [ExpressionNode::member("Name"), ExpressionNode::literal("1")],
        ),
        ExpressionNode::string("inus"),
    );
    let tree = executor
        .execute(&EntityRequest::new("Person").filter(substring))
        .unwrap();
    assert_eq!(tree.rows().len(), 1);
    assert_eq!(tree.rows()[0].get("Name"), Some(&Value::from("Linus")));

    // indexof(Name, 'a') eq 0
    let indexof = ExpressionNode::equals(
        ExpressionNode::call(
            MethodKind::IndexOf,
            [ExpressionNode::member("Name"), ExpressionNode::string("A")],
        ),
        ExpressionNode::literal("0"),
    );
    let tree = executor
        .execute(&EntityRequest::new("Person").filter(indexof))
        .unwrap();
    assert_eq!(tree.rows().len(), 1);
}
