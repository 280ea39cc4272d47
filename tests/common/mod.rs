#![allow(dead_code)]

use relgraph::metamodel::{Attribute, EntityType, Metamodel, NavigationPath};
use relgraph::{PrimitiveKind, Row, Value};

/// Person -> Roles (composite key) -> Details, plus the PhoneNumbers element
/// collection and a single-valued Manager self reference.
pub fn metamodel() -> Metamodel {
    Metamodel::new()
        .with(
            EntityType::entity("Person", "PERSON")
                .key(Attribute::new("ID", "ID", PrimitiveKind::Int64))
                .attribute(Attribute::new("Name", "NAME", PrimitiveKind::String).searchable())
                .attribute(Attribute::new("Age", "AGE", PrimitiveKind::Int32).searchable())
                .attribute(Attribute::new("Active", "ACTIVE", PrimitiveKind::Boolean).searchable())
                .attribute(Attribute::new("ManagerID", "MANAGER_ID", PrimitiveKind::Int64))
                .navigation(
                    NavigationPath::association("Roles", "Person", "Role", true)
                        .join("ID", "PERSON_ID"),
                )
                .navigation(
                    NavigationPath::association("Manager", "Person", "Person", false)
                        .join("MANAGER_ID", "ID"),
                )
                .navigation(
                    NavigationPath::element_collection("PhoneNumbers", "Person", "Phone")
                        .join("ID", "PERSON_ID"),
                ),
        )
        .with(
            EntityType::entity("Role", "ROLE")
                .key(Attribute::new("PersonID", "PERSON_ID", PrimitiveKind::Int64))
                .key(Attribute::new("Name", "ROLE_NAME", PrimitiveKind::String))
                .attribute(Attribute::new("Since", "SINCE", PrimitiveKind::Int32))
                .navigation(
                    NavigationPath::association("Details", "Role", "RoleDetail", true)
                        .join("PERSON_ID", "PERSON_ID")
                        .join("ROLE_NAME", "ROLE_NAME"),
                ),
        )
        .with(
            EntityType::entity("RoleDetail", "ROLE_DETAIL")
                .key(Attribute::new("PersonID", "PERSON_ID", PrimitiveKind::Int64))
                .key(Attribute::new("RoleName", "ROLE_NAME", PrimitiveKind::String))
                .key(Attribute::new("Seq", "SEQ", PrimitiveKind::Int32))
                .attribute(Attribute::new("Note", "NOTE", PrimitiveKind::String)),
        )
        .with(
            EntityType::complex("Phone", "PHONE")
                .attribute(Attribute::new("Number", "NUMBER", PrimitiveKind::String))
                .attribute(Attribute::new("Kind", "KIND", PrimitiveKind::String)),
        )
}

pub const PERSON: &str = "Person";
pub const ROLES: &str = "Person#Roles->Role";
pub const DETAILS: &str = "Person#Roles->Role#Details->RoleDetail";
pub const PHONES: &str = "Person#PhoneNumbers->Phone";

pub fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    Row::from_pairs(pairs)
}

pub fn person_row(id: i64, name: &str) -> Row {
    row([
        ("ID", Value::from(id)),
        ("Name", Value::from(name)),
        ("Age", Value::Null),
        ("Active", Value::from(true)),
        ("ManagerID", Value::Null),
    ])
}

pub fn role_row(person: i64, name: &str, since: i32) -> Row {
    row([
        ("k1ID", Value::from(person)),
        ("PersonID", Value::from(person)),
        ("Name", Value::from(name)),
        ("Since", Value::from(since)),
    ])
}

pub fn detail_row(person: i64, role: &str, seq: i32, note: &str) -> Row {
    row([
        ("k1ID", Value::from(person)),
        ("Roles2PersonID", Value::from(person)),
        ("Roles2Name", Value::from(role)),
        ("PersonID", Value::from(person)),
        ("RoleName", Value::from(role)),
        ("Seq", Value::from(seq)),
        ("Note", Value::from(note)),
    ])
}

pub fn phone_row(person: i64, number: &str, kind: &str) -> Row {
    row([
        ("k1ID", Value::from(person)),
        ("Number", Value::from(number)),
        ("Kind", Value::from(kind)),
    ])
}

#[cfg(feature = "rusqlite")]
pub const SCHEMA: &str = "
    CREATE TABLE PERSON (
        ID INTEGER PRIMARY KEY,
        NAME TEXT,
        AGE INTEGER,
        ACTIVE INTEGER NOT NULL,
        MANAGER_ID INTEGER
    );
    CREATE TABLE ROLE (
        PERSON_ID INTEGER NOT NULL,
        ROLE_NAME TEXT NOT NULL,
        SINCE INTEGER,
        PRIMARY KEY (PERSON_ID, ROLE_NAME)
    );
    CREATE TABLE ROLE_DETAIL (
        PERSON_ID INTEGER NOT NULL,
        ROLE_NAME TEXT NOT NULL,
        SEQ INTEGER NOT NULL,
        NOTE TEXT,
        PRIMARY KEY (PERSON_ID, ROLE_NAME, SEQ)
    );
    CREATE TABLE PHONE (
        PERSON_ID INTEGER NOT NULL,
        NUMBER TEXT NOT NULL,
        KIND TEXT
    );

    INSERT INTO PERSON VALUES (1, 'Ada', 36, 1, NULL);
    INSERT INTO PERSON VALUES (2, 'Grace', 45, 0, 1);
    INSERT INTO PERSON VALUES (3, 'Linus', 28, 1, NULL);

    INSERT INTO ROLE VALUES (1, 'admin', 2010);
    INSERT INTO ROLE VALUES (1, 'dev', 2012);
    INSERT INTO ROLE VALUES (2, 'dev', 2015);

    INSERT INTO ROLE_DETAIL VALUES (1, 'admin', 1, 'root access');
    INSERT INTO ROLE_DETAIL VALUES (1, 'dev', 1, 'rust');
    INSERT INTO ROLE_DETAIL VALUES (2, 'dev', 1, 'cobol');
    INSERT INTO ROLE_DETAIL VALUES (2, 'dev', 2, 'fortran');

    INSERT INTO PHONE VALUES (1, '555-0001', 'home');
    INSERT INTO PHONE VALUES (1, '555-0002', 'work');
    INSERT INTO PHONE VALUES (3, '555-0003', 'home');
";

#[cfg(feature = "rusqlite")]
pub fn setup_db() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(SCHEMA).expect("create fixture schema");
    conn
}
