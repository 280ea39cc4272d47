//! # relgraph
//!
//! Entity-graph reads over relational tables: `$filter` translation to SQL,
//! one query per `$expand` level, and assembly of the flat level rows into a
//! result tree that answers "which child rows belong to this parent row".
//!
//! ## Quick Start
//!
//! ```rust
//! use relgraph::prelude::*;
//! use relgraph::query::MemorySource;
//!
//! # fn main() -> relgraph::Result<()> {
//! let metamodel = Metamodel::new()
//!     .with(
//!         EntityType::entity("Person", "PERSON")
//!             .key(Attribute::new("ID", "ID", PrimitiveKind::Int64))
//!             .attribute(Attribute::new("Name", "NAME", PrimitiveKind::String))
//!             .navigation(
//!                 NavigationPath::association("Roles", "Person", "Role", true)
//!                     .join("ID", "PERSON_ID"),
//!             ),
//!     )
//!     .with(
//!         EntityType::entity("Role", "ROLE")
//!             .key(Attribute::new("ID", "ID", PrimitiveKind::Int64))
//!             .attribute(Attribute::new("Title", "TITLE", PrimitiveKind::String)),
//!     );
//!
//! let source = MemorySource::new()
//!     .with_rows("Person", vec![Row::from_pairs([("ID", Value::from(1)), ("Name", Value::from("Ada"))])])
//!     .with_rows(
//!         "Person#Roles->Role",
//!         vec![Row::from_pairs([
//!             ("k1ID", Value::from(1)),
//!             ("ID", Value::from(10)),
//!             ("Title", Value::from("Admin")),
//!         ])],
//!     );
//!
//! let executor = QueryExecutor::new(&metamodel, ProcessorConfig::default(), source);
//! let tree = executor.execute(&EntityRequest::new("Person").expand(ExpandSpec::new("Roles")))?;
//!
//! let ada = &tree.rows()[0];
//! let roles = tree.lookup_children("Roles", ada)?.unwrap_or_default();
//! assert_eq!(roles[0].get("Title"), Some(&Value::from("Admin")));
//! # Ok(())
//! # }
//! ```
//!
//! ## Row sources
//!
//! | Source     | Feature Flag |
//! |------------|--------------|
//! | In memory  | (always)     |
//! | SQLite     | `rusqlite`   |

#![cfg_attr(docsrs, feature(doc_cfg))]

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for relgraph operations
pub use relgraph_core::error::Result;

/// Database dialect enum
pub use relgraph_types::Dialect;

/// Protocol primitive types
pub use relgraph_types::PrimitiveKind;

pub use relgraph_core::{ProcessorConfig, Row, Value};

/// Error types
pub mod error {
    pub use relgraph_core::error::{Error, Status};
}

pub use relgraph_core::{builder, dialect, entity, filter, metamodel, query, result, sql};

/// Configuration loading
pub mod config {
    pub use relgraph_core::config::*;
}

/// Commonly used types
pub mod prelude {
    pub use relgraph_core::prelude::*;
}
