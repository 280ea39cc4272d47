//! Core of relgraph: filter translation to SQL, per-level query planning and
//! assembly of flat level rows into a navigable result tree.
//!
//! # Overview
//!
//! - [`filter`] translates `$filter` expression trees into SQL fragments via
//!   the [`builder::ExpressionBuilder`] and the [`dialect`] hooks.
//! - [`query`] plans one SELECT per `$expand` level and runs them against a
//!   [`query::RowSource`].
//! - [`result`] groups the rows of every level by owning entity and answers
//!   child lookups for a parent row.
//! - [`entity`] hydrates a result tree into nested entity values.
//!
//! # Features
//!
//! - `serde` - Serialize values and entities, load configuration from TOML
//! - `rusqlite` - [`query::RowSource`] for `rusqlite::Connection`
//! - `tracing` - Debug events for rendered queries and grouped levels
//! - `profiling` - puffin scopes around rendering and assembly

#[macro_use]
mod trace;
#[macro_use]
pub mod profiling;

pub mod builder;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod filter;
pub mod metamodel;
pub mod query;
pub mod result;
pub mod row;
pub mod sql;
pub mod value;

pub use config::ProcessorConfig;
pub use error::{Error, Result, Status};
pub use relgraph_types::{Dialect, PrimitiveKind};
pub use row::Row;
pub use sql::{SQL, SQLChunk, Token};
pub use value::Value;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::builder::{Expression, ExpressionBuilder};
    pub use crate::config::ProcessorConfig;
    pub use crate::entity::{Entity, EntityConverter, Navigation};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{ExpressionNode, Literal, MethodKind};
    pub use crate::metamodel::{Attribute, EntityType, Metamodel, NavigationPath};
    pub use crate::query::{EntityRequest, ExpandSpec, OrderBy, QueryExecutor, RowSource};
    pub use crate::result::{EntityResult, ResultTree};
    pub use crate::row::Row;
    pub use crate::value::Value;
    pub use relgraph_types::{Dialect, PrimitiveKind};
}
