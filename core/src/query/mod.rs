//! Request planning and execution.
//!
//! An [`EntityRequest`] is planned into one [`SelectQuery`] per navigation
//! level ([`QueryPlanner`]). The [`QueryExecutor`] renders those queries,
//! runs them against a [`RowSource`] and assembles the rows into a
//! [`ResultTree`](crate::result::ResultTree).

mod executor;
mod plan;
mod request;
mod select;
mod source;
#[cfg(feature = "rusqlite")]
mod sqlite;

pub use executor::QueryExecutor;
pub use plan::{PlannedLevel, QueryPlan, QueryPlanner};
pub use request::{EntityRequest, ExpandSpec, OrderBy};
pub use select::{Join, JoinKind, RenderedQuery, SelectColumn, SelectQuery, TableRef};
pub use source::{MemorySource, RowSource};
