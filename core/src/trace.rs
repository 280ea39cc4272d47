//! Tracing utilities for query rendering and result assembly.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// relgraph_trace_query!("Person#Roles", &sql, params.len());
/// ```
#[macro_export]
macro_rules! relgraph_trace_query {
    ($level:expr, $sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(level = %$level, sql = %$sql, params = $param_count, "relgraph.query");
    };
}

/// Emit a debug-level tracing event after one nesting level was grouped.
///
/// ```ignore
/// relgraph_trace_level!(label, rows.len(), buckets.len());
/// ```
#[macro_export]
macro_rules! relgraph_trace_level {
    ($label:expr, $rows:expr, $buckets:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(level = %$label, rows = $rows, buckets = $buckets, "relgraph.group");
    };
}

/// Emit a warn-level tracing event for a rejected filter construct.
#[macro_export]
macro_rules! relgraph_trace_unsupported {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(name = %$name, "relgraph.unsupported");
    };
}
