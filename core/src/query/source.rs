//! Where level rows come from.

use std::sync::Arc;

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::error::Result;
use crate::query::RenderedQuery;
use crate::row::Row;

/// Executes rendered level queries.
///
/// Implementations must return the rows of `query` with the select aliases
/// of [`RenderedQuery::columns`] as column names.
pub trait RowSource {
    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Row>>;

    /// Runs a `SELECT COUNT(*)` query.
    fn count(&self, query: &RenderedQuery) -> Result<u64>;
}

impl<T: RowSource + ?Sized> RowSource for &T {
    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Row>> {
        (**self).fetch(query)
    }

    fn count(&self, query: &RenderedQuery) -> Result<u64> {
        (**self).count(query)
    }
}

impl<T: RowSource + ?Sized> RowSource for Arc<T> {
    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Row>> {
        (**self).fetch(query)
    }

    fn count(&self, query: &RenderedQuery) -> Result<u64> {
        (**self).count(query)
    }
}

/// Canned rows per navigation label.
///
/// Levels without registered rows come back empty. Counts fall back to the
/// number of rows registered for the label.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    levels: HashMap<CompactString, Vec<Row>>,
    counts: HashMap<CompactString, u64>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, label: impl Into<CompactString>, rows: Vec<Row>) -> Self {
        self.levels.entry(label.into()).or_default().extend(rows);
        self
    }

    pub fn with_count(mut self, label: impl Into<CompactString>, count: u64) -> Self {
        self.counts.insert(label.into(), count);
        self
    }
}

impl RowSource for MemorySource {
    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Row>> {
        Ok(self
            .levels
            .get(query.label.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn count(&self, query: &RenderedQuery) -> Result<u64> {
        if let Some(count) = self.counts.get(query.label.as_str()) {
            return Ok(*count);
        }
        Ok(self
            .levels
            .get(query.label.as_str())
            .map_or(0, |rows| rows.len() as u64))
    }
}
