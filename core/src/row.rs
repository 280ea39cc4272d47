//! Flat result rows with access by column alias.

use std::sync::Arc;

use compact_str::CompactString;

use crate::error::{Error, Result};
use crate::value::Value;

/// One record of a level query, values addressed by their select alias.
///
/// Column names are shared between all rows of one result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[CompactString]>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row over shared column names. `values` must have one entry
    /// per column; missing trailing values read as null.
    pub fn new(columns: Arc<[CompactString]>, mut values: Vec<Value>) -> Self {
        values.resize(columns.len(), Value::Null);
        Self { columns, values }
    }

    /// Convenience constructor for hand-built rows.
    ///
    /// ```
    /// use relgraph_core::{Row, Value};
    ///
    /// let row = Row::from_pairs([("ID", Value::from(1)), ("k1ID", Value::Null)]);
    /// assert_eq!(row.get("ID"), Some(&Value::Integer(1)));
    /// assert_eq!(row.get("k1ID"), Some(&Value::Null));
    /// assert_eq!(row.get("missing"), None);
    /// ```
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<CompactString>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let (columns, values): (Vec<CompactString>, Vec<Value>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn get(&self, alias: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == alias)
            .and_then(|i| self.values.get(i))
    }

    pub fn try_get(&self, alias: &str) -> Result<&Value> {
        self.get(alias)
            .ok_or_else(|| Error::MissingColumn(CompactString::from(alias)))
    }

    pub fn columns(&self) -> &[CompactString] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(CompactString::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
