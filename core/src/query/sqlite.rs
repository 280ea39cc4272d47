//! [`RowSource`] over a rusqlite connection.

use std::sync::Arc;

use compact_str::CompactString;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql, params_from_iter};

use crate::error::{Error, Result};
use crate::query::{RenderedQuery, RowSource};
use crate::row::Row;
use crate::value::Value;

impl ToSql for Value {
    fn to_sql(&self) -> ::rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(ToSqlOutput::Owned(rusqlite::types::Value::Null)),
            Value::Boolean(b) => Ok(ToSqlOutput::Owned(rusqlite::types::Value::Integer(
                i64::from(*b),
            ))),
            Value::Integer(i) => Ok(ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i))),
            Value::Real(f) => Ok(ToSqlOutput::Owned(rusqlite::types::Value::Real(*f))),
            Value::Text(s) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
            Value::Blob(b) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(b))),
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) => Value::Text(CompactString::from_utf8_lossy(bytes)),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

impl RowSource for Connection {
    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Row>> {
        let mut stmt = self.prepare(&query.sql)?;
        let columns: Arc<[CompactString]> = stmt
            .column_names()
            .into_iter()
            .map(CompactString::from)
            .collect();

        let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
        let mut fetched = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            fetched.push(Row::new(Arc::clone(&columns), values));
        }
        Ok(fetched)
    }

    fn count(&self, query: &RenderedQuery) -> Result<u64> {
        let count: i64 =
            self.query_row(&query.sql, params_from_iter(query.params.iter()), |row| {
                row.get(0)
            })?;
        u64::try_from(count).map_err(|_| Error::RowSource(format!("negative count {count}")))
    }
}
