//! SELECT statements of one nesting level.

use compact_str::CompactString;
use relgraph_types::Dialect;

use crate::sql::{SQL, Token};
use crate::value::Value;

/// A table reference with its qualifier, e.g. `"PERSON" AS "t0"`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub table: CompactString,
    pub qualifier: CompactString,
}

impl TableRef {
    pub fn new(table: impl Into<CompactString>, qualifier: impl Into<CompactString>) -> Self {
        Self {
            table: table.into(),
            qualifier: qualifier.into(),
        }
    }

    fn to_sql(&self) -> SQL {
        SQL::ident(self.table.clone()).alias(self.qualifier.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: SQL,
}

/// A selected expression and the alias rows expose it under.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    pub expr: SQL,
    pub alias: CompactString,
}

/// The SELECT of one level, kept structured until rendering so the count
/// query can reuse its FROM and WHERE parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    label: CompactString,
    columns: Vec<SelectColumn>,
    from: TableRef,
    joins: Vec<Join>,
    filter: Option<SQL>,
    order_by: Vec<(SQL, bool)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new(label: impl Into<CompactString>, from: TableRef) -> Self {
        Self {
            label: label.into(),
            columns: Vec::new(),
            from,
            joins: Vec::new(),
            filter: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn from_table(&self) -> &TableRef {
        &self.from
    }

    /// Selects `"qualifier"."column" AS "alias"`. A repeated alias is ignored.
    pub fn column(
        &mut self,
        qualifier: &str,
        column: &str,
        alias: impl Into<CompactString>,
    ) -> &mut Self {
        self.select(SQL::column(qualifier, column), alias)
    }

    pub fn select(&mut self, expr: SQL, alias: impl Into<CompactString>) -> &mut Self {
        let alias = alias.into();
        if !self.columns.iter().any(|c| c.alias == alias) {
            self.columns.push(SelectColumn { expr, alias });
        }
        self
    }

    pub fn join(&mut self, kind: JoinKind, table: TableRef, on: SQL) -> &mut Self {
        self.joins.push(Join { kind, table, on });
        self
    }

    /// ANDs `condition` into the WHERE clause.
    pub fn filter(&mut self, condition: SQL) -> &mut Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => SQL::join([existing.parens(), condition.parens()], Token::AND),
            None => condition,
        });
        self
    }

    pub fn order_by(&mut self, expr: SQL, descending: bool) -> &mut Self {
        if !self.order_by.iter().any(|(e, _)| *e == expr) {
            self.order_by.push((expr, descending));
        }
        self
    }

    pub fn limit(&mut self, limit: Option<u64>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn offset(&mut self, offset: Option<u64>) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn columns(&self) -> &[SelectColumn] {
        &self.columns
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.alias.as_str())
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn where_clause(&self) -> Option<&SQL> {
        self.filter.as_ref()
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// `SELECT <columns> FROM ... [WHERE] [ORDER BY] [LIMIT] [OFFSET]`
    pub fn to_sql(&self, dialect: Dialect) -> SQL {
        let columns = SQL::join(
            self.columns
                .iter()
                .map(|c| c.expr.clone().alias(c.alias.clone())),
            Token::COMMA,
        );
        let mut sql = SQL::token(Token::SELECT).append(columns);
        self.append_from_where(&mut sql);

        if !self.order_by.is_empty() {
            let items = self.order_by.iter().map(|(expr, descending)| {
                expr.clone()
                    .push(if *descending { Token::DESC } else { Token::ASC })
            });
            sql.push_mut(Token::ORDER);
            sql.push_mut(Token::BY);
            sql.append_mut(SQL::join(items, Token::COMMA));
        }

        match (self.limit, self.offset) {
            (Some(limit), _) => {
                sql.push_mut(Token::LIMIT);
                sql.append_mut(SQL::number(clamp(limit)));
            }
            // SQLite only accepts OFFSET after a LIMIT
            (None, Some(_)) if dialect == Dialect::SQLite => {
                sql.push_mut(Token::LIMIT);
                sql.append_mut(SQL::number(-1));
            }
            (None, _) => {}
        }
        if let Some(offset) = self.offset {
            sql.push_mut(Token::OFFSET);
            sql.append_mut(SQL::number(clamp(offset)));
        }
        sql
    }

    /// `SELECT COUNT(*) FROM ... [WHERE]`, ignoring ordering and paging.
    pub fn count_sql(&self) -> SQL {
        let mut sql = SQL::token(Token::SELECT)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .alias("count");
        self.append_from_where(&mut sql);
        sql
    }

    fn append_from_where(&self, sql: &mut SQL) {
        sql.push_mut(Token::FROM);
        sql.append_mut(self.from.to_sql());
        for join in &self.joins {
            if join.kind == JoinKind::Left {
                sql.push_mut(Token::LEFT);
            } else {
                sql.push_mut(Token::INNER);
            }
            sql.push_mut(Token::JOIN);
            sql.append_mut(join.table.to_sql());
            sql.push_mut(Token::ON);
            sql.append_mut(join.on.clone());
        }
        if let Some(filter) = &self.filter {
            sql.push_mut(Token::WHERE);
            sql.append_mut(filter.clone());
        }
    }

    /// Renders the level query with its bound parameters.
    pub fn render(&self, dialect: Dialect) -> RenderedQuery {
        RenderedQuery::new(
            self.label.clone(),
            &self.to_sql(dialect),
            dialect,
            self.columns.iter().map(|c| c.alias.clone()).collect(),
        )
    }

    pub fn render_count(&self, dialect: Dialect) -> RenderedQuery {
        RenderedQuery::new(
            self.label.clone(),
            &self.count_sql(),
            dialect,
            vec![CompactString::const_new("count")],
        )
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// SQL text and parameters ready for a [`RowSource`](crate::query::RowSource).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    /// Navigation label of the level, e.g. `Person#Roles->Role`
    pub label: CompactString,
    pub sql: String,
    pub params: Vec<Value>,
    /// Select aliases in column order
    pub columns: Vec<CompactString>,
}

impl RenderedQuery {
    fn new(label: CompactString, sql: &SQL, dialect: Dialect, columns: Vec<CompactString>) -> Self {
        let (text, params) = sql.build(dialect);
        let rendered = Self {
            label,
            sql: text,
            params: params.into_iter().cloned().collect(),
            columns,
        };
        crate::relgraph_trace_query!(rendered.label, rendered.sql, rendered.params.len());
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_query() -> SelectQuery {
        let mut query = SelectQuery::new("Person", TableRef::new("PERSON", "t0"));
        query
            .column("t0", "ID", "ID")
            .column("t0", "NAME", "Name")
            .filter(SQL::column("t0", "AGE").push(Token::GT).append(SQL::param(30)));
        query
    }

    #[test]
    fn test_select_with_filter_and_paging() {
        let mut query = person_query();
        query
            .order_by(SQL::column("t0", "ID"), false)
            .limit(Some(10))
            .offset(Some(20));
        let rendered = query.render(Dialect::Default);
        assert_eq!(
            rendered.sql,
            r#"SELECT "t0"."ID" AS "ID", "t0"."NAME" AS "Name" FROM "PERSON" AS "t0" WHERE "t0"."AGE" > ? ORDER BY "t0"."ID" ASC LIMIT 10 OFFSET 20"#
        );
        assert_eq!(rendered.params, vec![Value::Integer(30)]);
        assert_eq!(rendered.columns, vec!["ID", "Name"]);
    }

    #[test]
    fn test_sqlite_offset_without_limit() {
        let mut query = person_query();
        query.offset(Some(5));
        let sql = query.to_sql(Dialect::SQLite).sql(Dialect::SQLite);
        assert!(sql.ends_with("LIMIT -1 OFFSET 5"), "{sql}");

        let sql = query.to_sql(Dialect::PostgreSQL).sql(Dialect::PostgreSQL);
        assert!(sql.ends_with("$1 OFFSET 5"), "{sql}");
    }

    #[test]
    fn test_count_ignores_order_and_paging() {
        let mut query = person_query();
        query.order_by(SQL::column("t0", "ID"), true).limit(Some(3));
        let rendered = query.render_count(Dialect::Default);
        assert_eq!(
            rendered.sql,
            r#"SELECT COUNT(*) AS "count" FROM "PERSON" AS "t0" WHERE "t0"."AGE" > ?"#
        );
    }

    #[test]
    fn test_inner_join_and_duplicate_alias() {
        let mut query = SelectQuery::new("Person#Roles->Role", TableRef::new("PERSON", "t0"));
        query
            .join(
                JoinKind::Inner,
                TableRef::new("ROLE", "t1"),
                SQL::column("t0", "ID")
                    .push(Token::EQ)
                    .append(SQL::column("t1", "PERSON_ID")),
            )
            .column("t0", "ID", "k1ID")
            .column("t1", "ROLE", "Role")
            .column("t1", "ROLE", "Role");
        let sql = query.to_sql(Dialect::Default).sql(Dialect::Default);
        assert_eq!(
            sql,
            r#"SELECT "t0"."ID" AS "k1ID", "t1"."ROLE" AS "Role" FROM "PERSON" AS "t0" INNER JOIN "ROLE" AS "t1" ON "t0"."ID" = "t1"."PERSON_ID""#
        );
    }
}
