//! Deferred query builder.
//!
//! A [`Queryable`] accumulates operators as expression trees and only
//! produces SQL when asked. Operators fold into one SELECT until one can
//! no longer merge (a filter after pagination, say), at which point the
//! statement so far becomes a sub-query `(...) AS sq`.
//!
//! ```ignore
//! let sql = Queryable::table(Dialect::Sqlite, users)
//!     .filter(member("IsActive"))
//!     .order_by(member("Name"))
//!     .skip(20)
//!     .take(10)
//!     .to_sql()?;
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::ColumnCatalog;
use crate::sql::dialect::Dialect;
use crate::sql::expr::{table_star, Expr, ExprExt, SortDir};
use crate::sql::query::{OrderByExpr, Query, SelectExpr, Source, TableRef};
use crate::translate::ast::Node;
use crate::translate::{
    translate_predicate, translate_projection, translate_value, ColumnSource, GroupKey, Mode,
    SourceBinding, TranslateContext, TranslateError,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(
        "enumeration is not supported: this builder generates SQL text and never executes it; \
         use to_sql() or to_sql_with_parameters()"
    )]
    ExecutionNotSupported,
}

pub type QueryResult<T> = Result<T, QueryError>;

/// SQL text plus its bind parameters in binding order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterizedSql {
    pub sql: String,
    pub parameters: Vec<BoundParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundParameter {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone)]
enum QuerySource {
    Table {
        table: String,
        catalog: Option<Arc<ColumnCatalog>>,
    },
    Subquery(Box<Queryable>),
}

#[derive(Debug, Clone)]
struct JoinSpec {
    inner: Queryable,
    outer_key: Node,
    inner_key: Node,
}

/// Immutable, deferred SELECT builder. Every operator consumes the builder
/// and returns a new one; clone to branch.
#[derive(Debug, Clone)]
#[must_use = "a Queryable does nothing until converted with to_sql()"]
pub struct Queryable {
    dialect: Dialect,
    source: QuerySource,
    joins: Vec<JoinSpec>,
    filters: Vec<Node>,
    projection: Option<Node>,
    group_by: Option<Node>,
    order_by: Vec<(Node, SortDir)>,
    distinct: bool,
    skip: Option<u64>,
    take: Option<u64>,
}

/// A lowered statement and the columns it exposes to a wrapping query.
struct Built {
    query: Query,
    columns: ColumnSource,
}

impl Queryable {
    fn with_source(dialect: Dialect, source: QuerySource) -> Self {
        Self {
            dialect,
            source,
            joins: Vec::new(),
            filters: Vec::new(),
            projection: None,
            group_by: None,
            order_by: Vec::new(),
            distinct: false,
            skip: None,
            take: None,
        }
    }

    /// Entity table described by `catalog`.
    pub fn table(dialect: Dialect, catalog: Arc<ColumnCatalog>) -> Self {
        Self::with_source(
            dialect,
            QuerySource::Table {
                table: catalog.table().to_string(),
                catalog: Some(catalog),
            },
        )
    }

    /// Table without a catalog; selects `*` and maps members to snake_case.
    pub fn untyped(dialect: Dialect, table: &str) -> Self {
        Self::with_source(
            dialect,
            QuerySource::Table {
                table: table.to_string(),
                catalog: None,
            },
        )
    }

    /// Query over another query's results.
    pub fn from_query(inner: Queryable) -> Self {
        Self::with_source(inner.dialect, QuerySource::Subquery(Box::new(inner)))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn is_paginated(&self) -> bool {
        self.skip.is_some() || self.take.is_some()
    }

    /// Whether a new WHERE/ORDER BY/GROUP BY/JOIN must apply to the result
    /// of this statement rather than merge into it.
    fn is_closed(&self) -> bool {
        self.is_paginated() || self.distinct || self.projection.is_some() || self.group_by.is_some()
    }

    /// A bare table with no operators applied.
    fn is_plain_table(&self) -> bool {
        matches!(self.source, QuerySource::Table { .. })
            && self.joins.is_empty()
            && self.filters.is_empty()
            && !self.is_closed()
            && self.order_by.is_empty()
    }

    fn wrapped(self) -> Self {
        Self::from_query(self)
    }

    fn wrap_if(self, wrap: bool) -> Self {
        if wrap {
            self.wrapped()
        } else {
            self
        }
    }

    pub fn filter(self, predicate: Node) -> Self {
        let mut q = self.wrap_if_closed();
        q.filters.push(predicate);
        q
    }

    fn wrap_if_closed(self) -> Self {
        let closed = self.is_closed();
        self.wrap_if(closed)
    }

    pub fn select(self, projection: Node) -> Self {
        let wrap = self.projection.is_some() || self.distinct;
        let mut q = self.wrap_if(wrap);
        q.projection = Some(projection);
        q
    }

    /// Replace any ordering with `key` ascending.
    pub fn order_by(self, key: Node) -> Self {
        self.ordered(key, SortDir::Asc, true)
    }

    pub fn order_by_descending(self, key: Node) -> Self {
        self.ordered(key, SortDir::Desc, true)
    }

    /// Add a secondary ascending key.
    pub fn then_by(self, key: Node) -> Self {
        self.ordered(key, SortDir::Asc, false)
    }

    pub fn then_by_descending(self, key: Node) -> Self {
        self.ordered(key, SortDir::Desc, false)
    }

    fn ordered(self, key: Node, dir: SortDir, replace: bool) -> Self {
        let mut q = self.wrap_if_closed();
        if replace {
            q.order_by.clear();
        }
        q.order_by.push((key, dir));
        q
    }

    pub fn skip(mut self, count: u64) -> Self {
        if let Some(take) = self.take {
            self.take = Some(take.saturating_sub(count));
        }
        self.skip = Some(self.skip.unwrap_or(0).saturating_add(count));
        self
    }

    pub fn take(mut self, count: u64) -> Self {
        self.take = Some(self.take.map_or(count, |t| t.min(count)));
        self
    }

    /// Group by `key`; a [`project`](crate::translate::ast::project) key
    /// groups by several columns.
    pub fn group_by(self, key: Node) -> Self {
        let mut q = self.wrap_if_closed();
        q.group_by = Some(key);
        q
    }

    pub fn distinct(self) -> Self {
        let paginated = self.is_paginated();
        let mut q = self.wrap_if(paginated);
        q.distinct = true;
        q
    }

    /// Inner join with `inner` on `outer_key = inner_key`.
    ///
    /// `outer_key` addresses the sources joined so far by index; `inner_key`
    /// addresses the new source as index 0. After the join, the new source
    /// is the next index.
    pub fn join(self, inner: Queryable, outer_key: Node, inner_key: Node) -> Self {
        let mut q = self.wrap_if_closed();
        q.joins.push(JoinSpec {
            inner,
            outer_key,
            inner_key,
        });
        q
    }

    pub fn to_sql(&self) -> QueryResult<String> {
        let sql = self.build(Mode::Literal)?.query.to_sql(self.dialect);
        crate::sqlstencil_trace_query!(sql, 0);
        Ok(sql)
    }

    pub fn to_sql_with_parameters(&self) -> QueryResult<ParameterizedSql> {
        let (sql, params) = self
            .build(Mode::Parameterized)?
            .query
            .to_sql_with_parameters(self.dialect);
        crate::sqlstencil_trace_query!(sql, params.len());
        Ok(ParameterizedSql {
            sql,
            parameters: params
                .into_iter()
                .map(|(name, value)| BoundParameter {
                    name,
                    value: value.to_json(),
                })
                .collect(),
        })
    }

    /// Always fails: rows never come out of a SQL generator.
    pub fn to_list<T>(&self) -> QueryResult<Vec<T>> {
        Err(QueryError::ExecutionNotSupported)
    }

    /// FROM/JOIN source plus its column naming.
    fn lower_source(&self, alias: Option<&str>, mode: Mode) -> QueryResult<(Source, ColumnSource)> {
        match &self.source {
            QuerySource::Table { table, catalog } => {
                let mut table = TableRef::parse(table);
                if let Some(alias) = alias {
                    table = table.with_alias(alias);
                }
                let columns = catalog
                    .clone()
                    .map_or(ColumnSource::Untyped, ColumnSource::Catalog);
                Ok((Source::Table(table), columns))
            }
            QuerySource::Subquery(inner) => {
                let built = inner.build(mode)?;
                Ok((
                    Source::subquery(built.query, alias.unwrap_or("sq")),
                    built.columns,
                ))
            }
        }
    }

    fn build(&self, mode: Mode) -> QueryResult<Built> {
        let dialect = self.dialect;
        let joined = !self.joins.is_empty();
        let primary_alias = joined.then_some("t1");

        let (from, primary_columns) = self.lower_source(primary_alias, mode)?;
        let mut query = Query::new().from(from);
        let mut bindings = vec![SourceBinding::new(
            primary_alias.map(String::from),
            primary_columns.clone(),
        )];

        for (i, join) in self.joins.iter().enumerate() {
            let alias = format!("t{}", i + 2);
            let (source, columns) = if join.inner.is_plain_table() {
                join.inner.lower_source(Some(&alias), mode)?
            } else {
                let built = join.inner.build(mode)?;
                (Source::subquery(built.query, &alias), built.columns)
            };

            let outer_ctx = TranslateContext::new(dialect, mode, bindings.clone());
            let binding = SourceBinding::new(Some(alias), columns);
            let inner_ctx = TranslateContext::new(dialect, mode, vec![binding.clone()]);
            let on = translate_value(&join.outer_key, &outer_ctx)?
                .eq(translate_value(&join.inner_key, &inner_ctx)?);

            query = query.inner_join(source, on);
            bindings.push(binding);
        }

        let mut ctx = TranslateContext::new(dialect, mode, bindings);

        for filter in &self.filters {
            query = query.filter(translate_predicate(filter, &ctx)?);
        }

        if let Some(key) = &self.group_by {
            let key = match key {
                Node::New(fields) => GroupKey::Composite(
                    fields
                        .iter()
                        .map(|(name, node)| Ok((name.clone(), translate_value(node, &ctx)?)))
                        .collect::<QueryResult<Vec<_>>>()?,
                ),
                other => GroupKey::Single(translate_value(other, &ctx)?),
            };
            query = query.group_by(key.exprs());
            ctx = ctx.with_group_key(key);
        }

        let (select, columns) = match (&self.projection, ctx.group_key()) {
            (Some(projection), _) => {
                let projection = translate_projection(projection, &ctx)?;
                (projection.items, ColumnSource::Projected(projection.columns))
            }
            (None, Some(key)) => group_key_select(key),
            (None, None) => default_select(primary_alias, &primary_columns),
        };
        query = query.select(select);

        if self.distinct {
            query = query.distinct();
        }

        if !self.order_by.is_empty() {
            let order_by = self
                .order_by
                .iter()
                .map(|(node, dir)| {
                    let expr = translate_value(node, &ctx)?;
                    Ok(match dir {
                        SortDir::Asc => OrderByExpr::asc(expr),
                        SortDir::Desc => OrderByExpr::desc(expr),
                    })
                })
                .collect::<QueryResult<Vec<_>>>()?;
            query = query.order_by(order_by);
        }

        if let Some(take) = self.take {
            query = query.limit(take);
        }
        if let Some(skip) = self.skip {
            query = query.offset(skip);
        }

        Ok(Built { query, columns })
    }
}

/// Explicit column list for catalog-backed sources, `*` otherwise.
fn default_select(alias: Option<&str>, columns: &ColumnSource) -> (Vec<SelectExpr>, ColumnSource) {
    let column = |name: &str| {
        SelectExpr::new(Expr::Column {
            table: alias.map(String::from),
            column: name.to_string(),
        })
    };

    let select = match columns {
        ColumnSource::Catalog(catalog) => catalog
            .columns()
            .iter()
            .map(|c| column(&c.db_name))
            .collect(),
        ColumnSource::Projected(names) => names.iter().map(|(_, c)| column(c)).collect(),
        ColumnSource::Untyped => match alias {
            Some(alias) => vec![SelectExpr::new(table_star(alias))],
            None => Vec::new(),
        },
    };
    (select, columns.clone())
}

/// Grouped query without a projection selects its key.
fn group_key_select(key: &GroupKey) -> (Vec<SelectExpr>, ColumnSource) {
    match key {
        GroupKey::Single(expr) => {
            let (item, column) = match expr {
                Expr::Column { column, .. } => (SelectExpr::new(expr.clone()), column.clone()),
                _ => (SelectExpr::new(expr.clone()).with_alias("key"), "key".to_string()),
            };
            (vec![item], ColumnSource::Projected(vec![("Key".into(), column)]))
        }
        GroupKey::Composite(fields) => (
            fields
                .iter()
                .map(|(name, expr)| SelectExpr::new(expr.clone()).with_alias(name))
                .collect(),
            ColumnSource::Projected(fields.iter().map(|(n, _)| (n.clone(), n.clone())).collect()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnMetadata;
    use crate::sql::test_utils::validate_sql;
    use crate::sql::types::DataType;
    use crate::translate::ast::*;

    fn users() -> Arc<ColumnCatalog> {
        Arc::new(
            ColumnCatalog::new(
                "users",
                vec![
                    ColumnMetadata::new("Id", DataType::Int64),
                    ColumnMetadata::new("Name", DataType::String),
                    ColumnMetadata::new("IsActive", DataType::Bool),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_catalog_lists_columns() {
        let sql = Queryable::table(Dialect::Sqlite, users()).to_sql().unwrap();
        assert_eq!(sql, "SELECT [id], [name], [is_active] FROM [users]");
    }

    #[test]
    fn test_untyped_selects_star() {
        let sql = Queryable::untyped(Dialect::Postgres, "audit_log").to_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM \"audit_log\"");
    }

    #[test]
    fn test_pagination_arithmetic() {
        let q = Queryable::untyped(Dialect::Sqlite, "t");
        let sql = |q: Queryable| q.to_sql().unwrap();
        assert_eq!(sql(q.clone().skip(5).take(10)), "SELECT * FROM [t] LIMIT 10 OFFSET 5");
        assert_eq!(sql(q.clone().take(10).skip(3)), "SELECT * FROM [t] LIMIT 7 OFFSET 3");
        assert_eq!(sql(q.clone().take(10).take(4)), "SELECT * FROM [t] LIMIT 4");
        assert_eq!(sql(q.skip(2).skip(3)), "SELECT * FROM [t] LIMIT -1 OFFSET 5");
    }

    #[test]
    fn test_filter_after_take_wraps() {
        let sql = Queryable::table(Dialect::Sqlite, users())
            .take(5)
            .filter(member("IsActive"))
            .to_sql()
            .unwrap();
        insta::assert_snapshot!(sql, @"SELECT [id], [name], [is_active] FROM (SELECT [id], [name], [is_active] FROM [users] LIMIT 5) AS [sq] WHERE [is_active] = 1");
        validate_sql(&sql, Dialect::Sqlite).unwrap();
    }

    #[test]
    fn test_to_list_fails() {
        let q = Queryable::table(Dialect::Sqlite, users());
        assert_eq!(q.to_list::<()>(), Err(QueryError::ExecutionNotSupported));
    }

    #[test]
    fn test_group_key_selected_without_projection() {
        let sql = Queryable::table(Dialect::MySql, users())
            .group_by(member("IsActive"))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT `is_active` FROM `users` GROUP BY `is_active`");
    }
}
