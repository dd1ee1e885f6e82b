//! Per-call translation state: dialect, mode and the sources in scope.

use std::sync::Arc;

use crate::catalog::{snake_case, ColumnCatalog};
use crate::sql::dialect::Dialect;
use crate::sql::expr::Expr;

use super::error::{TranslateError, TranslateResult};

/// How constants reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Constants are inlined as literals.
    #[default]
    Literal,
    /// Constants become bind parameters `p0, p1, ...`.
    Parameterized,
}

/// Column naming for one source.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    /// Entity table with a catalog.
    Catalog(Arc<ColumnCatalog>),
    /// Sub-query output: `(member, column)` pairs of its projection.
    Projected(Vec<(String, String)>),
    /// Untyped table; members map to snake_case.
    Untyped,
}

impl ColumnSource {
    pub fn column_name(&self, member: &str) -> String {
        match self {
            ColumnSource::Catalog(catalog) => catalog.resolve(member).into_owned(),
            ColumnSource::Projected(columns) => columns
                .iter()
                .find(|(m, _)| m == member)
                .map(|(_, c)| c.clone())
                .unwrap_or_else(|| snake_case(member)),
            ColumnSource::Untyped => snake_case(member),
        }
    }

    pub fn catalog(&self) -> Option<&ColumnCatalog> {
        match self {
            ColumnSource::Catalog(catalog) => Some(catalog),
            _ => None,
        }
    }
}

/// A source in scope: optional alias (`t1`, `t2`, ...) plus its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBinding {
    pub alias: Option<String>,
    pub columns: ColumnSource,
}

impl SourceBinding {
    pub fn new(alias: Option<String>, columns: ColumnSource) -> Self {
        Self { alias, columns }
    }
}

/// Lowered grouping key.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    Single(Expr),
    Composite(Vec<(String, Expr)>),
}

impl GroupKey {
    pub fn exprs(&self) -> Vec<Expr> {
        match self {
            GroupKey::Single(expr) => vec![expr.clone()],
            GroupKey::Composite(fields) => fields.iter().map(|(_, e)| e.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranslateContext {
    pub dialect: Dialect,
    pub mode: Mode,
    sources: Vec<SourceBinding>,
    group_key: Option<GroupKey>,
}

impl TranslateContext {
    pub fn new(dialect: Dialect, mode: Mode, sources: Vec<SourceBinding>) -> Self {
        Self {
            dialect,
            mode,
            sources,
            group_key: None,
        }
    }

    /// One unaliased source.
    pub fn single(dialect: Dialect, mode: Mode, columns: ColumnSource) -> Self {
        Self::new(dialect, mode, vec![SourceBinding::new(None, columns)])
    }

    pub fn with_group_key(mut self, key: GroupKey) -> Self {
        self.group_key = Some(key);
        self
    }

    pub fn source(&self, index: usize) -> TranslateResult<&SourceBinding> {
        self.sources.get(index).ok_or(TranslateError::UnknownSource {
            index,
            available: self.sources.len(),
        })
    }

    pub fn group_key(&self) -> Option<&GroupKey> {
        self.group_key.as_ref()
    }
}
