//! # sqlstencil
//!
//! Dialect-aware SQL generation from two inputs:
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  SQL template with {{...}}   │     │  Expression tree (Node)      │
//! │  placeholders                │     │  + Queryable operator chain  │
//! └──────────────────────────────┘     └──────────────────────────────┘
//!                │ [template::prepare]                │ [translate]
//!                ▼                                    ▼
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  PreparedTemplate            │     │  sql::expr / sql::query AST  │
//! │  static text + dynamic sites │     │                              │
//! └──────────────────────────────┘     └──────────────────────────────┘
//!                │ [render]                           │ [to_sql]
//!                ▼                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        SQL text for one Dialect (+ bind parameters)                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dialects and column catalogs are immutable once built, so every entry
//! point is safe to call from many threads at once.

pub mod catalog;
pub mod config;
pub mod queryable;
pub mod sql;
pub mod template;
pub mod trace;
pub mod translate;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

pub use catalog::{CatalogError, ColumnCatalog, ColumnMetadata};
pub use queryable::{BoundParameter, ParameterizedSql, QueryError, Queryable};
pub use sql::dialect::{Dialect, SqlDialect};
pub use template::{prepare, PlaceholderContext, PreparedTemplate, TemplateCache, TemplateError};
pub use translate::{TranslateContext, TranslateError};

/// Everything needed to build catalogs, prepare templates and compose queries.
pub mod prelude {
    pub use crate::catalog::{ColumnCatalog, ColumnMetadata};
    pub use crate::queryable::{ParameterizedSql, Queryable};
    pub use crate::sql::dialect::Dialect;
    pub use crate::sql::types::DataType;
    pub use crate::template::{prepare, Params, PlaceholderContext, TemplateCache};
    pub use crate::translate::ast::{
        avg, constant, count, group_key, group_key_field, if_else, is_null_or_empty, list, max, member,
        member_of, min, null, project, sum, Node, NodeExt,
    };
    pub use crate::translate::{
        predicate_to_sql, translate_predicate, translate_value, ColumnSource, Mode,
        TranslateContext,
    };
}
