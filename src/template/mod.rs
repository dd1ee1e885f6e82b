//! SQL template placeholder engine.
//!
//! A template is SQL text with `{{...}}` placeholders. [`prepare`] parses it
//! once against a [`PlaceholderContext`], folding every placeholder that
//! depends only on the dialect and column catalog (`table`, `columns`,
//! `values`, `set`) into static text. The remaining sites (`where`,
//! `limit`, `offset`, `arg`, `if` blocks) are resolved per call by
//! [`PreparedTemplate::render`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sqlstencil::template::{prepare, PlaceholderContext};
//!
//! let ctx = PlaceholderContext::new(Dialect::Sqlite, Arc::new(catalog));
//! let tpl = prepare("SELECT {{columns}} FROM {{table}} {{limit --param n}}", &ctx)?;
//! let sql = tpl.render(Some(&params))?;
//! ```

mod cache;
mod error;
mod handlers;
mod lexer;
mod parser;
mod prepared;

use std::sync::Arc;

use crate::catalog::ColumnCatalog;
use crate::sql::dialect::Dialect;

pub use cache::TemplateCache;
pub use error::{TemplateError, TemplateResult};
pub use prepared::{prepare, PreparedTemplate};

/// Runtime parameters for rendering: key to JSON value.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Dialect and column catalog a template is prepared against.
///
/// The target table is the catalog's table.
#[derive(Debug, Clone)]
pub struct PlaceholderContext {
    pub dialect: Dialect,
    pub catalog: Arc<ColumnCatalog>,
}

impl PlaceholderContext {
    pub fn new(dialect: Dialect, catalog: Arc<ColumnCatalog>) -> Self {
        Self { dialect, catalog }
    }

    pub fn table(&self) -> &str {
        self.catalog.table()
    }
}
