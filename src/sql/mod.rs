//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates multi-dialect SQL.
//! It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`types`] - Column data types

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use expr::{
    bind, coalesce, col, concat, count_star, func, lit_bool, lit_float, lit_int, lit_null, lit_str,
    star, table_col, table_star, truth, BinaryOperator, Expr, ExprExt, Literal, SortDir,
    UnaryOperator,
};
pub use query::{Join, LimitOffset, OrderByExpr, Query, SelectExpr, Source, TableRef};
pub use token::{Token, TokenStream};
pub use types::DataType;
