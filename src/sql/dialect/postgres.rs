//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - `$` parameter prefix
//! - POSITION(needle IN haystack) for substring search

use super::helpers;
use super::{IndexOfStyle, SqlDialect};

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn parameter_prefix(&self) -> &'static str {
        "$"
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn index_of_style(&self) -> IndexOfStyle {
        IndexOfStyle::Position
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }
}
