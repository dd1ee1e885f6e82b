//! Oracle dialect.
//!
//! Oracle differences from ANSI:
//! - `:` parameter prefix
//! - No boolean in SQL (NUMBER(1) 1/0)
//! - OFFSET m ROWS FETCH NEXT n ROWS ONLY (12c+)
//! - CEIL, SUBSTR and INSTR function names
//! - No `AS` before table aliases

use super::helpers;
use super::{IndexOfStyle, PaginationStyle, SqlDialect};

/// Oracle dialect.
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn parameter_prefix(&self) -> &'static str {
        ":"
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::OffsetFetch
    }

    fn supports_table_alias_as(&self) -> bool {
        false
    }

    fn index_of_style(&self) -> IndexOfStyle {
        IndexOfStyle::Instr {
            supports_start: true,
        }
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_oracle(name)
    }
}
