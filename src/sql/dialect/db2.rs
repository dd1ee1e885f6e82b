//! IBM DB2 dialect.
//!
//! DB2 differences from ANSI:
//! - Positional `?` parameters, bound strictly in order
//! - Two-argument CONCAT
//! - OFFSET m ROWS FETCH NEXT n ROWS ONLY
//! - LOCATE(needle, haystack[, start]) for substring search

use super::helpers;
use super::{ConcatStyle, IndexOfStyle, PaginationStyle, SqlDialect};

/// DB2 dialect.
#[derive(Debug, Clone, Copy)]
pub struct Db2;

impl SqlDialect for Db2 {
    fn name(&self) -> &'static str {
        "db2"
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
        "?"
    }

    fn is_positional(&self) -> bool {
        true
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::OffsetFetch
    }

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::BinaryFunction
    }

    fn index_of_style(&self) -> IndexOfStyle {
        IndexOfStyle::Locate
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_db2(name)
    }
}
