//! SQL Server (T-SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - No native boolean literal (BIT 1/0)
//! - OFFSET FETCH for pagination (requires ORDER BY)
//! - String concatenation with `+`
//! - LEN instead of LENGTH, CHARINDEX for substring search
//! - SUBSTRING always takes a length
//! - No LPAD/RPAD (padding is composed from REPLICATE and RIGHT/LEFT)

use super::helpers;
use super::{ConcatStyle, IndexOfStyle, PadStyle, PaginationStyle, SqlDialect};

/// SQL Server dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlServer;

impl SqlDialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::OffsetFetch
    }

    fn requires_order_by_for_offset(&self) -> bool {
        true
    }

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Operator("+")
    }

    fn index_of_style(&self) -> IndexOfStyle {
        IndexOfStyle::CharIndex
    }

    fn pad_style(&self) -> PadStyle {
        PadStyle::Replicate
    }

    fn substring_requires_length(&self) -> bool {
        true
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_sqlserver(name)
    }
}
