//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Boolean is TINYINT(1), returns 1/0
//! - `||` is logical OR by default (use CONCAT())
//! - LIMIT ... OFFSET ... for pagination, no bare OFFSET
//! - POW as the short power function name

use super::helpers;
use super::{ConcatStyle, IndexOfStyle, SqlDialect};
use crate::sql::token::TokenStream;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        // Largest BIGINT UNSIGNED, the documented "all rows" value.
        helpers::emit_limit_offset_with_sentinel(limit, offset, "18446744073709551615")
    }

    fn concat_style(&self) -> ConcatStyle {
        // MySQL || is OR by default, use CONCAT() instead
        ConcatStyle::Function
    }

    fn index_of_style(&self) -> IndexOfStyle {
        IndexOfStyle::Locate
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_mysql(name)
    }
}
