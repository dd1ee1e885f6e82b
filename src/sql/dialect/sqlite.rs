//! SQLite dialect.
//!
//! SQLite differences from ANSI:
//! - Square bracket identifier quoting (`[name]`), double quotes also accepted
//! - No boolean type, stores 1/0
//! - `LIMIT -1 OFFSET m` for an offset without a limit
//! - No LPAD/RPAD (padding is composed from ZEROBLOB/HEX/REPLACE)
//! - INSTR without a start argument

use super::helpers;
use super::{IndexOfStyle, PadStyle, SqlDialect};
use crate::sql::token::TokenStream;

/// SQLite dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
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

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_with_sentinel(limit, offset, "-1")
    }

    fn index_of_style(&self) -> IndexOfStyle {
        IndexOfStyle::Instr {
            supports_start: false,
        }
    }

    fn pad_style(&self) -> PadStyle {
        PadStyle::ZeroBlob
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_sqlite(name)
    }
}
