//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: PostgreSQL, Oracle, DB2
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: SQL Server, SQLite
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Reverse [`quote_string_single`]. Returns `None` if `quoted` is not a
/// well-formed single-quoted literal.
pub fn unquote_string_single(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // A lone quote inside the literal means it was not escaped.
            if chars.next() != Some('\'') {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: PostgreSQL
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: SQLite, MySQL, SQL Server, Oracle, DB2
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
/// Used by: SQLite, MySQL, PostgreSQL
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit).space().push(Token::LitUInt(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset).space().push(Token::LitUInt(off));
    }

    ts
}

/// Emit OFFSET ... ROWS FETCH NEXT ... ROWS ONLY.
/// Used by: SQL Server, Oracle, DB2
pub fn emit_limit_offset_fetch(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    let off = offset.unwrap_or(0);
    ts.push(Token::Offset)
        .space()
        .push(Token::LitUInt(off))
        .space()
        .push(Token::Rows);

    if let Some(lim) = limit {
        ts.space()
            .push(Token::Fetch)
            .space()
            .push(Token::Next)
            .space()
            .push(Token::LitUInt(lim))
            .space()
            .push(Token::Rows)
            .space()
            .push(Token::Only);
    }

    ts
}

/// SQLite and MySQL reject a bare OFFSET, so an offset without a limit
/// gets the dialect's "no limit" sentinel.
pub fn emit_limit_offset_with_sentinel(
    limit: Option<u64>,
    offset: Option<u64>,
    no_limit: &'static str,
) -> TokenStream {
    match (limit, offset) {
        (None, Some(off)) => {
            let mut ts = TokenStream::new();
            ts.push(Token::Limit)
                .space()
                .push(Token::Raw(no_limit.into()))
                .space()
                .push(Token::Offset)
                .space()
                .push(Token::LitUInt(off));
            ts
        }
        _ => emit_limit_offset_standard(limit, offset),
    }
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for SQLite.
pub fn remap_function_sqlite(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "CEILING" => Some("CEIL"),
        "SUBSTRING" => Some("SUBSTR"),
        "INDEX_OF" => Some("INSTR"),
        _ => None,
    }
}

/// Remap functions for MySQL.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "POWER" => Some("POW"),
        "SUBSTR" => Some("SUBSTRING"),
        "INDEX_OF" => Some("LOCATE"),
        _ => None,
    }
}

/// Remap functions for SQL Server.
pub fn remap_function_sqlserver(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LENGTH" => Some("LEN"),
        "CEIL" => Some("CEILING"),
        "SUBSTR" => Some("SUBSTRING"),
        "INDEX_OF" => Some("CHARINDEX"),
        _ => None,
    }
}

/// Remap functions for PostgreSQL.
pub fn remap_function_postgres(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "CEIL" => Some("CEILING"),
        "SUBSTR" => Some("SUBSTRING"),
        "INDEX_OF" => Some("POSITION"),
        _ => None,
    }
}

/// Remap functions for Oracle.
pub fn remap_function_oracle(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "CEILING" => Some("CEIL"),
        "SUBSTRING" => Some("SUBSTR"),
        "INDEX_OF" => Some("INSTR"),
        _ => None,
    }
}

/// Remap functions for DB2.
pub fn remap_function_db2(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "CEIL" => Some("CEILING"),
        "SUBSTRING" => Some("SUBSTR"),
        "INDEX_OF" => Some("LOCATE"),
        _ => None,
    }
}
