//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (PostgreSQL/Oracle/DB2), `` ` `` (MySQL), `[]` (SQL Server/SQLite)
//! - Parameter prefixes: `@`, `$`, `:` or positional `?` (DB2)
//! - Pagination: LIMIT/OFFSET vs OFFSET/FETCH
//! - Boolean literals: true/false vs 1/0
//! - String concatenation: `||` vs `+` vs CONCAT()
//! - Function names: LEN vs LENGTH, CEIL vs CEILING, ...
//!
//! Dialects are stateless unit structs. The [`Dialect`] enum is `Copy` and
//! every descriptor is a `'static` constant, so a dialect can be shared across
//! threads and templates without synchronization.
//!
//! # Usage
//!
//! ```ignore
//! use sqlstencil::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::SqlServer;
//! let quoted = dialect.quote_identifier("user");  // [user]
//! let param = dialect.format_parameter("id");     // @id
//! ```

mod db2;
pub mod helpers;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use db2::Db2;
pub use mysql::MySql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use sqlserver::SqlServer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::token::TokenStream;

/// How a dialect expresses row pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
}

/// How a dialect concatenates strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// Infix operator (`||` or `+`).
    Operator(&'static str),
    /// Variadic `CONCAT(a, b, c)`.
    Function,
    /// Two-argument `CONCAT(a, b)`, nested for more operands.
    BinaryFunction,
}

/// How a dialect locates a substring (String.IndexOf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOfStyle {
    /// `INSTR(haystack, needle)`, optional start as third argument when supported.
    Instr { supports_start: bool },
    /// `LOCATE(needle, haystack[, start])`
    Locate,
    /// `CHARINDEX(needle, haystack[, start])`
    CharIndex,
    /// `POSITION(needle IN haystack)`
    Position,
}

/// How a dialect pads strings (String.PadLeft / PadRight).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadStyle {
    /// `LPAD(s, n, c)` / `RPAD(s, n, c)`
    Native,
    /// `RIGHT(REPLICATE(c, n) + s, n)` / `LEFT(s + REPLICATE(c, n), n)`
    Replicate,
    /// `SUBSTR(REPLACE(HEX(ZEROBLOB(n)), '00', c) || s, -n, n)` and friends.
    ZeroBlob,
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char);

    /// Quote an identifier (table, column, alias).
    ///
    /// - PostgreSQL/Oracle/DB2: `"identifier"`
    /// - MySQL: `` `identifier` ``
    /// - SQL Server/SQLite: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL: `true`/`false`
    /// - Everything else: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Prefix for named bind parameters.
    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    /// Whether bind parameters are positional (`?`) rather than named.
    fn is_positional(&self) -> bool {
        false
    }

    /// Render a bind parameter reference.
    ///
    /// Positional dialects ignore the name; callers rely on bind order.
    fn format_parameter(&self, name: &str) -> String {
        if self.is_positional() {
            self.parameter_prefix().to_string()
        } else {
            format!("{}{}", self.parameter_prefix(), name)
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::LimitOffset
    }

    /// Emit LIMIT/OFFSET or equivalent pagination clause.
    ///
    /// - SQLite/MySQL/PostgreSQL: `LIMIT n OFFSET m`
    /// - SQL Server/Oracle/DB2: `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        match self.pagination_style() {
            PaginationStyle::LimitOffset => helpers::emit_limit_offset_standard(limit, offset),
            PaginationStyle::OffsetFetch => helpers::emit_limit_offset_fetch(limit, offset),
        }
    }

    /// Whether this dialect requires ORDER BY for OFFSET/FETCH.
    ///
    /// SQL Server rejects OFFSET FETCH without ORDER BY.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    /// Whether `AS` may precede a table or derived-table alias.
    ///
    /// Oracle only accepts `FROM users t1`.
    fn supports_table_alias_as(&self) -> bool {
        true
    }

    // =========================================================================
    // Operators and Functions
    // =========================================================================

    /// String concatenation syntax.
    ///
    /// - SQLite/PostgreSQL/Oracle: `||`
    /// - SQL Server: `+`
    /// - MySQL: `CONCAT(...)`, DB2: two-argument `CONCAT(a, b)`
    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Operator("||")
    }

    fn index_of_style(&self) -> IndexOfStyle;

    fn pad_style(&self) -> PadStyle {
        PadStyle::Native
    }

    /// Whether SUBSTRING needs an explicit length (SQL Server).
    fn substring_requires_length(&self) -> bool {
        false
    }

    /// Remap a logical function name for this dialect.
    ///
    /// - `LENGTH` → `LEN` (SQL Server)
    /// - `CEILING` → `CEIL` (SQLite, Oracle)
    /// - `POWER` → `POW` (MySQL)
    /// - `SUBSTRING` → `SUBSTR` (SQLite, Oracle, DB2)
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Sqlite,
    MySql,
    SqlServer,
    Postgres,
    Oracle,
    Db2,
}

impl Dialect {
    /// Every supported dialect, in declaration order.
    pub const ALL: [Dialect; 6] = [
        Dialect::Sqlite,
        Dialect::MySql,
        Dialect::SqlServer,
        Dialect::Postgres,
        Dialect::Oracle,
        Dialect::Db2,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::MySql => &MySql,
            Dialect::SqlServer => &SqlServer,
            Dialect::Postgres => &Postgres,
            Dialect::Oracle => &Oracle,
            Dialect::Db2 => &Db2,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn identifier_quotes(&self) -> (char, char) {
        self.dialect().identifier_quotes()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn parameter_prefix(&self) -> &'static str {
        self.dialect().parameter_prefix()
    }

    fn is_positional(&self) -> bool {
        self.dialect().is_positional()
    }

    fn format_parameter(&self, name: &str) -> String {
        self.dialect().format_parameter(name)
    }

    fn pagination_style(&self) -> PaginationStyle {
        self.dialect().pagination_style()
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        self.dialect().emit_limit_offset(limit, offset)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        self.dialect().requires_order_by_for_offset()
    }

    fn supports_table_alias_as(&self) -> bool {
        self.dialect().supports_table_alias_as()
    }

    fn concat_style(&self) -> ConcatStyle {
        self.dialect().concat_style()
    }

    fn index_of_style(&self) -> IndexOfStyle {
        self.dialect().index_of_style()
    }

    fn pad_style(&self) -> PadStyle {
        self.dialect().pad_style()
    }

    fn substring_requires_length(&self) -> bool {
        self.dialect().substring_requires_length()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

/// Error returned when a dialect name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SQL dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::MySql),
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "oracle" => Ok(Dialect::Oracle),
            "db2" => Ok(Dialect::Db2),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

impl Serialize for Dialect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Dialect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
