//! Column data types for catalog metadata.
//!
//! Types are parsed from either SQL type names (`bigint`, `varchar(50)`,
//! `decimal(18,2)`) or host-language names (`long`, `string`, `guid`),
//! so entity catalogs in config files can use whichever the author knows.
//! A trailing `?` marks the column nullable.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Column data type.
///
/// # Examples
///
/// ```ignore
/// use sqlstencil::sql::types::DataType;
///
/// assert_eq!(DataType::parse("decimal(10,2)"), Some(DataType::Decimal(10, 2)));
/// assert_eq!(DataType::parse("long"), Some(DataType::Int64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type.
    Bool,

    /// 8-bit integer (TINYINT, byte).
    Int8,

    /// 16-bit signed integer (SMALLINT, short).
    Int16,

    /// 32-bit signed integer (INT/INTEGER).
    Int32,

    /// 64-bit signed integer (BIGINT, long).
    Int64,

    /// 32-bit floating point (REAL, float).
    Float32,

    /// 64-bit floating point (DOUBLE PRECISION, double).
    Float64,

    /// Fixed-precision decimal with precision and scale.
    Decimal(u8, u8),

    /// Variable-length string without a declared limit.
    String,

    /// Variable-length character string with maximum length.
    Varchar(u16),

    /// Date without time.
    Date,

    /// Time of day or duration.
    Time,

    /// Timestamp without timezone.
    DateTime,

    /// Timestamp with offset.
    DateTimeOffset,

    /// Binary data (BLOB, BYTEA, VARBINARY, byte[]).
    Binary,

    /// JSON document.
    Json,

    /// UUID/GUID type.
    Guid,
}

impl DataType {
    /// Parse a data type from a string.
    ///
    /// Supports common SQL type names and host-language aliases:
    /// - `bool`, `boolean`, `bit`
    /// - `tinyint`, `byte`
    /// - `smallint`, `short`
    /// - `int`, `integer`
    /// - `bigint`, `long`
    /// - `real`, `float`, `single`
    /// - `double`, `double precision`, `float8`
    /// - `decimal(p,s)`, `numeric(p,s)`, `decimal`, `money`
    /// - `text`, `string`, `varchar(n)`, `nvarchar(max)`
    /// - `date`, `time`, `timespan`, `datetime`, `timestamp`
    /// - `datetimeoffset`, `timestamptz`
    /// - `binary`, `blob`, `bytea`, `byte[]`
    /// - `json`, `jsonb`
    /// - `uuid`, `guid`, `uniqueidentifier`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        // Handle types with parameters first
        if let Some(inner) =
            extract_parens(&s, "decimal").or_else(|| extract_parens(&s, "numeric"))
        {
            return parse_decimal_params(&inner);
        }

        if let Some(inner) = extract_parens(&s, "varchar")
            .or_else(|| extract_parens(&s, "nvarchar"))
            .or_else(|| extract_parens(&s, "varchar2"))
        {
            return parse_length_param(&inner).map(DataType::Varchar);
        }

        match s.as_str() {
            "bool" | "boolean" | "bit" => Some(DataType::Bool),

            "tinyint" | "byte" | "sbyte" => Some(DataType::Int8),
            "smallint" | "short" | "int16" => Some(DataType::Int16),
            "int" | "integer" | "int32" => Some(DataType::Int32),
            "bigint" | "long" | "int64" => Some(DataType::Int64),

            "real" | "float" | "single" | "float4" => Some(DataType::Float32),
            "double" | "double precision" | "float8" => Some(DataType::Float64),

            // Without parameters use the common money-style default
            "decimal" | "numeric" | "number" | "money" => Some(DataType::Decimal(18, 2)),

            "text" | "string" | "clob" | "varchar" | "nvarchar" => Some(DataType::String),

            "date" | "dateonly" => Some(DataType::Date),
            "time" | "timeonly" | "timespan" | "interval" => Some(DataType::Time),
            "datetime" | "datetime2" | "timestamp" => Some(DataType::DateTime),
            "datetimeoffset" | "timestamptz" | "timestamp with time zone" => {
                Some(DataType::DateTimeOffset)
            }

            "binary" | "blob" | "bytea" | "varbinary" | "byte[]" => Some(DataType::Binary),

            "json" | "jsonb" => Some(DataType::Json),

            "uuid" | "guid" | "uniqueidentifier" => Some(DataType::Guid),

            _ => None,
        }
    }

    /// Parse a type with an optional trailing `?` nullability marker.
    ///
    /// Returns the type and whether it was marked nullable.
    pub fn parse_with_nullability(s: &str) -> Option<(Self, bool)> {
        let s = s.trim();
        match s.strip_suffix('?') {
            Some(inner) => Self::parse(inner).map(|t| (t, true)),
            None => Self::parse(s).map(|t| (t, false)),
        }
    }

    /// Returns true if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::Float32
                | DataType::Float64
                | DataType::Decimal(_, _)
        )
    }

    /// Returns true if this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    /// Returns true if this is a string/text type.
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::String | DataType::Varchar(_))
    }

    /// Returns true if this is a temporal (date/time) type.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date | DataType::Time | DataType::DateTime | DataType::DateTimeOffset
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Int8 => write!(f, "tinyint"),
            DataType::Int16 => write!(f, "smallint"),
            DataType::Int32 => write!(f, "int"),
            DataType::Int64 => write!(f, "bigint"),
            DataType::Float32 => write!(f, "real"),
            DataType::Float64 => write!(f, "double"),
            DataType::Decimal(p, s) => write!(f, "decimal({},{})", p, s),
            DataType::String => write!(f, "string"),
            DataType::Varchar(n) => write!(f, "varchar({})", n),
            DataType::Date => write!(f, "date"),
            DataType::Time => write!(f, "time"),
            DataType::DateTime => write!(f, "datetime"),
            DataType::DateTimeOffset => write!(f, "datetimeoffset"),
            DataType::Binary => write!(f, "binary"),
            DataType::Json => write!(f, "json"),
            DataType::Guid => write!(f, "guid"),
        }
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DataType::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown data type: {}", s)))
    }
}

/// Extract content inside parentheses for a given type prefix.
/// e.g., extract_parens("decimal(10,2)", "decimal") returns Some("10,2")
fn extract_parens(s: &str, prefix: &str) -> Option<String> {
    let rest = s.trim().strip_prefix(prefix)?.trim();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.to_string())
}

/// Parse decimal parameters "precision,scale" or "precision, scale".
fn parse_decimal_params(inner: &str) -> Option<DataType> {
    let (precision, scale) = inner.split_once(',')?;
    let precision: u8 = precision.trim().parse().ok()?;
    let scale: u8 = scale.trim().parse().ok()?;
    Some(DataType::Decimal(precision, scale))
}

/// Parse a single length parameter.
fn parse_length_param(inner: &str) -> Option<u16> {
    let inner = inner.trim();
    // T-SQL "max"
    if inner.eq_ignore_ascii_case("max") {
        return Some(u16::MAX);
    }
    inner.parse().ok()
}
