//! Column catalogs: per-entity column metadata and the target table.
//!
//! A catalog is built once (from config or code) and then only read.
//! Templates and queries share it as `Arc<ColumnCatalog>`.

use std::borrow::Cow;
use std::collections::HashSet;

use inflector::Inflector;
use serde::{Deserialize, Serialize};

use crate::sql::types::DataType;

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("table name must not be empty")]
    EmptyTable,

    #[error("duplicate column '{name}' in catalog for table '{table}'")]
    DuplicateColumn { table: String, name: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Default database column name for a member: `IsActive` → `is_active`.
pub fn snake_case(member_name: &str) -> String {
    member_name.to_snake_case()
}

/// Metadata for one mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub db_name: String,
    pub member_name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnMetadata {
    /// Column whose database name is the snake_case form of `member_name`.
    pub fn new(member_name: &str, data_type: DataType) -> Self {
        Self {
            db_name: snake_case(member_name),
            member_name: member_name.into(),
            data_type,
            nullable: false,
        }
    }

    /// Override the database column name.
    pub fn with_db_name(mut self, db_name: &str) -> Self {
        self.db_name = db_name.into();
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Ordered column metadata for one entity plus its table name.
///
/// Column order is declaration order and is preserved in every generated
/// column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCatalog {
    table: String,
    columns: Vec<ColumnMetadata>,
}

impl ColumnCatalog {
    /// Build a catalog, rejecting an empty table name and duplicate member
    /// or database names.
    pub fn new(table: impl Into<String>, columns: Vec<ColumnMetadata>) -> CatalogResult<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(CatalogError::EmptyTable);
        }

        let mut members = HashSet::new();
        let mut db_names = HashSet::new();
        for column in &columns {
            if !members.insert(column.member_name.as_str()) {
                return Err(CatalogError::DuplicateColumn {
                    table,
                    name: column.member_name.clone(),
                });
            }
            if !db_names.insert(column.db_name.as_str()) {
                return Err(CatalogError::DuplicateColumn {
                    table,
                    name: column.db_name.clone(),
                });
            }
        }

        Ok(Self { table, columns })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by member name (case-sensitive).
    pub fn column(&self, member_name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.member_name == member_name)
    }

    pub fn contains(&self, member_name: &str) -> bool {
        self.column(member_name).is_some()
    }

    /// Database name for a member, falling back to snake_case for members
    /// the catalog does not know.
    pub fn resolve(&self, member_name: &str) -> Cow<'_, str> {
        match self.column(member_name) {
            Some(c) => Cow::Borrowed(c.db_name.as_str()),
            None => Cow::Owned(snake_case(member_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<ColumnMetadata> {
        vec![
            ColumnMetadata::new("Id", DataType::Int64),
            ColumnMetadata::new("UserName", DataType::String),
            ColumnMetadata::new("IsActive", DataType::Bool),
            ColumnMetadata::new("Email", DataType::String)
                .with_db_name("email_address")
                .nullable(true),
        ]
    }

    #[test]
    fn test_snake_case_default() {
        assert_eq!(snake_case("IsActive"), "is_active");
        assert_eq!(snake_case("Id"), "id");
        assert_eq!(snake_case("CreatedAt"), "created_at");
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = ColumnCatalog::new("users", users()).unwrap();
        let names: Vec<_> = catalog.columns().iter().map(|c| c.db_name.as_str()).collect();
        assert_eq!(names, ["id", "user_name", "is_active", "email_address"]);
        assert_eq!(catalog.table(), "users");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = ColumnCatalog::new("users", users()).unwrap();
        assert!(catalog.contains("UserName"));
        assert!(!catalog.contains("username"));
        assert!(catalog.column("Email").unwrap().nullable);
    }

    #[test]
    fn test_resolve_falls_back_to_snake_case() {
        let catalog = ColumnCatalog::new("users", users()).unwrap();
        assert_eq!(catalog.resolve("Email"), "email_address");
        assert_eq!(catalog.resolve("LastLogin"), "last_login");
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let mut columns = users();
        columns.push(ColumnMetadata::new("Id", DataType::Int32).with_db_name("other_id"));
        assert_eq!(
            ColumnCatalog::new("users", columns),
            Err(CatalogError::DuplicateColumn {
                table: "users".into(),
                name: "Id".into()
            })
        );
    }

    #[test]
    fn test_duplicate_db_name_rejected() {
        let mut columns = users();
        columns.push(ColumnMetadata::new("UserID", DataType::Int32).with_db_name("id"));
        assert!(matches!(
            ColumnCatalog::new("users", columns),
            Err(CatalogError::DuplicateColumn { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            ColumnCatalog::new("  ", users()),
            Err(CatalogError::EmptyTable)
        );
    }
}
