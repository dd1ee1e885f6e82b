//! TOML-based configuration for sqlstencil.
//!
//! Supports a config file (sqlstencil.toml) with environment variable
//! expansion in table names.
//!
//! Example configuration:
//! ```toml
//! dialect = "postgres"
//!
//! [entities.User]
//! table = "${TENANT_SCHEMA}.users"
//! columns = [
//!     { member = "Id", type = "bigint" },
//!     { member = "Email", type = "string?", column = "email_address" },
//!     { member = "IsActive", type = "bool" },
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::{CatalogError, ColumnCatalog, ColumnMetadata};
use crate::sql::dialect::Dialect;
use crate::sql::types::DataType;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Unknown type '{ty}' for {entity}.{member}")]
    UnknownType {
        entity: String,
        member: String,
        ty: String,
    },

    #[error("Invalid catalog for {entity}: {source}")]
    Catalog {
        entity: String,
        #[source]
        source: CatalogError,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Dialect used when a command does not name one.
    pub dialect: Dialect,

    /// Entity catalogs keyed by entity name.
    pub entities: BTreeMap<String, EntitySettings>,
}

/// One entity: its table and ordered columns.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntitySettings {
    /// Table name, optionally schema-qualified (supports ${ENV_VAR} expansion).
    pub table: String,

    #[serde(default)]
    pub columns: Vec<ColumnSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnSettings {
    pub member: String,

    /// Type name; a trailing `?` marks the column nullable.
    #[serde(rename = "type")]
    pub ty: String,

    /// Explicit db column name; defaults to snake_case(member).
    #[serde(default)]
    pub column: Option<String>,
}

impl EntitySettings {
    /// Build the column catalog, expanding environment variables in the table name.
    pub fn to_catalog(&self, entity: &str) -> Result<ColumnCatalog, SettingsError> {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let (data_type, nullable) = DataType::parse_with_nullability(&c.ty).ok_or_else(
                    || SettingsError::UnknownType {
                        entity: entity.to_string(),
                        member: c.member.clone(),
                        ty: c.ty.clone(),
                    },
                )?;
                let mut meta = ColumnMetadata::new(&c.member, data_type).nullable(nullable);
                if let Some(column) = &c.column {
                    meta = meta.with_db_name(column);
                }
                Ok(meta)
            })
            .collect::<Result<Vec<_>, SettingsError>>()?;

        ColumnCatalog::new(expand_env_vars(&self.table)?, columns).map_err(|source| {
            SettingsError::Catalog {
                entity: entity.to_string(),
                source,
            }
        })
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLSTENCIL_CONFIG`
    /// 2. `./sqlstencil.toml`
    /// 3. `~/.config/sqlstencil/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLSTENCIL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlstencil.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlstencil").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Catalog for a named entity.
    pub fn catalog(&self, entity: &str) -> Result<Arc<ColumnCatalog>, SettingsError> {
        let settings = self
            .entities
            .get(entity)
            .ok_or_else(|| SettingsError::EntityNotFound(entity.to_string()))?;
        Ok(Arc::new(settings.to_catalog(entity)?))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let lookup = |name: String| env::var(&name).map_err(|_| SettingsError::MissingEnvVar(name));

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            let var_name: String = chars.by_ref().take_while(|&ch| ch != '}').collect();
            result.push_str(&lookup(var_name)?);
        } else {
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
            } else {
                result.push_str(&lookup(var_name)?);
            }
        }
    }

    Ok(result)
}
