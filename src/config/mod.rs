//! Configuration module for sqlstencil.
//!
//! Loads the default dialect and entity catalogs from TOML.

mod settings;

pub use settings::{expand_env_vars, ColumnSettings, EntitySettings, Settings, SettingsError};
