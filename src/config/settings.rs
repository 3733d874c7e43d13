//! TOML-based configuration for radhoc.
//!
//! Supports a config file (radhoc.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [sql]
//! dialect = "postgres"
//! join_type = "left"
//!
//! [labels]
//! strip_id_suffix = true
//!
//! [storage]
//! database = "${RADHOC_DATABASE}"
//! catalog = "./catalog.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::{Dialect, JoinType};

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
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// SQL rendering.
    pub sql: SqlSettings,

    /// Interpreted-mode labels.
    pub labels: LabelSettings,

    /// Where the CLI finds its database and catalog.
    pub storage: StorageSettings,
}

/// SQL rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqlSettings {
    /// Dialect used when rendering plans as text.
    pub dialect: Dialect,

    /// Join flavour for relationship hops (inner drops rows with a missing
    /// association, left keeps them with NULLs).
    pub join_type: JoinType,
}

/// Label defaulting settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelSettings {
    /// Drop a trailing `_id` when humanizing (`album_id` → `Album`).
    pub strip_id_suffix: bool,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            strip_id_suffix: true,
        }
    }
}

/// Storage locations (supports `${ENV_VAR}` expansion).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// SQLite database file.
    pub database: Option<String>,

    /// Catalog file (TOML or JSON). When absent the catalog is introspected
    /// from the database.
    pub catalog: Option<String>,
}

impl StorageSettings {
    /// Database path with environment variables expanded.
    pub fn database_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.database
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }

    /// Catalog path with environment variables expanded.
    pub fn catalog_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.catalog
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `RADHOC_CONFIG`
    /// 2. `./radhoc.toml`
    /// 3. `~/.config/radhoc/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("RADHOC_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("radhoc.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("radhoc").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
