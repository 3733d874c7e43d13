//! Configuration module for radhoc.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, LabelSettings, Settings, SettingsError, SqlSettings, StorageSettings,
};
