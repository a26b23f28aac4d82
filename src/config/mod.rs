//! Configuration module for foodcomp.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, DatabaseSettings, LogSettings, ServerSettings, Settings, SettingsError,
};
