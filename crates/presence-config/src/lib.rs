//! Presence watcher configuration.
//!
//! TOML-based configuration with a commented default template and full
//! validation. Every section uses serde defaults so partial files work.

pub mod convert;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    EndpointsConfig, LogLevel, LoggingConfig, PresenceConfig, SubjectConfig, TimingConfig,
    CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use presence_common::ConfigError;

/// Load and validate config from `path`, or from the platform default
/// path when `None` (creating a template there if it is missing).
pub fn load_config(path: Option<&Path>) -> Result<PresenceConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
