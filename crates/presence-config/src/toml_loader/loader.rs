//! Core TOML config loading: read from path or platform default.

use std::path::Path;

use presence_common::ConfigError;
use tracing::{info, warn};

use crate::schema::PresenceConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their defaults. Validation problems are logged as
/// a warning and the parsed config is still returned.
pub fn load_from_path(path: &Path) -> Result<PresenceConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: PresenceConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config validation warning: {e}");
    }

    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/presence-sync/config.toml`
/// On macOS: `~/Library/Application Support/presence-sync/config.toml`
///
/// If the file does not exist, writes the commented template and returns
/// defaults.
pub fn load_default() -> Result<PresenceConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "no config found, creating default");
            create_default_config(&path)?;
            Ok(PresenceConfig::default())
        }
        Err(e) => Err(e),
    }
}
