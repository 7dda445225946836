//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod endpoints;
mod helpers;
mod subject;
mod timing;


use presence_common::ConfigError;

pub use subject::validate_subject_id;

use crate::schema::PresenceConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PresenceConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    subject::validate_subject(&mut errors, config);
    endpoints::validate_endpoints(&mut errors, config);
    timing::validate_timing(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
