//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod endpoints;
mod logging;
mod subject;
mod timing;

pub use endpoints::*;
pub use logging::*;
pub use subject::*;
pub use timing::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the presence watcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub subject: SubjectConfig,
    pub endpoints: EndpointsConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}
