//! The tracked account.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// Discord user id (snowflake). Empty means "pass it on the command line".
    pub id: String,
    /// Optional name shown instead of the Discord username.
    pub display_name: String,
}
