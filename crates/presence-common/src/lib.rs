pub mod errors;

pub use errors::{ConfigError, PresenceError};

pub type Result<T> = std::result::Result<T, PresenceError>;
