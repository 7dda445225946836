use presence_common::ConfigError;

use crate::schema::PresenceConfig;

/// A non-empty subject id in the file must be a Discord snowflake.
pub(crate) fn validate_subject(errors: &mut Vec<String>, config: &PresenceConfig) {
    let id = &config.subject.id;
    if !id.is_empty() && !is_snowflake(id) {
        errors.push(format!("subject.id = {id:?} must be a numeric Discord user id"));
    }
}

/// Check an id supplied outside the config file, such as a CLI override.
///
/// Unlike the file, an empty id is an error here.
pub fn validate_subject_id(id: &str) -> Result<(), ConfigError> {
    if is_snowflake(id) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "subject id {id:?} must be a numeric Discord user id"
        )))
    }
}

fn is_snowflake(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}
