use crate::schema::PresenceConfig;

use super::helpers::validate_scheme;

pub(crate) fn validate_endpoints(errors: &mut Vec<String>, config: &PresenceConfig) {
    validate_scheme(
        errors,
        "endpoints.api_base_url",
        &config.endpoints.api_base_url,
        &["http://", "https://"],
    );
    validate_scheme(
        errors,
        "endpoints.stream_url",
        &config.endpoints.stream_url,
        &["ws://", "wss://"],
    );
}
