//! Validation for poll, reconnect, and timeout settings.

use crate::schema::PresenceConfig;

use super::helpers::validate_range;

pub(crate) fn validate_timing(errors: &mut Vec<String>, config: &PresenceConfig) {
    let timing = &config.timing;
    validate_range(
        errors,
        "timing.poll_interval_secs",
        timing.poll_interval_secs,
        5,
        3600,
    );
    validate_range(
        errors,
        "timing.reconnect_delay_ms",
        timing.reconnect_delay_ms,
        100,
        60000,
    );
    validate_range(
        errors,
        "timing.connect_timeout_secs",
        timing.connect_timeout_secs,
        1,
        120,
    );
    // 0 disables the fetch timeout.
    if timing.fetch_timeout_secs != 0 {
        validate_range(
            errors,
            "timing.fetch_timeout_secs",
            timing.fetch_timeout_secs,
            1,
            300,
        );
    }
}
