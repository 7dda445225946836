//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Presence Sync Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[subject]
# id = ""                  # Discord user id to track
# display_name = ""        # shown instead of the Discord username

[endpoints]
# api_base_url = "https://api.lanyard.rest"
# stream_url = "wss://api.lanyard.rest/socket"

[timing]
# poll_interval_secs = 30      # 5-3600
# reconnect_delay_ms = 3000    # 100-60000
# connect_timeout_secs = 15    # 1-120
# fetch_timeout_secs = 0       # 0 = no timeout, else 1-300

[logging]
# level = "INFO"               # DEBUG, INFO, WARNING, ERROR
"##
}
