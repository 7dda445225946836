//! Conversion from the file schema into the synchronizer's runtime config.

use std::time::Duration;

use presence_sync::SyncConfig;

use crate::schema::PresenceConfig;

impl PresenceConfig {
    pub fn to_sync_config(&self) -> SyncConfig {
        let timing = &self.timing;
        SyncConfig {
            api_base_url: self.endpoints.api_base_url.clone(),
            stream_url: self.endpoints.stream_url.clone(),
            poll_interval: Duration::from_secs(u64::from(timing.poll_interval_secs)),
            reconnect_delay: Duration::from_millis(u64::from(timing.reconnect_delay_ms)),
            connect_timeout: Duration::from_secs(u64::from(timing.connect_timeout_secs)),
            fetch_timeout: (timing.fetch_timeout_secs > 0)
                .then(|| Duration::from_secs(u64::from(timing.fetch_timeout_secs))),
        }
    }
}
