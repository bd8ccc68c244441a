//! Widget configuration: endpoints and timing constants.

use std::time::Duration;

/// Storage key for the persisted volume. Must not change between releases.
pub const VOLUME_KEY: &str = "volume";

const STREAM_PATH: &str = "/stream";
const EVENTS_PATH: &str = "/events";
const STATUS_PATH: &str = "/status";

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_DESKTOP_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Origin the endpoints are resolved against. Empty means "same origin".
    pub base_url: String,
    pub reconnect_delay: Duration,
    pub keepalive_interval: Duration,
    /// Volume change per wheel notch.
    pub wheel_step: i32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            reconnect_delay: Duration::from_millis(5000),
            keepalive_interval: Duration::from_secs(10 * 60),
            wheel_step: 5,
        }
    }
}

impl WidgetConfig {
    /// Configuration for the current platform.
    ///
    /// In the browser every endpoint is relative to the page. The desktop
    /// shell has no page origin, so it reads `QAA_RADIO_URL`.
    pub fn load() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let base_url = std::env::var("QAA_RADIO_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_DESKTOP_BASE_URL.to_string());
            Self {
                base_url,
                ..Self::default()
            }
        }
    }

    pub fn stream_url(&self, cache_buster: &str) -> String {
        format!("{}?r={cache_buster}", self.endpoint(STREAM_PATH))
    }

    pub fn events_url(&self) -> String {
        self.endpoint(EVENTS_PATH)
    }

    pub fn status_url(&self) -> String {
        self.endpoint(STATUS_PATH)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}
