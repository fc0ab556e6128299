//! Client configuration.
//!
//! The backend origin is an injected value rather than a hidden constant so
//! the conversation controller stays testable against a mock transport.

use serde::Deserialize;
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_REVEAL_TICK_MS: u64 = 15;

/// Runtime configuration for the Spendly client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base origin of the Spendly backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Milliseconds between reveal ticks.
    #[serde(default = "default_reveal_tick_ms")]
    pub reveal_tick_ms: u64,
    /// When enabled, an upload completion that was superseded by a newer
    /// upload is discarded instead of overwriting the stored reference.
    #[serde(default)]
    pub guard_stale_uploads: bool,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// `SPENDLY_BACKEND_URL` overrides the backend origin and
    /// `SPENDLY_REVEAL_TICK_MS` the reveal cadence; anything unset falls
    /// back to the defaults.
    pub fn from_env() -> Self {
        let base_url = env::var("SPENDLY_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let reveal_tick_ms = env::var("SPENDLY_REVEAL_TICK_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REVEAL_TICK_MS);

        Self {
            base_url,
            reveal_tick_ms,
            guard_stale_uploads: false,
        }
    }

    /// The reveal cadence as a [`Duration`].
    pub fn reveal_tick(&self) -> Duration {
        Duration::from_millis(self.reveal_tick_ms.max(1))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reveal_tick_ms: DEFAULT_REVEAL_TICK_MS,
            guard_stale_uploads: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_reveal_tick_ms() -> u64 {
    DEFAULT_REVEAL_TICK_MS
}
