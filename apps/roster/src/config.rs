use std::env;
use std::time::Duration;

use crate::prefetch::PrefetchConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub prefetch_concurrency: usize,
    pub prefetch_linger_ms: u64,
    pub prefetch_cancellation: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_url: env::var("ROSTER_SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:4000".to_string()),
            prefetch_concurrency: env::var("ROSTER_PREFETCH_CONCURRENCY")
                .ok()
                .and_then(|val| val.parse().ok())
                .filter(|&n| n >= 1)
                .unwrap_or(4),
            prefetch_linger_ms: env::var("ROSTER_PREFETCH_LINGER_MS")
                .ok()
                .and_then(|val| val.parse().ok())
                .unwrap_or(500),
            prefetch_cancellation: env::var("ROSTER_PREFETCH_CANCEL")
                .map(|value| value != "0" && !value.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }

    pub fn prefetch(&self) -> PrefetchConfig {
        PrefetchConfig {
            concurrency: self.prefetch_concurrency,
            linger: Duration::from_millis(self.prefetch_linger_ms),
            cancellation_enabled: self.prefetch_cancellation,
            ..PrefetchConfig::default()
        }
    }
}
