use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Artificial per-request latency bounds, inclusive, in milliseconds.
    /// Setting both to zero disables the delay entirely.
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Optional seed for deterministic record generation.
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        let delay_min_ms = env::var("ROSTER_DELAY_MIN_MS")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(500);
        let delay_max_ms = env::var("ROSTER_DELAY_MAX_MS")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(3000);

        Self {
            port: env::var("ROSTER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            delay_min_ms,
            delay_max_ms: delay_max_ms.max(delay_min_ms),
            seed: env::var("ROSTER_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }
}
