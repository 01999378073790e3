use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roster_core::{generate_directory, UserRecord, PAGE_SIZE};
use tracing::debug;

/// Inclusive artificial latency bounds applied before every read, emulating
/// a slow upstream. Zero-width at zero disables the delay.
#[derive(Debug, Clone, Copy)]
pub struct LatencyRange {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyRange {
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms.max(min_ms)),
        }
    }

    pub fn disabled() -> Self {
        Self::from_millis(0, 0)
    }

    fn sample(&self) -> Duration {
        if self.max.is_zero() {
            return Duration::ZERO;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// The fixed in-memory record collection. Generated once at startup and
/// never mutated afterwards, so handlers can share it behind an `Arc`
/// without locking.
pub struct UserDirectory {
    records: Vec<UserRecord>,
    latency: LatencyRange,
}

impl UserDirectory {
    pub fn new(seed: Option<u64>, latency: LatencyRange) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            records: generate_directory(&mut rng),
            latency,
        }
    }

    /// Records at offset `(page - 1) * PAGE_SIZE`, at most `PAGE_SIZE` of
    /// them. Out-of-range pages (including non-positive ones) yield an
    /// empty slice, never an error.
    pub async fn list_page(&self, page: i64) -> &[UserRecord] {
        self.pause().await;
        if page < 1 {
            return &[];
        }
        let start = (page as usize - 1).saturating_mul(PAGE_SIZE);
        if start >= self.records.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.records.len());
        &self.records[start..end]
    }

    /// Exact-match lookup. Absent is a valid result, not an error.
    pub async fn find_by_key(&self, username: &str) -> Option<&UserRecord> {
        self.pause().await;
        self.records.iter().find(|r| r.username == username)
    }

    /// All records flagged spammy, unpaged.
    pub async fn spammy_users(&self) -> Vec<UserRecord> {
        self.pause().await;
        self.records.iter().filter(|r| r.spammy).cloned().collect()
    }

    /// Suspends the calling request for a randomized interval. The sleep is
    /// an await point only; concurrent requests delay independently.
    async fn pause(&self) {
        let delay = self.latency.sample();
        if delay.is_zero() {
            return;
        }
        debug!(delay_ms = delay.as_millis() as u64, "simulating upstream latency");
        tokio::time::sleep(delay).await;
    }
}
