use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::gateway::Gateway;

/// Lifecycle of one tracked page: Pending -> Complete -> removed from the
/// map after the linger delay. A page whose request fails or never resolves
/// stays Pending indefinitely; that is only ever logged, never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Pending,
    Complete,
}

#[derive(Debug, Clone)]
pub struct PrefetchConfig {
    pub pages: RangeInclusive<u32>,
    /// Worker-pool size; the number of prefetch requests in flight never
    /// exceeds this.
    pub concurrency: usize,
    /// How long a completed page stays visible before its entry is removed.
    pub linger: Duration,
    /// When false, `shutdown` is inert. Parity switch for the original
    /// fire-and-forget behavior.
    pub cancellation_enabled: bool,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            pages: 1..=10,
            concurrency: 4,
            linger: Duration::from_millis(500),
            cancellation_enabled: true,
        }
    }
}

/// Shared page-status map. Written by the workers, read by the view each
/// frame. Empty once every tracked page has completed and lingered out.
#[derive(Clone, Default)]
pub struct PrefetchTracker {
    inner: Arc<Mutex<BTreeMap<u32, PageStatus>>>,
}

impl PrefetchTracker {
    pub fn snapshot(&self) -> Vec<(u32, PageStatus)> {
        self.inner
            .lock()
            .iter()
            .map(|(page, status)| (*page, *status))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    fn mark_pending(&self, page: u32) {
        self.inner.lock().insert(page, PageStatus::Pending);
    }

    fn mark_complete(&self, page: u32) {
        self.inner.lock().insert(page, PageStatus::Complete);
    }

    fn remove(&self, page: u32) {
        self.inner.lock().remove(&page);
    }
}

/// Bounded worker pool that warms the page cache in the background. Replaces
/// an unbounded one-task-per-page fan-out: pages queue through `concurrency`
/// workers, and `shutdown` cancels whatever is still in flight.
pub struct PrefetchCoordinator {
    tracker: PrefetchTracker,
    token: CancellationToken,
    cancellation_enabled: bool,
}

impl PrefetchCoordinator {
    pub fn start(gateway: Arc<dyn Gateway>, config: PrefetchConfig) -> Self {
        let tracker = PrefetchTracker::default();
        let token = CancellationToken::new();

        let pages: Vec<u32> = config.pages.clone().collect();
        let (queue_tx, queue_rx) = mpsc::channel(pages.len().max(1));
        for &page in &pages {
            tracker.mark_pending(page);
            // Channel capacity covers every page, so this cannot block.
            let _ = queue_tx.try_send(page);
        }
        drop(queue_tx);

        let queue_rx = Arc::new(tokio::sync::Mutex::new(queue_rx));
        for worker in 0..config.concurrency.max(1) {
            tokio::spawn(run_worker(
                worker,
                gateway.clone(),
                queue_rx.clone(),
                tracker.clone(),
                token.clone(),
                config.linger,
            ));
        }

        Self {
            tracker,
            token,
            cancellation_enabled: config.cancellation_enabled,
        }
    }

    pub fn tracker(&self) -> PrefetchTracker {
        self.tracker.clone()
    }

    /// Cancels queued and in-flight prefetches. Inert when the config
    /// disabled cancellation.
    pub fn shutdown(&self) {
        if self.cancellation_enabled {
            self.token.cancel();
        }
    }
}

async fn run_worker(
    worker: usize,
    gateway: Arc<dyn Gateway>,
    queue: Arc<tokio::sync::Mutex<mpsc::Receiver<u32>>>,
    tracker: PrefetchTracker,
    token: CancellationToken,
    linger: Duration,
) {
    loop {
        let page = {
            let mut queue = queue.lock().await;
            tokio::select! {
                _ = token.cancelled() => None,
                page = queue.recv() => page,
            }
        };
        let Some(page) = page else { break };

        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = gateway.list_page(page) => result,
        };
        match result {
            Ok(records) => {
                debug!(worker, page, count = records.len(), "prefetched page");
                tracker.mark_complete(page);
                let tracker = tracker.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(linger).await;
                    tracker.remove(page);
                });
            }
            Err(err) => {
                // Swallowed on purpose: a prefetch failure must never block
                // or error the main page view. The page stays Pending.
                warn!(worker, page, error = %err, "prefetch failed");
            }
        }
    }
}
