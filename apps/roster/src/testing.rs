use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use reqwest::StatusCode;
use roster_core::{username_for, UserRecord, PAGE_SIZE};

use crate::gateway::{Gateway, TransportError};

/// Scripted per-page behavior for `MockGateway::list_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBehavior {
    /// Resolve with that page's records.
    Resolve,
    /// Never resolve; the future stays pending until dropped.
    Hang,
    /// Resolve with a transport error.
    Fail,
}

/// In-memory `Gateway` for unit tests: scriptable resolution per page plus
/// in-flight accounting so tests can assert the concurrency cap.
pub struct MockGateway {
    behaviors: Mutex<HashMap<u32, PageBehavior>>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            behaviors: Mutex::new(HashMap::new()),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn script(&self, page: u32, behavior: PageBehavior) {
        self.behaviors.lock().insert(page, behavior);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlightGuard {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard {
            in_flight: self.in_flight.clone(),
        }
    }
}

/// Decrements the in-flight count even when the request future is dropped
/// mid-call (cancellation).
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Synthesizes the records the real data source would serve for `page`.
pub fn page_records(page: u32) -> Vec<UserRecord> {
    let start = (page - 1) * PAGE_SIZE as u32;
    (1..=PAGE_SIZE as u32)
        .map(|i| {
            let username = username_for(start + i);
            UserRecord {
                email: format!("{username}@example.com"),
                username,
                timestamp: Utc::now(),
                spammy: false,
            }
        })
        .collect()
}

#[async_trait]
impl Gateway for MockGateway {
    async fn list_page(&self, page: u32) -> Result<Vec<UserRecord>, TransportError> {
        let _guard = self.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let behavior = self
            .behaviors
            .lock()
            .get(&page)
            .copied()
            .unwrap_or(PageBehavior::Resolve);
        match behavior {
            PageBehavior::Resolve => Ok(page_records(page)),
            PageBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending future resolved")
            }
            PageBehavior::Fail => Err(TransportError::Status(StatusCode::BAD_GATEWAY)),
        }
    }

    async fn find_by_key(&self, username: &str) -> Result<Option<UserRecord>, TransportError> {
        let _guard = self.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let known = username
            .strip_prefix("user")
            .and_then(|n| n.parse::<u32>().ok())
            .is_some_and(|n| (1..=roster_core::USER_COUNT).contains(&n));
        Ok(known.then(|| UserRecord {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            timestamp: Utc::now(),
            spammy: false,
        }))
    }
}
