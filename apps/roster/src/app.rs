use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use roster_core::UserRecord;
use tokio::sync::mpsc;
use tracing::debug;

use crate::gateway::{Gateway, TransportError};
use crate::prefetch::{PageStatus, PrefetchTracker};
use crate::state::StateStore;

/// Completion of a spawned query, serialized back onto the event loop.
/// Tagged with the page/key it was issued for so stale completions can be
/// discarded after the state has moved on.
#[derive(Debug)]
pub enum FetchOutcome {
    Page {
        page: u32,
        result: Result<Vec<UserRecord>, TransportError>,
    },
    Selected {
        key: String,
        result: Result<Option<UserRecord>, TransportError>,
    },
}

/// What the table area shows for the current page.
#[derive(Debug)]
pub enum PageView {
    Loading,
    Ready(Vec<UserRecord>),
    Failed(String),
}

/// What the highlight panel shows for the selected record.
#[derive(Debug)]
pub enum SelectedView {
    Loading,
    Ready(UserRecord),
    Absent,
    Failed(String),
}

/// The client session: owns the state store and the per-query view states.
/// All mutation happens on the event-loop task; spawned fetches report back
/// through the outcome channel.
pub struct App {
    store: StateStore,
    gateway: Arc<dyn Gateway>,
    tracker: PrefetchTracker,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    page_view: PageView,
    selected_view: SelectedView,
    should_quit: bool,
}

impl App {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        store: StateStore,
        tracker: PrefetchTracker,
        outcome_tx: mpsc::Sender<FetchOutcome>,
    ) -> Self {
        Self {
            store,
            gateway,
            tracker,
            outcome_tx,
            page_view: PageView::Loading,
            selected_view: SelectedView::Loading,
            should_quit: false,
        }
    }

    /// Issues the initial page and selection queries.
    pub fn start(&mut self) {
        self.refetch_page();
        self.refetch_selected();
    }

    pub fn page(&self) -> u32 {
        self.store.page()
    }

    pub fn selected_key(&self) -> &str {
        self.store.selected_key()
    }

    pub fn page_view(&self) -> &PageView {
        &self.page_view
    }

    pub fn selected_view(&self) -> &SelectedView {
        &self.selected_view
    }

    pub fn prefetch_pages(&self) -> Vec<(u32, PageStatus)> {
        self.tracker.snapshot()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('j') => {
                self.store.next_page();
                self.refetch_page();
                self.refetch_selected();
            }
            KeyCode::Char('k') => {
                let before = self.store.page();
                self.store.prev_page();
                // Clamped at page 1: the page query's variables did not
                // change, so only the selection refetches.
                if self.store.page() != before {
                    self.refetch_page();
                }
                self.refetch_selected();
            }
            KeyCode::Char('r') => {
                self.store.request_refresh();
                self.refetch_selected();
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Applies a completed query, discarding it if the state has moved on.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Page { page, result } => {
                if page != self.store.page() {
                    debug!(page, current = self.store.page(), "discarding stale page result");
                    return;
                }
                self.page_view = match result {
                    Ok(records) => PageView::Ready(records),
                    Err(err) => PageView::Failed(err.to_string()),
                };
            }
            FetchOutcome::Selected { key, result } => {
                if key != self.store.selected_key() {
                    debug!(%key, "discarding stale selection result");
                    return;
                }
                self.selected_view = match result {
                    Ok(Some(record)) => SelectedView::Ready(record),
                    Ok(None) => SelectedView::Absent,
                    Err(err) => SelectedView::Failed(err.to_string()),
                };
            }
        }
    }

    fn refetch_page(&mut self) {
        self.page_view = PageView::Loading;
        let gateway = self.gateway.clone();
        let tx = self.outcome_tx.clone();
        let page = self.store.page();
        tokio::spawn(async move {
            let result = gateway.list_page(page).await;
            let _ = tx.send(FetchOutcome::Page { page, result }).await;
        });
    }

    fn refetch_selected(&mut self) {
        self.selected_view = SelectedView::Loading;
        let gateway = self.gateway.clone();
        let tx = self.outcome_tx.clone();
        let key = self.store.selected_key().to_string();
        tokio::spawn(async move {
            let result = gateway.find_by_key(&key).await;
            let _ = tx.send(FetchOutcome::Selected { key, result }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_records, MockGateway};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn app_with_channel() -> (App, mpsc::Receiver<FetchOutcome>) {
        let (tx, rx) = mpsc::channel(16);
        let app = App::new(
            Arc::new(MockGateway::new()),
            StateStore::new(),
            PrefetchTracker::default(),
            tx,
        );
        (app, rx)
    }

    #[tokio::test]
    async fn advancing_fetches_the_new_page() {
        let (mut app, mut rx) = app_with_channel();
        app.handle_key(key('j'));
        assert_eq!(app.page(), 2);
        assert!(matches!(app.page_view(), PageView::Loading));

        // Two outcomes arrive: the page fetch and the selection fetch.
        for _ in 0..2 {
            let outcome = rx.recv().await.expect("fetch completes");
            app.apply_outcome(outcome);
        }
        match app.page_view() {
            PageView::Ready(records) => assert_eq!(records[0].username, "user11"),
            other => panic!("expected ready page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_page_completions_are_discarded() {
        let (mut app, _rx) = app_with_channel();
        app.handle_key(key('j'));
        app.handle_key(key('j'));
        assert_eq!(app.page(), 3);

        app.apply_outcome(FetchOutcome::Page {
            page: 2,
            result: Ok(page_records(2)),
        });
        assert!(matches!(app.page_view(), PageView::Loading));

        app.apply_outcome(FetchOutcome::Page {
            page: 3,
            result: Ok(page_records(3)),
        });
        assert!(matches!(app.page_view(), PageView::Ready(_)));
    }

    #[tokio::test]
    async fn clamped_prev_keeps_the_page_view_but_reselects() {
        let (mut app, _rx) = app_with_channel();
        app.apply_outcome(FetchOutcome::Page {
            page: 1,
            result: Ok(page_records(1)),
        });
        app.apply_outcome(FetchOutcome::Selected {
            key: "user1".to_string(),
            result: Ok(Some(page_records(1)[0].clone())),
        });

        app.handle_key(key('k'));
        assert_eq!(app.page(), 1);
        assert!(matches!(app.page_view(), PageView::Ready(_)));
        assert!(matches!(app.selected_view(), SelectedView::Loading));
    }

    #[tokio::test]
    async fn stale_selection_completions_are_discarded() {
        let (mut app, _rx) = app_with_channel();
        app.apply_outcome(FetchOutcome::Selected {
            key: "user5".to_string(),
            result: Ok(None),
        });
        assert!(matches!(app.selected_view(), SelectedView::Loading));
    }

    #[tokio::test]
    async fn absent_selection_renders_as_absent_not_error() {
        let (mut app, _rx) = app_with_channel();
        app.apply_outcome(FetchOutcome::Selected {
            key: "user1".to_string(),
            result: Ok(None),
        });
        assert!(matches!(app.selected_view(), SelectedView::Absent));
    }

    #[tokio::test]
    async fn transport_failure_shows_per_query_error() {
        let (mut app, _rx) = app_with_channel();
        app.apply_outcome(FetchOutcome::Page {
            page: 1,
            result: Err(TransportError::Status(reqwest::StatusCode::BAD_GATEWAY)),
        });
        match app.page_view() {
            PageView::Failed(message) => assert!(message.contains("502")),
            other => panic!("expected failed page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn quit_keys_set_the_flag() {
        let (mut app, _rx) = app_with_channel();
        app.handle_key(key('q'));
        assert!(app.should_quit());

        let (mut app, _rx) = app_with_channel();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
