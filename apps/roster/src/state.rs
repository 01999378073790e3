/// Key highlighted before the first refresh fires.
pub const DEFAULT_SELECTED_KEY: &str = "user1";

/// Client-session pagination state. `refresh_counter` strictly increases on
/// every page change and explicit refresh; it is the sole trigger for
/// re-selecting `selected_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub selected_key: String,
    pub refresh_counter: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            selected_key: DEFAULT_SELECTED_KEY.to_string(),
            refresh_counter: 0,
        }
    }
}

/// Reaction to a refresh-counter bump. Returns the key to select; the store
/// applies it, so paging code never writes `selected_key` directly.
pub type RefreshSubscriber = Box<dyn FnMut(u64) -> String + Send>;

/// Explicit, injectable state store: owned by one client session, passed by
/// reference wherever it is needed. No ambient singletons.
#[derive(Default)]
pub struct StateStore {
    state: PaginationState,
    subscribers: Vec<RefreshSubscriber>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn selected_key(&self) -> &str {
        &self.state.selected_key
    }

    pub fn refresh_counter(&self) -> u64 {
        self.state.refresh_counter
    }

    /// Registers a refresh subscriber. Subscribers run, in registration
    /// order, after every counter bump.
    pub fn on_refresh(&mut self, subscriber: impl FnMut(u64) -> String + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn next_page(&mut self) {
        self.state.page += 1;
        self.bump();
    }

    /// Clamped at page 1; the counter still bumps so a refresh fires.
    pub fn prev_page(&mut self) {
        self.state.page = self.state.page.saturating_sub(1).max(1);
        self.bump();
    }

    /// Manual re-randomization, decoupled from paging.
    pub fn request_refresh(&mut self) {
        self.bump();
    }

    pub fn set_selected_key(&mut self, key: impl Into<String>) {
        self.state.selected_key = key.into();
    }

    fn bump(&mut self) {
        self.state.refresh_counter += 1;
        let counter = self.state.refresh_counter;
        let keys: Vec<String> = self
            .subscribers
            .iter_mut()
            .map(|subscriber| subscriber(counter))
            .collect();
        for key in keys {
            self.set_selected_key(key);
        }
    }
}
