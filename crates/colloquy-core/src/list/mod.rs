//! Paginated conversation list
//!
//! [`ConversationList`] keeps an ordered window of conversations in memory
//! and grows it page by page as the host reports scrolling. A non-empty
//! search term switches it to a filtered full fetch until the term is
//! cleared again.
//!
//! Failures never reach the host. They are logged and the last good state
//! stays on screen, so the next trigger can retry.

mod debounce;
mod state;

pub use debounce::Debouncer;
pub use state::{ListState, PageTicket, SearchTicket};

use crate::config::ListConfig;
use crate::error::{ListError, Result};
use crate::store::ConversationStore;
use crate::types::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Result of one `load_page` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Dropped by the in-flight or end-of-list guard
    Skipped,
    /// A page of `returned` records was merged
    Loaded { returned: usize },
    /// The fetch finished after a reset or search superseded it
    Stale,
    /// The fetch failed and the state was left alone
    Failed,
}

struct Inner {
    store: Arc<dyn ConversationStore>,
    config: ListConfig,
    state: Mutex<ListState>,
    events: broadcast::Sender<ListEvent>,
    view: watch::Sender<ListSnapshot>,
    search: Debouncer,
}

/// Paginated, searchable conversation list.
///
/// Cloning is cheap and every clone drives the same list. Independent
/// lists share nothing.
#[derive(Clone)]
pub struct ConversationList {
    inner: Arc<Inner>,
}

impl ConversationList {
    pub fn new(store: Arc<dyn ConversationStore>, config: ListConfig) -> Self {
        let config = config.validated();
        let state = ListState::new();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (view, _) = watch::channel(state.snapshot());

        Self {
            inner: Arc::new(Inner {
                store,
                search: Debouncer::new(config.search_debounce()),
                config,
                state: Mutex::new(state),
                events,
                view,
            }),
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.inner.config
    }

    /// Subscribe to host events
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.inner.events.subscribe()
    }

    /// Observe the rendered state
    pub fn watch(&self) -> watch::Receiver<ListSnapshot> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.inner.state.lock().snapshot()
    }

    /// Initial fetch when the list is first shown
    pub async fn mount(&self) -> LoadOutcome {
        info!("Mounting conversation list");
        self.load_page(true).await
    }

    /// Reload from the first page, dropping any search
    pub async fn reload(&self) -> LoadOutcome {
        self.load_page(true).await
    }

    /// Cancel the pending search and drop the loaded state. Fetches still
    /// in flight are discarded when they land, and every later call is a
    /// no-op.
    pub fn teardown(&self) {
        if self.inner.search.cancel() {
            debug!("Dropped pending search on teardown");
        }
        let mut state = self.inner.state.lock();
        state.tear_down();
        self.publish(&state);
    }

    fn is_torn_down(&self) -> bool {
        self.inner.state.lock().is_torn_down()
    }

    // ===== Pagination =====

    /// Fetch the next page, or the first one when `reset` is set
    pub async fn load_page(&self, reset: bool) -> LoadOutcome {
        let ticket = {
            let mut state = self.inner.state.lock();
            let ticket = state.begin_page(reset);
            if ticket.is_some() {
                self.publish(&state);
            }
            ticket
        };

        match ticket {
            Some(ticket) => self.run_page(ticket).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// React to a scroll event. Returns the spawned fetch, if one started.
    pub fn on_scroll(&self, position: ScrollPosition) -> Option<JoinHandle<LoadOutcome>> {
        let fraction = position.fraction()?;
        if fraction <= self.inner.config.scroll_threshold {
            return None;
        }

        let ticket = {
            let mut state = self.inner.state.lock();
            if !state.has_more || state.is_loading_more {
                return None;
            }
            let ticket = state.begin_page(false)?;
            self.publish(&state);
            ticket
        };

        debug!("Scrolled to {:.2}, loading offset {}", fraction, ticket.offset);
        let list = self.clone();
        Some(tokio::spawn(async move { list.run_page(ticket).await }))
    }

    async fn run_page(&self, ticket: PageTicket) -> LoadOutcome {
        let page_size = self.inner.config.page_size;
        let result = self.fetch_page(&ticket, page_size).await;

        let mut state = self.inner.state.lock();
        let outcome = match result {
            Ok((total, page)) => {
                let returned = page.len();
                if state.apply_page(&ticket, total, page, page_size) {
                    debug!(
                        "Loaded {} conversations (offset {}, total {})",
                        returned, state.offset, state.total_count
                    );
                    LoadOutcome::Loaded { returned }
                } else {
                    debug!("Discarding stale page for generation {}", ticket.generation);
                    LoadOutcome::Stale
                }
            }
            Err(e) => {
                error!("Failed to load conversations: {}", ListError::fetch(e));
                LoadOutcome::Failed
            }
        };
        state.finish_page(&ticket);
        self.publish(&state);
        outcome
    }

    async fn fetch_page(
        &self,
        ticket: &PageTicket,
        page_size: usize,
    ) -> Result<(Option<usize>, Vec<Conversation>)> {
        let total = if ticket.refresh_count {
            Some(self.inner.store.count().await?)
        } else {
            None
        };
        let page = self.inner.store.list_paged(page_size, ticket.offset).await?;
        Ok((total, page))
    }

    // ===== Search =====

    /// Feed a keystroke from the search box. Evaluated after the debounce.
    pub fn on_search_input(&self, query: impl Into<String>) {
        if self.is_torn_down() {
            return;
        }
        let query = query.into();
        let list = self.clone();
        self.inner.search.schedule(async move {
            list.apply_search_query(&query).await;
        });
    }

    /// Evaluate a search query immediately
    pub async fn apply_search_query(&self, query: &str) -> LoadOutcome {
        let term = query.trim();
        if term.is_empty() {
            let exiting = self.inner.state.lock().needs_search_exit();
            if !exiting {
                return LoadOutcome::Skipped;
            }
            info!("Search cleared, reloading conversations");
            return self.load_page(true).await;
        }

        let ticket = {
            let mut state = self.inner.state.lock();
            let Some(ticket) = state.begin_search(term.to_string()) else {
                return LoadOutcome::Skipped;
            };
            self.publish(&state);
            ticket
        };
        debug!("Searching conversations for {:?}", ticket.term);

        let result = self.inner.store.list_all().await;

        let mut state = self.inner.state.lock();
        let outcome = match result {
            Ok(all) => {
                let matches = filter_conversations(all, &ticket.term);
                let returned = matches.len();
                if state.apply_search(&ticket, matches) {
                    LoadOutcome::Loaded { returned }
                } else {
                    debug!("Discarding stale search for {:?}", ticket.term);
                    LoadOutcome::Stale
                }
            }
            Err(e) => {
                error!("Failed to search conversations: {}", ListError::fetch(e));
                LoadOutcome::Failed
            }
        };
        state.finish_search(&ticket);
        self.publish(&state);
        outcome
    }

    // ===== Mutations =====

    /// Create a conversation, announce it, and reload the list
    pub async fn create(&self, title: &str, category: &str) -> Option<ConversationId> {
        if self.is_torn_down() {
            warn!("{}", ListError::mutation("create", "list is torn down"));
            return None;
        }

        match self.inner.store.create(title, category).await {
            Ok(id) => {
                info!("Created conversation {}", id);
                self.emit(ListEvent::Created(id.clone()));
                self.load_page(true).await;
                Some(id)
            }
            Err(e) => {
                error!("{}", ListError::mutation("create", e));
                None
            }
        }
    }

    /// Rename a conversation and patch the loaded copy in place
    pub async fn rename(&self, id: &ConversationId, title: &str) -> bool {
        if self.is_torn_down() {
            warn!("{}", ListError::mutation("rename", "list is torn down"));
            return false;
        }
        let title = title.trim();
        if title.is_empty() {
            warn!("{}", ListError::mutation("rename", "title is empty"));
            return false;
        }

        match self.inner.store.rename(id, title).await {
            Ok(()) => {
                let mut state = self.inner.state.lock();
                if !state.rename_item(id, title) {
                    debug!("Renamed conversation {} is not loaded", id);
                }
                self.publish(&state);
                true
            }
            Err(e) => {
                error!("{}", ListError::mutation("rename", e));
                false
            }
        }
    }

    /// Delete a conversation and drop it from the loaded list
    pub async fn delete(&self, id: &ConversationId) -> bool {
        if self.is_torn_down() {
            warn!("{}", ListError::mutation("delete", "list is torn down"));
            return false;
        }

        match self.inner.store.delete(id).await {
            Ok(()) => {
                let mut state = self.inner.state.lock();
                state.remove_item(id);
                self.publish(&state);
                true
            }
            Err(e) => {
                error!("{}", ListError::mutation("delete", e));
                false
            }
        }
    }

    // ===== Host events =====

    pub fn select(&self, id: ConversationId) {
        self.emit(ListEvent::Selected(id));
    }

    pub fn close(&self) {
        self.emit(ListEvent::Closed);
    }

    fn emit(&self, event: ListEvent) {
        // No subscribers is fine; the host may not be listening yet.
        let _ = self.inner.events.send(event);
    }

    fn publish(&self, state: &ListState) {
        self.inner.view.send_replace(state.snapshot());
    }
}
