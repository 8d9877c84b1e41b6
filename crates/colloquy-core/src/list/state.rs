//! Conversation list state record

use crate::types::*;

/// Claim on a page fetch, handed out by [`ListState::begin_page`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub reset: bool,
    pub offset: usize,
    /// Whether the total count must be fetched before the page
    pub refresh_count: bool,
}

/// Claim on a filtered full fetch, handed out by [`ListState::begin_search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub term: String,
}

/// Working state of one conversation list.
///
/// Every fetch is tagged with the generation current when it started.
/// Resets and searches bump the generation, and results carrying an older
/// generation are dropped on arrival.
#[derive(Debug, Clone)]
pub struct ListState {
    pub items: Vec<Conversation>,
    pub offset: usize,
    pub total_count: usize,
    pub has_more: bool,
    pub mode: ListMode,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub search_term: Option<String>,
    generation: u64,
    torn_down: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            total_count: 0,
            has_more: true,
            mode: ListMode::Paginated,
            is_loading: false,
            is_loading_more: false,
            search_term: None,
            generation: 0,
            torn_down: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Drop everything and refuse further work. Fetches still in flight
    /// come back stale.
    pub fn tear_down(&mut self) {
        self.generation += 1;
        self.torn_down = true;
        self.items.clear();
        self.offset = 0;
        self.total_count = 0;
        self.has_more = false;
        self.mode = ListMode::Paginated;
        self.is_loading = false;
        self.is_loading_more = false;
        self.search_term = None;
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_loading_more
    }

    /// Claim a page fetch, or `None` if the request should be dropped.
    ///
    /// A reset supersedes whatever is in flight. Nothing starts once the
    /// list is torn down.
    pub fn begin_page(&mut self, reset: bool) -> Option<PageTicket> {
        if self.torn_down {
            return None;
        }

        if reset {
            self.generation += 1;
            self.mode = ListMode::Paginated;
            self.search_term = None;
            self.is_loading = true;
            return Some(PageTicket {
                generation: self.generation,
                reset: true,
                offset: 0,
                refresh_count: true,
            });
        }

        if self.is_busy() || !self.has_more {
            return None;
        }

        self.is_loading_more = true;
        Some(PageTicket {
            generation: self.generation,
            reset: false,
            offset: self.offset,
            refresh_count: self.offset == 0,
        })
    }

    /// Merge a fetched page. Returns `false` if the ticket is stale.
    pub fn apply_page(
        &mut self,
        ticket: &PageTicket,
        total: Option<usize>,
        page: Vec<Conversation>,
        page_size: usize,
    ) -> bool {
        if self.torn_down || ticket.generation != self.generation {
            return false;
        }

        if let Some(total) = total {
            self.total_count = total;
        }

        let returned = page.len();
        if ticket.reset {
            self.items = page;
        } else {
            // The window may have shifted under us; keep identities unique.
            for conversation in page {
                if !self.contains(&conversation.id) {
                    self.items.push(conversation);
                }
            }
        }

        self.offset = ticket.offset + returned;
        self.has_more = self.offset < self.total_count && returned == page_size;
        true
    }

    /// Release the loading flag held by `ticket`
    pub fn finish_page(&mut self, ticket: &PageTicket) {
        if ticket.reset {
            if ticket.generation == self.generation {
                self.is_loading = false;
            }
        } else {
            self.is_loading_more = false;
        }
    }

    /// Enter filtered mode for `term`
    pub fn begin_search(&mut self, term: String) -> Option<SearchTicket> {
        if self.torn_down {
            return None;
        }

        self.generation += 1;
        self.mode = ListMode::Filtered;
        self.search_term = Some(term.clone());
        self.has_more = false;
        self.is_loading = true;
        Some(SearchTicket {
            generation: self.generation,
            term,
        })
    }

    /// Replace the items with search matches. Returns `false` if stale.
    pub fn apply_search(&mut self, ticket: &SearchTicket, matches: Vec<Conversation>) -> bool {
        if self.torn_down || ticket.generation != self.generation {
            return false;
        }
        self.items = matches;
        self.has_more = false;
        true
    }

    pub fn finish_search(&mut self, ticket: &SearchTicket) {
        if ticket.generation == self.generation {
            self.is_loading = false;
        }
    }

    /// Whether clearing the search box has anything to undo
    pub fn needs_search_exit(&self) -> bool {
        self.mode == ListMode::Filtered || self.search_term.is_some()
    }

    pub fn contains(&self, id: &ConversationId) -> bool {
        self.items.iter().any(|c| &c.id == id)
    }

    /// Patch a title in place. Returns whether the record was present.
    pub fn rename_item(&mut self, id: &ConversationId, title: &str) -> bool {
        match self.items.iter_mut().find(|c| &c.id == id) {
            Some(conversation) => {
                conversation.title = Some(title.to_string());
                conversation.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }

    /// Drop a deleted record and shrink the total. `offset` is untouched.
    pub fn remove_item(&mut self, id: &ConversationId) -> bool {
        let before = self.items.len();
        self.items.retain(|c| &c.id != id);
        self.total_count = self.total_count.saturating_sub(1);
        self.items.len() != before
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.items.clone(),
            offset: self.offset,
            total_count: self.total_count,
            has_more: self.has_more,
            mode: self.mode,
            is_loading: self.is_loading,
            is_loading_more: self.is_loading_more,
            search_term: self.search_term.clone(),
        }
    }
}
