//! Text rendering of the conversation list

use crate::commands::Command;
use crate::format::{display_title, relative_time, truncate};
use chrono::{DateTime, Utc};
use colloquy_core::{
    ConversationId, ConversationList, ListEvent, ListMode, ListSnapshot, ScrollPosition,
};
use tracing::{debug, info};

/// Virtual row height used to turn rows into scroll metrics
pub const ROW_HEIGHT: f64 = 32.0;
/// Rows visible at once
pub const VIEWPORT_ROWS: usize = 12;
const TITLE_WIDTH: usize = 40;

/// Host side of the conversation list: tracks selection and renders rows
pub struct ConversationListView {
    list: ConversationList,
    selected: Option<ConversationId>,
    closed: bool,
}

impl ConversationListView {
    pub fn new(list: ConversationList) -> Self {
        Self {
            list,
            selected: None,
            closed: false,
        }
    }

    pub fn list(&self) -> &ConversationList {
        &self.list
    }

    pub fn selected(&self) -> Option<&ConversationId> {
        self.selected.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn handle_event(&mut self, event: ListEvent) {
        match event {
            ListEvent::Selected(id) | ListEvent::Created(id) => {
                info!("Opening conversation {}", id);
                self.selected = Some(id);
            }
            ListEvent::Closed => {
                self.closed = true;
            }
        }
    }

    /// Scroll metrics for a viewport resting at the bottom of `snapshot`
    pub fn bottom_position(snapshot: &ListSnapshot) -> ScrollPosition {
        let scroll_height = snapshot.items.len() as f64 * ROW_HEIGHT;
        let client_height = scroll_height.min(VIEWPORT_ROWS as f64 * ROW_HEIGHT);
        ScrollPosition::new(scroll_height - client_height, client_height, scroll_height)
    }

    /// Apply one command to the list. Returns text to show, if any.
    pub async fn execute(&mut self, command: Command) -> Option<String> {
        debug!("Executing {:?}", command);
        match command {
            Command::Down => {
                let position = Self::bottom_position(&self.list.snapshot());
                if let Some(handle) = self.list.on_scroll(position) {
                    // The watch channel reports the result; only wait so
                    // that commands stay ordered.
                    let _ = handle.await;
                }
                None
            }
            Command::Scroll(position) => {
                if let Some(handle) = self.list.on_scroll(position) {
                    let _ = handle.await;
                }
                None
            }
            Command::Search(query) => {
                self.list.on_search_input(query);
                None
            }
            Command::New { category, title } => match self.list.create(&title, &category).await {
                Some(id) => Some(format!("created {id}")),
                None => Some("could not create conversation".to_string()),
            },
            Command::Rename { id, title } => {
                (!self.list.rename(&id, &title).await).then(|| format!("could not rename {id}"))
            }
            Command::Delete(id) => {
                let deleted = self.list.delete(&id).await;
                if deleted && self.selected.as_ref() == Some(&id) {
                    self.selected = None;
                }
                (!deleted).then(|| format!("could not delete {id}"))
            }
            Command::Select(id) => {
                self.list.select(id);
                None
            }
            Command::Reload => {
                self.list.reload().await;
                None
            }
            Command::List => Some(self.render(&self.list.snapshot(), Utc::now()).join("\n")),
            Command::Quit => {
                self.list.close();
                None
            }
            Command::Help => Some(crate::commands::HELP.to_string()),
        }
    }

    /// One line per conversation followed by a status line
    pub fn render(&self, snapshot: &ListSnapshot, now: DateTime<Utc>) -> Vec<String> {
        let mut lines: Vec<String> = snapshot
            .items
            .iter()
            .map(|c| {
                let marker = if self.selected.as_ref() == Some(&c.id) {
                    '>'
                } else {
                    ' '
                };
                format!(
                    "{marker} {:<width$}  {:>10}  {}",
                    truncate(display_title(c), TITLE_WIDTH),
                    relative_time(c.updated_at, now),
                    c.id,
                    width = TITLE_WIDTH,
                )
            })
            .collect();

        lines.push(status_line(snapshot));
        lines
    }
}

fn status_line(snapshot: &ListSnapshot) -> String {
    if snapshot.is_loading {
        return "Loading…".to_string();
    }
    if snapshot.is_loading_more {
        return "Loading more…".to_string();
    }
    match (snapshot.mode, snapshot.is_empty()) {
        (ListMode::Filtered, true) => "No matches".to_string(),
        (ListMode::Filtered, false) => format!(
            "{} matches for {:?}",
            snapshot.items.len(),
            snapshot.search_term.as_deref().unwrap_or_default()
        ),
        (ListMode::Paginated, true) => "No conversations".to_string(),
        (ListMode::Paginated, false) => {
            format!("{} of {} loaded", snapshot.items.len(), snapshot.total_count)
        }
    }
}
