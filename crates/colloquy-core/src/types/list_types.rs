//! Conversation list view-model types

use super::{Conversation, ConversationId};
use serde::{Deserialize, Serialize};

/// How the list is currently populated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Pages are fetched incrementally as the user scrolls
    #[default]
    Paginated,
    /// The full set was fetched once and filtered by the search term
    Filtered,
}

/// Scroll metrics reported by the rendering side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Fraction of the content that has been scrolled into view.
    ///
    /// `None` when there is nothing to scroll.
    pub fn fraction(&self) -> Option<f64> {
        if self.scroll_height <= 0.0 || !self.scroll_height.is_finite() {
            return None;
        }
        let fraction = (self.scroll_top + self.client_height) / self.scroll_height;
        fraction.is_finite().then_some(fraction)
    }
}

/// Events emitted to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// A conversation was picked
    Selected(ConversationId),
    /// A conversation was created and the list reloaded
    Created(ConversationId),
    /// The list asked to be closed
    Closed,
}

/// Render-relevant copy of the list state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub items: Vec<Conversation>,
    pub offset: usize,
    pub total_count: usize,
    pub has_more: bool,
    pub mode: ListMode,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub search_term: Option<String>,
}

impl ListSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_fraction() {
        let pos = ScrollPosition::new(700.0, 200.0, 1000.0);
        assert_eq!(pos.fraction(), Some(0.9));
    }

    #[test]
    fn test_scroll_fraction_without_content() {
        assert_eq!(ScrollPosition::new(0.0, 200.0, 0.0).fraction(), None);
        assert_eq!(ScrollPosition::new(0.0, 200.0, f64::NAN).fraction(), None);
    }

    #[test]
    fn test_scroll_fraction_rejects_non_finite_metrics() {
        assert_eq!(ScrollPosition::new(f64::NAN, 100.0, 1000.0).fraction(), None);
        assert_eq!(ScrollPosition::new(0.0, f64::INFINITY, 1000.0).fraction(), None);
        assert_eq!(ScrollPosition::new(0.0, 100.0, f64::INFINITY).fraction(), None);
    }
}
