//! Conversation list configuration

use crate::error::Result;
use crate::storage::{get_setting, set_setting, Storage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Settings key the list configuration is stored under
pub const LIST_CONFIG_KEY: &str = "conversation_list";

/// Tuning knobs for the conversation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListConfig {
    /// Records fetched per page
    pub page_size: usize,
    /// Quiet period after the last keystroke before a search runs
    pub search_debounce_ms: u64,
    /// Scroll fraction past which the next page is requested
    pub scroll_threshold: f64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_debounce_ms: 300,
            scroll_threshold: 0.8,
        }
    }
}

impl ListConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Clamp values into their usable ranges
    pub fn validated(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        if !(self.scroll_threshold > 0.0 && self.scroll_threshold <= 1.0) {
            self.scroll_threshold = Self::default().scroll_threshold;
        }
        self
    }

    /// Load the persisted configuration, falling back to defaults
    pub fn load(storage: &Storage) -> Result<Self> {
        let conn = storage.connection()?;
        let config = match get_setting(&conn, LIST_CONFIG_KEY)? {
            Some(raw) => serde_json::from_str::<ListConfig>(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed {} setting: {}", LIST_CONFIG_KEY, e);
                Self::default()
            }),
            None => Self::default(),
        };
        Ok(config.validated())
    }

    /// Persist this configuration
    pub fn save(&self, storage: &Storage) -> Result<()> {
        let conn = storage.connection()?;
        set_setting(&conn, LIST_CONFIG_KEY, &serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ListConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.scroll_threshold, 0.8);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ListConfig = serde_json::from_str(r#"{"pageSize": 50}"#).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn test_validated_clamps() {
        let config = ListConfig {
            page_size: 0,
            search_debounce_ms: 0,
            scroll_threshold: 1.5,
        }
        .validated();

        assert_eq!(config.page_size, 1);
        assert_eq!(config.scroll_threshold, 0.8);
    }

    #[test]
    fn test_load_and_save() {
        let storage = Storage::in_memory().unwrap();
        assert_eq!(ListConfig::load(&storage).unwrap(), ListConfig::default());

        let custom = ListConfig {
            page_size: 5,
            ..Default::default()
        };
        custom.save(&storage).unwrap();

        assert_eq!(ListConfig::load(&storage).unwrap(), custom);
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let storage = Storage::in_memory().unwrap();
        let conn = storage.connection().unwrap();
        set_setting(&conn, LIST_CONFIG_KEY, "not json").unwrap();
        drop(conn);

        assert_eq!(ListConfig::load(&storage).unwrap(), ListConfig::default());
    }
}
