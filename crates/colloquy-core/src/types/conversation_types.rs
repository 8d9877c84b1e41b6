//! Conversation record types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of internal child conversations spawned by an agent. These
/// are never shown in the conversation list.
pub const SUBAGENT_CATEGORY: &str = "subagent";

/// Unique identifier for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stored conversation as shown in the sidebar list.
///
/// Identity is `id`. Two conversations with the same id are the same
/// record even if their titles differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub title: Option<String>,
    pub category: String,
    pub summary: Option<String>,
    pub model_name: Option<String>,
    pub total_messages: u32,
    pub is_archived: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Conversation {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        let title = title.into();
        Self {
            id: ConversationId::generate(),
            title: if title.trim().is_empty() {
                None
            } else {
                Some(title)
            },
            category: category.into(),
            summary: None,
            model_name: None,
            total_messages: 0,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Case-insensitive substring match against title and summary.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |field: &Option<String>| {
            field
                .as_deref()
                .map(|v| v.to_lowercase().contains(needle))
                .unwrap_or(false)
        };
        hit(&self.title) || hit(&self.summary)
    }
}

/// Keep the conversations matching `query`, preserving their order.
pub fn filter_conversations(all: Vec<Conversation>, query: &str) -> Vec<Conversation> {
    let needle = query.trim().to_lowercase();
    all.into_iter().filter(|c| c.matches(&needle)).collect()
}
