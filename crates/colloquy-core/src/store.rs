//! Record store abstraction used by the conversation list
//!
//! `ConversationStore` is the seam between the list and wherever the
//! conversations actually live. `SqliteConversationStore` is the
//! production implementation over [`Storage`].

use crate::error::{Error, Result, StoreError};
use crate::storage::{self, Storage};
use crate::types::{Conversation, ConversationId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

/// Operations the conversation list needs from a record store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Number of visible conversations
    async fn count(&self) -> Result<usize>;

    /// At most `limit` conversations starting at `offset`
    async fn list_paged(&self, limit: usize, offset: usize) -> Result<Vec<Conversation>>;

    /// Every visible conversation
    async fn list_all(&self) -> Result<Vec<Conversation>>;

    /// Create a conversation and return its id
    async fn create(&self, title: &str, category: &str) -> Result<ConversationId>;

    async fn rename(&self, id: &ConversationId, title: &str) -> Result<()>;

    async fn delete(&self, id: &ConversationId) -> Result<()>;
}

/// SQLite-backed conversation store
#[derive(Clone)]
pub struct SqliteConversationStore {
    storage: Arc<Storage>,
}

impl SqliteConversationStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Run a query on the blocking pool with a pooled connection
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || {
            let conn = storage.connection()?;
            f(&conn)
        })
        .await
        .map_err(|e| Error::Store(StoreError::TaskJoin(e.to_string())))?
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn count(&self) -> Result<usize> {
        self.with_connection(storage::count_conversations).await
    }

    async fn list_paged(&self, limit: usize, offset: usize) -> Result<Vec<Conversation>> {
        debug!("Listing conversations: limit={} offset={}", limit, offset);
        self.with_connection(move |conn| storage::list_conversations(conn, limit, offset))
            .await
    }

    async fn list_all(&self) -> Result<Vec<Conversation>> {
        self.with_connection(storage::list_all_conversations).await
    }

    async fn create(&self, title: &str, category: &str) -> Result<ConversationId> {
        let conversation = Conversation::new(title, category);
        let id = conversation.id.clone();
        info!("Creating conversation {} ({})", id, conversation.category);

        self.with_connection(move |conn| storage::insert_conversation(conn, &conversation))
            .await?;
        Ok(id)
    }

    async fn rename(&self, id: &ConversationId, title: &str) -> Result<()> {
        let id = id.clone();
        let title = title.to_string();
        self.with_connection(move |conn| storage::update_conversation_title(conn, &id, &title))
            .await
    }

    async fn delete(&self, id: &ConversationId) -> Result<()> {
        let id = id.clone();
        info!("Deleting conversation {}", id);
        self.with_connection(move |conn| storage::delete_conversation(conn, &id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteConversationStore {
        SqliteConversationStore::new(Arc::new(Storage::in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = store();

        let first = store.create("First", "chat").await.unwrap();
        let second = store.create("Second", "chat").await.unwrap();
        store.create("child", "subagent").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);

        let ids: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert!(ids.contains(&first));
        assert!(ids.contains(&second));
    }

    #[tokio::test]
    async fn test_paging_respects_limit() {
        let store = store();
        for i in 0..5 {
            store.create(&format!("c{i}"), "chat").await.unwrap();
        }

        assert_eq!(store.list_paged(2, 0).await.unwrap().len(), 2);
        assert_eq!(store.list_paged(2, 4).await.unwrap().len(), 1);
        assert!(store.list_paged(2, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_and_delete() {
        let store = store();
        let id = store.create("Old", "chat").await.unwrap();

        store.rename(&id, "New").await.unwrap();
        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].title.as_deref(), Some("New"));

        store.delete(&id).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.delete(&id).await.is_err());
    }
}
