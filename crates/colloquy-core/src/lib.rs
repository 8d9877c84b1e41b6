//! Colloquy Core Library
//!
//! This crate provides the core functionality behind the Colloquy
//! conversation sidebar:
//! - Conversation records and list view-model types
//! - SQLite-based persistence
//! - The record store seam used by the list
//! - The paginated, searchable conversation list
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     colloquy-core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  list/         - Paginated list, search debounce            │
//! │  store.rs      - ConversationStore trait + SQLite impl      │
//! │  storage/      - SQLite database, queries                   │
//! │  config.rs     - List tuning, persisted as a setting        │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod list;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ListError, Result, StoreError};
pub use types::*;

pub use config::ListConfig;
pub use list::{ConversationList, Debouncer, ListState, LoadOutcome};
pub use storage::Storage;
pub use store::{ConversationStore, SqliteConversationStore};
