//! Colloquy host
//!
//! A headless stand-in for the desktop window: it owns a conversation
//! list, listens for its events, and renders it as text.

pub mod commands;
pub mod format;
pub mod view;

pub use commands::{Command, Input};
pub use view::ConversationListView;
