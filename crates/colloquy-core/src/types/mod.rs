//! Core type definitions for Colloquy
//!
//! Conversation records as returned by the store, and the view-model
//! types the conversation list hands to its host.

mod conversation_types;
mod list_types;

pub use conversation_types::*;
pub use list_types::*;
