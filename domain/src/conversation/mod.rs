//! Conversation domain.
//!
//! - [`entities::Message`] - a single message sent to the model
//! - [`entities::ConversationHistory`] - bounded user/assistant history

pub mod entities;
