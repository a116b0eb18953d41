//! Conversation domain.
//!
//! - [`entities::Message`] — one role-tagged transcript entry
//! - [`conversation::Conversation`] — the transcript with its trimming policy
//! - [`response::AssistantReply`] — a normalized completion reply

pub mod conversation;
pub mod entities;
pub mod response;
