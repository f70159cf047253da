//! # Ragline Retrieval
//!
//! Turns the top-ranked stored chunks for a user message into an augmented
//! system prompt, and assembles the role-tagged message list for the chat
//! collaborator.
//!
//! Augmentation is strictly best-effort: every failure on the retrieval
//! path (embedding trouble, search trouble, an empty store) degrades to the
//! unmodified base message. The degradation is a typed, testable branch,
//! [`AugmentedPrompt::Fallback`] with a [`FallbackReason`], rather than a
//! silent catch-all, and it never blocks a chat turn.

mod context;
mod messages;

pub use context::{AugmentedPrompt, ContextBuilder, FallbackReason, RetrievalConfig};
pub use messages::{build_messages, ChatMessage, Role};
