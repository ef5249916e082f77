//! Conversation session management.
//!
//! A `ChatSession` owns the ordered transcript, keeps it under the
//! configured context budget, and produces the next assistant reply
//! through the retrying dispatcher.

mod chat;
mod guard;
mod manager;

pub use manager::ChatSession;
