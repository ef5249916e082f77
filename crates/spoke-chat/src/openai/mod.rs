//! OpenAI chat-completion API client.
//!
//! Implements the `CompletionClient` trait via the Chat Completions API
//! (https://api.openai.com/v1/chat/completions). The rest of the crate
//! only sees the trait, so provider or API-version changes stay inside
//! this module.

mod api;
mod client;

pub use client::OpenAiClient;
