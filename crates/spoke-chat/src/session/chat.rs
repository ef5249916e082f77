//! Async submit path for ChatSession.

use crate::{ChatError, CompletionClient, CompletionRequest, Message};

use super::guard::BusyGuard;
use super::manager::ChatSession;

impl<C: CompletionClient> ChatSession<C> {
    /// Add a user message and get the assistant's reply.
    ///
    /// Empty or whitespace-only input fails with `ChatError::Validation`
    /// before any network call. On dispatch failure the pending user
    /// message is rolled back, so the transcript never holds a user
    /// message without a reply.
    pub async fn submit(&mut self, user_text: impl Into<String>) -> Result<String, ChatError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(ChatError::Validation("message is empty".into()));
        }

        self.transcript.push(Message::user(user_text));
        super::manager::enforce_budget(&mut self.transcript, self.config.context_budget);

        let request = CompletionRequest {
            model: &self.config.model,
            messages: &self.transcript,
            temperature: self.config.temperature,
            max_tokens: self.config.max_reply_tokens,
        };

        match self.dispatcher.dispatch(&request).await {
            Ok(reply) => {
                self.transcript.push(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(error) => {
                // Budget evictions stand; only the failed turn is undone.
                self.transcript.pop();
                Err(error)
            }
        }
    }
}
