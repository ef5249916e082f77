//! ChatSession struct and transcript management.

use std::sync::atomic::AtomicBool;

use tracing::debug;

use crate::config::SessionConfig;
use crate::dispatch::{RetryPolicy, RetryingDispatcher};
use crate::{ChatError, CompletionClient, Message};

/// A conversation session with a bounded, ordered transcript.
///
/// The transcript always starts with the system message at index 0; it is
/// set once at construction and never evicted or mutated. Each successful
/// [`submit`](ChatSession::submit) appends one user and one assistant
/// message. The transcript lives in memory only.
pub struct ChatSession<C: CompletionClient> {
    /// Ordered conversation transcript, system message first.
    pub(super) transcript: Vec<Message>,
    pub(super) config: SessionConfig,
    pub(super) dispatcher: RetryingDispatcher<C>,
    /// Whether the session is currently processing a request.
    pub(super) busy: AtomicBool,
}

impl<C: CompletionClient> ChatSession<C> {
    /// Create a session. Fails with `ChatError::Configuration` if any
    /// config field is out of range, before any request is made.
    pub fn new(config: SessionConfig, client: C) -> Result<Self, ChatError> {
        config.validate()?;
        let transcript = vec![Message::system(config.system_prompt.clone())];
        Ok(Self {
            transcript,
            config,
            dispatcher: RetryingDispatcher::new(client),
            busy: AtomicBool::new(false),
        })
    }

    /// Override the retry policy for outbound dispatch.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.dispatcher = self.dispatcher.with_policy(policy);
        self
    }

    /// Read-only snapshot of the transcript. Mutating the returned
    /// vector does not affect the session.
    pub fn history(&self) -> Vec<Message> {
        self.transcript.clone()
    }

    /// Number of messages in the transcript, system message included.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }

    /// Truncate the transcript back to the system message alone.
    pub fn reset(&mut self) {
        self.transcript.truncate(1);
    }

}

/// Combined content length of the transcript, in characters. Used as a
/// deterministic proxy for token count.
pub(super) fn transcript_chars(transcript: &[Message]) -> usize {
    transcript.iter().map(|m| m.content.chars().count()).sum()
}

/// Evict oldest non-system messages until the transcript fits the
/// context budget or only one non-system message remains. The system
/// message at index 0 is never evicted.
///
/// Takes the transcript and budget directly so the submit path can
/// call it while its busy guard borrows the session.
pub(super) fn enforce_budget(transcript: &mut Vec<Message>, budget: usize) {
    while transcript_chars(transcript) > budget && transcript.len() > 2 {
        let evicted = transcript.remove(1);
        debug!(
            role = ?evicted.role,
            chars = evicted.content.chars().count(),
            "evicted oldest message to fit context budget"
        );
    }
}
