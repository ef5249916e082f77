//! Retry wrapper around the completion call.
//!
//! Isolates the session from transient provider failures: rate limits,
//! timeouts, transport errors, and 5xx responses are retried with a
//! bounded, non-decreasing backoff; everything else propagates at once.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{ChatError, CompletionClient, CompletionRequest};

/// Retry attempt ceiling and backoff bounds.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows failed attempt `attempt`
    /// (1-based). Doubles from the floor, clamped to the cap.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.min_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Dispatches completion requests with bounded retry.
///
/// Holds no conversation state; appending or rolling back transcript
/// entries is the caller's concern.
pub struct RetryingDispatcher<C: CompletionClient> {
    client: C,
    policy: RetryPolicy,
}

impl<C: CompletionClient> RetryingDispatcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Perform the call, retrying transient failures up to the attempt
    /// ceiling. Returns the last observed error once attempts are
    /// exhausted; never a partial response.
    pub async fn dispatch(&self, request: &CompletionRequest<'_>) -> Result<String, ChatError> {
        let mut last_error = None;

        for attempt in 1..=self.policy.max_attempts {
            debug!(attempt, max = self.policy.max_attempts, "dispatching completion request");

            match self.client.complete(request).await {
                Ok(text) => {
                    if attempt > 1 {
                        debug!(attempt, "request succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(error) => {
                    if !error.is_transient() {
                        warn!(%error, "non-retryable provider error");
                        return Err(error);
                    }

                    if attempt < self.policy.max_attempts {
                        let delay = self.policy.delay_for(attempt);
                        warn!(
                            attempt,
                            max = self.policy.max_attempts,
                            delay_secs = delay.as_secs_f64(),
                            %error,
                            "transient failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        warn!(attempts = self.policy.max_attempts, %error, "retry attempts exhausted");
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ChatError::Network("no attempts were made".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Stub backend that plays back a script of results and counts calls.
    struct ScriptedClient {
        script: Mutex<Vec<Result<String, ChatError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<String, ChatError>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, ChatError> {
            *self.calls.lock().unwrap() += 1;
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok("ok".to_string())
            } else {
                script.remove(0)
            }
        }
    }

    fn request_fixture(messages: &[Message]) -> CompletionRequest<'_> {
        CompletionRequest {
            model: "gpt-4",
            messages,
            temperature: 0.7,
            max_tokens: 64,
        }
    }

    #[test]
    fn backoff_is_non_decreasing_and_capped() {
        let policy = RetryPolicy::default();
        let mut previous = Duration::ZERO;
        for attempt in 1..=6 {
            let delay = policy.delay_for(attempt);
            assert!(delay >= previous, "delay shrank at attempt {attempt}");
            assert!(delay <= policy.max_delay);
            previous = delay;
        }
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for(3), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt() {
        let client = ScriptedClient::new(vec![
            Err(ChatError::RateLimited),
            Err(ChatError::Network("reset".into())),
            Ok("hello".to_string()),
        ]);
        let dispatcher = RetryingDispatcher::new(client);

        let messages = [Message::user("hi")];
        let reply = dispatcher.dispatch(&request_fixture(&messages)).await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_three_transient_failures() {
        let client = ScriptedClient::new(vec![
            Err(ChatError::RateLimited),
            Err(ChatError::RateLimited),
            Err(ChatError::RateLimited),
        ]);
        let dispatcher = RetryingDispatcher::new(client);

        let messages = [Message::user("hi")];
        let err = dispatcher.dispatch(&request_fixture(&messages)).await.unwrap_err();
        assert!(matches!(err, ChatError::RateLimited));
        assert_eq!(dispatcher.client.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_error_is_not_retried() {
        let client = ScriptedClient::new(vec![Err(ChatError::Api {
            status: 401,
            message: "invalid key".into(),
        })]);
        let dispatcher = RetryingDispatcher::new(client);

        let start = tokio::time::Instant::now();
        let messages = [Message::user("hi")];
        let err = dispatcher.dispatch(&request_fixture(&messages)).await.unwrap_err();

        assert!(matches!(err, ChatError::Api { status: 401, .. }));
        assert_eq!(dispatcher.client.calls(), 1);
        // No backoff sleep observed under the paused clock.
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
