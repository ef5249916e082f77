//! Session configuration.

use std::fmt;

use crate::ChatError;

pub(crate) const DEFAULT_MODEL: &str = "gpt-4";
pub(crate) const DEFAULT_TEMPERATURE: f64 = 0.7;
pub(crate) const DEFAULT_MAX_REPLY_TOKENS: u32 = 1024;
pub(crate) const DEFAULT_CONTEXT_BUDGET: usize = 16_000;

/// Immutable configuration for a [`ChatSession`](crate::ChatSession).
///
/// Built once, validated at session construction. The credential is
/// resolved either explicitly or from `OPENAI_API_KEY`; a missing
/// credential is a construction-time error, never a runtime surprise.
#[derive(Clone)]
pub struct SessionConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_reply_tokens: u32,
    /// Maximum combined transcript content length, in characters, before
    /// the oldest non-system messages are evicted.
    pub context_budget: usize,
    pub system_prompt: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_reply_tokens", &self.max_reply_tokens)
            .field("context_budget", &self.context_budget)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(api_key: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_reply_tokens: DEFAULT_MAX_REPLY_TOKENS,
            context_budget: DEFAULT_CONTEXT_BUDGET,
            system_prompt: system_prompt.into(),
        }
    }

    /// Create a config with the credential taken from `OPENAI_API_KEY`.
    pub fn from_env(system_prompt: impl Into<String>) -> Result<Self, ChatError> {
        Self::from_env_var("OPENAI_API_KEY", system_prompt)
    }

    /// Create a config with the credential taken from a named
    /// environment variable.
    pub fn from_env_var(
        var: &str,
        system_prompt: impl Into<String>,
    ) -> Result<Self, ChatError> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key, system_prompt)),
            _ => Err(ChatError::Configuration(format!(
                "OpenAI API not configured. Set {var}."
            ))),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_reply_tokens(mut self, max_reply_tokens: u32) -> Self {
        self.max_reply_tokens = max_reply_tokens;
        self
    }

    pub fn with_context_budget(mut self, context_budget: usize) -> Self {
        self.context_budget = context_budget;
        self
    }

    /// Check every field against its valid range. Called once at session
    /// construction so misconfiguration fails before the first request.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.api_key.trim().is_empty() {
            return Err(ChatError::Configuration("API key is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ChatError::Configuration("model identifier is empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatError::Configuration(format!(
                "temperature {} out of range [0, 2]",
                self.temperature
            )));
        }
        if self.max_reply_tokens == 0 {
            return Err(ChatError::Configuration("max_reply_tokens must be > 0".into()));
        }
        if self.context_budget == 0 {
            return Err(ChatError::Configuration("context_budget must be > 0".into()));
        }
        if self.system_prompt.trim().is_empty() {
            return Err(ChatError::Configuration("system prompt is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SessionConfig {
        SessionConfig::new("sk-test", "You are a helpful assistant.")
    }

    #[test]
    fn defaults_validate() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn temperature_range_enforced() {
        assert!(valid().with_temperature(0.0).validate().is_ok());
        assert!(valid().with_temperature(2.0).validate().is_ok());
        assert!(valid().with_temperature(-0.1).validate().is_err());
        assert!(valid().with_temperature(2.1).validate().is_err());
    }

    #[test]
    fn zero_limits_rejected() {
        assert!(valid().with_max_reply_tokens(0).validate().is_err());
        assert!(valid().with_context_budget(0).validate().is_err());
    }

    #[test]
    fn empty_credential_rejected() {
        let err = SessionConfig::new("  ", "prompt").validate().unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn missing_credential_var_is_configuration_error() {
        // Variable name nothing else in the process uses, so the test
        // never touches shared environment state.
        let err = SessionConfig::from_env_var("SPOKE_TEST_ABSENT_KEY", "prompt").unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn credential_resolved_from_named_var() {
        std::env::set_var("SPOKE_TEST_PRESENT_KEY", "sk-from-env");
        let config = SessionConfig::from_env_var("SPOKE_TEST_PRESENT_KEY", "prompt").unwrap();
        assert_eq!(config.api_key, "sk-from-env");
    }

    #[test]
    fn debug_redacts_api_key() {
        let out = format!("{:?}", valid());
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("sk-test"));
    }
}
