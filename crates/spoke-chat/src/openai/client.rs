//! OpenAI API client struct, request building, and response parsing.

use crate::{ChatError, CompletionRequest, Role};

pub(crate) const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI API client.
pub struct OpenAiClient {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_string(),
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Override the API base URL (alternate hosts, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body for the Chat Completions API.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest<'_>) -> serde_json::Value {
        let msgs: Vec<_> = request
            .messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                serde_json::json!({
                    "role": role,
                    "content": msg.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": request.model,
            "messages": msgs,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    /// Extract the assistant text from a completion response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, ChatError> {
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ChatError::Parse("no message content in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn request_body_carries_all_fields() {
        let client = OpenAiClient::new("sk-test");
        let messages = vec![
            Message::system("You sell bicycles."),
            Message::user("Any road bikes under $500?"),
        ];
        let body = client.build_request_body(&CompletionRequest {
            model: "gpt-4",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 256,
        });

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Any road bikes under $500?");
    }

    #[test]
    fn parse_extracts_first_choice() {
        let client = OpenAiClient::new("sk-test");
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "We have three models." } }
            ]
        });
        assert_eq!(client.parse_response(json).unwrap(), "We have three models.");
    }

    #[test]
    fn parse_rejects_missing_content() {
        let client = OpenAiClient::new("sk-test");
        let err = client
            .parse_response(serde_json::json!({ "choices": [] }))
            .unwrap_err();
        assert!(matches!(err, ChatError::Parse(_)));
    }

    #[test]
    fn base_url_override_shapes_endpoint() {
        let client = OpenAiClient::new("sk-test").with_base_url("http://127.0.0.1:8080/v1/");
        assert_eq!(
            client.completions_url(),
            "http://127.0.0.1:8080/v1/chat/completions"
        );
    }
}
