use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The upstream imposes no bound of its own, so cap the outbound call here.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sampling settings for itinerary generation: structured output, so keep
/// the temperature moderate and leave room for a full multi-day plan.
pub const ITINERARY_GENERATION: GenerationParams = GenerationParams {
    max_tokens: 2000,
    temperature: 0.7,
};

/// Sampling settings for the chatbot: shorter replies, more creative.
pub const CHAT_GENERATION: GenerationParams = GenerationParams {
    max_tokens: 800,
    temperature: 0.8,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("OpenAI API error: {message}")]
    Api { status: u16, message: String },
    #[error("OpenAI request failed: {0}")]
    Request(String),
    #[error("OpenAI response contained no completion choices")]
    EmptyResponse,
}

/// The single outbound dependency of both handlers. Implemented by
/// [`OpenAiClient`] in production and by a scripted mock in tests.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// One chat-completion round trip: the full message sequence in, the
    /// first choice's text out. No retries, no streaming.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<String, GatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

#[async_trait]
impl CompletionGateway for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        params: GenerationParams,
    ) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            max_tokens = params.max_tokens,
            "calling chat completion API"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Request(format!(
                        "timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    ))
                } else {
                    GatewayError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Request(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            tracing::error!(status = %status, message = %message, "chat completion API error");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Request(format!("failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }
}

/// Pull the human-readable message out of an OpenAI error body
/// (`{"error": {"message": ...}}`), falling back to a generic description.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> OpenAiClient {
        OpenAiClient::with_base_url("test-key".to_string(), server.url())
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "Visit Hundru Falls."}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reply = client_for(&server)
            .complete(
                vec![ChatMessage::user("What should I see?")],
                CHAT_GENERATION,
            )
            .await
            .unwrap();

        assert_eq!(reply, "Visit Hundru Falls.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_surfaces_upstream_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(json!({"error": {"message": "Incorrect API key provided"}}).to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .complete(vec![ChatMessage::user("hi")], CHAT_GENERATION)
            .await
            .unwrap_err();

        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_generic_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .complete(vec![ChatMessage::user("hi")], CHAT_GENERATION)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unknown error"), "got: {}", err);
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .complete(vec![ChatMessage::user("hi")], CHAT_GENERATION)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::EmptyResponse));
    }

    #[test]
    fn extract_error_message_handles_both_shapes() {
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "quota exceeded"}}"#),
            "quota exceeded"
        );
        assert_eq!(extract_error_message("not json at all"), "Unknown error");
        assert_eq!(extract_error_message(r#"{"error": "bare"}"#), "Unknown error");
    }
}
