use std::time::Duration;

use arena_config::TranslationConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ArenaError, Result};
use crate::storage::http::truncate_body;

/// A single-shot chat completion.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Client for any endpoint that speaks the OpenAI chat completions API.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ArenaError::Translation(
                "LLM API key cannot be empty".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ArenaError::Translation(format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            temperature,
        })
    }

    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ArenaError::Translation("LLM API key is not configured".to_string())
        })?;
        Self::new(
            config.endpoint.clone(),
            api_key,
            config.model.clone(),
            config.temperature,
            config.timeout(),
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ArenaError::Translation(format!("LLM request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, model = %self.model, "LLM endpoint returned an error");
            return Err(ArenaError::Translation(format!(
                "LLM endpoint returned {status}: {}",
                truncate_body(&body)
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ArenaError::Translation(format!("malformed LLM response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ArenaError::Translation("LLM response had no content".to_string())
            })?;

        debug!(model = %self.model, chars = content.len(), "LLM completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn client(endpoint: String) -> OpenAiCompatibleClient {
        OpenAiCompatibleClient::new(
            endpoint,
            "sk-test",
            "test-model",
            0.2,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_chat_request_and_returns_content() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(
                    headers.get("authorization").unwrap().to_str().unwrap(),
                    "Bearer sk-test"
                );
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["response_format"]["type"], "json_object");
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "traducí esto");
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "{\"en\":{}}" } }]
                }))
            }),
        );
        let endpoint = serve(router).await;

        let reply = client(endpoint)
            .complete("be a translator", "traducí esto")
            .await
            .unwrap();
        assert_eq!(reply, "{\"en\":{}}");
    }

    #[tokio::test]
    async fn non_success_status_is_a_translation_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let endpoint = serve(router).await;

        let err = client(endpoint).complete("s", "u").await.unwrap_err();
        assert!(
            matches!(&err, ArenaError::Translation(msg) if msg.contains("429") && msg.contains("rate limited")),
            "{err}"
        );
    }

    #[tokio::test]
    async fn empty_choices_are_rejected() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let endpoint = serve(router).await;

        let err = client(endpoint).complete("s", "u").await.unwrap_err();
        assert!(matches!(err, ArenaError::Translation(_)));
    }

    #[test]
    fn requires_api_key() {
        let result = OpenAiCompatibleClient::new(
            "http://localhost",
            "  ",
            "m",
            0.0,
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(ArenaError::Translation(_))));
    }
}
