//! Client for the chat-completion service.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, ServiceKind};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Thin typed wrapper over the `/v1/chat/completions` endpoint.
///
/// No retries and no timeout beyond the HTTP client defaults; failures
/// propagate as `Service` errors carrying the upstream status when one was
/// received.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Send a system/user message pair and return the raw text of the first
    /// choice.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AppError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Completion, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream_status(
                ServiceKind::Completion,
                status.as_u16(),
                body,
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::from_reqwest(ServiceKind::Completion, e))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Service {
                service: ServiceKind::Completion,
                status: Some(status.as_u16()),
                message: "response contained no choices".to_string(),
            })?;

        Ok(content)
    }
}
