//! REST-backed completion client.
//!
//! Speaks the common chat-completions wire shape: POST `{model, messages}`
//! with bearer auth, read `choices[0].message.content`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ChatMessage, CompletionGateway};

pub struct ExternalCompletion {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl ExternalCompletion {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(15))
            .timeout(std::time::Duration::from_secs(300))
            .tcp_nodelay(true)
            .build()?;

        let endpoint = endpoint.into();
        tracing::info!(endpoint = %endpoint, "Creating external completion client (connect_timeout=15s)");

        Ok(Self {
            endpoint,
            api_key: api_key.into(),
            client,
        })
    }

    /// Parse a response body as JSON, returning a clear error if the server
    /// returned HTML (e.g. a gateway error page) instead of valid JSON.
    async fn parse_json_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &str,
    ) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body from {}: {}", endpoint, e))?;

        let trimmed = body.trim_start();
        if trimmed.starts_with('<') || trimmed.starts_with("<!") {
            let preview: String = trimmed.chars().take(200).collect();
            return Err(anyhow!(
                "Endpoint {} returned HTML instead of JSON (HTTP {}) — the service may be down or misconfigured. Response: {}",
                endpoint, status, preview
            ));
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let preview: String = body.chars().take(300).collect();
            anyhow!(
                "Failed to parse JSON from {} (HTTP {}): {}. Response body: {}",
                endpoint,
                status,
                e,
                preview
            )
        })
    }
}

#[async_trait]
impl CompletionGateway for ExternalCompletion {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let request = json!({
            "model": model,
            "messages": messages,
        });

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %model,
            message_count = messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!(
                        "Completion request to {} timed out — check network connectivity",
                        self.endpoint
                    )
                } else if e.is_connect() {
                    anyhow!(
                        "Failed to connect to {} — check network/firewall/proxy settings: {}",
                        self.endpoint,
                        e
                    )
                } else {
                    anyhow!("Completion request to {} failed: {}", self.endpoint, e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await?;
            tracing::error!(endpoint = %self.endpoint, status = %status, error = %error, "Completion API returned error");
            return Err(anyhow!("Completion API error ({}): {}", status, error));
        }

        let result: CompletionResponse =
            Self::parse_json_response(response, &self.endpoint).await?;

        if result.choices.is_empty() {
            return Err(anyhow!("No choices returned from completion API"));
        }

        Ok(result.choices[0].message.content.clone())
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}
