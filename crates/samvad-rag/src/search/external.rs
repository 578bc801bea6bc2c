//! REST-backed retrieval client.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::RetrievalGateway;

pub struct ExternalRetrieval {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ExternalRetrieval {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(15))
            .timeout(std::time::Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl RetrievalGateway for ExternalRetrieval {
    async fn search(
        &self,
        service_name: &str,
        query: &str,
        columns: &[String],
        limit: usize,
    ) -> Result<Vec<Value>> {
        let endpoint = format!("{}/services/{}/query", self.base_url, service_name);
        let request = json!({
            "query": query,
            "columns": columns,
            "limit": limit,
        });

        tracing::debug!(
            endpoint = %endpoint,
            service = %service_name,
            limit = limit,
            "Sending retrieval request"
        );

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!(
                        "Retrieval request to {} timed out — check network connectivity",
                        endpoint
                    )
                } else if e.is_connect() {
                    anyhow!("Failed to connect to {}: {}", endpoint, e)
                } else {
                    anyhow!("Retrieval request to {} failed: {}", endpoint, e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await?;
            tracing::error!(endpoint = %endpoint, status = %status, error = %error, "Retrieval API returned error");
            return Err(anyhow!("Retrieval API error ({}): {}", status, error));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read retrieval response from {}: {}", endpoint, e))?;

        let trimmed = body.trim_start();
        if trimmed.starts_with('<') || trimmed.starts_with("<!") {
            let preview: String = trimmed.chars().take(200).collect();
            return Err(anyhow!(
                "Endpoint {} returned HTML instead of JSON — the service may be down. Response: {}",
                endpoint,
                preview
            ));
        }

        let result: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(300).collect();
            anyhow!(
                "Failed to parse retrieval response from {}: {}. Body: {}",
                endpoint,
                e,
                preview
            )
        })?;

        Ok(result.results)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Value>,
}
