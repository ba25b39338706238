use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::url::redact_api_key;

/// Retrieves one URL and decodes its body as JSON.
///
/// No retries and no caching happen at this level.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, SourceError>;
}

#[async_trait]
impl<T: JsonFetcher + ?Sized> JsonFetcher for Arc<T> {
    async fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
        (**self).fetch_json(url).await
    }
}

/// Fetch every URL concurrently and return the bodies in input order.
///
/// An empty list resolves immediately without touching the network. The first
/// failing request fails the whole group and the other results are dropped.
pub async fn fetch_all<F>(fetcher: &F, urls: &[String]) -> Result<Vec<Value>, SourceError>
where
    F: JsonFetcher + ?Sized,
{
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    try_join_all(urls.iter().map(|url| fetcher.fetch_json(url))).await
}

/// `JsonFetcher` over a shared reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client: Arc::new(client) }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
        debug!(url = %redact_api_key(url), "GET");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = status_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            warn!(status = status.as_u16(), url = %redact_api_key(url), "Request failed: {}", message);
            return Err(SourceError::Status { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

/// TMDB error bodies look like `{"success": false, "status_code": 7, "status_message": "..."}`.
fn status_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("status_message")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}
