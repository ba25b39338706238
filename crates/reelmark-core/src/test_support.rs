use async_trait::async_trait;
use reelmark_sources::{ApiUrlBuilder, JsonFetcher, SourceError, TmdbApi};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Answers by URL path suffix, records every request, and can hold requests
/// until permits are released.
pub struct StubFetcher {
    routes: Mutex<Vec<(String, Result<Value, SourceError>)>>,
    requested: Mutex<Vec<String>>,
    gate: Option<Semaphore>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            requested: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated() -> Self {
        Self { gate: Some(Semaphore::new(0)), ..Self::new() }
    }

    pub fn route(self, suffix: &str, result: Result<Value, SourceError>) -> Self {
        self.routes.lock().unwrap().push((suffix.to_string(), result));
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonFetcher for StubFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
        self.requested.lock().unwrap().push(url.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let path = url.split('?').next().unwrap_or_default();
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Err(SourceError::Status { status: 404, message: "not found".to_string() }))
    }
}

pub fn api(fetcher: Arc<StubFetcher>) -> TmdbApi {
    let urls = ApiUrlBuilder::new("https://api.themoviedb.org/3", "test-key", "zh-TW").unwrap();
    TmdbApi::new(urls, fetcher)
}
