use anyhow::{Context as _, Result};
use reelmark_config::{Config, PathManager};
use reelmark_sources::{image_url, ApiUrlBuilder, HttpFetcher, ImageFallback, ImageSize, JsonFetcher, TmdbApi};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::movie_detail::MovieDetailResource;
use crate::movie_list::MovieListResource;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::toast::ToastChannel;
use crate::watchlist::Watchlist;

/// Everything a front end needs, built once at startup and passed around
/// explicitly.
pub struct AppContext {
    pub api: TmdbApi,
    pub toasts: ToastChannel,
    pub watchlist: Watchlist,
    pub movie_list: MovieListResource,
    pub movie_detail: MovieDetailResource,
    image_base_url: String,
}

impl AppContext {
    pub fn new(api: TmdbApi, store: Arc<dyn KeyValueStore>, toasts: ToastChannel, image_base_url: &str) -> Self {
        Self {
            movie_list: MovieListResource::new(api.clone(), toasts.clone()),
            movie_detail: MovieDetailResource::new(api.clone(), toasts.clone()),
            watchlist: Watchlist::new(store),
            api,
            toasts,
            image_base_url: image_base_url.to_string(),
        }
    }

    /// Validate `config` and wire the HTTP fetcher plus the configured store.
    ///
    /// A missing API key or a malformed base URL fails here, before any request.
    pub fn from_config(config: &Config, paths: &PathManager, ephemeral: bool) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if ephemeral {
            debug!("Using in-memory storage");
            Arc::new(MemoryStore::new())
        } else {
            let dir = config.storage.dir.clone().unwrap_or_else(|| paths.storage_dir());
            debug!("Using storage directory {:?}", dir);
            Arc::new(JsonFileStore::new(dir))
        };

        Self::with_parts(config, Arc::new(HttpFetcher::new()), store)
    }

    pub fn with_parts(config: &Config, fetcher: Arc<dyn JsonFetcher>, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let urls = ApiUrlBuilder::new(&config.tmdb.api_base_url, &config.tmdb.api_key, &config.tmdb.language)?;
        let toasts = ToastChannel::new(Duration::from_secs(config.toast.ttl_seconds));
        info!("Using TMDB API at {} (language {})", config.tmdb.api_base_url, urls.language());

        Ok(Self::new(TmdbApi::new(urls, fetcher), store, toasts, &config.tmdb.image_base_url))
    }

    pub fn image_url(&self, path: Option<&str>, size: ImageSize, fallback: ImageFallback) -> String {
        image_url(&self.image_base_url, path, size, fallback)
    }
}
