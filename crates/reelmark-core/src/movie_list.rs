use reelmark_models::{Movie, MoviePage, Toast};
use reelmark_sources::{SourceError, TmdbApi};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::revalidate::RevalidationCache;
use crate::toast::ToastChannel;

const SEARCH_FAILED: &str = "Failed to search movies";
const POPULAR_FAILED: &str = "Failed to load popular movies";

/// Cache key for one page of popular movies or search results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieListKey {
    pub page: u32,
    pub query: Option<String>,
}

impl MovieListKey {
    /// An empty query means browsing popular movies. Pages start at 1.
    pub fn new(page: u32, query: Option<&str>) -> Self {
        Self {
            page: page.max(1),
            query: query.filter(|q| !q.is_empty()).map(String::from),
        }
    }

    pub fn is_search(&self) -> bool {
        self.query.is_some()
    }

    fn failure_fallback(&self) -> &'static str {
        if self.is_search() {
            SEARCH_FAILED
        } else {
            POPULAR_FAILED
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieListState {
    pub data: Vec<Movie>,
    pub error: Option<SourceError>,
    pub is_loading: bool,
    pub has_more: bool,
}

impl MovieListState {
    fn loading() -> Self {
        Self { is_loading: true, ..Self::default() }
    }

    fn loaded(page: &MoviePage, requested_page: u32) -> Self {
        Self {
            data: page.results.clone(),
            error: None,
            is_loading: false,
            has_more: page.has_more_after(requested_page),
        }
    }

    fn failed(error: SourceError) -> Self {
        Self { error: Some(error), ..Self::default() }
    }
}

/// Toast text for a failed load: the error detail, or `fallback` when it has none
pub(crate) fn failure_message(error: &SourceError, fallback: &str) -> String {
    let detail = error.detail().trim();
    if detail.is_empty() {
        fallback.to_string()
    } else {
        detail.to_string()
    }
}

/// Popular and search listings with a keyed response cache.
///
/// Each `load` publishes a loading state, then the outcome, on a watch
/// channel. Failures surface as one error toast and an empty page; they are
/// never returned as `Err`.
pub struct MovieListResource {
    api: TmdbApi,
    toasts: ToastChannel,
    cache: RevalidationCache<MovieListKey, MoviePage>,
    state: watch::Sender<MovieListState>,
}

impl MovieListResource {
    pub fn new(api: TmdbApi, toasts: ToastChannel) -> Self {
        Self::with_cache(api, toasts, RevalidationCache::new())
    }

    pub fn with_cache(
        api: TmdbApi,
        toasts: ToastChannel,
        cache: RevalidationCache<MovieListKey, MoviePage>,
    ) -> Self {
        let (state, _) = watch::channel(MovieListState::default());
        Self { api, toasts, cache, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieListState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MovieListState {
        self.state.borrow().clone()
    }

    pub async fn load(&self, page: u32, query: Option<&str>) -> MovieListState {
        let key = MovieListKey::new(page, query);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Movie list cache hit for {:?}", key);
            return self.publish(MovieListState::loaded(&cached, key.page));
        }

        self.state.send_replace(MovieListState::loading());

        let result = match &key.query {
            Some(query) => self.api.movie_search(key.page, query).await,
            None => self.api.movie_list(key.page).await,
        };

        let state = match result {
            Ok(movie_page) => {
                let state = MovieListState::loaded(&movie_page, key.page);
                self.cache.insert(key, movie_page);
                state
            }
            Err(error) => {
                warn!("Movie list load failed for {:?}: {}", key, error);
                self.toasts
                    .open_toast(Toast::error(failure_message(&error, key.failure_fallback())));
                MovieListState::failed(error)
            }
        };

        self.publish(state)
    }

    /// Drop one cached page so the next load refetches it
    pub fn invalidate(&self, page: u32, query: Option<&str>) -> bool {
        self.cache.invalidate(&MovieListKey::new(page, query))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn publish(&self, state: MovieListState) -> MovieListState {
        self.state.send_replace(state.clone());
        state
    }
}
