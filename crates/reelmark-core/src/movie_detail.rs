use reelmark_models::{AllMovieDetail, Toast};
use reelmark_sources::{SourceError, TmdbApi};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::movie_list::failure_message;
use crate::revalidate::RevalidationCache;
use crate::toast::ToastChannel;

const DETAIL_FAILED: &str = "Failed to load movie details";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDetailState {
    pub data: Option<AllMovieDetail>,
    pub error: Option<SourceError>,
    pub is_loading: bool,
}

/// Detail, credits and videos for one movie, fetched together and cached by id.
pub struct MovieDetailResource {
    api: TmdbApi,
    toasts: ToastChannel,
    cache: RevalidationCache<u64, AllMovieDetail>,
    state: watch::Sender<MovieDetailState>,
}

impl MovieDetailResource {
    pub fn new(api: TmdbApi, toasts: ToastChannel) -> Self {
        let (state, _) = watch::channel(MovieDetailState::default());
        Self {
            api,
            toasts,
            cache: RevalidationCache::new(),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieDetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MovieDetailState {
        self.state.borrow().clone()
    }

    pub async fn load(&self, id: u64) -> MovieDetailState {
        if let Some(cached) = self.cache.get(&id) {
            debug!("Movie detail cache hit for {}", id);
            return self.publish(MovieDetailState { data: Some(cached), ..Default::default() });
        }

        self.state.send_replace(MovieDetailState { is_loading: true, ..Default::default() });

        let state = match self.api.movie_detail(id).await {
            Ok(detail) => {
                self.cache.insert(id, detail.clone());
                MovieDetailState { data: Some(detail), ..Default::default() }
            }
            Err(error) => {
                warn!("Movie detail load failed for {}: {}", id, error);
                self.toasts.open_toast(Toast::error(failure_message(&error, DETAIL_FAILED)));
                MovieDetailState { error: Some(error), ..Default::default() }
            }
        };

        self.publish(state)
    }

    pub fn invalidate(&self, id: u64) -> bool {
        self.cache.invalidate(&id)
    }

    fn publish(&self, state: MovieDetailState) -> MovieDetailState {
        self.state.send_replace(state.clone());
        state
    }
}
