use reelmark_models::{Movie, OrderDirection, OrderKey};
use reelmark_sources::transform_movie;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::order::order_list;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the watchlist as a JSON array of movies
pub const WATCHLIST_KEY: &str = "watchList";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    Uninitialized,
    Hydrating,
    Ready,
}

struct WatchlistState {
    movies: Vec<Movie>,
    hydration: HydrationState,
    // Set by mutations made while the stored list is still being read
    pending_write: bool,
}

/// Shared, persisted list of saved movies.
///
/// Clones are handles onto the same list. Every mutation writes the whole
/// list back to the store before it becomes visible; a failed write leaves the
/// list unchanged. While hydrating, mutations stay in memory and hydration
/// writes the merged list once the stored one is read. Duplicates are not rejected here;
/// callers that want set semantics check `contains` first or use `toggle`.
#[derive(Clone)]
pub struct Watchlist {
    store: Arc<dyn KeyValueStore>,
    state: Arc<RwLock<WatchlistState>>,
}

impl Watchlist {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(WatchlistState {
                movies: Vec::new(),
                hydration: HydrationState::Uninitialized,
                pending_write: false,
            })),
        }
    }

    pub fn hydration_state(&self) -> HydrationState {
        self.read().hydration
    }

    /// True only while the stored list is being read
    pub fn is_loading(&self) -> bool {
        self.hydration_state() == HydrationState::Hydrating
    }

    /// Load the persisted list. Runs once; later calls return the current length.
    ///
    /// Absent or corrupt stored data yields an empty list. A read failure
    /// still leaves the container ready (and empty) but is returned so the
    /// caller can report it. Movies added while hydrating are kept after the
    /// stored ones and the merged list is written back, unless the read failed.
    /// A failed write-back is returned; the merged list stays in memory.
    pub async fn hydrate(&self) -> Result<usize, StorageError> {
        {
            let mut state = self.write();
            if state.hydration != HydrationState::Uninitialized {
                return Ok(state.movies.len());
            }
            state.hydration = HydrationState::Hydrating;
        }

        let stored = self.store.get_item(WATCHLIST_KEY).await;

        let (stored_movies, result) = match stored {
            Ok(Some(raw)) => (parse_stored(&raw), Ok(())),
            Ok(None) => {
                debug!("No stored watchlist, starting empty");
                (Vec::new(), Ok(()))
            }
            Err(e) => {
                warn!("Failed to read stored watchlist: {}", e);
                (Vec::new(), Err(e))
            }
        };

        let mut state = self.write();
        let added_meanwhile = std::mem::replace(&mut state.movies, stored_movies);
        state.movies.extend(added_meanwhile);
        state.hydration = HydrationState::Ready;
        let pending_write = std::mem::take(&mut state.pending_write);
        info!("Watchlist ready with {} movies", state.movies.len());

        result?;
        if pending_write {
            debug!("Writing back changes made while hydrating");
            self.persist(&state.movies)?;
        }
        Ok(state.movies.len())
    }

    pub fn add(&self, movie: Movie) -> Result<(), StorageError> {
        let mut state = self.write();
        debug!("Adding movie {} ({}) to watchlist", movie.id, movie.title);
        let mut movies = state.movies.clone();
        movies.push(movie);
        self.commit(&mut state, movies)
    }

    /// Remove every entry with `movie_id`; returns how many were dropped
    pub fn remove(&self, movie_id: u64) -> Result<usize, StorageError> {
        let mut state = self.write();
        let movies: Vec<Movie> = state.movies.iter().filter(|m| m.id != movie_id).cloned().collect();
        let removed = state.movies.len() - movies.len();
        debug!("Removing {} entries for movie {} from watchlist", removed, movie_id);
        self.commit(&mut state, movies)?;
        Ok(removed)
    }

    /// Add when absent, remove when present. Returns whether the movie is now saved.
    pub fn toggle(&self, movie: Movie) -> Result<bool, StorageError> {
        if self.contains(movie.id) {
            self.remove(movie.id)?;
            Ok(false)
        } else {
            self.add(movie)?;
            Ok(true)
        }
    }

    /// Reorder the stored list in place and persist the new order
    pub fn order_by(&self, key: OrderKey, direction: OrderDirection) -> Result<(), StorageError> {
        let mut state = self.write();
        let movies = order_list(&state.movies, key, direction);
        debug!("Ordering watchlist by {} {}", key, direction);
        self.commit(&mut state, movies)
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.read().movies.iter().any(|m| m.id == movie_id)
    }

    pub fn get(&self, movie_id: u64) -> Option<Movie> {
        self.read().movies.iter().find(|m| m.id == movie_id).cloned()
    }

    pub fn list(&self) -> Vec<Movie> {
        self.read().movies.clone()
    }

    pub fn len(&self) -> usize {
        self.read().movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persist `movies` then make them current. Writes wait for hydration.
    fn commit(&self, state: &mut WatchlistState, movies: Vec<Movie>) -> Result<(), StorageError> {
        if state.hydration == HydrationState::Hydrating {
            state.pending_write = true;
        } else {
            self.persist(&movies)?;
        }
        state.movies = movies;
        Ok(())
    }

    fn persist(&self, movies: &[Movie]) -> Result<(), StorageError> {
        let json = serde_json::to_string(movies).map_err(|source| StorageError::Serialize {
            key: WATCHLIST_KEY.to_string(),
            source,
        })?;
        self.store.set_item(WATCHLIST_KEY, &json)?;
        debug!("Persisted watchlist ({} movies)", movies.len());
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, WatchlistState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WatchlistState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stored entries go back through normalization so old or hand-edited data
/// still yields complete movies.
fn parse_stored(raw: &str) -> Vec<Movie> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().map(transform_movie).collect(),
        Ok(other) => {
            warn!("Stored watchlist is not a list ({}), starting empty", json_kind(&other));
            Vec::new()
        }
        Err(e) => {
            warn!("Stored watchlist is corrupt ({}), starting empty", e);
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests;
