pub mod context;
pub mod movie_detail;
pub mod movie_list;
pub mod order;
pub mod revalidate;
pub mod storage;
pub mod toast;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::AppContext;
pub use movie_detail::{MovieDetailResource, MovieDetailState};
pub use movie_list::{MovieListKey, MovieListResource, MovieListState};
pub use order::order_list;
pub use revalidate::RevalidationCache;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use toast::{ToastChannel, DEFAULT_TOAST_TTL};
pub use watchlist::{HydrationState, Watchlist, WATCHLIST_KEY};
