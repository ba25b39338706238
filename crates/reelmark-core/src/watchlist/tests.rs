use super::*;
use crate::storage::MemoryStore;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Semaphore;

fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        original_language: "en".to_string(),
        ..Movie::default()
    }
}

fn ids(list: &[Movie]) -> Vec<u64> {
    list.iter().map(|m| m.id).collect()
}

fn stored_ids(store: &MemoryStore) -> Vec<u64> {
    let raw = store.get(WATCHLIST_KEY).unwrap();
    let items: Vec<Value> = serde_json::from_str(&raw).unwrap();
    items.iter().map(|item| item["id"].as_u64().unwrap()).collect()
}

/// Store whose reads wait until a permit is released
struct GatedStore {
    inner: MemoryStore,
    gate: Semaphore,
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _permit = self.gate.acquire().await.unwrap();
        self.inner.get_item(key).await
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value)
    }
}

/// Reads succeed from `inner`, writes are refused
struct ReadOnlyStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).await
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

#[tokio::test]
async fn test_hydrate_empty_store() {
    let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));
    assert_eq!(watchlist.hydration_state(), HydrationState::Uninitialized);
    assert!(!watchlist.is_loading());

    assert_eq!(watchlist.hydrate().await.unwrap(), 0);
    assert_eq!(watchlist.hydration_state(), HydrationState::Ready);
    assert!(watchlist.is_empty());
}

#[tokio::test]
async fn test_hydrate_normalizes_stored_entries() {
    let store = MemoryStore::with_item(
        WATCHLIST_KEY,
        r#"[{"id": 438631, "title": "Dune", "popularity": 321.5}, {"id": 7}]"#,
    );
    let watchlist = Watchlist::new(Arc::new(store));
    assert_eq!(watchlist.hydrate().await.unwrap(), 2);

    let list = watchlist.list();
    assert_eq!(list[0].title, "Dune");
    assert_eq!(list[1].title, "Unknown Title");
    assert_eq!(list[1].original_language, "en");
}

#[tokio::test]
async fn test_hydrate_corrupt_data_starts_empty() {
    for raw in ["{not json", r#"{"id": 1}"#, "null"] {
        let store = Arc::new(MemoryStore::with_item(WATCHLIST_KEY, raw));
        let watchlist = Watchlist::new(store.clone());
        assert_eq!(watchlist.hydrate().await.unwrap(), 0);
        assert_eq!(watchlist.hydration_state(), HydrationState::Ready);
        // left untouched until the next mutation
        assert_eq!(store.get(WATCHLIST_KEY).as_deref(), Some(raw));
    }
}

#[tokio::test]
async fn test_hydrate_read_failure_is_reported() {
    let watchlist = Watchlist::new(Arc::new(FailingStore));
    assert!(watchlist.hydrate().await.is_err());
    assert_eq!(watchlist.hydration_state(), HydrationState::Ready);
    assert!(watchlist.is_empty());
}

#[tokio::test]
async fn test_hydrate_runs_once() {
    let store = Arc::new(MemoryStore::with_item(WATCHLIST_KEY, r#"[{"id": 1}]"#));
    let watchlist = Watchlist::new(store.clone());
    watchlist.hydrate().await.unwrap();

    store.set_item(WATCHLIST_KEY, r#"[{"id": 1}, {"id": 2}]"#).unwrap();
    assert_eq!(watchlist.hydrate().await.unwrap(), 1);
}

#[tokio::test]
async fn test_is_loading_during_hydration() {
    let store = Arc::new(GatedStore {
        inner: MemoryStore::with_item(WATCHLIST_KEY, r#"[{"id": 1}]"#),
        gate: Semaphore::new(0),
    });
    let watchlist = Watchlist::new(store.clone());

    let task = {
        let watchlist = watchlist.clone();
        tokio::spawn(async move { watchlist.hydrate().await })
    };

    while !watchlist.is_loading() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    watchlist.add(movie(2, "Added while loading")).unwrap();

    // held in memory until the stored list is read
    assert_eq!(store.inner.get(WATCHLIST_KEY).as_deref(), Some(r#"[{"id": 1}]"#));

    store.gate.add_permits(1);
    assert_eq!(task.await.unwrap().unwrap(), 2);
    assert!(!watchlist.is_loading());
    assert_eq!(ids(&watchlist.list()), vec![1, 2]);
    assert_eq!(stored_ids(&store.inner), vec![1, 2]);
}

#[tokio::test]
async fn test_hydration_without_changes_leaves_store_untouched() {
    let raw = r#"[{"id": 1}]"#;
    let store = Arc::new(MemoryStore::with_item(WATCHLIST_KEY, raw));
    let watchlist = Watchlist::new(store.clone());
    watchlist.hydrate().await.unwrap();
    assert_eq!(store.get(WATCHLIST_KEY).as_deref(), Some(raw));
}

#[tokio::test]
async fn test_add_then_remove_during_hydration_keeps_stored_list() {
    let store = Arc::new(GatedStore {
        inner: MemoryStore::with_item(WATCHLIST_KEY, r#"[{"id": 1}, {"id": 3}]"#),
        gate: Semaphore::new(0),
    });
    let watchlist = Watchlist::new(store.clone());

    let task = {
        let watchlist = watchlist.clone();
        tokio::spawn(async move { watchlist.hydrate().await })
    };
    while !watchlist.is_loading() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    watchlist.add(movie(2, "Arrival")).unwrap();
    assert_eq!(watchlist.remove(2).unwrap(), 1);

    store.gate.add_permits(1);
    assert_eq!(task.await.unwrap().unwrap(), 2);
    assert_eq!(ids(&watchlist.list()), vec![1, 3]);
    assert_eq!(stored_ids(&store.inner), vec![1, 3]);
}

#[tokio::test]
async fn test_add_persists_and_allows_duplicates() {
    let store = Arc::new(MemoryStore::new());
    let watchlist = Watchlist::new(store.clone());
    watchlist.hydrate().await.unwrap();

    watchlist.add(movie(1, "Dune")).unwrap();
    watchlist.add(movie(2, "Arrival")).unwrap();
    watchlist.add(movie(1, "Dune")).unwrap();

    assert_eq!(ids(&watchlist.list()), vec![1, 2, 1]);
    assert_eq!(stored_ids(&store), vec![1, 2, 1]);
}

#[tokio::test]
async fn test_remove_drops_every_match() {
    let store = Arc::new(MemoryStore::new());
    let watchlist = Watchlist::new(store.clone());
    for (id, title) in [(1, "Dune"), (2, "Arrival"), (1, "Dune")] {
        watchlist.add(movie(id, title)).unwrap();
    }

    assert_eq!(watchlist.remove(1).unwrap(), 2);
    assert_eq!(watchlist.remove(99).unwrap(), 0);
    assert_eq!(stored_ids(&store), vec![2]);
    assert!(!watchlist.contains(1));
}

#[tokio::test]
async fn test_toggle() {
    let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));
    assert!(watchlist.toggle(movie(5, "Heat")).unwrap());
    assert!(watchlist.contains(5));
    assert_eq!(watchlist.get(5).map(|m| m.title), Some("Heat".to_string()));
    assert!(!watchlist.toggle(movie(5, "Heat")).unwrap());
    assert!(watchlist.is_empty());
}

#[tokio::test]
async fn test_order_by_persists_new_order() {
    let store = Arc::new(MemoryStore::new());
    let watchlist = Watchlist::new(store.clone());
    for (id, popularity) in [(1, 10.0), (2, 90.0), (3, 40.0)] {
        watchlist.add(Movie { popularity, ..movie(id, "m") }).unwrap();
    }

    watchlist.order_by(OrderKey::Popularity, OrderDirection::Desc).unwrap();
    assert_eq!(ids(&watchlist.list()), vec![2, 3, 1]);
    assert_eq!(stored_ids(&store), vec![2, 3, 1]);
}

#[tokio::test]
async fn test_clones_share_state() {
    let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));
    let other = watchlist.clone();
    watchlist.add(movie(1, "Dune")).unwrap();
    assert!(other.contains(1));
    assert_eq!(other.len(), 1);
}

#[tokio::test]
async fn test_mutation_reports_write_failure() {
    let store = Arc::new(ReadOnlyStore {
        inner: MemoryStore::with_item(WATCHLIST_KEY, r#"[{"id": 1}, {"id": 2}]"#),
    });
    let watchlist = Watchlist::new(store.clone());
    watchlist.hydrate().await.unwrap();

    let err = watchlist.add(movie(3, "Heat")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
    assert!(watchlist.remove(1).is_err());
    assert!(watchlist.order_by(OrderKey::Popularity, OrderDirection::Desc).is_err());
    assert!(watchlist.toggle(movie(2, "m")).is_err());

    // memory still matches what is stored
    assert_eq!(ids(&watchlist.list()), vec![1, 2]);
    assert_eq!(stored_ids(&store.inner), vec![1, 2]);
}

#[tokio::test]
async fn test_failed_write_before_hydration_leaves_list_empty() {
    let watchlist = Watchlist::new(Arc::new(FailingStore));
    assert!(watchlist.add(movie(1, "Dune")).is_err());
    assert!(watchlist.is_empty());
}
