use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed response cache shared by the data resources.
///
/// Without a max age, entries live until invalidated. With one, older entries
/// are treated as missing so the next load refetches.
pub struct RevalidationCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    max_age: Option<Duration>,
}

impl<K: Eq + Hash, V: Clone> RevalidationCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_age: None,
        }
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_age: Some(max_age),
        }
    }

    /// Expired entries are dropped on lookup
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        let expired = self.max_age.is_some_and(|max_age| entry.stored_at.elapsed() >= max_age);
        if expired {
            entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        self.lock().insert(key, Entry { value, stored_at: Instant::now() });
    }

    /// Returns whether an entry was dropped
    pub fn invalidate(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash, V: Clone> Default for RevalidationCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_invalidate() {
        let cache = RevalidationCache::new();
        cache.insert((1, None::<String>), vec![1, 2]);
        assert_eq!(cache.get(&(1, None)), Some(vec![1, 2]));
        assert_eq!(cache.get(&(2, None)), None);

        assert!(cache.invalidate(&(1, None)));
        assert!(!cache.invalidate(&(1, None)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = RevalidationCache::new();
        cache.insert(1u64, "a".to_string());
        cache.insert(2u64, "b".to_string());
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_expired_entries_are_missing() {
        let cache = RevalidationCache::with_max_age(Duration::ZERO);
        cache.insert(1u64, 10);
        cache.insert(2u64, 20);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), None);
        assert!(cache.is_empty());

        let cache = RevalidationCache::with_max_age(Duration::from_secs(3600));
        cache.insert(1u64, 10);
        assert_eq!(cache.get(&1), Some(10));
    }
}
