//! Request cache for fetched pages.
//!
//! Entries are keyed by `endpoint?query` so every (resource, page, sort,
//! filter) combination is cached independently. Writes invalidate a whole
//! resource by prefix, and optimistic edits hand back a [`Rollback`] that
//! restores the previous value if the request behind them fails.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Entry = Arc<dyn Any + Send + Sync>;

/// Cloneable handle to a shared cache.
#[derive(Clone, Default)]
pub struct RequestCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

/// Previous value of an optimistically mutated entry.
#[must_use = "a rollback does nothing unless passed to `RequestCache::rollback`"]
pub struct Rollback {
    key: String,
    previous: Entry,
}

impl Rollback {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("len", &self.len())
            .finish()
    }
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for one request.
    pub fn key(endpoint: &str, query: &str) -> String {
        if query.is_empty() {
            endpoint.to_owned()
        } else {
            format!("{endpoint}?{query}")
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the cached value, if present and of type `T`.
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|entry| entry.downcast_ref::<T>())
            .cloned()
    }

    pub fn insert<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.lock().insert(key.into(), Arc::new(value));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry of a resource: the bare endpoint and all of its
    /// `endpoint?...` variants. Returns how many entries were dropped.
    pub fn invalidate_prefix(&self, endpoint: &str) -> usize {
        let query_prefix = format!("{endpoint}?");
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| key != endpoint && !key.starts_with(&query_prefix));
        let dropped = before - entries.len();
        log::debug!("Invalidated {dropped} cached entries under {endpoint}");
        dropped
    }

    /// Applies `edit` to a copy of the cached value and stores the result.
    ///
    /// Returns `None` when nothing of type `T` is cached under `key`.
    pub fn mutate_optimistic<T>(&self, key: &str, edit: impl FnOnce(&mut T)) -> Option<Rollback>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.lock();
        let previous = entries.get(key)?.clone();
        let mut next = previous.downcast_ref::<T>()?.clone();
        edit(&mut next);
        entries.insert(key.to_owned(), Arc::new(next));

        Some(Rollback {
            key: key.to_owned(),
            previous,
        })
    }

    /// Restores the value captured by an optimistic edit.
    pub fn rollback(&self, rollback: Rollback) {
        log::debug!("Rolling back optimistic edit of {}", rollback.key);
        self.lock().insert(rollback.key, rollback.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(RequestCache::key("assets", "page=0&size=20"), "assets?page=0&size=20");
        assert_eq!(RequestCache::key("categories", ""), "categories");
    }

    #[test]
    fn test_get_is_typed() {
        let cache = RequestCache::new();
        cache.insert("assets?page=0", vec![1_u32, 2, 3]);

        assert_eq!(cache.get::<Vec<u32>>("assets?page=0"), Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<String>("assets?page=0"), None);
        assert_eq!(cache.get::<Vec<u32>>("assets?page=1"), None);
    }

    #[test]
    fn test_invalidate_prefix_only_hits_one_resource() {
        let cache = RequestCache::new();
        cache.insert("assets", 0_u8);
        cache.insert("assets?page=0", 1_u8);
        cache.insert("assets?page=1", 2_u8);
        cache.insert("assets-history?page=0", 3_u8);
        cache.insert("users?page=0", 4_u8);

        assert_eq!(cache.invalidate_prefix("assets"), 3);
        assert!(cache.contains("assets-history?page=0"));
        assert!(cache.contains("users?page=0"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_optimistic_edit_and_rollback() {
        let cache = RequestCache::new();
        cache.insert("users?page=0", vec!["annv".to_owned(), "binhnt".to_owned()]);

        let rollback = cache
            .mutate_optimistic::<Vec<String>>("users?page=0", |users| {
                users.retain(|name| name != "annv");
            })
            .expect("entry is cached");

        assert_eq!(
            cache.get::<Vec<String>>("users?page=0"),
            Some(vec!["binhnt".to_owned()])
        );

        cache.rollback(rollback);
        assert_eq!(
            cache.get::<Vec<String>>("users?page=0").map(|users| users.len()),
            Some(2)
        );
    }

    #[test]
    fn test_optimistic_edit_on_missing_entry() {
        let cache = RequestCache::new();
        assert!(
            cache
                .mutate_optimistic::<Vec<String>>("users?page=0", |users| users.clear())
                .is_none()
        );
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = RequestCache::new();
        let other = cache.clone();
        other.insert("assets?page=0", 1_u8);
        assert!(cache.contains("assets?page=0"));
        assert_eq!(cache.invalidate_prefix("assets"), 1);
        assert!(other.is_empty());
    }
}
