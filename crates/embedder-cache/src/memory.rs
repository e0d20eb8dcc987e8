//! In-process cache backed by a concurrent map.

use dashmap::DashMap;

use crate::Cache;

/// In-memory [`Cache`] shared between concurrently running embeds.
///
/// Keeps `None` entries so callers can tell a key that was written with
/// "no markup" apart from one that was never written (see
/// [`contains_key`](Self::contains_key)).
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Option<String>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` was ever written, including writes of `None`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).and_then(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: Option<&str>) {
        self.entries
            .insert(key.to_owned(), value.map(ToOwned::to_owned));
    }
}
