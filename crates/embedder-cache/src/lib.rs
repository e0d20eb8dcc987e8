//! Key-value cache stores for embed markup.
//!
//! This crate provides the [`Cache`] trait that decouples the embedder from
//! the underlying storage mechanism. Values are markup strings; a stored
//! `None` records that a transformer legitimately produced nothing.
//!
//! # Implementations
//!
//! - [`NullCache`]: No-op implementation (always misses)
//! - [`MemoryCache`]: Concurrent in-process map
//! - [`FileCache`]: File-based implementation with version validation
//!
//! # Example
//!
//! ```
//! use embedder_cache::{Cache, MemoryCache, NullCache};
//!
//! let cache = NullCache;
//! cache.set("remark-embedder:video:https://example.com/", Some("<iframe></iframe>"));
//! assert_eq!(cache.get("remark-embedder:video:https://example.com/"), None);
//!
//! let cache = MemoryCache::new();
//! cache.set("key", Some("<div>x</div>"));
//! assert_eq!(cache.get("key").as_deref(), Some("<div>x</div>"));
//! ```

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileCache;
pub use memory::MemoryCache;

/// A synchronous key-value store for rendered markup.
///
/// Implementations must tolerate concurrent `get`/`set` calls from several
/// in-flight embeds; both operations are idempotent.
pub trait Cache: Send + Sync {
    /// Retrieve cached markup.
    ///
    /// Returns `None` on a miss **and** when the key was stored with a `None`
    /// value, so callers treat "nothing cached" and "cached nothing" alike.
    fn get(&self, key: &str) -> Option<String>;

    /// Store markup (or the absence of it) under `key`.
    ///
    /// Overwrites any existing entry for the same key.
    fn set(&self, key: &str, value: Option<&str>);
}

/// Shared handles delegate to the inner cache, so a caller can keep a
/// reference for inspection while the embedder holds another.
impl<C: Cache + ?Sized> Cache for Arc<C> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Option<&str>) {
        (**self).set(key, value);
    }
}

/// No-op [`Cache`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded. Use when
/// caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: Option<&str>) {}
}
