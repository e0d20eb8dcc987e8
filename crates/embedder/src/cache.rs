//! Cache access for rendered markup.

use std::fmt::Write;

use embedder_cache::Cache;
use url::Url;

use crate::consts::NAMESPACE;
use crate::deferred::Deferred;

/// Markup store consulted before calling a transformer.
///
/// Every synchronous [`Cache`] implements this trait, so any store from
/// `embedder_cache` can be passed directly. Stores backed by asynchronous
/// I/O implement it by returning [`Deferred::pending`].
pub trait EmbedCache: Send + Sync {
    /// Cached markup for `key`, `None` on a miss.
    fn get<'a>(&'a self, key: &'a str) -> Deferred<'a, Option<String>>;

    /// Store markup for `key`. `None` records that there was nothing to embed.
    fn set<'a>(&'a self, key: &'a str, value: Option<&'a str>) -> Deferred<'a, ()>;
}

impl<C: Cache + ?Sized> EmbedCache for C {
    fn get<'a>(&'a self, key: &'a str) -> Deferred<'a, Option<String>> {
        Deferred::ready(Cache::get(self, key))
    }

    fn set<'a>(&'a self, key: &'a str, value: Option<&'a str>) -> Deferred<'a, ()> {
        Cache::set(self, key, value);
        Deferred::ready(())
    }
}

/// Cache key for markup produced by `transformer` for `url`.
///
/// # Example
///
/// ```
/// use embedder::cache_key;
///
/// let url = url::Url::parse("https://example.com").unwrap();
/// assert_eq!(cache_key("video", &url), "remark-embedder:video:https://example.com/");
/// ```
pub fn cache_key(transformer: &str, url: &Url) -> String {
    let mut key = String::with_capacity(NAMESPACE.len() + transformer.len() + url.as_str().len() + 2);
    write!(key, "{NAMESPACE}:{transformer}:{url}").unwrap();
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedder_cache::{MemoryCache, NullCache};
    use futures::executor::block_on;

    #[test]
    fn test_cache_key_format() {
        let url = Url::parse("https://codesandbox.io/s/abc?x=1").unwrap();
        assert_eq!(
            cache_key("CodeSandbox", &url),
            "remark-embedder:CodeSandbox:https://codesandbox.io/s/abc?x=1"
        );
    }

    #[test]
    fn test_sync_cache_is_ready() {
        let cache = MemoryCache::new();

        let set = EmbedCache::set(&cache, "k", Some("<div>x</div>"));
        assert!(set.is_ready());
        block_on(set);

        let get = EmbedCache::get(&cache, "k");
        assert!(get.is_ready());
        assert_eq!(block_on(get).as_deref(), Some("<div>x</div>"));
    }

    #[test]
    fn test_null_cache_as_embed_cache() {
        let cache: Box<dyn EmbedCache> = Box::new(NullCache);

        block_on(cache.set("k", Some("v")));

        assert_eq!(block_on(cache.get("k")), None);
    }
}
