//! Embedding rich content for bare URLs in markdown trees.
//!
//! A paragraph whose only content is a URL (a bare link or a plain
//! auto-link) is a candidate. For each candidate the [`Embedder`] asks its
//! registered [`Transformer`]s, in order, whether they handle the URL, then
//! resolves markup through the cache or the chosen transformer and attaches
//! it to the paragraph as an embed annotation.
//!
//! # Architecture
//!
//! - [`url`]: URL normalization
//! - [`scan`]: candidate discovery
//! - [`transformer`]: the [`Transformer`] trait and the ordered [`Registry`]
//! - `fetch`: cache-or-render resolution with error recovery ([`EmbedCache`], [`ErrorHandler`])
//! - [`splice`]: turning markup into an annotation
//! - [`Embedder`]: the sequential and concurrent drivers
//!
//! Collaborators return [`Deferred`] values, so the same pass runs with
//! synchronous and asynchronous transformers and caches alike.
//!
//! # Example
//!
//! ```
//! use embedder::{Embedder, FnTransformer};
//! use embedder_cache::MemoryCache;
//! use embedder_mdast::{parse_markdown, to_html};
//!
//! let embedder = Embedder::builder()
//!     .transformer(FnTransformer::new(
//!         "video",
//!         |url| url.host_str() == Some("videos.test"),
//!         |url, _| Ok(Some(format!(r#"<iframe src="{url}"></iframe>"#))),
//!     ))
//!     .cache(MemoryCache::new())
//!     .build()
//!     .unwrap();
//!
//! let mut tree = parse_markdown("<https://videos.test/42>");
//! embedder.transform_sync(&mut tree).unwrap();
//!
//! assert_eq!(to_html(&tree), r#"<iframe src="https://videos.test/42"></iframe>"#);
//! ```

mod cache;
mod consts;
mod deferred;
mod embedder;
mod error;
mod fetch;
pub mod scan;
pub mod splice;
pub mod transformer;
pub mod url;

#[cfg(test)]
mod testing;

pub use self::cache::{EmbedCache, cache_key};
pub use self::deferred::Deferred;
pub use self::embedder::{Embedder, EmbedderBuilder};
pub use self::error::{BoxError, EmbedError, EmbedFailure, ErrorContext, ErrorHandler, banner};
pub use self::scan::Candidate;
pub use self::transformer::{FnTransformer, Registry, Resolved, Transformer, TransformerEntry};
pub use self::url::normalize_url;
pub use ::url::Url;
